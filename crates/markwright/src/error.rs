use thiserror::Error;

/// Errors surfaced by the pipeline. Parsing itself never fails: unmatched
/// constructs degrade to literal text, so everything here comes from
/// rendering dispatch or from strict-mode extension handlers.
#[derive(Debug, Error)]
pub enum Error {
    /// A token kind reached the renderer without a registered method for it.
    #[error("no render method registered for token kind `{kind}`")]
    MissingRenderMethod { kind: String },

    /// A directive named in the source has no registered handler and the
    /// directive plugin is running in strict mode.
    #[error("directive `{name}` is not registered")]
    DirectiveNotRegistered { name: String },

    /// A directive handler rejected its payload in strict mode.
    #[error("directive `{name}` is malformed: {reason}")]
    DirectiveMalformed { name: String, reason: String },

    /// The include resolver failed to produce content for a path.
    #[error("failed to include `{path}`: {source}")]
    IncludeResolution {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
