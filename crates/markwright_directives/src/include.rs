use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use markwright::{BlockParser, BlockState};

use crate::{Directive, DirectiveError, DirectiveHandler};

/// Resolves an include path to source text. The second argument is the base
/// directory owned by the pipeline configuration, when one was set.
pub type IncludeResolver =
    Box<dyn Fn(&str, Option<&Path>) -> io::Result<String> + Send + Sync>;

/// The default resolver: read from the filesystem, joining relative paths
/// onto the base directory.
pub fn fs_resolver() -> IncludeResolver {
    Box::new(|relative, base_dir| {
        let path = match base_dir {
            Some(base) => base.join(relative),
            None => PathBuf::from(relative),
        };
        std::fs::read_to_string(path)
    })
}

/// `.. include:: path` splices the resolved content into the document,
/// block-parsed against the current reference map.
pub struct Include {
    resolver: Arc<IncludeResolver>,
    base_dir: Option<PathBuf>,
}

impl Include {
    pub fn new(resolver: Arc<IncludeResolver>, base_dir: Option<PathBuf>) -> Self {
        Self { resolver, base_dir }
    }
}

impl DirectiveHandler for Include {
    fn handle(
        &self,
        directive: Directive,
        state: &mut BlockState,
        parser: &BlockParser,
    ) -> Result<(), DirectiveError> {
        let relative = directive.title.trim();
        if relative.is_empty() {
            return Err(DirectiveError::malformed("include requires a path"));
        }
        let content = (*self.resolver)(relative, self.base_dir.as_deref()).map_err(|source| {
            DirectiveError::Include {
                path: relative.to_string(),
                source,
            }
        })?;
        for token in parser.parse_container(state, content) {
            state.append(token);
        }
        Ok(())
    }
}
