use crate::token::Token;

/// The AST render mode: the token tree as nested mappings, each token a
/// `{type, raw?, text?, children?, attrs?}` object. Unlike the HTML
/// renderer this accepts every token kind, so it is also the debugging lens
/// for plugin-emitted trees.
pub fn ast_value(tokens: &[Token]) -> serde_json::Value {
    serde_json::to_value(tokens).expect("token serialization is infallible")
}
