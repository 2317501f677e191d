use std::borrow::Cow;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// An attribute value attached to a token. Attribute maps are intentionally
/// loose so that plugins can annotate tokens without the core needing to know
/// about every kind in advance.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Null,
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.into())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttrValue::Str(value) => serializer.serialize_str(value),
            AttrValue::Int(value) => serializer.serialize_i64(*value),
            AttrValue::Bool(value) => serializer.serialize_bool(*value),
            AttrValue::Null => serializer.serialize_unit(),
        }
    }
}

/// An insertion-ordered attribute list. Tokens rarely carry more than a
/// handful of attributes, so a flat list beats a map both in memory and in
/// iteration order stability.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attrs(Vec<(Cow<'static, str>, AttrValue)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Insert or replace the attribute with the given name.
    pub fn set(&mut self, name: impl Into<Cow<'static, str>>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(key, value)| (key.as_ref(), value))
    }
}

impl Serialize for Attrs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A single node in the document tree.
///
/// A token is either a *container* (`children` is present) or a *leaf*. A
/// leaf whose `text` is set before the inline phase has run is a *raw leaf*:
/// the inline parser consumes `text` and replaces it with `children`. Leaves
/// that carry literal content that must never be inline-parsed (code blocks,
/// raw HTML) store it in `raw` instead.
///
/// `kind` is an open string identifier rather than a closed enum so that
/// plugins can introduce new token kinds at runtime; the renderer method
/// table is keyed by the same names.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: Cow<'static, str>,
    pub raw: Option<String>,
    pub text: Option<String>,
    pub children: Option<Vec<Token>>,
    pub attrs: Attrs,
}

impl Token {
    pub fn new(kind: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind: kind.into(),
            raw: None,
            text: None,
            children: None,
            attrs: Attrs::new(),
        }
    }

    /// A leaf whose `text` will be consumed by the inline phase.
    pub fn raw_leaf(kind: impl Into<Cow<'static, str>>, text: impl Into<String>) -> Self {
        let mut token = Token::new(kind);
        token.text = Some(text.into());
        token
    }

    /// A leaf carrying literal content that is never inline-parsed.
    pub fn literal(kind: impl Into<Cow<'static, str>>, raw: impl Into<String>) -> Self {
        let mut token = Token::new(kind);
        token.raw = Some(raw.into());
        token
    }

    /// A finished inline text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        let mut token = Token::new("text");
        token.text = Some(text.into());
        token
    }

    pub fn container(kind: impl Into<Cow<'static, str>>, children: Vec<Token>) -> Self {
        let mut token = Token::new(kind);
        token.children = Some(children);
        token
    }

    pub fn with_attr(
        mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<AttrValue>,
    ) -> Self {
        self.attrs.set(name, value);
        self
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(AttrValue::as_str)
    }

    pub fn attr_int(&self, name: &str) -> Option<i64> {
        self.attrs.get(name).and_then(AttrValue::as_int)
    }

    pub fn attr_bool(&self, name: &str) -> bool {
        self.attrs
            .get(name)
            .and_then(AttrValue::as_bool)
            .unwrap_or(false)
    }

    pub fn children(&self) -> &[Token] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Concatenate the plain text carried by this token and its descendants.
    /// Used for image alt text and TOC entries.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_plain_text(self, &mut out);
        out
    }
}

fn collect_plain_text(token: &Token, out: &mut String) {
    match token.kind.as_ref() {
        "linebreak" | "softbreak" => out.push(' '),
        _ => {
            if let Some(children) = &token.children {
                for child in children {
                    collect_plain_text(child, out);
                }
            } else if let Some(text) = &token.text {
                out.push_str(text);
            }
        }
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut len = 1;
        len += self.raw.is_some() as usize;
        len += self.text.is_some() as usize;
        len += self.children.is_some() as usize;
        len += !self.attrs.is_empty() as usize;

        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", &self.kind)?;
        if let Some(raw) = &self.raw {
            map.serialize_entry("raw", raw)?;
        }
        if let Some(text) = &self.text {
            map.serialize_entry("text", text)?;
        }
        if let Some(children) = &self.children {
            map.serialize_entry("children", children)?;
        }
        if !self.attrs.is_empty() {
            map.serialize_entry("attrs", &self.attrs)?;
        }
        map.end()
    }
}
