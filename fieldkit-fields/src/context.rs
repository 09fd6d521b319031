//! Persistence contexts and storage key derivation.
//!
//! A [`Context`] names where a value lives: the meta of one post, the meta of
//! one term, or a settings page. A [`StorageKey`] is the key a leaf field is
//! written under inside that context. Nesting never participates in the key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldsError;

/// Which backend family a context belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    Post,
    Term,
    Settings,
}

impl ContextType {
    pub const ALL: [ContextType; 3] = [ContextType::Post, ContextType::Term, ContextType::Settings];

    /// Resolve a caller-supplied token. Unknown tokens yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "post" => Some(Self::Post),
            "term" => Some(Self::Term),
            "settings" => Some(Self::Settings),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Term => "term",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextType {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| FieldsError::UnknownContextType {
            token: s.to_string(),
        })
    }
}

/// A (type, id) pair identifying where field values are stored.
///
/// Post and term ids are usually numeric, settings ids are page slugs; both
/// are carried as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Context {
    pub context_type: ContextType,
    pub id: String,
}

impl Context {
    pub fn new(context_type: ContextType, id: impl ToString) -> Self {
        Self {
            context_type,
            id: id.to_string(),
        }
    }

    pub fn post(id: impl ToString) -> Self {
        Self::new(ContextType::Post, id)
    }

    pub fn term(id: impl ToString) -> Self {
        Self::new(ContextType::Term, id)
    }

    pub fn settings(id: impl ToString) -> Self {
        Self::new(ContextType::Settings, id)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.context_type, self.id)
    }
}

/// Option name for a field: `{prefix}_{name}` unless prefixing is disabled
/// or there is no prefix.
pub fn option_name(name: &str, prefix: &str, use_name_prefix: bool) -> String {
    if use_name_prefix && !prefix.is_empty() {
        format!("{prefix}_{name}")
    } else {
        name.to_string()
    }
}

/// The key a leaf field's value is read from and written to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey {
    context: Context,
    key: String,
}

impl StorageKey {
    /// Derive the key for `field_name` in `context`.
    ///
    /// Settings keys are flat, so they carry the page id as a prefix. Post and
    /// term keys are the bare name; the backend scopes them by context id.
    pub fn derive(field_name: &str, use_name_prefix: bool, context: &Context) -> Self {
        let key = match context.context_type {
            ContextType::Settings => option_name(field_name, &context.id, use_name_prefix),
            ContextType::Post | ContextType::Term => field_name.to_string(),
        };
        Self {
            context: context.clone(),
            key,
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_type_parses_known_tokens_only() {
        assert_eq!(ContextType::parse("post"), Some(ContextType::Post));
        assert_eq!(ContextType::parse("term"), Some(ContextType::Term));
        assert_eq!(ContextType::parse("settings"), Some(ContextType::Settings));
        assert_eq!(ContextType::parse("user"), None);
        assert!("comment".parse::<ContextType>().is_err());
    }

    #[test]
    fn settings_keys_are_prefixed_with_page_id() {
        let ctx = Context::settings("store-settings");
        let key = StorageKey::derive("currency", true, &ctx);
        assert_eq!(key.key(), "store-settings_currency");
        assert_eq!(key.context(), &ctx);
    }

    #[test]
    fn settings_keys_honor_prefix_opt_out() {
        let ctx = Context::settings("store-settings");
        let key = StorageKey::derive("currency", false, &ctx);
        assert_eq!(key.key(), "currency");
    }

    #[test]
    fn post_and_term_keys_are_bare_names() {
        assert_eq!(StorageKey::derive("price", true, &Context::post(42)).key(), "price");
        assert_eq!(StorageKey::derive("color", true, &Context::term(7)).key(), "color");
    }

    #[test]
    fn numeric_ids_are_carried_as_strings() {
        let ctx = Context::post(42);
        assert_eq!(ctx.id, "42");
        assert_eq!(ctx.to_string(), "post:42");
    }

    #[test]
    fn option_name_without_prefix_is_name() {
        assert_eq!(option_name("title", "", true), "title");
        assert_eq!(option_name("title", "opts", true), "opts_title");
        assert_eq!(option_name("title", "opts", false), "title");
    }
}
