//! Validation rule engine.
//!
//! Each rule is a pure check of one value that yields at most one message.
//! [`validate_value`] applies the required check first, then every declared
//! rule in declaration order, accumulating messages.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{trace, warn};

use crate::types::{as_number, scalar_to_string, FieldConfig, ValidationResult};

/// Email address pattern
pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("valid email regex"));

/// A numeric bound together with how the host wrote it, so messages echo
/// `0` rather than `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub display: String,
}

impl Bound {
    fn from_param(param: &Value) -> Option<Self> {
        let value = as_number(param)?;
        let display = match param {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        Some(Self { value, display })
    }
}

/// One declared validation rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    Min(Bound),
    Max(Bound),
    Pattern(String),
    Email,
    Url,
}

impl Rule {
    /// Interpret one `validation` entry. Unknown rules, disabled flags and
    /// unusable parameters yield `None`.
    pub fn from_declaration(name: &str, param: &Value) -> Option<Rule> {
        let enabled = !matches!(param, Value::Bool(false) | Value::Null);
        match name {
            "required" if enabled => Some(Rule::Required),
            "min" => Bound::from_param(param).map(Rule::Min),
            "max" => Bound::from_param(param).map(Rule::Max),
            "pattern" => param.as_str().map(|p| Rule::Pattern(p.to_string())),
            "email" if enabled => Some(Rule::Email),
            "url" if enabled => Some(Rule::Url),
            "required" | "email" | "url" => None,
            other => {
                trace!(rule = other, "ignoring unknown validation rule");
                None
            }
        }
    }

    /// Evaluate this rule against `value`.
    pub fn check(&self, label: &str, value: &Value) -> Option<String> {
        match self {
            Rule::Required => check_required(label, value),
            Rule::Min(bound) => check_min(label, value, bound),
            Rule::Max(bound) => check_max(label, value, bound),
            Rule::Pattern(pattern) => check_pattern(label, value, pattern),
            Rule::Email => check_email(label, value),
            Rule::Url => check_url(label, value),
        }
    }
}

/// Null, blank strings, empty collections and `false` count as empty.
/// Numeric zero and the string `"0"` do not.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

pub fn check_required(label: &str, value: &Value) -> Option<String> {
    is_empty_value(value).then(|| format!("{label} is required."))
}

/// How a value is measured against min/max: numerically when it is numeric,
/// otherwise by character (or element) count.
enum Measure {
    Numeric(f64),
    Length(f64),
}

fn measure(value: &Value) -> Option<Measure> {
    if let Some(n) = as_number(value) {
        return Some(Measure::Numeric(n));
    }
    match value {
        Value::String(s) => Some(Measure::Length(s.chars().count() as f64)),
        Value::Array(items) => Some(Measure::Length(items.len() as f64)),
        _ => None,
    }
}

pub fn check_min(label: &str, value: &Value, bound: &Bound) -> Option<String> {
    match measure(value)? {
        Measure::Numeric(n) if n < bound.value => {
            Some(format!("{label} must be at least {}.", bound.display))
        }
        Measure::Length(len) if len < bound.value => Some(format!(
            "{label} must be at least {} characters long.",
            bound.display
        )),
        _ => None,
    }
}

pub fn check_max(label: &str, value: &Value, bound: &Bound) -> Option<String> {
    match measure(value)? {
        Measure::Numeric(n) if n > bound.value => {
            Some(format!("{label} must be no more than {}.", bound.display))
        }
        Measure::Length(len) if len > bound.value => Some(format!(
            "{label} must be no more than {} characters long.",
            bound.display
        )),
        _ => None,
    }
}

/// Compile a declared pattern. Accepts bare regexes and `/.../flags` style
/// delimited patterns (`i`, `m`, `s`, `x` flags).
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    let source = match delimited(pattern) {
        Some((body, flags)) if flags.is_empty() => body.to_string(),
        Some((body, flags)) => format!("(?{flags}){body}"),
        None => pattern.to_string(),
    };
    match Regex::new(&source) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pattern, %e, "skipping invalid validation pattern");
            None
        }
    }
}

fn delimited(pattern: &str) -> Option<(&str, &str)> {
    let rest = pattern.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    let flags = &rest[end + 1..];
    flags
        .chars()
        .all(|c| matches!(c, 'i' | 'm' | 's' | 'x'))
        .then(|| (&rest[..end], flags))
}

pub fn check_pattern(label: &str, value: &Value, pattern: &str) -> Option<String> {
    let text = match value {
        Value::String(_) | Value::Number(_) => scalar_to_string(value),
        _ => return None,
    };
    let re = compile_pattern(pattern)?;
    (!re.is_match(&text)).then(|| format!("{label} format is invalid."))
}

/// Skipped for empty input; emptiness belongs to the required check.
pub fn check_email(label: &str, value: &Value) -> Option<String> {
    if is_empty_value(value) {
        return None;
    }
    let text = scalar_to_string(value);
    (!EMAIL_RE.is_match(&text)).then(|| format!("{label} must be a valid email address."))
}

/// Skipped for empty input; emptiness belongs to the required check.
pub fn check_url(label: &str, value: &Value) -> Option<String> {
    if is_empty_value(value) {
        return None;
    }
    let text = scalar_to_string(value);
    let valid = url::Url::parse(&text)
        .map(|u| u.has_host())
        .unwrap_or(false);
    (!valid).then(|| format!("{label} must be a valid URL."))
}

/// Validate `value` against a field declaration.
///
/// A required, empty value produces exactly one message and nothing else runs.
/// Otherwise every declared rule runs in order, followed by `implicit` rules
/// the field type adds (for example `email` for email inputs) unless the host
/// already declared them.
pub fn validate_value(
    config: &FieldConfig,
    label: &str,
    value: &Value,
    implicit: &[Rule],
) -> ValidationResult {
    let required = config.required
        || config
            .validation
            .get("required")
            .is_some_and(|p| matches!(Rule::from_declaration("required", p), Some(Rule::Required)));

    if required {
        if let Some(message) = check_required(label, value) {
            return ValidationResult::from_errors(vec![message]);
        }
    }

    let mut rules: Vec<Rule> = config
        .validation
        .iter()
        .filter(|(name, _)| name.as_str() != "required")
        .filter_map(|(name, param)| Rule::from_declaration(name, param))
        .collect();
    for rule in implicit {
        if !rules.contains(rule) {
            rules.push(rule.clone());
        }
    }

    let errors = rules
        .iter()
        .filter_map(|rule| rule.check(label, value))
        .collect();
    ValidationResult::from_errors(errors)
}
