//! Field rules and the pure validation function.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::net::types::timestamp;

/// Same shape the browser's `type=email` check accepts: a dot-atom local
/// part, `@`, then dot-separated host labels (a TLD is not required).
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("invalid email regex")
});

const EMAIL_MAX_LEN: usize = 254;
const EMAIL_LOCAL_MAX_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value must not be empty.
    Required,
    /// Value, when present, must look like an email address.
    Email,
    /// Value, when present, must be a `YYYY-MM-DD` calendar day.
    Day,
    /// Value, when present, must be a whole number.
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldError {
    Required,
    Email,
    Day,
    Integer,
}

impl FieldError {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Email => "email",
            Self::Day => "date",
            Self::Integer => "number",
        }
    }
}

/// A form's field set. Implemented by small `Copy` enums, one per form.
pub trait FormField: Copy + Ord + std::fmt::Debug + Send + Sync + 'static {
    /// Every field, in display order.
    const ALL: &'static [Self];

    /// Control name as used by the view (`email`, `teacher_id`, ...).
    fn name(self) -> &'static str;

    fn rules(self) -> &'static [Rule];
}

/// Outcome of validating every field of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation<F: FormField> {
    pub valid: bool,
    /// Only fields with at least one error appear.
    pub field_errors: BTreeMap<F, Vec<FieldError>>,
}

impl<F: FormField> Validation<F> {
    #[must_use]
    pub fn errors(&self, field: F) -> &[FieldError] {
        self.field_errors.get(&field).map_or(&[], Vec::as_slice)
    }
}

#[must_use]
pub fn is_email(value: &str) -> bool {
    if value.len() > EMAIL_MAX_LEN {
        return false;
    }
    let Some((local, _)) = value.split_once('@') else {
        return false;
    };
    local.len() <= EMAIL_LOCAL_MAX_LEN && EMAIL_RE.is_match(value)
}

/// Errors for one value. An empty value only ever reports `Required`.
#[must_use]
pub fn validate_value(value: &str, rules: &[Rule]) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for rule in rules {
        match rule {
            Rule::Required if value.is_empty() => errors.push(FieldError::Required),
            Rule::Email if !value.is_empty() && !is_email(value) => errors.push(FieldError::Email),
            Rule::Day if !value.is_empty() && timestamp::parse_day(value).is_err() => errors.push(FieldError::Day),
            Rule::Integer if !value.is_empty() && value.trim().parse::<i64>().is_err() => {
                errors.push(FieldError::Integer);
            }
            _ => {}
        }
    }
    errors
}

/// Validate every field of `F`. Missing values count as empty.
#[must_use]
pub fn validate<F: FormField>(values: &BTreeMap<F, String>) -> Validation<F> {
    let field_errors: BTreeMap<F, Vec<FieldError>> = F::ALL
        .iter()
        .filter_map(|&field| {
            let value = values.get(&field).map_or("", String::as_str);
            let errors = validate_value(value, field.rules());
            (!errors.is_empty()).then_some((field, errors))
        })
        .collect();
    Validation { valid: field_errors.is_empty(), field_errors }
}
