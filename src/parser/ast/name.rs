use std::fmt;

use crate::parser::{strip_obj_name, wrap_obj_if_needed_with, Dialect, NameWrapper};

/// Identifier as written in the query (`text`, quotes included) and its bare `value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    pub value: String,
    pub text: String,
}

impl Name {
    pub fn from_token(text: &str) -> Self {
        Self { value: strip_obj_name(text), text: text.to_string() }
    }

    /// Builds a name from its bare value, quoting it when it could not be written bare.
    pub fn wrapped(value: &str, dialect: Dialect, wrapper: NameWrapper) -> Self {
        Self { value: value.to_string(), text: wrap_obj_if_needed_with(value, dialect, wrapper) }
    }

    pub fn matches(&self, other: &str) -> bool {
        self.value.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
