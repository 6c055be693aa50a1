use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parser::tokens::is_keyword;

static BARE_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").expect("valid identifier pattern")
});

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    #[default]
    Sqlite3,
    Sqlite2,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameWrapper {
    #[default]
    DoubleQuote,
    Bracket,
    Backtick,
}

impl NameWrapper {
    pub fn supported_by(&self, dialect: Dialect) -> bool {
        !(dialect == Dialect::Sqlite2 && *self == NameWrapper::Backtick)
    }

    pub fn can_wrap(&self, name: &str) -> bool {
        match self {
            NameWrapper::Bracket => !name.contains(']'),
            _ => true,
        }
    }

    pub fn wrap(&self, name: &str) -> String {
        match self {
            NameWrapper::DoubleQuote => format!("\"{}\"", name.replace('"', "\"\"")),
            NameWrapper::Backtick => format!("`{}`", name.replace('`', "``")),
            NameWrapper::Bracket => format!("[{}]", name),
        }
    }
}

pub fn needs_wrapping(name: &str) -> bool {
    !BARE_IDENTIFIER.is_match(name) || is_keyword(name)
}

pub fn wrap_obj_if_needed(name: &str, dialect: Dialect) -> String {
    wrap_obj_if_needed_with(name, dialect, NameWrapper::default())
}

/// Quotes `name` only when it is not usable as a bare identifier, preferring the
/// given wrapper when the dialect supports it and it can represent the name.
pub fn wrap_obj_if_needed_with(name: &str, dialect: Dialect, preferred: NameWrapper) -> String {
    if !needs_wrapping(name) {
        return name.to_string();
    }
    wrap_obj_with(name, dialect, preferred)
}

/// Quotes `name` unconditionally.
pub fn wrap_obj_with(name: &str, dialect: Dialect, preferred: NameWrapper) -> String {
    let wrapper = [preferred, NameWrapper::DoubleQuote, NameWrapper::Bracket]
        .into_iter()
        .find(|w| w.supported_by(dialect) && w.can_wrap(name))
        .unwrap_or(NameWrapper::DoubleQuote);

    wrapper.wrap(name)
}

/// Strips identifier quotes, undoing the doubled-quote escape.
pub fn strip_obj_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() < 2 {
        return name.to_string();
    }
    let (first, last) = (chars[0], chars[chars.len() - 1]);
    let inner: String = chars[1..chars.len() - 1].iter().collect();
    match (first, last) {
        ('"', '"') => inner.replace("\"\"", "\""),
        ('`', '`') => inner.replace("``", "`"),
        ('\'', '\'') => inner.replace("''", "'"),
        ('[', ']') => inner,
        _ => name.to_string(),
    }
}

pub fn is_system_table(name: &str) -> bool {
    name.get(..7).is_some_and(|prefix| prefix.eq_ignore_ascii_case("sqlite_"))
}

pub fn is_row_id_keyword(name: &str) -> bool {
    ["rowid", "oid", "_rowid_"].iter().any(|k| k.eq_ignore_ascii_case(name))
}
