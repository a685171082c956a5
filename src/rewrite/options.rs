//! Expansion options

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LamdefError;
use crate::parser::lexer::is_identifier;

/// Indentation added in front of an expanded body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndentRepr", into = "IndentRepr")]
pub enum IndentStyle {
    /// A number of spaces per level
    Spaces(usize),
    /// One tab per level
    Tabs,
}

impl IndentStyle {
    /// Text of one indentation level
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Spaces(width) => " ".repeat(*width),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(4)
    }
}

impl fmt::Display for IndentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndentStyle::Spaces(width) => write!(f, "{width}"),
            IndentStyle::Tabs => write!(f, "tabs"),
        }
    }
}

impl FromStr for IndentStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tab" | "tabs" => Ok(IndentStyle::Tabs),
            other => match other.parse::<usize>() {
                Ok(width) if (1..=16).contains(&width) => Ok(IndentStyle::Spaces(width)),
                _ => Err(format!(
                    "invalid indent '{s}': expected 'tabs' or a width between 1 and 16"
                )),
            },
        }
    }
}

/// Serialized form: a width or the string "tabs"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum IndentRepr {
    Width(usize),
    Name(String),
}

impl TryFrom<IndentRepr> for IndentStyle {
    type Error = String;

    fn try_from(repr: IndentRepr) -> Result<Self, Self::Error> {
        match repr {
            IndentRepr::Width(width) => width.to_string().parse(),
            IndentRepr::Name(name) => name.parse(),
        }
    }
}

impl From<IndentStyle> for IndentRepr {
    fn from(style: IndentStyle) -> Self {
        match style {
            IndentStyle::Spaces(width) => IndentRepr::Width(width),
            IndentStyle::Tabs => IndentRepr::Name("tabs".to_string()),
        }
    }
}

/// Options controlling how lamdef blocks are found and expanded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteOptions {
    /// Keyword introducing a multiline lambda
    pub keyword: String,
    /// Prefix of generated function names
    pub name_prefix: String,
    /// Indentation of expanded bodies relative to the enclosing statement
    pub indent: IndentStyle,
    /// Expand `name = lamdef(...):` into `def name(...):`
    pub direct_assignment: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            keyword: "lamdef".to_string(),
            name_prefix: "_lamdef_".to_string(),
            indent: IndentStyle::default(),
            direct_assignment: true,
        }
    }
}

impl RewriteOptions {
    /// Reject options that would produce invalid Python
    pub fn validate(&self) -> Result<(), LamdefError> {
        if !is_identifier(&self.keyword) {
            return Err(LamdefError::InvalidOptions(format!(
                "keyword '{}' is not an identifier",
                self.keyword
            )));
        }
        if !is_identifier(&format!("{}1", self.name_prefix)) {
            return Err(LamdefError::InvalidOptions(format!(
                "name prefix '{}' does not form identifiers",
                self.name_prefix
            )));
        }
        if let IndentStyle::Spaces(width) = self.indent
            && !(1..=16).contains(&width)
        {
            return Err(LamdefError::InvalidOptions(format!(
                "indent width {width} is out of range"
            )));
        }
        Ok(())
    }
}
