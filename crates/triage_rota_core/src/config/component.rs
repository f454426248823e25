//! Bug-tracker component filters (`Product::Component`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static COMPONENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)(?:\s*::\s*(.+))?$").expect("valid component regex"));

/// One product (and optionally one component within it) to restrict triage
/// queries to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentFilter {
    pub product: String,
    pub component: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentFilterError(pub String);

impl Display for ComponentFilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid component filter `{}`; expected `Product` or `Product::Component`",
            self.0
        )
    }
}

impl Error for ComponentFilterError {}

impl ComponentFilter {
    /// Parses `Product` or `Product::Component`, trimming whitespace.
    ///
    /// Single colons are allowed inside names (`Core::DOM: Events`); only
    /// the first `::` separates product from component.
    pub fn parse(raw: &str) -> Result<Self, ComponentFilterError> {
        let invalid = || ComponentFilterError(raw.to_string());
        let captures = COMPONENT_RE.captures(raw.trim()).ok_or_else(invalid)?;
        let product = captures
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .ok_or_else(invalid)?;
        let component = captures.get(2).map(|m| m.as_str().trim().to_string());

        if product.is_empty() || product.contains("::") {
            return Err(invalid());
        }
        if let Some(component) = &component {
            if component.is_empty() || component.contains("::") {
                return Err(invalid());
            }
        }
        Ok(Self { product, component })
    }
}

impl Display for ComponentFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.component {
            Some(component) => write!(f, "{}::{}", self.product, component),
            None => write!(f, "{}", self.product),
        }
    }
}

impl TryFrom<String> for ComponentFilter {
    type Error = ComponentFilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ComponentFilter> for String {
    fn from(value: ComponentFilter) -> Self {
        value.to_string()
    }
}
