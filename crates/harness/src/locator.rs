//! Locator strategies: ordered fallback queries with first-match-wins resolution
//!
//! The ranking is data, not control flow: a [`Strategy`] is a named, ordered
//! list of [`Query`] values, and [`resolve`] walks it against the live UI
//! tree until one query yields at least one element. Strategies can be
//! unit-tested without a live UI and overridden from YAML, since selectors
//! are configuration, not architecture.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::driver::{ElementHandle, WindowHandle};
use crate::error::{Error, Result};

/// A declarative description of candidate UI elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Query {
    /// Elements whose text content contains `contains`, optionally scoped
    /// to a tag name.
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        contains: String,
    },
    /// Elements with the given ARIA role.
    Role { role: String },
    /// A raw CSS selector.
    Css { selector: String },
    /// Elements carrying an attribute, optionally with an exact value.
    Attr {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
}

impl Query {
    pub fn text(tag: &str, contains: &str) -> Self {
        Query::Text {
            tag: Some(tag.to_string()),
            contains: contains.to_string(),
        }
    }

    pub fn role(role: &str) -> Self {
        Query::Role {
            role: role.to_string(),
        }
    }

    pub fn css(selector: &str) -> Self {
        Query::Css {
            selector: selector.to_string(),
        }
    }

    pub fn attr(name: &str, value: &str) -> Self {
        Query::Attr {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }
}

/// A named, ordered sequence of fallback queries. Order encodes preference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    pub queries: Vec<Query>,
}

impl Strategy {
    pub fn new(name: &str, queries: Vec<Query>) -> Self {
        Self {
            name: name.to_string(),
            queries,
        }
    }
}

/// Outcome of resolving a strategy against the live UI tree.
pub struct Resolution {
    /// Matches of the first non-empty query; empty when nothing matched.
    pub elements: Vec<Box<dyn ElementHandle>>,
    /// Index of the query that produced the matches.
    pub winning_query: Option<usize>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn first(&self) -> Option<&dyn ElementHandle> {
        self.elements.first().map(|e| e.as_ref())
    }
}

/// Evaluate each query in order and return the match set of the first one
/// producing at least one element. Read-only with respect to UI state; an
/// empty resolution is not an error here, callers decide severity.
pub async fn resolve(window: &dyn WindowHandle, strategy: &Strategy) -> Result<Resolution> {
    for (index, query) in strategy.queries.iter().enumerate() {
        let elements = window.query_all(query).await?;
        if !elements.is_empty() {
            debug!(
                strategy = %strategy.name,
                query = index,
                matches = elements.len(),
                "locator resolved"
            );
            return Ok(Resolution {
                elements,
                winning_query: Some(index),
            });
        }
    }
    debug!(strategy = %strategy.name, "no query matched");
    Ok(Resolution {
        elements: Vec::new(),
        winning_query: None,
    })
}

/// The full set of named strategies for a target application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub strategies: Vec<Strategy>,
}

impl Catalog {
    pub fn get(&self, name: &str) -> Result<&Strategy> {
        self.strategies
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::UnknownStrategy(name.to_string()))
    }

    pub fn insert(&mut self, strategy: Strategy) {
        self.strategies.push(strategy);
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Overlay another catalog: strategies with the same name replace the
    /// existing entry, new names are appended.
    pub fn merge(&mut self, other: Catalog) {
        for strategy in other.strategies {
            if let Some(existing) = self.strategies.iter_mut().find(|s| s.name == strategy.name) {
                *existing = strategy;
            } else {
                self.strategies.push(strategy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_catalog_yaml() {
        let yaml = r#"
strategies:
  - name: welcome.header
    queries:
      - by: text
        tag: h1
        contains: Welcome to Cutline
      - by: text
        contains: Welcome
  - name: icon_bar.container
    queries:
      - by: css
        selector: ".left-icon-bar"
      - by: role
        role: toolbar
"#;
        let catalog = Catalog::from_yaml(yaml).unwrap();
        assert_eq!(catalog.strategies.len(), 2);
        let header = catalog.get("welcome.header").unwrap();
        assert_eq!(header.queries.len(), 2);
        assert_eq!(
            header.queries[0],
            Query::text("h1", "Welcome to Cutline")
        );
    }

    #[test]
    fn merge_replaces_by_name() {
        let mut base = Catalog::default();
        base.insert(Strategy::new("a", vec![Query::css(".old")]));
        base.insert(Strategy::new("b", vec![Query::css(".b")]));

        let mut overlay = Catalog::default();
        overlay.insert(Strategy::new("a", vec![Query::css(".new")]));
        overlay.insert(Strategy::new("c", vec![Query::css(".c")]));

        base.merge(overlay);
        assert_eq!(base.strategies.len(), 3);
        assert_eq!(base.get("a").unwrap().queries[0], Query::css(".new"));
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        let catalog = Catalog::default();
        assert!(matches!(
            catalog.get("nope"),
            Err(Error::UnknownStrategy(_))
        ));
    }
}
