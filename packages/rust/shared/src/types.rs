//! Navigation domain types.
//!
//! The site generator expects every navigation node to be a single-key
//! mapping (`{label: children}` or `{label: target}`). These types keep the
//! label and its payload as named fields and only collapse into that shape
//! when serialized.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::ProtonavError;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// One of the two API categories, each backed by its own markdown page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Node,
    Provider,
}

impl Category {
    /// All categories, in the order their subtrees appear in the navigation.
    pub const ALL: [Category; 2] = [Category::Node, Category::Provider];

    /// Identifier used in link targets (`node/#anchor`).
    pub fn id(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Provider => "provider",
        }
    }

    /// Label of the category subtree in the navigation.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Node => "Node",
            Self::Provider => "Provider",
        }
    }

    /// Build the link target for an anchor on this category's page.
    pub fn link_target(self, anchor: &str) -> String {
        format!("{}/#{anchor}", self.id())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Category {
    type Err = ProtonavError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "provider" => Ok(Self::Provider),
            other => Err(ProtonavError::config(format!(
                "unknown category '{other}' (expected 'node' or 'provider')"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Link / Section
// ---------------------------------------------------------------------------

/// A leaf navigation node pointing at an anchor on a category page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Display label (message or service name).
    pub label: String,
    /// Target reference, e.g. `node/#queryrequest`.
    pub target: String,
}

impl Link {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
        }
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.label, &self.target)?;
        map.end()
    }
}

/// A navigation node for one `.proto` file, holding its links in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Formatted section name, e.g. `Node-Query`.
    pub name: String,
    pub links: Vec<Link>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            links: Vec::new(),
        }
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.links)?;
        map.end()
    }
}

/// The sections parsed from one category page, serialized as
/// `{<Display name>: [sections...]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNav {
    pub category: Category,
    pub sections: Vec<Section>,
}

impl CategoryNav {
    /// Total number of links across all sections.
    pub fn link_count(&self) -> usize {
        self.sections.iter().map(|s| s.links.len()).sum()
    }
}

impl Serialize for CategoryNav {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.category.display_name(), &self.sections)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_from_str() {
        assert_eq!("node".parse::<Category>().unwrap(), Category::Node);
        assert_eq!("provider".parse::<Category>().unwrap(), Category::Provider);
        assert!("Node".parse::<Category>().is_err());
    }

    #[test]
    fn category_link_target() {
        assert_eq!(Category::Node.link_target("queryrequest"), "node/#queryrequest");
        assert_eq!(Category::Provider.link_target("x"), "provider/#x");
    }

    #[test]
    fn section_serializes_as_single_key_mapping() {
        let mut section = Section::new("Node-Query");
        section.links.push(Link::new("QueryRequest", "node/#queryrequest"));

        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(
            value,
            json!({ "Node-Query": [ { "QueryRequest": "node/#queryrequest" } ] })
        );
    }

    #[test]
    fn empty_section_serializes_empty_list() {
        let value = serde_json::to_value(Section::new("Node-Service")).unwrap();
        assert_eq!(value, json!({ "Node-Service": [] }));
    }

    #[test]
    fn category_nav_uses_display_name() {
        let nav = CategoryNav {
            category: Category::Provider,
            sections: vec![Section::new("Provider-Lease")],
        };
        let value = serde_json::to_value(&nav).unwrap();
        assert_eq!(value, json!({ "Provider": [ { "Provider-Lease": [] } ] }));
    }

    #[test]
    fn category_nav_link_count() {
        let mut a = Section::new("A");
        a.links.push(Link::new("x", "node/#x"));
        a.links.push(Link::new("y", "node/#y"));
        let mut b = Section::new("B");
        b.links.push(Link::new("z", "node/#z"));

        let nav = CategoryNav {
            category: Category::Node,
            sections: vec![a, b],
        };
        assert_eq!(nav.link_count(), 3);
    }
}
