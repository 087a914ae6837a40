//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Kind of menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuItemType {
    Link,
    Dropdown,
    MegaMenu,
    Button,
    Divider,
}

impl MenuItemType {
    pub const ALL: [MenuItemType; 5] = [
        MenuItemType::Link,
        MenuItemType::Dropdown,
        MenuItemType::MegaMenu,
        MenuItemType::Button,
        MenuItemType::Divider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuItemType::Link => "link",
            MenuItemType::Dropdown => "dropdown",
            MenuItemType::MegaMenu => "mega-menu",
            MenuItemType::Button => "button",
            MenuItemType::Divider => "divider",
        }
    }

    /// Whether nodes of this type may carry children.
    pub fn accepts_children(&self) -> bool {
        !matches!(self, MenuItemType::Divider)
    }
}

impl fmt::Display for MenuItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MenuItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown item type: {s}"))
    }
}

/// Where a link opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkTarget {
    /// Same tab
    #[serde(rename = "_self")]
    SameTab,
    /// New tab
    #[serde(rename = "_blank")]
    NewTab,
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkTarget::SameTab => f.write_str("_self"),
            LinkTarget::NewTab => f.write_str("_blank"),
        }
    }
}

impl FromStr for LinkTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "_self" | "self" | "same-tab" => Ok(LinkTarget::SameTab),
            "_blank" | "blank" | "new-tab" => Ok(LinkTarget::NewTab),
            other => Err(format!("unknown link target: {other}")),
        }
    }
}

/// Icons the builder offers for menu entries.
pub const KNOWN_ICONS: [&str; 8] = [
    "Home",
    "Settings",
    "User",
    "ShoppingCart",
    "Search",
    "Globe",
    "Mail",
    "Phone",
];

/// Scalar fields of a menu entry (everything except its children).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub item_type: MenuItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<LinkTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, item_type: MenuItemType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            item_type,
            url: None,
            icon: None,
            target: None,
            hidden: None,
            description: None,
            classes: None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }
}

/// A menu entry with its ordered children.
///
/// Nodes never point back to their parent; the parent of a node is found by
/// traversal (see [`crate::domain::locator`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    #[serde(flatten)]
    pub item: MenuItem,
    #[serde(default)]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, item_type: MenuItemType) -> Self {
        Self {
            item: MenuItem::new(id, label, item_type),
            children: Vec::new(),
        }
    }

    /// Builder-style url setter. Dividers never carry a url.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        if self.item.item_type.accepts_children() {
            self.item.url = Some(url.into());
        }
        self
    }

    /// Builder-style children setter. Dividers never carry children.
    pub fn with_children(mut self, children: Vec<MenuNode>) -> Self {
        if self.item.item_type.accepts_children() {
            self.children = children;
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn label(&self) -> &str {
        &self.item.label
    }

    pub fn item_type(&self) -> MenuItemType {
        self.item.item_type
    }

    /// Pre-order iterator over this node and all its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &MenuNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            // reversed so the leftmost child is visited first
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Check the divider invariant for this node only.
    pub fn check_shape(&self) -> Result<(), DomainError> {
        if self.item.item_type == MenuItemType::Divider {
            if !self.children.is_empty() {
                return Err(DomainError::InvalidNode {
                    id: self.item.id.clone(),
                    message: "divider cannot have children".into(),
                });
            }
            if self.item.url.is_some() {
                return Err(DomainError::InvalidNode {
                    id: self.item.id.clone(),
                    message: "divider cannot have a url".into(),
                });
            }
        }
        Ok(())
    }
}

/// The whole menu: the ordered sequence of root-level nodes.
///
/// Serializes as a plain JSON array of nested records, which is also the
/// export format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuTree {
    pub roots: Vec<MenuNode>,
}

impl MenuTree {
    pub fn new(roots: Vec<MenuNode>) -> Self {
        Self { roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order iterator over every node of the tree.
    pub fn iter(&self) -> impl Iterator<Item = &MenuNode> {
        self.roots.iter().flat_map(|root| root.iter())
    }

    /// Root-level identifiers, in order.
    pub fn root_ids(&self) -> Vec<&str> {
        self.roots.iter().map(|n| n.id()).collect()
    }
}

impl From<Vec<MenuNode>> for MenuTree {
    fn from(roots: Vec<MenuNode>) -> Self {
        Self { roots }
    }
}

/// Partial field changes for [`crate::domain::mutator::update`].
///
/// `None` leaves a field untouched. For optional fields `Some(None)` clears
/// the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub label: Option<String>,
    pub url: Option<Option<String>>,
    pub icon: Option<Option<String>>,
    pub target: Option<Option<LinkTarget>>,
    pub hidden: Option<bool>,
    pub description: Option<Option<String>>,
    pub classes: Option<Option<String>>,
}

impl NodePatch {
    pub fn is_empty(&self) -> bool {
        *self == NodePatch::default()
    }

    /// Apply the patch onto an item. Dividers keep an empty url.
    pub fn apply_to(&self, item: &mut MenuItem) {
        if let Some(label) = &self.label {
            item.label = label.clone();
        }
        if let Some(url) = &self.url {
            if item.item_type.accepts_children() {
                item.url = url.clone();
            }
        }
        if let Some(icon) = &self.icon {
            item.icon = icon.clone();
        }
        if let Some(target) = &self.target {
            item.target = *target;
        }
        if let Some(hidden) = self.hidden {
            item.hidden = Some(hidden);
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(classes) = &self.classes {
            item.classes = classes.clone();
        }
    }
}

/// Row of the flattened tree used by sortable list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatMenuItem {
    #[serde(flatten)]
    pub item: MenuItem,
    pub parent_id: Option<String>,
    pub depth: usize,
    pub index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_node_when_serialized_then_matches_export_shape() {
        let node = MenuNode::new("1", "Home", MenuItemType::Link).with_url("/");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "1", "label": "Home", "type": "link", "url": "/", "children": []})
        );
    }

    #[test]
    fn given_export_json_when_parsed_then_reads_optional_fields() {
        let raw = r#"[{"id":"2","label":"Shop","type":"mega-menu","target":"_blank","hidden":true,
                       "children":[{"id":"21","label":"New","type":"link"}]}]"#;
        let tree: MenuTree = serde_json::from_str(raw).unwrap();
        let shop = &tree.roots[0];
        assert_eq!(shop.item_type(), MenuItemType::MegaMenu);
        assert_eq!(shop.item.target, Some(LinkTarget::NewTab));
        assert!(shop.item.is_hidden());
        assert_eq!(shop.children[0].id(), "21");
        assert!(shop.children[0].children.is_empty());
    }

    #[test]
    fn given_divider_when_building_then_url_and_children_are_dropped() {
        let divider = MenuNode::new("d", "Divider", MenuItemType::Divider)
            .with_url("/nope")
            .with_children(vec![MenuNode::new("x", "X", MenuItemType::Link)]);
        assert!(divider.item.url.is_none());
        assert!(divider.children.is_empty());
        assert!(divider.check_shape().is_ok());
    }

    #[test]
    fn given_patch_when_applied_to_divider_then_url_is_ignored() {
        let mut item = MenuItem::new("d", "Divider", MenuItemType::Divider);
        let patch = NodePatch {
            label: Some("Line".into()),
            url: Some(Some("/x".into())),
            ..Default::default()
        };
        patch.apply_to(&mut item);
        assert_eq!(item.label, "Line");
        assert!(item.url.is_none());
    }

    #[test]
    fn given_item_type_strings_when_parsed_then_round_trip() {
        for t in MenuItemType::ALL {
            assert_eq!(t.as_str().parse::<MenuItemType>().unwrap(), t);
        }
        assert!("menu".parse::<MenuItemType>().is_err());
    }
}
