//! Item library: immutable templates that stamp out new menu nodes.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{MenuItemType, MenuNode};
use crate::domain::id::IdGenerator;

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Page,
    Collection,
}

/// Page from the read-only site catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailablePage {
    pub id: String,
    pub title: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: PageKind,
}

impl AvailablePage {
    /// Pages drop as links labelled with the title.
    pub fn to_template(&self) -> LibraryTemplate {
        LibraryTemplate {
            key: format!("page:{}", self.id),
            label: self.title.clone(),
            item_type: MenuItemType::Link,
            url: Some(self.path.clone()),
        }
    }

    /// Case-insensitive match on title or path.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term) || self.path.to_lowercase().contains(&term)
    }
}

/// Archetype a new node is created from. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryTemplate {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub item_type: MenuItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl LibraryTemplate {
    fn custom(key: &str, label: &str, item_type: MenuItemType, url: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            item_type,
            url: url.map(str::to_string),
        }
    }

    /// Fresh node: new id, fields copied from the template, no children.
    pub fn instantiate(&self, ids: &dyn IdGenerator) -> MenuNode {
        let node = MenuNode::new(ids.new_id(), self.label.clone(), self.item_type);
        match &self.url {
            Some(url) => node.with_url(url.clone()),
            None => node,
        }
    }
}

/// Custom item archetypes offered next to the page catalog.
pub fn custom_templates() -> Vec<LibraryTemplate> {
    vec![
        LibraryTemplate::custom("link", "New Link", MenuItemType::Link, Some("#")),
        LibraryTemplate::custom("dropdown", "Dropdown", MenuItemType::Dropdown, Some("")),
        LibraryTemplate::custom("mega-menu", "Mega Menu", MenuItemType::MegaMenu, Some("")),
        LibraryTemplate::custom("button", "Button", MenuItemType::Button, Some("#")),
        LibraryTemplate::custom("divider", "Divider", MenuItemType::Divider, None),
    ]
}

/// Page catalog plus custom archetypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    pages: Vec<AvailablePage>,
    custom: Vec<LibraryTemplate>,
}

impl Default for Library {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Library {
    pub fn new(pages: Vec<AvailablePage>) -> Self {
        Self {
            pages,
            custom: custom_templates(),
        }
    }

    pub fn pages(&self) -> &[AvailablePage] {
        &self.pages
    }

    pub fn custom(&self) -> &[LibraryTemplate] {
        &self.custom
    }

    /// Pages whose title or path contains `term`; all pages for an empty term.
    pub fn search_pages(&self, term: &str) -> Vec<&AvailablePage> {
        self.pages.iter().filter(|p| p.matches(term)).collect()
    }

    /// Resolve a template key: a custom key (`link`, `divider`, ...) or
    /// `page:<page id>`.
    pub fn template(&self, key: &str) -> Option<LibraryTemplate> {
        if let Some(page_id) = key.strip_prefix("page:") {
            return self
                .pages
                .iter()
                .find(|p| p.id == page_id)
                .map(AvailablePage::to_template);
        }
        self.custom.iter().find(|t| t.key == key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{sample_pages, SequentialIds};

    #[test]
    fn given_custom_link_when_instantiated_then_fresh_node_with_defaults() {
        let library = Library::default();
        let template = library.template("link").unwrap();
        let node = template.instantiate(&SequentialIds::new("n"));
        assert_eq!(node.id(), "n-1");
        assert_eq!(node.label(), "New Link");
        assert_eq!(node.item.url.as_deref(), Some("#"));
        assert!(node.children.is_empty());
    }

    #[test]
    fn given_divider_template_when_instantiated_then_no_url() {
        let node = Library::default()
            .template("divider")
            .unwrap()
            .instantiate(&SequentialIds::new("d"));
        assert_eq!(node.item_type(), MenuItemType::Divider);
        assert!(node.item.url.is_none());
    }

    #[test]
    fn given_page_key_when_resolving_then_link_to_page_path() {
        let library = Library::new(sample_pages());
        let template = library.template("page:p2").unwrap();
        assert_eq!(template.label, "About Us");
        assert_eq!(template.item_type, MenuItemType::Link);
        assert_eq!(template.url.as_deref(), Some("/about"));
        assert!(library.template("page:nope").is_none());
        assert!(library.template("widget").is_none());
    }

    #[test]
    fn given_search_term_when_filtering_pages_then_matches_title_or_path() {
        let library = Library::new(sample_pages());
        let titles: Vec<_> = library
            .search_pages("CAR")
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Careers"]);
        assert_eq!(library.search_pages("/").len(), library.pages().len());
        assert_eq!(library.search_pages("").len(), library.pages().len());
    }
}
