use termtree::Tree;

use crate::domain::entities::{MenuNode, MenuTree};

pub trait TreeDisplay {
    fn to_display_tree(&self) -> Tree<String>;
}

fn node_line(node: &MenuNode) -> String {
    let item = &node.item;
    let mut line = format!("{} [{}]", item.label, item.item_type);
    if let Some(url) = item.url.as_deref().filter(|u| !u.is_empty()) {
        line.push_str(&format!(" -> {url}"));
    }
    if item.is_hidden() {
        line.push_str(" (hidden)");
    }
    line.push_str(&format!(" #{}", item.id));
    line
}

impl TreeDisplay for MenuNode {
    fn to_display_tree(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_display_tree()).collect();
        Tree::new(node_line(self)).with_leaves(leaves)
    }
}

impl TreeDisplay for MenuTree {
    fn to_display_tree(&self) -> Tree<String> {
        let label = if self.is_empty() { "(empty menu)" } else { "menu" };
        let leaves: Vec<_> = self.roots.iter().map(|n| n.to_display_tree()).collect();
        Tree::new(label.to_string()).with_leaves(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::sample_menu;

    #[test]
    fn given_menu_when_rendered_then_children_are_indented_under_parent() {
        let rendered = sample_menu().to_display_tree().to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "menu");
        assert!(lines[1].contains("Home [link] -> / #1"));
        let parent_at = lines[2].find("Products").unwrap();
        let child_at = lines[3].find("New Arrivals").unwrap();
        assert!(child_at > parent_at);
        assert!(!rendered.contains("(hidden)"));
    }

    #[test]
    fn given_empty_menu_when_rendered_then_placeholder() {
        let rendered = MenuTree::default().to_display_tree().to_string();
        assert_eq!(rendered.trim_end(), "(empty menu)");
    }
}
