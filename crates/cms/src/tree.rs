//! Helpers for the category tree.

use cms_api::response::Category;
use std::collections::{BTreeMap, BTreeSet};

/// A category with its depth in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Flattened<'a> {
    pub category: &'a Category,
    pub depth: usize,
}

/// Walks the tree depth first, parents before their children.
pub fn flatten(tree: &[Category]) -> Vec<Flattened<'_>> {
    fn walk<'a>(nodes: &'a [Category], depth: usize, out: &mut Vec<Flattened<'a>>) {
        for category in nodes {
            out.push(Flattened { category, depth });
            walk(&category.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(tree, 0, &mut out);
    out
}

/// Root categories whose name contains `keyword`, ignoring case.
pub fn filter_roots<'a>(tree: &'a [Category], keyword: &str) -> Vec<&'a Category> {
    let keyword = keyword.trim().to_lowercase();
    tree.iter()
        .filter(|category| keyword.is_empty() || category.name.to_lowercase().contains(&keyword))
        .collect()
}

/// An entry of the parent selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentOption {
    pub id: String,
    /// The name indented by depth.
    pub label: String,
}

/// Categories that can become the parent of `editing`.
///
/// `all` is the flat list. The edited category and its descendants are left
/// out since choosing one of them would create a cycle.
pub fn parent_options(all: &[Category], editing: Option<&str>) -> Vec<ParentOption> {
    let mut children: BTreeMap<&str, Vec<&Category>> = BTreeMap::new();
    let ids: BTreeSet<&str> = all.iter().map(|category| category.id.as_str()).collect();
    let mut roots = Vec::new();
    for category in all {
        match category.parent_id.as_deref() {
            Some(parent) if ids.contains(parent) && parent != category.id => {
                children.entry(parent).or_default().push(category)
            }
            _ => roots.push(category),
        }
    }

    let mut options = Vec::new();
    let mut visited = BTreeSet::new();
    let mut stack: Vec<(&Category, usize)> =
        roots.into_iter().rev().map(|root| (root, 0)).collect();
    while let Some((category, depth)) = stack.pop() {
        if !visited.insert(category.id.as_str()) {
            tracing::warn!("Category {} appears twice in the tree", category.id);
            continue;
        }
        if Some(category.id.as_str()) == editing {
            continue;
        }
        options.push(ParentOption {
            id: category.id.clone(),
            label: format!("{}{}", "-- ".repeat(depth), category.name),
        });
        if let Some(kids) = children.get(category.id.as_str()) {
            stack.extend(kids.iter().rev().map(|kid| (*kid, depth + 1)));
        }
    }
    options
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::category;

    fn tree() -> Vec<Category> {
        let mut rust = category("c1", "Rust", None);
        let mut web = category("c2", "Web", Some("c1"));
        web.children.push(category("c3", "Leptos", Some("c2")));
        rust.children.push(web);
        vec![rust, category("c4", "Travel", None)]
    }

    fn flat() -> Vec<Category> {
        vec![
            category("c1", "Rust", None),
            category("c2", "Web", Some("c1")),
            category("c3", "Leptos", Some("c2")),
            category("c4", "Travel", None),
        ]
    }

    #[test]
    fn flatten_keeps_parents_before_children() {
        let tree = tree();
        let flat: Vec<_> = flatten(&tree)
            .into_iter()
            .map(|node| (node.category.id.as_str(), node.depth))
            .collect();
        assert_eq!(flat, vec![("c1", 0), ("c2", 1), ("c3", 2), ("c4", 0)]);
    }

    #[test]
    fn keyword_filters_roots_ignoring_case() {
        let tree = tree();
        let roots = filter_roots(&tree, "rUs");
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, "c1");
        assert_eq!(filter_roots(&tree, "  ").len(), 2);
        // children are not matched on their own
        assert!(filter_roots(&tree, "leptos").is_empty());
    }

    #[test]
    fn parent_options_are_indented() {
        let options = parent_options(&flat(), None);
        let labels: Vec<_> = options.iter().map(|option| option.label.as_str()).collect();
        assert_eq!(labels, vec!["Rust", "-- Web", "-- -- Leptos", "Travel"]);
    }

    #[test]
    fn parent_options_exclude_the_edited_subtree() {
        let options = parent_options(&flat(), Some("c2"));
        let ids: Vec<_> = options.iter().map(|option| option.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c4"]);
    }

    #[test]
    fn parent_options_survive_cycles() {
        let all = vec![
            category("a", "A", Some("b")),
            category("b", "B", Some("a")),
            category("c", "C", Some("c")),
        ];
        let options = parent_options(&all, None);
        // the cycle has no root and is unreachable, the self parent is treated as a root
        let ids: Vec<_> = options.iter().map(|option| option.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }
}
