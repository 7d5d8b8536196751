//! Category hierarchy queries shared by the state store, pickers, and CLI.
//!
//! Categories live in a flat list linked by `parent_id`. Nothing here trusts
//! that list to be consistent: every upward walk is bounded by a visited set,
//! dangling parents read as "orphan, treat as root", and cycles never hang or
//! drop entries.

use crate::constants::CATEGORY_INDENT;
use crate::models::Category;
use std::collections::{HashMap, HashSet};

fn find<'a>(all: &'a [Category], id: &str) -> Option<&'a Category> {
    all.iter().find(|category| category.id == id)
}

/// Returns `true` if `ancestor_id` appears on the parent chain of `category`.
///
/// # Arguments
/// - `category`: Category whose ancestors are walked.
/// - `ancestor_id`: Candidate ancestor.
/// - `all`: Full category list.
///
/// # Returns
/// `true` once `ancestor_id` is reached; `false` at a root, at a dangling
/// parent reference, or when the chain loops back on itself.
pub fn is_descendant_of(category: &Category, ancestor_id: &str, all: &[Category]) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(category.id.as_str());
    let mut current = category.parent_id.as_deref();

    while let Some(parent_id) = current {
        if parent_id == ancestor_id {
            return true;
        }
        if !visited.insert(parent_id) || visited.len() > all.len() + 1 {
            return false;
        }
        current = find(all, parent_id).and_then(|parent| parent.parent_id.as_deref());
    }

    false
}

/// Categories without a `parent_id`, in list order.
pub fn root_categories(all: &[Category]) -> Vec<&Category> {
    all.iter()
        .filter(|category| category.parent_id.is_none())
        .collect()
}

/// Direct children of `id`, in list order.
pub fn children<'a>(all: &'a [Category], id: &str) -> Vec<&'a Category> {
    all.iter()
        .filter(|category| category.parent_id.as_deref() == Some(id))
        .collect()
}

/// Categories `category_id` may be re-parented under.
///
/// Excludes the category itself and every transitive descendant, so any
/// returned target keeps the hierarchy acyclic.
pub fn valid_move_targets<'a>(all: &'a [Category], category_id: &str) -> Vec<&'a Category> {
    all.iter()
        .filter(|candidate| can_move_under(all, category_id, candidate.id.as_str()))
        .collect()
}

/// Whether `category_id` may take `new_parent_id` as its parent.
///
/// Agrees with [`valid_move_targets`]: a loop elsewhere in the list does not
/// block the move, only a path back to `category_id` does.
pub fn can_move_under(all: &[Category], category_id: &str, new_parent_id: &str) -> bool {
    if new_parent_id == category_id {
        return false;
    }
    find(all, new_parent_id).map_or(true, |parent| !is_descendant_of(parent, category_id, all))
}

/// Returns `true` if assigning `category_id` under `new_parent_id` introduces a cycle.
pub fn introduces_cycle(all: &[Category], category_id: &str, new_parent_id: &str) -> bool {
    let parent_map: HashMap<&str, Option<&str>> = all
        .iter()
        .map(|category| (category.id.as_str(), category.parent_id.as_deref()))
        .collect();
    let mut current = Some(new_parent_id);
    let mut visited = HashSet::new();

    while let Some(curr) = current {
        if !visited.insert(curr) || curr == category_id {
            return true;
        }
        current = parent_map.get(curr).copied().flatten();
    }

    false
}

/// Parent used for display: the stored parent when its chain reaches a
/// real root, otherwise `None`.
pub fn effective_parent_id<'a>(all: &'a [Category], category: &Category) -> Option<&'a str> {
    let parent_id = category.parent_id.as_deref()?;
    let parent = find(all, parent_id)?;
    if introduces_cycle(all, category.id.as_str(), parent_id) {
        return None;
    }
    Some(parent.id.as_str())
}

/// `root_id` plus all of its transitive descendants, parents before children.
pub fn descendant_ids(all: &[Category], root_id: &str) -> Vec<String> {
    let mut to_visit = vec![root_id.to_string()];
    let mut discovered = Vec::new();
    let mut visited = HashSet::new();

    while let Some(current) = to_visit.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        for child in children(all, current.as_str()).into_iter().rev() {
            to_visit.push(child.id.clone());
        }
        discovered.push(current);
    }

    discovered
}

/// One line of a rendered category tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow<'a> {
    pub category: &'a Category,
    pub depth: usize,
}

impl TreeRow<'_> {
    pub fn label(&self) -> String {
        indent_label(self.category.name.as_str(), self.depth)
    }
}

/// Prefix `name` with one indent unit per level of depth.
pub fn indent_label(name: &str, depth: usize) -> String {
    format!("{}{}", CATEGORY_INDENT.repeat(depth), name)
}

/// Arena index over a category list: id → position and parent → children.
///
/// Rebuild it whenever the list changes; it borrows nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    positions: HashMap<String, usize>,
    children: HashMap<String, Vec<usize>>,
    roots: Vec<usize>,
}

impl CategoryIndex {
    /// Build the index; orphans and cycle members are indexed as roots.
    pub fn build(all: &[Category]) -> Self {
        let positions: HashMap<String, usize> = all
            .iter()
            .enumerate()
            .map(|(pos, category)| (category.id.clone(), pos))
            .collect();
        let mut children: HashMap<String, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (pos, category) in all.iter().enumerate() {
            match effective_parent_id(all, category) {
                Some(parent_id) => children.entry(parent_id.to_string()).or_default().push(pos),
                None => roots.push(pos),
            }
        }
        Self {
            positions,
            children,
            roots,
        }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions of `id`'s children, in list order.
    pub fn children_of(&self, id: &str) -> &[usize] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Depth-first pre-order rows; `exclude` drops a category and its subtree.
    pub fn rows<'a>(&self, all: &'a [Category], exclude: Option<&str>) -> Vec<TreeRow<'a>> {
        let mut rows = Vec::with_capacity(all.len());
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|pos| (*pos, 0)).collect();
        let mut visited = HashSet::new();

        while let Some((pos, depth)) = stack.pop() {
            let Some(category) = all.get(pos) else {
                continue;
            };
            if !visited.insert(pos) || exclude == Some(category.id.as_str()) {
                continue;
            }
            rows.push(TreeRow { category, depth });
            for child in self.children_of(category.id.as_str()).iter().rev() {
                stack.push((*child, depth + 1));
            }
        }

        rows
    }
}

/// Depth-first pre-order traversal of the whole forest.
///
/// Roots (including orphans whose parent no longer resolves) come in list
/// order, children in list order beneath their parent. `exclude` drops one
/// category and its entire subtree, which is what a move-target picker shows.
pub fn tree_rows<'a>(all: &'a [Category], exclude: Option<&str>) -> Vec<TreeRow<'a>> {
    CategoryIndex::build(all).rows(all, exclude)
}
