use generational_arena::{Arena, Index};
use std::collections::HashSet;
use std::fmt;
use tracing::instrument;

/// Reserved name of the synthetic root node. Not usable as a destination name.
pub const ROOT_NAME: &str = "__root__";

/// Tree node for a single named destination.
#[derive(Debug)]
pub struct DestinationNode {
    /// Destination name, unique among reachable nodes
    pub name: String,
    /// Index of the parent node, None for the root or a detached node
    pub parent: Option<Index>,
    /// Indices of prerequisite nodes, in insertion order
    pub children: Vec<Index>,
}

impl fmt::Display for DestinationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Arena-based dependency tree over named destinations.
///
/// Nodes live in a generational arena; parent/child edges are index lists.
/// A single synthetic root, created at construction, anchors all top-level
/// destinations. A node's children are the destinations that must be
/// linearized before the node itself.
#[derive(Debug)]
pub struct DestinationTree {
    /// Arena storage for all tree nodes
    arena: Arena<DestinationNode>,
    /// Index of the synthetic root node, always present
    root: Index,
}

impl Default for DestinationTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DestinationTree {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(DestinationNode {
            name: ROOT_NAME.to_string(),
            parent: None,
            children: Vec::new(),
        });
        Self { arena, root }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Index {
        self.root
    }

    #[instrument(level = "trace", skip(self))]
    pub fn node(&self, idx: Index) -> Option<&DestinationNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn parent_of(&self, idx: Index) -> Option<Index> {
        self.arena.get(idx).and_then(|node| node.parent)
    }

    /// Number of destination nodes, excluding the synthetic root.
    pub fn len(&self) -> usize {
        self.arena.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, name: &str, parent: Index) -> Index {
        let node_idx = self.arena.insert(DestinationNode {
            name: name.to_string(),
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(node_idx);
        }
        node_idx
    }

    /// Pre-order depth-first lookup by name; the first match wins. The root's
    /// reserved name is included in the search.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, name: &str) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.name == name)
            .map(|(idx, _)| idx)
    }

    /// Appends `child` to `parent`'s ordered children and repoints the child's
    /// parent link. No uniqueness check; the edge from the previous parent is
    /// left in place — callers drive relocation (attach first, detach the old
    /// edge after, so the subtree never goes unreachable).
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, child: Index, parent: Index) {
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.arena.get_mut(child) {
            child_node.parent = Some(parent);
        }
    }

    /// Removes every direct child of `parent` whose name equals `name`.
    /// Edge removal only: a subtree already re-attached elsewhere stays live,
    /// and arena slots are never freed.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, name: &str, parent: Index) {
        let removed: Vec<Index> = match self.arena.get(parent) {
            Some(parent_node) => parent_node
                .children
                .iter()
                .copied()
                .filter(|&child| {
                    self.arena
                        .get(child)
                        .map_or(false, |node| node.name == name)
                })
                .collect(),
            None => return,
        };
        if removed.is_empty() {
            return;
        }
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.retain(|child| !removed.contains(child));
        }
        for idx in removed {
            if let Some(child_node) = self.arena.get_mut(idx) {
                if child_node.parent == Some(parent) {
                    child_node.parent = None;
                }
            }
        }
    }

    /// True when `needle` lies inside the subtree rooted at `sub_root`,
    /// `sub_root` itself included. Tracks seen indices so a doubled edge
    /// cannot loop the walk.
    #[instrument(level = "trace", skip(self))]
    pub fn contains_in_subtree(&self, needle: Index, sub_root: Index) -> bool {
        let mut stack = vec![sub_root];
        let mut seen: HashSet<Index> = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == needle {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(node) = self.arena.get(current) {
                stack.extend(node.children.iter().copied());
            }
        }
        false
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }
}

pub struct TreeIterator<'a> {
    tree: &'a DestinationTree,
    stack: Vec<Index>,
    seen: HashSet<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a DestinationTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
            seen: HashSet::new(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a DestinationNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            // A node reachable through a doubled edge is yielded once
            if !self.seen.insert(current_idx) {
                continue;
            }
            if let Some(node) = self.tree.node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
