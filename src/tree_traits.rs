use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::arena::DestinationTree;

/// Conversion into a printable `termtree` representation.
pub trait TreeFormat {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeFormat for DestinationTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        let root_idx = self.root();
        let root_name = self
            .node(root_idx)
            .map(|node| node.name.clone())
            .unwrap_or_default();
        let mut tree = Tree::new(root_name);

        fn build_tree(arena: &DestinationTree, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = arena.node(child_idx) {
                        let mut child_tree = Tree::new(child.name.clone());
                        build_tree(arena, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        build_tree(self, root_idx, &mut tree);
        tree
    }
}

/// Formats a computed route as a single line, e.g. `lyon -> nice -> paris`.
pub fn format_route(route: &[String]) -> String {
    route.iter().join(" -> ")
}
