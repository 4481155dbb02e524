use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::arena::{DestinationTree, ROOT_NAME};
use crate::errors::{PlannerError, PlannerResult};
use crate::tree_traits::TreeFormat;

/// Computes a linear visiting order over named destinations subject to
/// "visit after" constraints.
///
/// Constraints are stored in a [`DestinationTree`]: a node's children are the
/// prerequisites that must appear earlier in the route. Destinations are
/// created lazily, either top-level via [`add`](Self::add) or on demand when
/// referenced by [`add_after`](Self::add_after).
pub struct RoutePlanner {
    tree: DestinationTree,
    visited: HashSet<String>,
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutePlanner {
    pub fn new() -> Self {
        Self {
            tree: DestinationTree::new(),
            visited: HashSet::new(),
        }
    }

    pub fn tree(&self) -> &DestinationTree {
        &self.tree
    }

    /// Registers a new top-level destination.
    ///
    /// Fails with [`PlannerError::DuplicateDestination`] when the name already
    /// exists anywhere in the tree; the tree is left untouched in that case.
    #[instrument(level = "debug", skip(self))]
    pub fn add(&mut self, destination: &str) -> PlannerResult<()> {
        validate_name(destination)?;
        if self.tree.find(destination).is_some() {
            return Err(PlannerError::DuplicateDestination(destination.to_string()));
        }
        let root = self.tree.root();
        self.tree.insert_node(destination, root);
        debug!("added top-level destination: {destination}");
        Ok(())
    }

    /// Records that `destination` must be visited after `source`.
    ///
    /// Both names are created on demand. When `source` already sits elsewhere
    /// in the tree it is relocated under `destination`: the newest constraint
    /// wins and the edge from the previous parent is dropped. Restating an
    /// already-recorded constraint is a no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn add_after(&mut self, destination: &str, source: &str) -> PlannerResult<()> {
        validate_name(destination)?;
        validate_name(source)?;

        let dest_idx = match self.tree.find(destination) {
            Some(idx) => idx,
            None => {
                let root = self.tree.root();
                self.tree.insert_node(destination, root)
            }
        };

        match self.tree.find(source) {
            Some(src_idx) => self.relocate(src_idx, source, dest_idx),
            None => {
                self.tree.insert_node(source, dest_idx);
            }
        }
        debug!("recorded constraint: {destination} after {source}");
        Ok(())
    }

    /// Moves an existing prerequisite under a newly stated dependent.
    ///
    /// Attaches before detaching so the subtree never goes unreachable. When
    /// the dependent already lies inside the prerequisite's own subtree the
    /// stated constraints form a cycle; the old edge is kept in exactly that
    /// case so the loop stays reachable from the root and route computation
    /// reports it.
    fn relocate(&mut self, src_idx: Index, source: &str, dest_idx: Index) {
        let old_parent = self.tree.parent_of(src_idx);
        if old_parent == Some(dest_idx) {
            // constraint already recorded
            return;
        }
        let forms_cycle = self.tree.contains_in_subtree(dest_idx, src_idx);
        self.tree.attach(src_idx, dest_idx);
        if !forms_cycle {
            if let Some(old) = old_parent {
                self.tree.detach(source, old);
            }
        }
    }

    /// Computes the full visiting order.
    ///
    /// Post-order depth-first traversal from the root: children are resolved
    /// in insertion order and a node's entire subtree is placed before the
    /// node's own name, so every prerequisite precedes its dependents. The
    /// synthetic root is stripped from the result. All-or-nothing: a
    /// [`PlannerError::CircularDependency`] aborts without a partial route.
    #[instrument(level = "debug", skip(self))]
    pub fn calculate_route(&mut self) -> PlannerResult<Vec<String>> {
        self.visited.clear();
        let mut route = Vec::new();
        Self::visit(&self.tree, self.tree.root(), &mut self.visited, &mut route)?;
        route.pop(); // the root anchor is always appended last
        debug!("calculated route over {} destinations", route.len());
        Ok(route)
    }

    /// Renders the current dependency tree for display.
    pub fn to_tree_string(&self) -> termtree::Tree<String> {
        self.tree.to_tree_string()
    }

    fn visit(
        tree: &DestinationTree,
        idx: Index,
        visited: &mut HashSet<String>,
        route: &mut Vec<String>,
    ) -> PlannerResult<()> {
        let node = tree
            .node(idx)
            .ok_or_else(|| PlannerError::Internal(format!("dangling node index: {idx:?}")))?;
        // Re-entering a name on the current descent means a node is reachable
        // from two parents: the doubled edge deliberately left by relocate()
        if !visited.insert(node.name.clone()) {
            return Err(PlannerError::CircularDependency(node.name.clone()));
        }
        for &child in &node.children {
            Self::visit(tree, child, visited, route)?;
        }
        route.push(node.name.clone());
        Ok(())
    }
}

fn validate_name(name: &str) -> PlannerResult<()> {
    if name.is_empty() {
        return Err(PlannerError::InvalidName {
            name: name.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if name == ROOT_NAME {
        return Err(PlannerError::InvalidName {
            name: name.to_string(),
            reason: "reserved for the tree root".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_rejects_empty_and_reserved() {
        assert!(matches!(
            validate_name(""),
            Err(PlannerError::InvalidName { .. })
        ));
        assert!(matches!(
            validate_name(ROOT_NAME),
            Err(PlannerError::InvalidName { .. })
        ));
        assert!(validate_name("lisbon").is_ok());
    }
}
