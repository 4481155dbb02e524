//! Travel route planner: dependency-ordered itineraries with cycle detection.
//!
//! Destinations are stored in a rooted dependency tree; a node's children are
//! the destinations that must be visited before it. [`RoutePlanner`] exposes
//! the mutation API and computes the linearized route.
//!
//! ```
//! use rsroute::RoutePlanner;
//!
//! let mut planner = RoutePlanner::new();
//! planner.add("paris")?;
//! planner.add_after("nice", "lyon")?;
//! assert_eq!(planner.calculate_route()?, vec!["paris", "lyon", "nice"]);
//! # Ok::<(), rsroute::PlannerError>(())
//! ```

pub mod arena;
pub mod errors;
pub mod planner;
pub mod tree_traits;
pub mod util;

pub use arena::{DestinationNode, DestinationTree, ROOT_NAME};
pub use errors::{PlannerError, PlannerResult};
pub use planner::RoutePlanner;
pub use tree_traits::{format_route, TreeFormat};
