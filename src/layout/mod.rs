//! Node layout: the algorithm contract and the built-in algorithms.
//!
//! Algorithms are black boxes. They receive the nodes and arcs to lay out plus
//! a target area and answer with a placement per node; [`LayoutAction`] copies
//! the placements onto the nodes.

mod action;
mod force;
mod grid;

pub use action::LayoutAction;
pub use force::{ForceLayout, ForceLayoutConfig};
pub use grid::GridLayout;

use crate::error::Result;
use crate::geometry::Rect;
use crate::graph::{GraphArc, GraphNode, ItemId};

/// Name of the alphabetical grid layout.
pub const LAYOUT_GRID_BY_ALPHA: &str = "Grid - Alphabetical";
/// Name of the force directed layout.
pub const LAYOUT_FORCE_DIRECTED: &str = "Force Directed";

/// Where a layout wants a node to go.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePlacement {
	/// The node being placed.
	pub node: ItemId,
	/// New top-left corner and size.
	pub bounds: Rect,
}

/// Computes node positions inside an area.
pub trait LayoutAlgorithm {
	/// Place `nodes` inside `area`. Arcs are hints; algorithms may ignore them.
	/// Errors are handed back to whoever ran the layout.
	fn apply_layout(&self, nodes: &[GraphNode], arcs: &[GraphArc], area: Rect) -> Result<Vec<NodePlacement>>;
}
