use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};

use super::LayoutAlgorithm;
use crate::error::Result;
use crate::geometry::Rect;
use crate::graph::{GraphArc, GraphItem, GraphModel, GraphNode, ItemType};

/// A named layout run over the visible part of a model.
#[derive(Clone)]
pub struct LayoutAction {
	name: String,
	algorithm: Rc<dyn LayoutAlgorithm>,
	layout_arc_types: Vec<ItemType>,
}

impl LayoutAction {
	/// Wrap `algorithm` under `name`.
	pub fn new(name: impl Into<String>, algorithm: Rc<dyn LayoutAlgorithm>) -> Self {
		Self {
			name: name.into(),
			algorithm,
			layout_arc_types: Vec::new(),
		}
	}

	/// The display name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The algorithm that computes positions.
	pub fn algorithm(&self) -> Rc<dyn LayoutAlgorithm> {
		self.algorithm.clone()
	}

	/// Swap the algorithm.
	pub fn set_algorithm(&mut self, algorithm: Rc<dyn LayoutAlgorithm>) {
		self.algorithm = algorithm;
	}

	/// Arc types handed to the algorithm. Empty means every visible arc.
	pub fn layout_arc_types(&self) -> &[ItemType] {
		&self.layout_arc_types
	}

	/// Restrict the arcs handed to the algorithm.
	pub fn set_layout_arc_types(&mut self, types: Vec<ItemType>) {
		self.layout_arc_types = types;
	}

	fn layout_arcs(&self, model: &GraphModel) -> Vec<GraphArc> {
		let arcs = model.visible_arcs();
		if self.layout_arc_types.is_empty() {
			return arcs;
		}
		arcs.into_iter()
			.filter(|arc| self.layout_arc_types.contains(&arc.item_type()))
			.collect()
	}

	/// Lay out the visible nodes of `model` inside `area`.
	///
	/// Every placement is recorded in the node's layout cache; nodes that are
	/// not pinned are then moved there. Returns how many nodes moved.
	pub fn run(&self, model: &GraphModel, area: Rect) -> Result<usize> {
		let nodes = model.visible_nodes();
		let arcs = self.layout_arcs(model);
		let placements = self.algorithm.apply_layout(&nodes, &arcs, area)?;

		let by_id: HashMap<_, &GraphNode> = nodes.iter().map(|node| (node.id(), node)).collect();
		let mut moved = 0;
		for placement in &placements {
			let Some(node) = by_id.get(&placement.node) else {
				warn!("layout '{}' placed unknown node {}", self.name, placement.node);
				continue;
			};
			let bounds = placement.bounds;
			node.set_location_in_layout(bounds.x, bounds.y);
			node.set_size_in_layout(bounds.width, bounds.height);
			if !node.is_fixed_location() {
				node.set_location(bounds.x, bounds.y);
				moved += 1;
			}
		}
		debug!(
			"layout '{}' moved {} of {} nodes ({} arcs)",
			self.name,
			moved,
			nodes.len(),
			arcs.len()
		);
		Ok(moved)
	}
}

impl fmt::Debug for LayoutAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LayoutAction")
			.field("name", &self.name)
			.field("layout_arc_types", &self.layout_arc_types)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::GraphError;
	use crate::graph::{ArcOptions, ItemId};
	use crate::layout::NodePlacement;
	use pretty_assertions::assert_eq;
	use std::cell::RefCell;

	/// Puts every node at the area origin and remembers what it was given.
	#[derive(Default)]
	struct Recording {
		seen: RefCell<(Vec<String>, Vec<String>)>,
	}

	impl LayoutAlgorithm for Recording {
		fn apply_layout(&self, nodes: &[GraphNode], arcs: &[GraphArc], area: Rect) -> Result<Vec<NodePlacement>> {
			*self.seen.borrow_mut() = (
				nodes.iter().map(|n| n.id().to_string()).collect(),
				arcs.iter().map(|a| a.id().to_string()).collect(),
			);
			let mut placements: Vec<NodePlacement> = nodes
				.iter()
				.map(|n| NodePlacement {
					node: n.id().clone(),
					bounds: Rect::new(area.x, area.y, 5.0, 5.0),
				})
				.collect();
			placements.push(NodePlacement {
				node: ItemId::from("ghost"),
				bounds: Rect::default(),
			});
			Ok(placements)
		}
	}

	struct Failing;

	impl LayoutAlgorithm for Failing {
		fn apply_layout(&self, _: &[GraphNode], _: &[GraphArc], _: Rect) -> Result<Vec<NodePlacement>> {
			Err(GraphError::Layout("boom".into()))
		}
	}

	#[test]
	fn test_pinned_nodes_stay_put() {
		let model = GraphModel::new();
		let a = model.add_node("a").unwrap();
		let b = model.add_node("b").unwrap();
		b.set_location(1.0, 2.0);
		b.set_fixed_location(true);

		let action = LayoutAction::new("test", Rc::new(Recording::default()));
		let moved = action.run(&model, Rect::new(30.0, 40.0, 100.0, 100.0)).unwrap();
		assert_eq!(moved, 1);
		assert_eq!((a.bounds().x, a.bounds().y), (30.0, 40.0));
		assert_eq!((b.bounds().x, b.bounds().y), (1.0, 2.0));
		assert_eq!(b.layout_bounds(), Rect::new(30.0, 40.0, 5.0, 5.0));
	}

	#[test]
	fn test_only_visible_items_and_chosen_arc_types() {
		let model = GraphModel::new();
		let typed = |t: &str| ArcOptions {
			item_type: Some(ItemType::named(t)),
			icon: None,
		};
		model.add_arc_with("ab", "a", "b", typed("is_a")).unwrap();
		model.add_arc_with("bc", "b", "c", typed("part_of")).unwrap();
		model.add_node("hidden").unwrap().set_visible(false);

		let recording = Rc::new(Recording::default());
		let mut action = LayoutAction::new("test", recording.clone());
		action.set_layout_arc_types(vec![ItemType::named("part_of")]);
		action.run(&model, Rect::default()).unwrap();
		let (nodes, arcs) = recording.seen.borrow().clone();
		assert_eq!(nodes, vec!["a", "b", "c"]);
		assert_eq!(arcs, vec!["bc"]);
	}

	#[test]
	fn test_errors_propagate() {
		let model = GraphModel::new();
		model.add_node("a").unwrap();
		let action = LayoutAction::new("failing", Rc::new(Failing));
		assert_eq!(
			action.run(&model, Rect::default()),
			Err(GraphError::Layout("boom".into()))
		);
	}
}
