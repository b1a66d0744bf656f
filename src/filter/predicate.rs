//! Filter predicates.

use std::fmt;
use std::rc::Rc;

use super::types::TypeState;
use crate::graph::GraphItem;

/// Decides whether a node and/or arc should be shown.
///
/// A filter only takes part in the passes it opts into; an item is shown only
/// when every participating filter says so.
pub trait GraphFilter {
	/// Whether this filter is consulted for nodes.
	fn is_node_filter(&self) -> bool;

	/// Whether this filter is consulted for arcs.
	fn is_arc_filter(&self) -> bool;

	/// Whether the item should stay visible.
	fn is_visible(&self, item: &dyn GraphItem) -> bool;
}

/// Which items a [`PredicateFilter`] applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterTarget {
	/// Nodes only.
	Nodes,
	/// Arcs only.
	Arcs,
	/// Nodes and arcs.
	Both,
}

/// A [`GraphFilter`] built from a closure.
pub struct PredicateFilter {
	target: FilterTarget,
	predicate: Box<dyn Fn(&dyn GraphItem) -> bool>,
}

impl PredicateFilter {
	/// Wrap `predicate`, applying it to `target`.
	pub fn new(target: FilterTarget, predicate: impl Fn(&dyn GraphItem) -> bool + 'static) -> Self {
		Self {
			target,
			predicate: Box::new(predicate),
		}
	}

	/// A filter consulted for nodes only.
	pub fn nodes(predicate: impl Fn(&dyn GraphItem) -> bool + 'static) -> Self {
		Self::new(FilterTarget::Nodes, predicate)
	}

	/// A filter consulted for arcs only.
	pub fn arcs(predicate: impl Fn(&dyn GraphItem) -> bool + 'static) -> Self {
		Self::new(FilterTarget::Arcs, predicate)
	}

	/// What this filter applies to.
	pub fn target(&self) -> FilterTarget {
		self.target
	}
}

impl GraphFilter for PredicateFilter {
	fn is_node_filter(&self) -> bool {
		matches!(self.target, FilterTarget::Nodes | FilterTarget::Both)
	}

	fn is_arc_filter(&self) -> bool {
		matches!(self.target, FilterTarget::Arcs | FilterTarget::Both)
	}

	fn is_visible(&self, item: &dyn GraphItem) -> bool {
		(self.predicate)(item)
	}
}

impl fmt::Debug for PredicateFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PredicateFilter")
			.field("target", &self.target)
			.finish_non_exhaustive()
	}
}

/// Hides nodes whose type is switched off.
pub(crate) struct NodeTypeFilter(pub Rc<TypeState>);

impl GraphFilter for NodeTypeFilter {
	fn is_node_filter(&self) -> bool {
		true
	}

	fn is_arc_filter(&self) -> bool {
		false
	}

	fn is_visible(&self, item: &dyn GraphItem) -> bool {
		self.0.nodes.is_visible(&item.item_type())
	}
}

/// Hides arcs whose type is switched off.
pub(crate) struct ArcTypeFilter(pub Rc<TypeState>);

impl GraphFilter for ArcTypeFilter {
	fn is_node_filter(&self) -> bool {
		false
	}

	fn is_arc_filter(&self) -> bool {
		true
	}

	fn is_visible(&self, item: &dyn GraphItem) -> bool {
		self.0.arcs.is_visible(&item.item_type())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::GraphModel;

	#[test]
	fn test_targets() {
		let filter = PredicateFilter::nodes(|_| false);
		assert!(filter.is_node_filter());
		assert!(!filter.is_arc_filter());
		let filter = PredicateFilter::new(FilterTarget::Both, |_| true);
		assert!(filter.is_node_filter() && filter.is_arc_filter());
	}

	#[test]
	fn test_predicate_sees_item() {
		let model = GraphModel::new();
		let node = model.add_node("keep").unwrap();
		let other = model.add_node("drop").unwrap();
		let filter = PredicateFilter::nodes(|item| item.id().to_string() == "keep");
		assert!(filter.is_visible(&node));
		assert!(!filter.is_visible(&other));
	}
}
