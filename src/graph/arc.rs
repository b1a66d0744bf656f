//! Graph arcs.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::item::{GraphItem, ItemId, ItemKind, ItemState, ItemType};
use super::node::GraphNode;

#[derive(Debug)]
struct ArcInner {
	id: ItemId,
	item_type: RefCell<ItemType>,
	source: GraphNode,
	destination: GraphNode,
	icon: Option<String>,
	state: ItemState,
	inverted: Cell<bool>,
	curve_factor: Cell<u32>,
	show_arrow_head: Cell<bool>,
}

/// An arc handle. Arcs only exist inside a [`GraphModel`](super::GraphModel).
///
/// Clones share the same arc. Equality and hashing use the identity only.
#[derive(Clone)]
pub struct GraphArc(Rc<ArcInner>);

impl GraphArc {
	pub(crate) fn new(
		id: ItemId,
		source: GraphNode,
		destination: GraphNode,
		icon: Option<String>,
		item_type: ItemType,
	) -> Self {
		// an arc between hidden nodes starts hidden
		let visible = source.is_visible() && destination.is_visible();
		Self(Rc::new(ArcInner {
			id,
			item_type: RefCell::new(item_type),
			source,
			destination,
			icon,
			state: ItemState::new(visible),
			inverted: Cell::new(false),
			curve_factor: Cell::new(0),
			show_arrow_head: Cell::new(true),
		}))
	}

	/// Whether both handles point at the very same arc.
	pub fn ptr_eq(&self, other: &GraphArc) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	/// The source node.
	pub fn source(&self) -> GraphNode {
		self.0.source.clone()
	}

	/// The destination node.
	pub fn destination(&self) -> GraphNode {
		self.0.destination.clone()
	}

	/// Whether source and destination are the same node.
	pub fn is_self_arc(&self) -> bool {
		self.0.source.ptr_eq(&self.0.destination)
	}

	/// Icon resource name, if any.
	pub fn icon(&self) -> Option<String> {
		self.0.icon.clone()
	}

	/// Change the type. The owning model only notices after
	/// [`GraphModel::recalculate_arc_types`](super::GraphModel::recalculate_arc_types).
	pub fn set_item_type(&self, item_type: ItemType) {
		*self.0.item_type.borrow_mut() = item_type;
	}

	/// How far the rendered path bows away from the chord; 0 is a straight line.
	pub fn curve_factor(&self) -> u32 {
		self.0.curve_factor.get()
	}

	/// Set the curve factor. Normally done by the model's arrangement pass.
	pub fn set_curve_factor(&self, curve_factor: u32) {
		self.0.curve_factor.set(curve_factor);
	}

	/// Whether the arc is drawn from destination to source.
	///
	/// Only rendering and the tooltip honour this; source and destination stay put.
	pub fn is_inverted(&self) -> bool {
		self.0.inverted.get()
	}

	/// Draw the arc backwards.
	pub fn set_inverted(&self, inverted: bool) {
		self.0.inverted.set(inverted);
	}

	/// Whether an arrow head should be drawn.
	pub fn shows_arrow_head(&self) -> bool {
		self.0.show_arrow_head.get()
	}

	/// Toggle the arrow head.
	pub fn set_show_arrow_head(&self, show: bool) {
		self.0.show_arrow_head.set(show);
	}
}

impl GraphItem for GraphArc {
	fn id(&self) -> &ItemId {
		&self.0.id
	}

	fn kind(&self) -> ItemKind {
		ItemKind::Arc
	}

	fn item_type(&self) -> ItemType {
		self.0.item_type.borrow().clone()
	}

	fn is_selected(&self) -> bool {
		self.0.state.selected.get()
	}

	fn set_selected(&self, selected: bool) {
		self.0.state.selected.set(selected);
	}

	fn is_highlighted(&self) -> bool {
		self.0.state.highlighted.get()
	}

	fn set_highlighted(&self, highlighted: bool) {
		self.0.state.highlighted.set(highlighted);
	}

	fn is_visible(&self) -> bool {
		self.0.state.visible.get()
	}

	/// An arc can only be shown while both endpoints are visible; otherwise a
	/// request to show it is ignored.
	fn set_visible(&self, visible: bool) {
		if !visible {
			self.0.state.visible.set(false);
		} else if self.0.source.is_visible() && self.0.destination.is_visible() {
			self.0.state.visible.set(true);
		}
	}

	fn tooltip(&self) -> String {
		self.0
			.state
			.tooltip
			.borrow()
			.clone()
			.unwrap_or_else(|| self.to_string())
	}

	fn set_tooltip(&self, tooltip: Option<String>) {
		*self.0.state.tooltip.borrow_mut() = tooltip;
	}

	fn attribute(&self, key: &str) -> Option<String> {
		self.0.state.attribute(key)
	}

	fn set_attribute(&self, key: &str, value: Option<String>) {
		self.0.state.set_attribute(key, value);
	}
}

impl PartialEq for GraphArc {
	fn eq(&self, other: &Self) -> bool {
		self.0.id == other.0.id
	}
}

impl Eq for GraphArc {}

impl Hash for GraphArc {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.id.hash(state);
	}
}

impl fmt::Debug for GraphArc {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GraphArc")
			.field("id", &self.0.id)
			.field("source", self.0.source.id())
			.field("destination", self.0.destination.id())
			.field("curve_factor", &self.curve_factor())
			.finish()
	}
}

impl fmt::Display for GraphArc {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let (from, to) = if self.is_inverted() {
			(&self.0.destination, &self.0.source)
		} else {
			(&self.0.source, &self.0.destination)
		};
		write!(f, "{} -- {} --> {}", from, self.item_type(), to)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{ArcOptions, GraphModel};

	#[test]
	fn test_hidden_endpoint_hides_arc() {
		let model = GraphModel::new();
		let arc = model.add_arc("ab", "a", "b").unwrap();
		let a = arc.source();
		assert!(arc.is_visible());

		a.set_visible(false);
		assert!(!arc.is_visible());

		// showing the node does not bring the arc back
		a.set_visible(true);
		assert!(!arc.is_visible());
		arc.set_visible(true);
		assert!(arc.is_visible());
	}

	#[test]
	fn test_show_request_ignored_while_endpoint_hidden() {
		let model = GraphModel::new();
		let arc = model.add_arc("ab", "a", "b").unwrap();
		arc.destination().set_visible(false);
		arc.set_visible(true);
		assert!(!arc.is_visible());
	}

	#[test]
	fn test_arc_to_hidden_node_starts_hidden() {
		let model = GraphModel::new();
		model.add_node("a").unwrap().set_visible(false);
		let arc = model.add_arc("ab", "a", "b").unwrap();
		assert!(!arc.is_visible());
	}

	#[test]
	fn test_tooltip_honours_inversion() {
		let model = GraphModel::new();
		let arc = model
			.add_arc_with(
				"ab",
				"a",
				"b",
				ArcOptions {
					item_type: Some(ItemType::named("is_a")),
					..ArcOptions::default()
				},
			)
			.unwrap();
		assert_eq!(arc.tooltip(), "a -- is_a --> b");
		arc.set_inverted(true);
		assert_eq!(arc.tooltip(), "b -- is_a --> a");
		// inversion is cosmetic
		assert_eq!(arc.source().id(), &ItemId::from("a"));
	}
}
