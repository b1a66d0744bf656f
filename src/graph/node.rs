//! Graph nodes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::arc::GraphArc;
use super::item::{GraphItem, ItemId, ItemKind, ItemState, ItemType};
use crate::geometry::{Point, Rect, preferred_node_size};

#[derive(Debug)]
struct NodeInner {
	id: ItemId,
	item_type: RefCell<ItemType>,
	text: RefCell<String>,
	icon: RefCell<Option<String>>,
	state: ItemState,
	matching: Cell<bool>,
	fixed_location: Cell<bool>,
	bounds: Cell<Rect>,
	layout_bounds: Cell<Rect>,
	arcs: RefCell<Vec<GraphArc>>,
}

/// A node handle.
///
/// Clones share the same node. Equality and hashing use the identity only.
#[derive(Clone)]
pub struct GraphNode(Rc<NodeInner>);

impl GraphNode {
	pub(crate) fn new(id: ItemId, text: String, icon: Option<String>, item_type: ItemType) -> Self {
		let (width, height) = preferred_node_size(&text);
		Self(Rc::new(NodeInner {
			id,
			item_type: RefCell::new(item_type),
			text: RefCell::new(text),
			icon: RefCell::new(icon),
			state: ItemState::new(true),
			matching: Cell::new(false),
			fixed_location: Cell::new(false),
			bounds: Cell::new(Rect::new(0.0, 0.0, width, height)),
			layout_bounds: Cell::new(Rect::default()),
			arcs: RefCell::new(Vec::new()),
		}))
	}

	/// Whether both handles point at the very same node.
	pub fn ptr_eq(&self, other: &GraphNode) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	/// Label text.
	pub fn text(&self) -> String {
		self.0.text.borrow().clone()
	}

	/// Replace the label text. The node keeps its position and is resized to fit.
	pub fn set_text(&self, text: impl Into<String>) {
		let text = text.into();
		let (width, height) = preferred_node_size(&text);
		let bounds = self.bounds();
		self.0.bounds.set(Rect::new(bounds.x, bounds.y, width, height));
		*self.0.text.borrow_mut() = text;
	}

	/// Icon resource name, if any.
	pub fn icon(&self) -> Option<String> {
		self.0.icon.borrow().clone()
	}

	/// Set or clear the icon resource name.
	pub fn set_icon(&self, icon: Option<String>) {
		*self.0.icon.borrow_mut() = icon;
	}

	/// Change the type. The owning model only notices after
	/// [`GraphModel::recalculate_node_types`](super::GraphModel::recalculate_node_types).
	pub fn set_item_type(&self, item_type: ItemType) {
		*self.0.item_type.borrow_mut() = item_type;
	}

	/// All incident arcs, in the order they were attached.
	pub fn arcs(&self) -> Vec<GraphArc> {
		self.0.arcs.borrow().clone()
	}

	/// Number of incident arcs.
	pub fn arc_count(&self) -> usize {
		self.0.arcs.borrow().len()
	}

	/// Incoming and/or outgoing arcs. Self arcs count as both.
	pub fn arcs_directed(&self, incoming: bool, outgoing: bool) -> Vec<GraphArc> {
		self.0
			.arcs
			.borrow()
			.iter()
			.filter(|arc| {
				(incoming && arc.destination().ptr_eq(self)) || (outgoing && arc.source().ptr_eq(self))
			})
			.cloned()
			.collect()
	}

	/// Distinct neighbours reachable over any incident arc, excluding this node itself.
	pub fn connected_nodes(&self) -> Vec<GraphNode> {
		let mut connected: Vec<GraphNode> = Vec::new();
		for arc in self.0.arcs.borrow().iter() {
			let other = if arc.source().ptr_eq(self) {
				arc.destination()
			} else {
				arc.source()
			};
			if other.ptr_eq(self) || connected.iter().any(|n| n.ptr_eq(&other)) {
				continue;
			}
			connected.push(other);
		}
		connected
	}

	pub(crate) fn attach_arc(&self, arc: &GraphArc) {
		let mut arcs = self.0.arcs.borrow_mut();
		if !arcs.iter().any(|a| a.ptr_eq(arc)) {
			arcs.push(arc.clone());
		}
	}

	pub(crate) fn detach_arc(&self, arc: &GraphArc) {
		self.0.arcs.borrow_mut().retain(|a| !a.ptr_eq(arc));
	}

	pub(crate) fn detach_all_arcs(&self) {
		self.0.arcs.borrow_mut().clear();
	}

	/// Whether the node matched the last search.
	pub fn is_matching(&self) -> bool {
		self.0.matching.get()
	}

	/// Mark the node as a search hit.
	pub fn set_matching(&self, matching: bool) {
		self.0.matching.set(matching);
	}

	/// Whether automatic layouts must leave this node where it is.
	pub fn is_fixed_location(&self) -> bool {
		self.0.fixed_location.get()
	}

	/// Pin or unpin the node.
	pub fn set_fixed_location(&self, fixed: bool) {
		self.0.fixed_location.set(fixed);
	}

	/// Current bounds on the canvas.
	pub fn bounds(&self) -> Rect {
		self.0.bounds.get()
	}

	/// Replace the bounds.
	pub fn set_bounds(&self, bounds: Rect) {
		self.0.bounds.set(bounds);
	}

	/// Move the top-left corner, keeping the size.
	pub fn set_location(&self, x: f64, y: f64) {
		let bounds = self.bounds();
		self.set_bounds(Rect::new(x, y, bounds.width, bounds.height));
	}

	/// Resize, keeping the top-left corner.
	pub fn set_size(&self, width: f64, height: f64) {
		let bounds = self.bounds();
		self.set_bounds(Rect::new(bounds.x, bounds.y, width, height));
	}

	/// Centre of the current bounds.
	pub fn center(&self) -> Point {
		self.bounds().center()
	}

	/// Position and size most recently assigned by a layout algorithm.
	pub fn layout_bounds(&self) -> Rect {
		self.0.layout_bounds.get()
	}

	/// Record the position a layout algorithm assigned.
	pub fn set_location_in_layout(&self, x: f64, y: f64) {
		let layout = self.layout_bounds();
		self.0
			.layout_bounds
			.set(Rect::new(x, y, layout.width, layout.height));
	}

	/// Record the size a layout algorithm assigned.
	pub fn set_size_in_layout(&self, width: f64, height: f64) {
		let layout = self.layout_bounds();
		self.0
			.layout_bounds
			.set(Rect::new(layout.x, layout.y, width, height));
	}

	fn update_arc_selection(&self) {
		let selected = self.is_selected();
		for arc in self.arcs() {
			if selected {
				arc.set_selected(true);
				continue;
			}
			let (src, dest) = (arc.source(), arc.destination());
			if src.ptr_eq(&dest) {
				arc.set_selected(false);
			} else if src.ptr_eq(self) {
				arc.set_selected(dest.is_selected());
			} else {
				arc.set_selected(src.is_selected());
			}
		}
	}
}

impl GraphItem for GraphNode {
	fn id(&self) -> &ItemId {
		&self.0.id
	}

	fn kind(&self) -> ItemKind {
		ItemKind::Node
	}

	fn item_type(&self) -> ItemType {
		self.0.item_type.borrow().clone()
	}

	fn is_selected(&self) -> bool {
		self.0.state.selected.get()
	}

	fn set_selected(&self, selected: bool) {
		if self.is_selected() != selected {
			self.0.state.selected.set(selected);
			self.update_arc_selection();
		}
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

	/// Hiding a node hides every incident arc. Showing it again leaves the arcs alone;
	/// their visibility has to be re-asserted (filters do this).
	fn set_visible(&self, visible: bool) {
		self.0.state.visible.set(visible);
		if !visible {
			for arc in self.arcs() {
				arc.set_visible(false);
			}
		}
	}

	fn tooltip(&self) -> String {
		self.0
			.state
			.tooltip
			.borrow()
			.clone()
			.unwrap_or_else(|| self.text())
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

impl PartialEq for GraphNode {
	fn eq(&self, other: &Self) -> bool {
		self.0.id == other.0.id
	}
}

impl Eq for GraphNode {}

impl Hash for GraphNode {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.id.hash(state);
	}
}

impl fmt::Debug for GraphNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GraphNode")
			.field("id", &self.0.id)
			.field("type", &*self.0.item_type.borrow())
			.field("arcs", &self.arc_count())
			.finish()
	}
}

impl fmt::Display for GraphNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0.text.borrow())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::GraphModel;
	use pretty_assertions::assert_eq;

	#[test]
	fn test_connected_nodes_are_distinct_and_skip_self() {
		let model = GraphModel::new();
		let a = model.add_node("a").unwrap();
		model.add_arc("ab", "a", "b").unwrap();
		model.add_arc("ba", "b", "a").unwrap();
		model.add_arc("ac", "a", "c").unwrap();
		model.add_arc("aa", "a", "a").unwrap();
		let ids: Vec<String> = a.connected_nodes().iter().map(|n| n.id().to_string()).collect();
		assert_eq!(ids, vec!["b", "c"]);
	}

	#[test]
	fn test_directed_arcs() {
		let model = GraphModel::new();
		let a = model.add_node("a").unwrap();
		model.add_arc("ab", "a", "b").unwrap();
		model.add_arc("ca", "c", "a").unwrap();
		let out: Vec<String> = a.arcs_directed(false, true).iter().map(|x| x.id().to_string()).collect();
		let inc: Vec<String> = a.arcs_directed(true, false).iter().map(|x| x.id().to_string()).collect();
		assert_eq!(out, vec!["ab"]);
		assert_eq!(inc, vec!["ca"]);
		assert_eq!(a.arcs_directed(true, true).len(), 2);
		assert!(a.arcs_directed(false, false).is_empty());
	}

	#[test]
	fn test_selection_cascades_to_arcs() {
		let model = GraphModel::new();
		let arc = model.add_arc("ab", "a", "b").unwrap();
		let (a, b) = (arc.source(), arc.destination());
		a.set_selected(true);
		assert!(arc.is_selected());
		b.set_selected(true);
		a.set_selected(false);
		// b is still selected, so the arc stays selected
		assert!(arc.is_selected());
		b.set_selected(false);
		assert!(!arc.is_selected());
	}

	#[test]
	fn test_tooltip_defaults_to_text() {
		let model = GraphModel::new();
		let node = model.add_node("n1").unwrap();
		assert_eq!(node.tooltip(), "n1");
		node.set_tooltip(Some("custom".into()));
		assert_eq!(node.tooltip(), "custom");
		node.set_tooltip(None);
		node.set_text("renamed");
		assert_eq!(node.tooltip(), "renamed");
	}

	#[test]
	fn test_layout_cache_is_separate_from_bounds() {
		let model = GraphModel::new();
		let node = model.add_node("n").unwrap();
		node.set_location_in_layout(5.0, 6.0);
		node.set_size_in_layout(10.0, 4.0);
		assert_eq!(node.layout_bounds(), Rect::new(5.0, 6.0, 10.0, 4.0));
		assert_eq!(node.bounds().x, 0.0);
	}
}
