//! The graph model: node and arc registries plus change notification.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use super::arc::GraphArc;
use super::arrange::arrange_arcs;
use super::data::GraphData;
use super::event::{GraphModelEvent, GraphModelListener};
use super::item::{GraphItem, ItemId, ItemType};
use super::node::GraphNode;
use crate::error::Result;
use crate::notify::ListenerList;

/// Optional arguments of [`GraphModel::add_node_with`].
#[derive(Clone, Debug, Default)]
pub struct NodeOptions {
	/// Label; defaults to the identity's text.
	pub text: Option<String>,
	/// Icon resource name.
	pub icon: Option<String>,
	/// Type; defaults to [`ItemType::Unknown`].
	pub item_type: Option<ItemType>,
}

/// Optional arguments of [`GraphModel::add_arc_with`].
#[derive(Clone, Debug, Default)]
pub struct ArcOptions {
	/// Type; defaults to [`ItemType::Unknown`].
	pub item_type: Option<ItemType>,
	/// Icon resource name.
	pub icon: Option<String>,
}

/// An arc endpoint: either an identity (added implicitly when unknown) or a node.
#[derive(Clone, Debug)]
pub enum NodeRef {
	/// Look the node up by identity.
	Id(ItemId),
	/// Use this node, registering it if the model has no node with its identity.
	Node(GraphNode),
}

impl NodeRef {
	fn id(&self) -> &ItemId {
		match self {
			NodeRef::Id(id) => id,
			NodeRef::Node(node) => node.id(),
		}
	}
}

impl From<GraphNode> for NodeRef {
	fn from(node: GraphNode) -> Self {
		NodeRef::Node(node)
	}
}

impl From<&GraphNode> for NodeRef {
	fn from(node: &GraphNode) -> Self {
		NodeRef::Node(node.clone())
	}
}

impl From<ItemId> for NodeRef {
	fn from(id: ItemId) -> Self {
		NodeRef::Id(id)
	}
}

impl From<&ItemId> for NodeRef {
	fn from(id: &ItemId) -> Self {
		NodeRef::Id(id.clone())
	}
}

impl From<&str> for NodeRef {
	fn from(id: &str) -> Self {
		NodeRef::Id(id.into())
	}
}

impl From<String> for NodeRef {
	fn from(id: String) -> Self {
		NodeRef::Id(id.into())
	}
}

impl From<i64> for NodeRef {
	fn from(id: i64) -> Self {
		NodeRef::Id(id.into())
	}
}

impl From<i32> for NodeRef {
	fn from(id: i32) -> Self {
		NodeRef::Id(id.into())
	}
}

impl From<u32> for NodeRef {
	fn from(id: u32) -> Self {
		NodeRef::Id(id.into())
	}
}

#[derive(Default)]
struct Registry {
	nodes: IndexMap<ItemId, GraphNode>,
	arcs: IndexMap<ItemId, GraphArc>,
	node_types: IndexSet<ItemType>,
	arc_types: IndexSet<ItemType>,
}

struct ModelInner {
	registry: RefCell<Registry>,
	listeners: ListenerList<dyn GraphModelListener>,
}

impl Drop for ModelInner {
	fn drop(&mut self) {
		// nodes and arcs point at each other
		for node in self.registry.get_mut().nodes.values() {
			node.detach_all_arcs();
		}
	}
}

/// The single source of truth for a graph.
///
/// `GraphModel` is a cheap handle; clones share the same graph. Every
/// operation releases its internal borrow before listeners run, and listeners
/// are called with the model so they can query it.
#[derive(Clone)]
pub struct GraphModel {
	inner: Rc<ModelInner>,
}

impl GraphModel {
	/// Create an empty model.
	pub fn new() -> Self {
		Self {
			inner: Rc::new(ModelInner {
				registry: RefCell::new(Registry::default()),
				listeners: ListenerList::new(),
			}),
		}
	}

	/// Build a model from a plain description.
	pub fn from_data(data: &GraphData) -> Result<Self> {
		let model = Self::new();
		model.load_data(data)?;
		Ok(model)
	}

	/// Whether both handles refer to the same model.
	pub fn ptr_eq(&self, other: &GraphModel) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}

	/// Subscribe to change events. Returns false if already subscribed.
	pub fn add_listener(&self, listener: Rc<dyn GraphModelListener>) -> bool {
		self.inner.listeners.add(listener)
	}

	/// Unsubscribe. Returns true if the listener was subscribed.
	pub fn remove_listener(&self, listener: &Rc<dyn GraphModelListener>) -> bool {
		self.inner.listeners.remove(listener)
	}

	/// A handle on the listener list, usable from inside a callback.
	pub fn listeners(&self) -> ListenerList<dyn GraphModelListener> {
		self.inner.listeners.clone()
	}

	fn fire(&self, event: GraphModelEvent) {
		trace!("graph model event: {}", event.name());
		self.inner
			.listeners
			.dispatch(|listener| listener.graph_changed(self, &event));
	}

	/// Add a node labelled with its identity. See [`GraphModel::add_node_with`].
	pub fn add_node(&self, id: impl Into<ItemId>) -> Result<GraphNode> {
		self.add_node_with(id, NodeOptions::default())
	}

	/// Add a node, or return the existing node with this identity unchanged.
	///
	/// A new node fires `NodeTypeAdded` first if its type has not been seen
	/// before, then `NodeAdded`. Fails with `InvalidArgument` on an empty identity.
	pub fn add_node_with(&self, id: impl Into<ItemId>, options: NodeOptions) -> Result<GraphNode> {
		let id = id.into();
		id.validate()?;
		if let Some(existing) = self.node(&id) {
			return Ok(existing);
		}
		let text = options.text.unwrap_or_else(|| id.to_string());
		let node = GraphNode::new(id, text, options.icon, options.item_type.unwrap_or_default());
		self.insert_node(&node);
		Ok(node)
	}

	fn insert_node(&self, node: &GraphNode) {
		let new_type = {
			let mut registry = self.inner.registry.borrow_mut();
			if registry.nodes.contains_key(node.id()) {
				return;
			}
			registry.nodes.insert(node.id().clone(), node.clone());
			registry.node_types.insert(node.item_type())
		};
		trace!("added node {}", node.id());
		if new_type {
			self.fire(GraphModelEvent::NodeTypeAdded(node.item_type()));
		}
		self.fire(GraphModelEvent::NodeAdded(node.clone()));
	}

	fn resolve(&self, endpoint: NodeRef) -> Result<GraphNode> {
		match endpoint {
			NodeRef::Id(id) => self.add_node(id),
			NodeRef::Node(node) => match self.node(node.id()) {
				Some(existing) => Ok(existing),
				None => {
					self.insert_node(&node);
					Ok(node)
				}
			},
		}
	}

	/// Remove a node and, first, every arc attached to it. No-op if absent.
	pub fn remove_node(&self, id: impl Into<ItemId>) {
		let id = id.into();
		let Some(node) = self.node(&id) else {
			return;
		};
		// snapshot: removing arcs mutates the node's incident list
		for arc in node.arcs() {
			self.remove_arc_internal(&arc, false);
		}
		self.inner.registry.borrow_mut().nodes.shift_remove(&id);
		trace!("removed node {}", id);
		self.fire(GraphModelEvent::NodeRemoved(node));
	}

	/// Add an arc of unknown type. See [`GraphModel::add_arc_with`].
	pub fn add_arc(
		&self,
		id: impl Into<ItemId>,
		source: impl Into<NodeRef>,
		destination: impl Into<NodeRef>,
	) -> Result<GraphArc> {
		self.add_arc_with(id, source, destination, ArcOptions::default())
	}

	/// Add an arc, or return the existing arc with this identity without touching anything.
	///
	/// Unknown endpoints are added first (with their own events). The arc then
	/// fires `ArcTypeAdded` if its type is new, then `ArcAdded`, and finally the
	/// arcs between the two endpoints are re-arranged.
	pub fn add_arc_with(
		&self,
		id: impl Into<ItemId>,
		source: impl Into<NodeRef>,
		destination: impl Into<NodeRef>,
		options: ArcOptions,
	) -> Result<GraphArc> {
		let id = id.into();
		id.validate()?;
		if let Some(existing) = self.arc(&id) {
			return Ok(existing);
		}
		let (source, destination) = (source.into(), destination.into());
		source.id().validate()?;
		destination.id().validate()?;

		let source = self.resolve(source)?;
		let destination = self.resolve(destination)?;
		let arc = GraphArc::new(
			id,
			source.clone(),
			destination.clone(),
			options.icon,
			options.item_type.unwrap_or_default(),
		);
		let new_type = {
			let mut registry = self.inner.registry.borrow_mut();
			registry.arcs.insert(arc.id().clone(), arc.clone());
			registry.arc_types.insert(arc.item_type())
		};
		source.attach_arc(&arc);
		destination.attach_arc(&arc);
		trace!("added arc {}", arc.id());

		if new_type {
			self.fire(GraphModelEvent::ArcTypeAdded(arc.item_type()));
		}
		self.fire(GraphModelEvent::ArcAdded(arc.clone()));
		arrange_arcs(&source, &destination);
		Ok(arc)
	}

	/// Remove an arc. No-op if absent. The remaining arcs between its endpoints
	/// are re-arranged so no gaps are left in their curve factors.
	pub fn remove_arc(&self, id: impl Into<ItemId>) {
		if let Some(arc) = self.arc(id) {
			self.remove_arc_internal(&arc, true);
		}
	}

	fn remove_arc_internal(&self, arc: &GraphArc, rearrange: bool) {
		let removed = self
			.inner
			.registry
			.borrow_mut()
			.arcs
			.shift_remove(arc.id())
			.is_some();
		if !removed {
			return;
		}
		let (source, destination) = (arc.source(), arc.destination());
		source.detach_arc(arc);
		destination.detach_arc(arc);
		if rearrange {
			arrange_arcs(&source, &destination);
		}
		trace!("removed arc {}", arc.id());
		self.fire(GraphModelEvent::ArcRemoved(arc.clone()));
	}

	/// Arrange the arcs between two nodes. Runs automatically after every insertion.
	pub fn arrange_arcs(&self, source: &GraphNode, destination: &GraphNode) {
		arrange_arcs(source, destination);
	}

	/// Drop every node, arc and observed type, firing a single `Cleared` event.
	/// No-op on an empty model.
	pub fn clear(&self) {
		let nodes = {
			let mut registry = self.inner.registry.borrow_mut();
			if registry.nodes.is_empty() && registry.arcs.is_empty() {
				return;
			}
			registry.arcs.clear();
			registry.node_types.clear();
			registry.arc_types.clear();
			std::mem::take(&mut registry.nodes)
		};
		for node in nodes.values() {
			node.detach_all_arcs();
		}
		debug!("cleared graph model ({} nodes)", nodes.len());
		self.fire(GraphModelEvent::Cleared);
	}

	/// Rebuild the observed node types from the current nodes and announce each one again.
	pub fn recalculate_node_types(&self) {
		let types: Vec<ItemType> = {
			let mut registry = self.inner.registry.borrow_mut();
			let types: IndexSet<ItemType> = registry.nodes.values().map(|n| n.item_type()).collect();
			registry.node_types = types.clone();
			types.into_iter().collect()
		};
		for item_type in types {
			self.fire(GraphModelEvent::NodeTypeAdded(item_type));
		}
	}

	/// Rebuild the observed arc types from the current arcs and announce each one again.
	pub fn recalculate_arc_types(&self) {
		let types: Vec<ItemType> = {
			let mut registry = self.inner.registry.borrow_mut();
			let types: IndexSet<ItemType> = registry.arcs.values().map(|a| a.item_type()).collect();
			registry.arc_types = types.clone();
			types.into_iter().collect()
		};
		for item_type in types {
			self.fire(GraphModelEvent::ArcTypeAdded(item_type));
		}
	}

	/// Add every node and arc of `data`. Arcs may reference nodes not listed.
	pub fn load_data(&self, data: &GraphData) -> Result<()> {
		for node in &data.nodes {
			self.add_node_with(
				node.id.as_str(),
				NodeOptions {
					text: node.label.clone(),
					icon: node.icon.clone(),
					item_type: node.node_type.clone().map(ItemType::from),
				},
			)?;
		}
		for arc in &data.arcs {
			self.add_arc_with(
				arc.id.as_str(),
				arc.source.as_str(),
				arc.target.as_str(),
				ArcOptions {
					item_type: arc.arc_type.clone().map(ItemType::from),
					icon: None,
				},
			)?;
		}
		Ok(())
	}

	/// The node with this identity.
	pub fn node(&self, id: impl Into<ItemId>) -> Option<GraphNode> {
		self.inner.registry.borrow().nodes.get(&id.into()).cloned()
	}

	/// The arc with this identity.
	pub fn arc(&self, id: impl Into<ItemId>) -> Option<GraphArc> {
		self.inner.registry.borrow().arcs.get(&id.into()).cloned()
	}

	/// Whether a node with this node's identity is registered.
	pub fn contains_node(&self, node: &GraphNode) -> bool {
		self.inner.registry.borrow().nodes.contains_key(node.id())
	}

	/// Whether an arc with this arc's identity is registered.
	pub fn contains_arc(&self, arc: &GraphArc) -> bool {
		self.inner.registry.borrow().arcs.contains_key(arc.id())
	}

	/// Every node, in insertion order.
	pub fn all_nodes(&self) -> Vec<GraphNode> {
		self.inner.registry.borrow().nodes.values().cloned().collect()
	}

	/// Nodes whose visibility flag is set, recomputed on every call.
	pub fn visible_nodes(&self) -> Vec<GraphNode> {
		self.inner
			.registry
			.borrow()
			.nodes
			.values()
			.filter(|n| n.is_visible())
			.cloned()
			.collect()
	}

	/// Every arc, in insertion order.
	pub fn all_arcs(&self) -> Vec<GraphArc> {
		self.inner.registry.borrow().arcs.values().cloned().collect()
	}

	/// Arcs whose visibility flag is set, recomputed on every call.
	pub fn visible_arcs(&self) -> Vec<GraphArc> {
		self.inner
			.registry
			.borrow()
			.arcs
			.values()
			.filter(|a| a.is_visible())
			.cloned()
			.collect()
	}

	/// Distinct neighbours of the node, excluding itself. Empty if the node is unknown.
	pub fn connected_nodes(&self, id: impl Into<ItemId>) -> Vec<GraphNode> {
		self.node(id)
			.map(|node| node.connected_nodes())
			.unwrap_or_default()
	}

	/// Arcs attached to the node. Empty if the node is unknown.
	pub fn arcs_of(&self, id: impl Into<ItemId>) -> Vec<GraphArc> {
		self.node(id).map(|node| node.arcs()).unwrap_or_default()
	}

	/// Source of the arc with this identity.
	pub fn source_node(&self, arc_id: impl Into<ItemId>) -> Option<GraphNode> {
		self.arc(arc_id).map(|arc| arc.source())
	}

	/// Destination of the arc with this identity.
	pub fn destination_node(&self, arc_id: impl Into<ItemId>) -> Option<GraphNode> {
		self.arc(arc_id).map(|arc| arc.destination())
	}

	/// Snapshot of the observed node types, in order of first appearance.
	pub fn node_types(&self) -> Vec<ItemType> {
		self.inner.registry.borrow().node_types.iter().cloned().collect()
	}

	/// Snapshot of the observed arc types, in order of first appearance.
	pub fn arc_types(&self) -> Vec<ItemType> {
		self.inner.registry.borrow().arc_types.iter().cloned().collect()
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.inner.registry.borrow().nodes.len()
	}

	/// Number of arcs.
	pub fn arc_count(&self) -> usize {
		self.inner.registry.borrow().arcs.len()
	}

	/// Whether the model holds no nodes and no arcs.
	pub fn is_empty(&self) -> bool {
		let registry = self.inner.registry.borrow();
		registry.nodes.is_empty() && registry.arcs.is_empty()
	}
}

impl Default for GraphModel {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for GraphModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GraphModel")
			.field("nodes", &self.node_count())
			.field("arcs", &self.arc_count())
			.field("listeners", &self.inner.listeners.len())
			.finish()
	}
}
