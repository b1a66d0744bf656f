//! The filter chain and its type visibility maps.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

use super::predicate::{ArcTypeFilter, GraphFilter, NodeTypeFilter};
use super::types::{TypeState, TypeSync};
use crate::graph::{GraphItem, GraphModel, GraphModelListener, ItemType};
use crate::notify::ListenerList;

/// What changed in a [`FilterManager`].
#[derive(Clone, Debug, PartialEq)]
pub enum FilterChangedEvent {
	/// A node type was switched on or off.
	NodeTypeVisibility {
		/// The type.
		item_type: ItemType,
		/// Its new flag.
		visible: bool,
	},
	/// An arc type was switched on or off.
	ArcTypeVisibility {
		/// The type.
		item_type: ItemType,
		/// Its new flag.
		visible: bool,
	},
	/// A filter joined the chain.
	FilterAdded,
	/// A filter left the chain.
	FilterRemoved,
}

/// Told when filter state changes. Usually answers by calling
/// [`FilterManager::apply_filters`]; the manager never applies filters by itself.
pub trait FilterChangedListener {
	/// Called after the change.
	fn filters_changed(&self, manager: &FilterManager, event: &FilterChangedEvent);
}

impl<F> FilterChangedListener for F
where
	F: Fn(&FilterManager, &FilterChangedEvent),
{
	fn filters_changed(&self, manager: &FilterManager, event: &FilterChangedEvent) {
		self(manager, event)
	}
}

struct ManagerInner {
	types: Rc<TypeState>,
	type_sync: Rc<TypeSync>,
	filters: RefCell<Vec<Rc<dyn GraphFilter>>>,
	listeners: ListenerList<dyn FilterChangedListener>,
}

/// Derives node and arc visibility from per-type flags and a chain of filters.
///
/// Two built-in filters, one for node types and one for arc types, always sit
/// at the front of the chain. Clones share the same state.
#[derive(Clone)]
pub struct FilterManager {
	inner: Rc<ManagerInner>,
}

impl FilterManager {
	/// A manager with empty type maps that watches nothing yet.
	pub fn new() -> Self {
		let types = Rc::new(TypeState::default());
		let builtin: Vec<Rc<dyn GraphFilter>> = vec![
			Rc::new(NodeTypeFilter(types.clone())),
			Rc::new(ArcTypeFilter(types.clone())),
		];
		Self {
			inner: Rc::new(ManagerInner {
				type_sync: Rc::new(TypeSync::new(types.clone())),
				types,
				filters: RefCell::new(builtin),
				listeners: ListenerList::new(),
			}),
		}
	}

	/// A manager that tracks the types of `model`.
	pub fn for_model(model: &GraphModel) -> Self {
		let manager = Self::new();
		manager.watch(model);
		manager
	}

	/// The listener that keeps the type maps in sync. Register it wherever the
	/// manager should follow changes; [`FilterManager::watch`] does so for a model.
	pub fn type_sync(&self) -> Rc<TypeSync> {
		self.inner.type_sync.clone()
	}

	fn sync_listener(&self) -> Rc<dyn GraphModelListener> {
		self.inner.type_sync.clone()
	}

	/// Sync with `model` now and follow its type changes from here on.
	pub fn watch(&self, model: &GraphModel) {
		self.sync_types(model);
		model.add_listener(self.sync_listener());
	}

	/// Stop following `model`.
	pub fn unwatch(&self, model: &GraphModel) {
		model.remove_listener(&self.sync_listener());
	}

	/// Resynchronise the type maps with `model`, keeping flags of types that survive.
	/// Fires nothing.
	pub fn sync_types(&self, model: &GraphModel) {
		self.inner.type_sync.sync(model);
	}

	/// Subscribe to filter changes. Returns false if already subscribed.
	pub fn add_filter_changed_listener(&self, listener: Rc<dyn FilterChangedListener>) -> bool {
		self.inner.listeners.add(listener)
	}

	/// Unsubscribe. Returns true if the listener was subscribed.
	pub fn remove_filter_changed_listener(&self, listener: &Rc<dyn FilterChangedListener>) -> bool {
		self.inner.listeners.remove(listener)
	}

	fn fire(&self, event: FilterChangedEvent) {
		self.inner
			.listeners
			.dispatch(|listener| listener.filters_changed(self, &event));
	}

	/// Append a filter to the chain. Adding the same filter twice is a no-op.
	pub fn add_filter(&self, filter: Rc<dyn GraphFilter>) {
		{
			let mut filters = self.inner.filters.borrow_mut();
			if filters.iter().any(|f| Rc::ptr_eq(f, &filter)) {
				return;
			}
			filters.push(filter);
		}
		self.fire(FilterChangedEvent::FilterAdded);
	}

	/// Remove a filter. The built-in type filters cannot be removed.
	pub fn remove_filter(&self, filter: &Rc<dyn GraphFilter>) {
		{
			let mut filters = self.inner.filters.borrow_mut();
			let Some(index) = filters.iter().position(|f| Rc::ptr_eq(f, filter)) else {
				return;
			};
			filters.remove(index);
		}
		self.fire(FilterChangedEvent::FilterRemoved);
	}

	/// Number of filters, the two built-in ones included.
	pub fn filter_count(&self) -> usize {
		self.inner.filters.borrow().len()
	}

	/// Whether the chain holds any filter.
	pub fn has_filters(&self) -> bool {
		self.filter_count() > 0
	}

	/// Recompute the visibility of every node, then of every arc.
	///
	/// An item is visible when every filter that applies to it agrees; the
	/// first veto wins. Every item is assigned its result, changed or not, so
	/// hidden endpoints keep their arcs hidden.
	pub fn apply_filters(&self, model: &GraphModel) {
		let filters = self.inner.filters.borrow().clone();
		let passes = |item: &dyn GraphItem, applies: fn(&dyn GraphFilter) -> bool| {
			filters
				.iter()
				.filter(|f| applies(f.as_ref()))
				.all(|f| f.is_visible(item))
		};

		let mut hidden_nodes = 0;
		for node in model.all_nodes() {
			let visible = passes(&node, |f| f.is_node_filter());
			hidden_nodes += usize::from(!visible);
			node.set_visible(visible);
		}
		let mut hidden_arcs = 0;
		for arc in model.all_arcs() {
			let visible = passes(&arc, |f| f.is_arc_filter());
			arc.set_visible(visible);
			hidden_arcs += usize::from(!arc.is_visible());
		}
		debug!(
			"applied {} filters: {} nodes and {} arcs hidden",
			filters.len(),
			hidden_nodes,
			hidden_arcs
		);
	}

	/// Whether nodes of this type pass the node type filter. Unknown types do.
	pub fn is_node_type_visible(&self, item_type: &ItemType) -> bool {
		self.inner.types.nodes.is_visible(item_type)
	}

	/// Switch a node type on or off. Fires only when the flag changes.
	pub fn set_node_type_visible(&self, item_type: impl Into<ItemType>, visible: bool) {
		let item_type = item_type.into();
		if self.inner.types.nodes.set_visible(item_type.clone(), visible) {
			self.fire(FilterChangedEvent::NodeTypeVisibility { item_type, visible });
		}
	}

	/// Whether arcs of this type pass the arc type filter. Unknown types do.
	pub fn is_arc_type_visible(&self, item_type: &ItemType) -> bool {
		self.inner.types.arcs.is_visible(item_type)
	}

	/// Switch an arc type on or off. Fires only when the flag changes.
	pub fn set_arc_type_visible(&self, item_type: impl Into<ItemType>, visible: bool) {
		let item_type = item_type.into();
		if self.inner.types.arcs.set_visible(item_type.clone(), visible) {
			self.fire(FilterChangedEvent::ArcTypeVisibility { item_type, visible });
		}
	}

	/// Snapshot of node type → visible.
	pub fn node_types_map(&self) -> BTreeMap<ItemType, bool> {
		self.inner.types.nodes.snapshot()
	}

	/// Snapshot of arc type → visible.
	pub fn arc_types_map(&self) -> BTreeMap<ItemType, bool> {
		self.inner.types.arcs.snapshot()
	}

	/// Known node types.
	pub fn node_types(&self) -> Vec<ItemType> {
		self.inner.types.nodes.types()
	}

	/// Known arc types.
	pub fn arc_types(&self) -> Vec<ItemType> {
		self.inner.types.arcs.types()
	}
}

impl Default for FilterManager {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for FilterManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FilterManager")
			.field("filters", &self.filter_count())
			.field("node_types", &self.node_types_map())
			.field("arc_types", &self.arc_types_map())
			.finish()
	}
}
