//! Per-type visibility flags and their synchronisation with a model.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::trace;

use crate::graph::{GraphModel, GraphModelEvent, GraphModelListener, ItemType};
use crate::view::{ViewEvent, ViewListener};

/// Type → visible flags. Types missing from the map are visible.
#[derive(Debug, Default)]
pub(crate) struct TypeVisibility {
	flags: RefCell<BTreeMap<ItemType, bool>>,
}

impl TypeVisibility {
	pub fn is_visible(&self, item_type: &ItemType) -> bool {
		self.flags.borrow().get(item_type).copied().unwrap_or(true)
	}

	/// Returns true if the flag changed.
	pub fn set_visible(&self, item_type: ItemType, visible: bool) -> bool {
		if self.is_visible(&item_type) == visible {
			return false;
		}
		self.flags.borrow_mut().insert(item_type, visible);
		true
	}

	/// Drop types that are gone and add new ones as visible, keeping the
	/// flags of types that are still present.
	pub fn sync(&self, current: &[ItemType]) {
		let mut flags = self.flags.borrow_mut();
		flags.retain(|item_type, _| current.contains(item_type));
		for item_type in current {
			flags.entry(item_type.clone()).or_insert(true);
		}
	}

	pub fn snapshot(&self) -> BTreeMap<ItemType, bool> {
		self.flags.borrow().clone()
	}

	pub fn types(&self) -> Vec<ItemType> {
		self.flags.borrow().keys().cloned().collect()
	}
}

#[derive(Debug, Default)]
pub(crate) struct TypeState {
	pub nodes: TypeVisibility,
	pub arcs: TypeVisibility,
}

/// Keeps a filter manager's type maps in step with the model it watches.
///
/// Register it on a model (and on a view, to follow model swaps). Obtained
/// from [`FilterManager::type_sync`](super::FilterManager::type_sync).
pub struct TypeSync {
	types: Rc<TypeState>,
}

impl TypeSync {
	pub(crate) fn new(types: Rc<TypeState>) -> Self {
		Self { types }
	}

	/// Resynchronise both maps with the model's observed types.
	pub fn sync(&self, model: &GraphModel) {
		self.types.nodes.sync(&model.node_types());
		self.types.arcs.sync(&model.arc_types());
		trace!(
			"synced filter types: {} node types, {} arc types",
			self.types.nodes.types().len(),
			self.types.arcs.types().len()
		);
	}
}

impl GraphModelListener for TypeSync {
	fn graph_changed(&self, model: &GraphModel, event: &GraphModelEvent) {
		match event {
			GraphModelEvent::Cleared => self.sync(model),
			GraphModelEvent::NodeTypeAdded(_) => self.types.nodes.sync(&model.node_types()),
			GraphModelEvent::ArcTypeAdded(_) => self.types.arcs.sync(&model.arc_types()),
			_ => {}
		}
	}
}

impl ViewListener for TypeSync {
	fn view_changed(&self, event: &ViewEvent) {
		match event {
			ViewEvent::ModelChanged { new, .. } => self.sync(new),
		}
	}
}
