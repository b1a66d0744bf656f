//! Change notifications emitted by a [`GraphModel`].

use super::arc::GraphArc;
use super::item::ItemType;
use super::model::GraphModel;
use super::node::GraphNode;

/// A single structural change.
///
/// Batch operations are one semantic event: clearing a model emits
/// [`GraphModelEvent::Cleared`], never a flood of removals.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphModelEvent {
	/// Every node, arc and observed type was dropped.
	Cleared,
	/// A node was registered.
	NodeAdded(GraphNode),
	/// A node was removed (after its arcs).
	NodeRemoved(GraphNode),
	/// An arc was registered.
	ArcAdded(GraphArc),
	/// An arc was removed.
	ArcRemoved(GraphArc),
	/// The first node of this type was added.
	NodeTypeAdded(ItemType),
	/// The first arc of this type was added.
	ArcTypeAdded(ItemType),
}

impl GraphModelEvent {
	/// Short name, used for logging.
	pub fn name(&self) -> &'static str {
		match self {
			GraphModelEvent::Cleared => "cleared",
			GraphModelEvent::NodeAdded(_) => "node-added",
			GraphModelEvent::NodeRemoved(_) => "node-removed",
			GraphModelEvent::ArcAdded(_) => "arc-added",
			GraphModelEvent::ArcRemoved(_) => "arc-removed",
			GraphModelEvent::NodeTypeAdded(_) => "node-type-added",
			GraphModelEvent::ArcTypeAdded(_) => "arc-type-added",
		}
	}
}

/// Receives [`GraphModelEvent`]s synchronously, after the change is applied.
///
/// The model is passed along so listeners can query it. Listeners may add or
/// remove model listeners from inside the callback; structural changes to the
/// model from inside a callback are not supported.
pub trait GraphModelListener {
	/// Called once per event.
	fn graph_changed(&self, model: &GraphModel, event: &GraphModelEvent);
}

impl<F> GraphModelListener for F
where
	F: Fn(&GraphModel, &GraphModelEvent),
{
	fn graph_changed(&self, model: &GraphModel, event: &GraphModelEvent) {
		self(model, event)
	}
}
