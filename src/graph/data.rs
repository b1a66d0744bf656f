//! Plain descriptions of a graph, used to seed a [`GraphModel`](super::GraphModel).

/// A node to create.
#[derive(Clone, Debug, Default)]
pub struct NodeData {
	/// Identity.
	pub id: String,
	/// Label; the identity is used when absent.
	pub label: Option<String>,
	/// Type name.
	pub node_type: Option<String>,
	/// Icon resource name.
	pub icon: Option<String>,
}

/// An arc to create. Unknown endpoints are created on the fly.
#[derive(Clone, Debug, Default)]
pub struct ArcData {
	/// Identity.
	pub id: String,
	/// Source node identity.
	pub source: String,
	/// Destination node identity.
	pub target: String,
	/// Type name.
	pub arc_type: Option<String>,
}

/// Nodes and arcs, loaded in order.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	/// Nodes.
	pub nodes: Vec<NodeData>,
	/// Arcs.
	pub arcs: Vec<ArcData>,
}
