//! The graph model: nodes, arcs, their types and change events.

mod arc;
mod arrange;
mod collection;
mod data;
mod event;
mod item;
mod model;
mod node;

pub use arc::GraphArc;
pub use arrange::arrange_arcs;
pub use collection::{ArcCollection, CollectionEvent, CollectionListener, ItemCollection, NodeCollection};
pub use data::{ArcData, GraphData, NodeData};
pub use event::{GraphModelEvent, GraphModelListener};
pub use item::{GraphItem, ItemId, ItemKind, ItemType, UNKNOWN_TYPE_NAME};
pub use model::{ArcOptions, GraphModel, NodeOptions, NodeRef};
pub use node::GraphNode;
