use std::cell::RefCell;
use std::rc::Rc;

use graph_canvas::graph::{GraphItem, GraphModel, GraphModelEvent, GraphNode, ItemType, NodeOptions};
use pretty_assertions::assert_eq;

fn record(model: &GraphModel) -> Rc<RefCell<Vec<GraphModelEvent>>> {
	let events = Rc::new(RefCell::new(Vec::new()));
	let sink = events.clone();
	model.add_listener(Rc::new(move |_: &GraphModel, event: &GraphModelEvent| {
		sink.borrow_mut().push(event.clone());
	}));
	events
}

fn typed(t: &str) -> NodeOptions {
	NodeOptions {
		item_type: Some(ItemType::named(t)),
		..NodeOptions::default()
	}
}

fn ids(nodes: &[GraphNode]) -> Vec<String> {
	nodes.iter().map(|n| n.id().to_string()).collect()
}

#[test]
fn add_node_is_idempotent() {
	let model = GraphModel::new();
	let events = record(&model);
	let first = model.add_node("a").unwrap();
	let second = model.add_node("a").unwrap();
	assert!(first.ptr_eq(&second));
	let added = events
		.borrow()
		.iter()
		.filter(|e| matches!(e, GraphModelEvent::NodeAdded(_)))
		.count();
	assert_eq!(added, 1);
}

#[test]
fn type_added_fires_once_per_type() {
	let model = GraphModel::new();
	let events = record(&model);
	for id in ["a", "b", "c"] {
		model.add_node_with(id, typed("class")).unwrap();
	}
	for (id, t) in [("d", "x"), ("e", "y")] {
		model.add_node_with(id, typed(t)).unwrap();
	}
	let types: Vec<ItemType> = events
		.borrow()
		.iter()
		.filter_map(|e| match e {
			GraphModelEvent::NodeTypeAdded(t) => Some(t.clone()),
			_ => None,
		})
		.collect();
	assert_eq!(
		types,
		vec![ItemType::named("class"), ItemType::named("x"), ItemType::named("y")]
	);
}

#[test]
fn removing_a_node_removes_its_arcs_first() {
	let model = GraphModel::new();
	model.add_arc("ab", "a", "b").unwrap();
	model.add_arc("bc", "b", "c").unwrap();
	let events = record(&model);

	model.remove_node("b");
	let names: Vec<String> = events
		.borrow()
		.iter()
		.map(|e| match e {
			GraphModelEvent::ArcRemoved(arc) => format!("arc {}", arc.id()),
			GraphModelEvent::NodeRemoved(node) => format!("node {}", node.id()),
			other => other.name().to_string(),
		})
		.collect();
	assert_eq!(names, vec!["arc ab", "arc bc", "node b"]);
	assert!(model.all_arcs().is_empty());
	assert_eq!(ids(&model.all_nodes()), vec!["a", "c"]);
	assert_eq!(model.node("a").unwrap().arc_count(), 0);
}

#[test]
fn curve_factors_single_direction() {
	let model = GraphModel::new();
	let factors = |model: &GraphModel| -> Vec<u32> { model.all_arcs().iter().map(|a| a.curve_factor()).collect() };
	model.add_arc(1i64, "a", "b").unwrap();
	assert_eq!(factors(&model), vec![0]);
	model.add_arc(2i64, "a", "b").unwrap();
	assert_eq!(factors(&model), vec![0, 1]);
	model.add_arc(3i64, "a", "b").unwrap();
	assert_eq!(factors(&model), vec![0, 1, 2]);
}

#[test]
fn curve_factors_both_directions() {
	let model = GraphModel::new();
	let ab = model.add_arc("ab", "a", "b").unwrap();
	let ba = model.add_arc("ba", "b", "a").unwrap();
	assert_eq!((ab.curve_factor(), ba.curve_factor()), (1, 1));
	let ab2 = model.add_arc("ab2", "a", "b").unwrap();
	assert_eq!(ab2.curve_factor(), 2);
}

#[test]
fn arc_visibility_follows_endpoints_one_way() {
	let model = GraphModel::new();
	let arc = model.add_arc("ab", "a", "b").unwrap();
	let (a, b) = (arc.source(), arc.destination());

	a.set_visible(false);
	assert!(!arc.is_visible());
	a.set_visible(true);
	assert!(!arc.is_visible());
	arc.set_visible(true);
	assert!(arc.is_visible());

	b.set_visible(false);
	assert!(!arc.is_visible());
	b.set_visible(true);
	assert!(!arc.is_visible());
	arc.set_visible(true);
	assert!(arc.is_visible());
}

#[test]
fn self_arc_round_trip() {
	let model = GraphModel::new();
	let arc = model.add_arc("loop", "a", "a").unwrap();
	let a = model.node("a").unwrap();
	assert!(arc.is_self_arc());
	assert_eq!(a.arc_count(), 1);
	assert!(model.connected_nodes("a").is_empty());
	model.remove_arc("loop");
	assert_eq!(a.arc_count(), 0);
	assert_eq!(model.arc_count(), 0);
	assert_eq!(model.node_count(), 1);
}

#[test]
fn clear_is_a_single_event() {
	let model = GraphModel::new();
	model.add_arc("ab", "a", "b").unwrap();
	let events = record(&model);
	model.clear();
	assert_eq!(*events.borrow(), vec![GraphModelEvent::Cleared]);
	assert!(model.all_nodes().is_empty());
}
