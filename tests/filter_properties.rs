use std::collections::BTreeMap;
use std::rc::Rc;

use graph_canvas::filter::{FilterManager, GraphFilter, PredicateFilter};
use graph_canvas::graph::{ArcOptions, GraphItem, GraphModel, ItemType, NodeOptions};
use graph_canvas::view::GraphView;
use pretty_assertions::assert_eq;

fn node_of(model: &GraphModel, id: &str, t: &str) {
	model
		.add_node_with(
			id,
			NodeOptions {
				item_type: Some(ItemType::named(t)),
				..NodeOptions::default()
			},
		)
		.unwrap();
}

fn arc_of(model: &GraphModel, id: &str, src: &str, dest: &str, t: &str) {
	model
		.add_arc_with(
			id,
			src,
			dest,
			ArcOptions {
				item_type: Some(ItemType::named(t)),
				icon: None,
			},
		)
		.unwrap();
}

fn visible_ids(model: &GraphModel) -> Vec<String> {
	model.visible_nodes().iter().map(|n| n.id().to_string()).collect()
}

#[test]
fn node_type_round_trip() {
	let model = GraphModel::new();
	node_of(&model, "a", "class");
	node_of(&model, "b", "instance");
	node_of(&model, "c", "instance");
	arc_of(&model, "ab", "a", "b", "is_a");
	let manager = FilterManager::for_model(&model);

	manager.set_node_type_visible("instance", false);
	manager.apply_filters(&model);
	assert_eq!(visible_ids(&model), vec!["a"]);
	assert!(!model.arc("ab").unwrap().is_visible());

	manager.set_node_type_visible("instance", true);
	manager.apply_filters(&model);
	assert_eq!(visible_ids(&model), vec!["a", "b", "c"]);
	assert!(model.arc("ab").unwrap().is_visible());
}

#[test]
fn user_filter_vetoes_restore() {
	let model = GraphModel::new();
	node_of(&model, "a", "class");
	node_of(&model, "b", "class");
	let manager = FilterManager::for_model(&model);
	let veto: Rc<dyn GraphFilter> = Rc::new(PredicateFilter::nodes(|item| item.id().to_string() != "b"));
	manager.add_filter(veto);

	manager.set_node_type_visible("class", false);
	manager.apply_filters(&model);
	manager.set_node_type_visible("class", true);
	manager.apply_filters(&model);
	assert_eq!(visible_ids(&model), vec!["a"]);
}

#[test]
fn type_maps_resync_after_clear() {
	let model = GraphModel::new();
	node_of(&model, "a", "class");
	arc_of(&model, "ab", "a", "b", "is_a");
	let manager = FilterManager::for_model(&model);
	manager.set_node_type_visible("class", false);
	manager.set_arc_type_visible("is_a", false);

	model.clear();
	assert!(manager.node_types_map().is_empty());
	assert!(manager.arc_types_map().is_empty());

	node_of(&model, "a", "class");
	arc_of(&model, "ab", "a", "b", "is_a");
	assert_eq!(
		manager.node_types_map(),
		BTreeMap::from([(ItemType::Unknown, true), (ItemType::named("class"), true)])
	);
	assert_eq!(
		manager.arc_types_map(),
		BTreeMap::from([(ItemType::named("is_a"), true)])
	);
}

#[test]
fn flags_survive_a_model_swap_for_shared_types() {
	let first = GraphModel::new();
	node_of(&first, "a", "class");
	node_of(&first, "b", "gone");
	let view = GraphView::new(first);
	let manager = view.filter_manager();
	manager.set_node_type_visible("class", false);
	manager.set_node_type_visible("gone", false);

	let second = GraphModel::new();
	node_of(&second, "x", "class");
	node_of(&second, "y", "fresh");
	view.set_model(second.clone());
	assert_eq!(
		manager.node_types_map(),
		BTreeMap::from([(ItemType::named("class"), false), (ItemType::named("fresh"), true)])
	);

	view.apply_filters();
	assert_eq!(visible_ids(&second), vec!["y"]);
}
