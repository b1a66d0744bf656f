use leptos::prelude::*;

use crate::components::graph_canvas::GraphCanvas;
use crate::graph::{ArcData, GraphData, NodeData};

const NODE_TYPES: [&str; 2] = ["class", "instance"];
const ARC_TYPES: [&str; 3] = ["is_a", "part_of", "develops_from"];

fn push_node(data: &mut GraphData, label: String, r: f64) -> String {
	let id = data.nodes.len().to_string();
	data.nodes.push(NodeData {
		id: id.clone(),
		label: Some(label),
		node_type: Some(NODE_TYPES[(r * 2.0) as usize % 2].to_string()),
		icon: None,
	});
	id
}

fn push_arc(data: &mut GraphData, source: &str, target: &str, r: f64) {
	data.arcs.push(ArcData {
		id: format!("arc{}", data.arcs.len()),
		source: source.to_string(),
		target: target.to_string(),
		arc_type: Some(ARC_TYPES[(r * 3.0) as usize % 3].to_string()),
	});
}

/// Sample graph: a root with four children, each with a few grandchildren.
/// Root and the first child share extra arcs in both directions, and root
/// has a self arc, to show how parallel arcs are fanned out.
fn generate_sample_data() -> GraphData {
	let mut data = GraphData::default();
	let mut seed = 0;
	let mut next = || {
		seed += 1;
		rand_simple(seed)
	};

	let root = push_node(&mut data, "Root".into(), next());
	for i in 1..=4 {
		let child = push_node(&mut data, format!("Child #{}", i), next());
		push_arc(&mut data, &root, &child, next());
		if i == 1 {
			push_arc(&mut data, &root, &child, next());
			push_arc(&mut data, &child, &root, next());
		}
		let grandchildren = (next() * 4.0) as usize;
		for j in 1..grandchildren {
			let grandchild = push_node(&mut data, format!("Grand Child #{}", j), next());
			push_arc(&mut data, &child, &grandchild, next());
		}
	}
	push_arc(&mut data, &root, &root, next());
	data
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(generate_sample_data);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<GraphCanvas data=graph_data fullscreen=true />
				<div class="graph-overlay">
					<h1>"Graph Canvas"</h1>
					<p class="subtitle">
						"Click to select, shift-click to add. Drag nodes to pin them. Scroll to zoom. Drag background to pan."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{GraphItem, GraphModel};

	#[test]
	fn test_sample_loads() {
		let model = GraphModel::from_data(&generate_sample_data()).unwrap();
		assert!(model.node_count() >= 5);
		let root = model.node("0").unwrap();
		assert_eq!(root.text(), "Root");
		assert_eq!(model.connected_nodes("0").len(), 4);
		let factors: Vec<u32> = model
			.arcs_of("1")
			.iter()
			.filter(|arc| arc.source().id() == root.id() || arc.destination().id() == root.id())
			.map(|arc| arc.curve_factor())
			.collect();
		assert_eq!(factors, vec![1, 2, 1]);
	}
}
