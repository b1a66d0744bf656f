use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::{LayoutAlgorithm, NodePlacement};
use crate::error::{GraphError, Result};
use crate::geometry::Rect;
use crate::graph::{GraphArc, GraphItem, GraphNode, ItemId};

/// Simulation settings for [`ForceLayout`].
#[derive(Clone, Debug)]
pub struct ForceLayoutConfig {
	/// Repulsion between nodes.
	pub force_charge: f32,
	/// Attraction along arcs.
	pub force_spring: f32,
	/// Upper bound of any single force.
	pub force_max: f32,
	/// Velocity scale.
	pub node_speed: f32,
	/// Velocity kept between steps.
	pub damping_factor: f32,
	/// Simulation steps per layout run.
	pub iterations: usize,
	/// Seconds per step.
	pub time_step: f32,
	/// Mass of every node.
	pub node_mass: f32,
}

impl Default for ForceLayoutConfig {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			iterations: 300,
			time_step: 0.016,
			node_mass: 10.0,
		}
	}
}

/// Force directed placement backed by [`force_graph`].
///
/// Nodes start on a circle and the simulation runs for a fixed number of steps.
/// Pinned nodes are anchors. The result is scaled to fit the target area.
#[derive(Clone, Debug, Default)]
pub struct ForceLayout {
	config: ForceLayoutConfig,
}

impl ForceLayout {
	/// A layout with the given settings.
	pub fn new(config: ForceLayoutConfig) -> Self {
		Self { config }
	}

	/// The current settings.
	pub fn config(&self) -> &ForceLayoutConfig {
		&self.config
	}

	fn simulate(&self, nodes: &[GraphNode], arcs: &[GraphArc], area: Rect) -> Vec<(f64, f64)> {
		let config = &self.config;
		let mut graph: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
			force_charge: config.force_charge,
			force_spring: config.force_spring,
			force_max: config.force_max,
			node_speed: config.node_speed,
			damping_factor: config.damping_factor,
		});

		let center = area.center();
		let radius = (area.width.min(area.height) / 4.0).max(1.0);
		let mut start = Vec::with_capacity(nodes.len());
		let mut index_of: HashMap<&ItemId, _> = HashMap::new();
		for (i, node) in nodes.iter().enumerate() {
			let (x, y) = if node.is_fixed_location() {
				let c = node.center();
				(c.x, c.y)
			} else {
				let angle = (i as f64) * 2.0 * PI / nodes.len() as f64;
				(center.x + radius * angle.cos(), center.y + radius * angle.sin())
			};
			start.push((x, y));
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: config.node_mass,
				is_anchor: node.is_fixed_location(),
				user_data: i,
			});
			index_of.insert(node.id(), idx);
		}

		for arc in arcs.iter().filter(|arc| !arc.is_self_arc()) {
			let (source, destination) = (arc.source(), arc.destination());
			if let (Some(&src), Some(&dest)) = (index_of.get(source.id()), index_of.get(destination.id())) {
				graph.add_edge(src, dest, EdgeData::default());
			}
		}

		for _ in 0..config.iterations {
			graph.update(config.time_step);
		}

		let mut positions = start.clone();
		graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			if x.is_finite() && y.is_finite() {
				positions[node.data.user_data] = (x, y);
			}
		});
		positions
	}
}

impl LayoutAlgorithm for ForceLayout {
	fn apply_layout(&self, nodes: &[GraphNode], arcs: &[GraphArc], area: Rect) -> Result<Vec<NodePlacement>> {
		if self.config.time_step <= 0.0 {
			return Err(GraphError::Layout(format!(
				"force layout needs a positive time step, got {}",
				self.config.time_step
			)));
		}
		if nodes.is_empty() {
			return Ok(Vec::new());
		}
		let positions = self.simulate(nodes, arcs, area);
		let anchored = nodes.iter().any(|node| node.is_fixed_location());
		// anchors keep their place, so the simulation frame is used as is
		let fit = if anchored {
			Fit::IDENTITY
		} else {
			Fit::to_area(&positions, area)
		};
		debug!(
			"force layout: {} nodes, {} arcs, {} steps",
			nodes.len(),
			arcs.len(),
			self.config.iterations
		);

		Ok(nodes
			.iter()
			.zip(positions)
			.map(|(node, (x, y))| {
				let size = node.bounds();
				let (cx, cy) = if node.is_fixed_location() {
					let c = node.center();
					(c.x, c.y)
				} else if anchored {
					(
						x.clamp(area.x, area.x + area.width),
						y.clamp(area.y, area.y + area.height),
					)
				} else {
					fit.apply(x, y)
				};
				NodePlacement {
					node: node.id().clone(),
					bounds: Rect::new(cx - size.width / 2.0, cy - size.height / 2.0, size.width, size.height),
				}
			})
			.collect())
	}
}

/// Maps simulated centres into the target area.
#[derive(Clone, Copy, Debug)]
struct Fit {
	scale: f64,
	min_x: f64,
	min_y: f64,
	offset_x: f64,
	offset_y: f64,
}

impl Fit {
	const IDENTITY: Fit = Fit {
		scale: 1.0,
		min_x: 0.0,
		min_y: 0.0,
		offset_x: 0.0,
		offset_y: 0.0,
	};

	fn to_area(positions: &[(f64, f64)], area: Rect) -> Self {
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in positions {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}
		let (span_x, span_y) = (max_x - min_x, max_y - min_y);
		let scale = match (span_x > f64::EPSILON, span_y > f64::EPSILON) {
			(true, true) => (area.width / span_x).min(area.height / span_y),
			(true, false) => area.width / span_x,
			(false, true) => area.height / span_y,
			(false, false) => 0.0,
		};
		Self {
			scale,
			min_x,
			min_y,
			offset_x: area.x + (area.width - span_x * scale) / 2.0,
			offset_y: area.y + (area.height - span_y * scale) / 2.0,
		}
	}

	fn apply(&self, x: f64, y: f64) -> (f64, f64) {
		(
			self.offset_x + (x - self.min_x) * self.scale,
			self.offset_y + (y - self.min_y) * self.scale,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::GraphModel;

	#[test]
	fn test_placements_fit_area() {
		let model = GraphModel::new();
		model.add_arc("ab", "a", "b").unwrap();
		model.add_arc("bc", "b", "c").unwrap();
		model.add_node("d").unwrap();
		let area = Rect::new(0.0, 0.0, 400.0, 300.0);
		let placements = ForceLayout::default()
			.apply_layout(&model.all_nodes(), &model.all_arcs(), area)
			.unwrap();
		assert_eq!(placements.len(), 4);
		for placement in placements {
			let c = placement.bounds.center();
			assert!(c.x >= -1e-6 && c.x <= 400.0 + 1e-6, "{:?}", placement);
			assert!(c.y >= -1e-6 && c.y <= 300.0 + 1e-6, "{:?}", placement);
		}
	}

	#[test]
	fn test_single_node_lands_in_center() {
		let model = GraphModel::new();
		let node = model.add_node("solo").unwrap();
		let placements = ForceLayout::default()
			.apply_layout(&[node], &[], Rect::new(0.0, 0.0, 100.0, 100.0))
			.unwrap();
		let c = placements[0].bounds.center();
		assert!((c.x - 50.0).abs() < 1e-9 && (c.y - 50.0).abs() < 1e-9);
	}

	#[test]
	fn test_bad_time_step_is_an_error() {
		let layout = ForceLayout::new(ForceLayoutConfig {
			time_step: 0.0,
			..ForceLayoutConfig::default()
		});
		assert!(matches!(
			layout.apply_layout(&[], &[], Rect::default()),
			Err(GraphError::Layout(_))
		));
	}

	#[test]
	fn test_pinned_nodes_keep_their_place() {
		let model = GraphModel::new();
		model.add_arc("ab", "a", "b").unwrap();
		model.add_arc("bc", "b", "c").unwrap();
		let a = model.node("a").unwrap();
		a.set_bounds(Rect::new(20.0, 30.0, 40.0, 20.0));
		a.set_fixed_location(true);
		let area = Rect::new(0.0, 0.0, 400.0, 300.0);
		let placements = ForceLayout::default()
			.apply_layout(&model.all_nodes(), &model.all_arcs(), area)
			.unwrap();

		let pinned = placements.iter().find(|p| p.node == *a.id()).unwrap();
		assert_eq!(pinned.bounds, a.bounds());
		for placement in &placements {
			let c = placement.bounds.center();
			assert!(c.x >= 0.0 && c.x <= 400.0, "{:?}", placement);
			assert!(c.y >= 0.0 && c.y <= 300.0, "{:?}", placement);
		}
	}
}
