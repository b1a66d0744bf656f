use super::{LayoutAlgorithm, NodePlacement};
use crate::error::Result;
use crate::geometry::Rect;
use crate::graph::{GraphArc, GraphItem, GraphNode};

/// Lays nodes out row by row in a square-ish grid, sorted by label
/// ignoring case. Each node is centred in its cell and keeps its size.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridLayout;

impl LayoutAlgorithm for GridLayout {
	fn apply_layout(&self, nodes: &[GraphNode], _arcs: &[GraphArc], area: Rect) -> Result<Vec<NodePlacement>> {
		if nodes.is_empty() {
			return Ok(Vec::new());
		}
		let mut sorted: Vec<&GraphNode> = nodes.iter().collect();
		sorted.sort_by_cached_key(|node| node.text().to_lowercase());

		let columns = (sorted.len() as f64).sqrt().ceil() as usize;
		let rows = sorted.len().div_ceil(columns);
		let (cell_width, cell_height) = (area.width / columns as f64, area.height / rows as f64);

		Ok(sorted
			.into_iter()
			.enumerate()
			.map(|(i, node)| {
				let (row, column) = (i / columns, i % columns);
				let size = node.bounds();
				let x = area.x + column as f64 * cell_width + ((cell_width - size.width) / 2.0).max(0.0);
				let y = area.y + row as f64 * cell_height + ((cell_height - size.height) / 2.0).max(0.0);
				NodePlacement {
					node: node.id().clone(),
					bounds: Rect::new(x, y, size.width, size.height),
				}
			})
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::GraphModel;
	use pretty_assertions::assert_eq;

	#[test]
	fn test_alphabetical_rows() {
		let model = GraphModel::new();
		for id in ["delta", "Alpha", "charlie", "bravo"] {
			model.add_node(id).unwrap().set_size(10.0, 10.0);
		}
		let placements = GridLayout
			.apply_layout(&model.all_nodes(), &[], Rect::new(0.0, 0.0, 100.0, 100.0))
			.unwrap();
		let order: Vec<String> = placements.iter().map(|p| p.node.to_string()).collect();
		assert_eq!(order, vec!["Alpha", "bravo", "charlie", "delta"]);
		assert_eq!(placements[0].bounds, Rect::new(20.0, 20.0, 10.0, 10.0));
		assert_eq!(placements[3].bounds, Rect::new(70.0, 70.0, 10.0, 10.0));
	}

	#[test]
	fn test_empty() {
		let placements = GridLayout
			.apply_layout(&[], &[], Rect::new(0.0, 0.0, 10.0, 10.0))
			.unwrap();
		assert!(placements.is_empty());
	}
}
