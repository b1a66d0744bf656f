use crate::error::Result;
use crate::geometry::Point;
use crate::graph::{GraphData, GraphItem, GraphModel, GraphNode, ItemType};
use crate::layout::LAYOUT_FORCE_DIRECTED;
use crate::view::{GraphView, ViewConfig};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<GraphNode>,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<GraphNode>,
	pub highlight_t: f64,
}

pub struct GraphCanvasState {
	pub view: GraphView,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
}

impl GraphCanvasState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Result<Self> {
		let model = GraphModel::from_data(data)?;
		let view = GraphView::with_config(
			model,
			ViewConfig {
				canvas_width: width,
				canvas_height: height,
				..ViewConfig::default()
			},
		);
		view.run_layout(LAYOUT_FORCE_DIRECTED)?;
		Ok(Self {
			view,
			transform: ViewTransform {
				x: 5.0,
				y: 5.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
		})
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<GraphNode> {
		self.view.node_at(self.screen_to_graph(sx, sy))
	}

	pub fn set_hover(&mut self, node: Option<GraphNode>) {
		if self.hover.node.as_ref().map(|n| n.id()) == node.as_ref().map(|n| n.id()) {
			return;
		}
		self.view.set_highlighted_node(node.clone());
		self.hover.node = node;
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.highlight_t > 0.0
	}

	/// Palette colour of a type, by its position among the model's types.
	pub fn type_color(&self, item_type: &ItemType, types: &[ItemType]) -> &'static str {
		let index = types.iter().position(|t| t == item_type).unwrap_or(0);
		COLORS[index % COLORS.len()]
	}

	pub fn tick(&mut self, dt: f64) {
		let (target, speed) = if self.hover.node.is_some() {
			(1.0, 1.8)
		} else {
			(0.0, 1.26)
		};
		self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
		if self.hover.node.is_none() && self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.view.set_canvas_size(width, height);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::ArcData;

	fn state() -> GraphCanvasState {
		let data = GraphData {
			nodes: Vec::new(),
			arcs: vec![ArcData {
				id: "ab".into(),
				source: "a".into(),
				target: "b".into(),
				arc_type: None,
			}],
		};
		GraphCanvasState::new(&data, 800.0, 600.0).unwrap()
	}

	#[test]
	fn test_hover_highlights_neighbourhood() {
		let mut state = state();
		let model = state.view.model();
		let (a, b) = (model.node("a").unwrap(), model.node("b").unwrap());

		state.set_hover(Some(a.clone()));
		assert!(b.is_highlighted());
		assert_eq!(state.view.highlighted_node(), Some(a.clone()));

		// same node again leaves the highlight alone
		state.set_hover(Some(a));
		assert!(state.has_active_highlight());

		state.set_hover(None);
		assert!(!b.is_highlighted());
		assert_eq!(state.view.highlighted_node(), None);
	}

	#[test]
	fn test_screen_to_graph_undoes_transform() {
		let mut state = state();
		state.transform = ViewTransform { x: 10.0, y: 20.0, k: 2.0 };
		assert_eq!(state.screen_to_graph(30.0, 60.0), Point::new(10.0, 20.0));
	}
}
