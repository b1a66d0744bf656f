use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::GraphCanvasState;
use crate::geometry::{ArcPath, Point, arc_path};
use crate::graph::{GraphArc, GraphItem, GraphNode};

const ARROW_SIZE: f64 = 8.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let model = state.view.model();
	for arc in model.visible_arcs() {
		draw_arc(state, ctx, &arc);
	}
	let types = model.node_types();
	for node in model.visible_nodes() {
		draw_node(state, ctx, &node, state.type_color(&node.item_type(), &types));
	}
	ctx.restore();
}

fn item_alpha(state: &GraphCanvasState, highlighted: bool) -> f64 {
	if !state.has_active_highlight() {
		return 1.0;
	}
	let t = ease_out_cubic(state.hover.highlight_t);
	if highlighted { 1.0 } else { 1.0 - 0.7 * t }
}

fn draw_arc(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d, arc: &GraphArc) {
	let k = state.transform.k;
	let alpha = item_alpha(state, arc.is_highlighted()) * 0.7;
	let color = if arc.is_selected() {
		format!("rgba(255, 220, 120, {})", alpha)
	} else {
		format!("rgba(100, 180, 255, {})", alpha)
	};
	ctx.set_stroke_style_str(&color);
	ctx.set_fill_style_str(&color);
	ctx.set_line_width(1.5 / k.max(0.5));

	let path = arc_path(arc);
	ctx.begin_path();
	let direction = match path {
		ArcPath::Line { start, end } => {
			ctx.move_to(start.x, start.y);
			ctx.line_to(end.x, end.y);
			Point::new(end.x - start.x, end.y - start.y)
		}
		ArcPath::Curve {
			start,
			control,
			end,
		} => {
			ctx.move_to(start.x, start.y);
			ctx.quadratic_curve_to(control.x, control.y, end.x, end.y);
			Point::new(end.x - start.x, end.y - start.y)
		}
		ArcPath::Loop { anchor, diameter } => {
			let radius = diameter / 2.0;
			let _ = ctx.arc(anchor.x + radius, anchor.y, radius, 0.0, 2.0 * PI);
			Point::new(0.0, 1.0)
		}
	};
	ctx.stroke();

	if arc.shows_arrow_head() {
		draw_arrow_head(ctx, path.arrow_point(), direction);
	}
}

fn draw_arrow_head(ctx: &CanvasRenderingContext2d, tip: Point, direction: Point) {
	let length = (direction.x * direction.x + direction.y * direction.y).sqrt();
	if length < 0.001 {
		return;
	}
	let (ux, uy) = (direction.x / length, direction.y / length);
	let (back_x, back_y) = (tip.x - ux * ARROW_SIZE, tip.y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_node(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d, node: &GraphNode, color: &str) {
	let bounds = node.bounds();
	let k = state.transform.k;
	let t = ease_out_cubic(state.hover.highlight_t);

	ctx.set_global_alpha(item_alpha(state, node.is_highlighted()));
	ctx.set_fill_style_str(color);
	ctx.fill_rect(bounds.x, bounds.y, bounds.width, bounds.height);

	if node.is_selected() || node.is_matching() {
		ctx.set_stroke_style_str(if node.is_selected() { "white" } else { "#ffdd57" });
		ctx.set_line_width(2.0 / k.max(0.5));
		ctx.stroke_rect(bounds.x, bounds.y, bounds.width, bounds.height);
	}
	if node.is_fixed_location() {
		ctx.begin_path();
		let _ = ctx.arc(bounds.x + 4.0, bounds.y + 4.0, 2.0, 0.0, 2.0 * PI);
		ctx.set_fill_style_str("white");
		ctx.fill();
	}

	let is_hovered = state.hover.node.as_ref().is_some_and(|h| h.ptr_eq(node));
	if is_hovered && t > 0.01 {
		ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
		ctx.set_line_width(1.5 / k);
		ctx.stroke_rect(bounds.x - 2.0, bounds.y - 2.0, bounds.width + 4.0, bounds.height + 4.0);
	}

	let center = bounds.center();
	ctx.set_fill_style_str("white");
	ctx.set_font("11px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&node.text(), center.x, center.y);
	ctx.set_global_alpha(1.0);
}
