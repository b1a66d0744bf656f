//! Plain geometry shared by the model, the layouts and the canvas.
//!
//! The model never draws anything. It stores node bounds and per-arc curve
//! factors; [`arc_path`] turns those into the path a renderer should stroke.

use crate::graph::GraphArc;

/// Base divisor for the perpendicular offset of curved arcs.
pub const CURVE_FACTOR_BASE_OFFSET: f64 = 8.0;
/// Diameter of the innermost self loop.
pub const SELF_ARC_DIAMETER: f64 = 20.0;

const PADDING_X: f64 = 12.0;
const PADDING_Y: f64 = 6.0;
const CHAR_WIDTH: f64 = 7.0;
const LINE_HEIGHT: f64 = 14.0;
const MAX_TEXT_CHARS: usize = 15;

/// A point in graph coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// Create a point.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(&self, other: &Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// An axis aligned rectangle; `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Width, never negative.
	pub width: f64,
	/// Height, never negative.
	pub height: f64,
}

impl Rect {
	/// Create a rectangle.
	pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}

	/// The centre point.
	pub fn center(&self) -> Point {
		Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	/// Right edge.
	pub fn max_x(&self) -> f64 {
		self.x + self.width
	}

	/// Bottom edge.
	pub fn max_y(&self) -> f64 {
		self.y + self.height
	}

	/// Whether `point` lies inside (edges included).
	pub fn contains(&self, point: Point) -> bool {
		point.x >= self.x && point.x <= self.max_x() && point.y >= self.y && point.y <= self.max_y()
	}
}

/// The path a renderer should draw for an arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArcPath {
	/// Straight segment between the two node centres.
	Line {
		/// Start (source centre, or destination centre when inverted).
		start: Point,
		/// End.
		end: Point,
	},
	/// Quadratic curve bowing away from the chord.
	Curve {
		/// Start.
		start: Point,
		/// Quadratic control point.
		control: Point,
		/// End.
		end: Point,
	},
	/// A loop hanging off the right edge of a node, for arcs whose endpoints coincide.
	Loop {
		/// Point on the node's right edge where the loop starts and ends.
		anchor: Point,
		/// Loop diameter.
		diameter: f64,
	},
}

impl ArcPath {
	/// Where the arrow head should sit.
	pub fn arrow_point(&self) -> Point {
		match *self {
			ArcPath::Line { start, end } => Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0),
			ArcPath::Curve {
				start,
				control,
				end,
			} => {
				// on a quadratic the half-offset point is the curve midpoint
				let mid = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
				Point::new((mid.x + control.x) / 2.0, (mid.y + control.y) / 2.0)
			}
			ArcPath::Loop { anchor, diameter } => Point::new(anchor.x + diameter, anchor.y),
		}
	}
}

/// Compute the path of `arc` from its endpoints' bounds and its curve factor.
pub fn arc_path(arc: &GraphArc) -> ArcPath {
	let (src, dest) = if arc.is_inverted() {
		(arc.destination(), arc.source())
	} else {
		(arc.source(), arc.destination())
	};
	let (src_bounds, dest_bounds) = (src.bounds(), dest.bounds());
	let curve_factor = arc.curve_factor() as f64;

	if arc.is_self_arc() {
		return ArcPath::Loop {
			anchor: Point::new(src_bounds.max_x() - 1.0, src_bounds.center().y),
			diameter: SELF_ARC_DIAMETER * (curve_factor + 1.0),
		};
	}

	let (start, end) = (src_bounds.center(), dest_bounds.center());
	if arc.curve_factor() == 0 {
		return ArcPath::Line { start, end };
	}
	let length = start.distance(&end);
	if length < f64::EPSILON {
		return ArcPath::Line { start, end };
	}
	let (ux, uy) = ((end.x - start.x) / length, (end.y - start.y) / length);
	let offset = (curve_factor + 1.0) * length / CURVE_FACTOR_BASE_OFFSET;
	let (along, across) = (length / 2.0, offset);
	let control = Point::new(
		start.x + along * ux - across * uy,
		start.y + along * uy + across * ux,
	);
	ArcPath::Curve {
		start,
		control,
		end,
	}
}

/// Size of a node showing `text` on a single label line.
pub fn preferred_node_size(text: &str) -> (f64, f64) {
	let chars = text.trim().chars().count().min(MAX_TEXT_CHARS) as f64;
	(
		3.0 * PADDING_X + chars * CHAR_WIDTH,
		2.0 * PADDING_Y + LINE_HEIGHT,
	)
}
