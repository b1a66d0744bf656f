//! Curve factor assignment for arcs sharing an endpoint pair.

use super::arc::GraphArc;
use super::node::GraphNode;

/// Assign curve factors to every arc between `src` and `dest` so that none overlap.
///
/// Arcs are split by direction and numbered independently in the order they
/// were attached to `src`. A pair with arcs in only one direction starts at 0,
/// so a lone arc is straight; once both directions exist numbering starts at 1
/// and the two directions bow away from each other.
///
/// Self arcs (`src == dest`) all land in the forward list and are numbered
/// 0, 1, 2, … which the renderer turns into nested loops.
pub fn arrange_arcs(src: &GraphNode, dest: &GraphNode) {
	let (mut forward, mut backward): (Vec<GraphArc>, Vec<GraphArc>) = (Vec::new(), Vec::new());
	for arc in src.arcs() {
		let (from, to) = (arc.source(), arc.destination());
		if from.ptr_eq(src) && to.ptr_eq(dest) {
			forward.push(arc);
		} else if from.ptr_eq(dest) && to.ptr_eq(src) {
			backward.push(arc);
		}
	}

	let starting_curve = if forward.is_empty() || backward.is_empty() {
		0
	} else {
		1
	};
	for (offset, arc) in forward.iter().enumerate() {
		arc.set_curve_factor(starting_curve + offset as u32);
	}
	for (offset, arc) in backward.iter().enumerate() {
		arc.set_curve_factor(starting_curve + offset as u32);
	}
}

#[cfg(test)]
mod tests {
	use crate::graph::GraphModel;
	use pretty_assertions::assert_eq;

	fn factors(model: &GraphModel, ids: &[&str]) -> Vec<u32> {
		ids.iter()
			.map(|id| model.arc(*id).unwrap().curve_factor())
			.collect()
	}

	#[test]
	fn test_single_direction_counts_from_zero() {
		let model = GraphModel::new();
		model.add_arc("ab1", "a", "b").unwrap();
		assert_eq!(factors(&model, &["ab1"]), vec![0]);
		model.add_arc("ab2", "a", "b").unwrap();
		assert_eq!(factors(&model, &["ab1", "ab2"]), vec![0, 1]);
		model.add_arc("ab3", "a", "b").unwrap();
		assert_eq!(factors(&model, &["ab1", "ab2", "ab3"]), vec![0, 1, 2]);
	}

	#[test]
	fn test_both_directions_count_from_one() {
		let model = GraphModel::new();
		model.add_arc("ab1", "a", "b").unwrap();
		model.add_arc("ba1", "b", "a").unwrap();
		assert_eq!(factors(&model, &["ab1", "ba1"]), vec![1, 1]);
		model.add_arc("ab2", "a", "b").unwrap();
		assert_eq!(factors(&model, &["ab1", "ab2", "ba1"]), vec![1, 2, 1]);
	}

	#[test]
	fn test_other_pairs_untouched() {
		let model = GraphModel::new();
		model.add_arc("ab1", "a", "b").unwrap();
		model.add_arc("ab2", "a", "b").unwrap();
		model.add_arc("ac", "a", "c").unwrap();
		assert_eq!(factors(&model, &["ab1", "ab2", "ac"]), vec![0, 1, 0]);
	}

	#[test]
	fn test_removal_closes_gaps() {
		let model = GraphModel::new();
		model.add_arc("ab1", "a", "b").unwrap();
		model.add_arc("ab2", "a", "b").unwrap();
		model.add_arc("ab3", "a", "b").unwrap();
		model.remove_arc("ab1");
		assert_eq!(factors(&model, &["ab2", "ab3"]), vec![0, 1]);
	}

	#[test]
	fn test_removing_last_reverse_arc_straightens_pair() {
		let model = GraphModel::new();
		model.add_arc("ab", "a", "b").unwrap();
		model.add_arc("ba", "b", "a").unwrap();
		model.remove_arc("ba");
		assert_eq!(factors(&model, &["ab"]), vec![0]);
	}
}
