//! A graph as seen on screen: the current model, its filters, selections and layouts.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use log::{debug, info};

use crate::error::{GraphError, Result};
use crate::filter::{FilterChangedEvent, FilterManager};
use crate::geometry::{Point, Rect};
use crate::graph::{
	ArcCollection, CollectionEvent, GraphArc, GraphItem, GraphModel, GraphModelEvent, GraphModelListener,
	GraphNode, NodeCollection,
};
use crate::layout::{ForceLayout, GridLayout, LAYOUT_FORCE_DIRECTED, LAYOUT_GRID_BY_ALPHA, LayoutAction};
use crate::notify::ListenerList;

/// Canvas settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
	/// Canvas width in pixels.
	pub canvas_width: f64,
	/// Canvas height in pixels.
	pub canvas_height: f64,
	/// Whether hovering a node shows its tooltip.
	pub show_node_tooltips: bool,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			canvas_width: 800.0,
			canvas_height: 600.0,
			show_node_tooltips: true,
		}
	}
}

/// Something about the view itself changed.
#[derive(Clone, Debug)]
pub enum ViewEvent {
	/// A different model was attached.
	ModelChanged {
		/// The detached model.
		old: GraphModel,
		/// The model now shown.
		new: GraphModel,
	},
}

/// Receives [`ViewEvent`]s.
pub trait ViewListener {
	/// Called after the change.
	fn view_changed(&self, event: &ViewEvent);
}

impl<F> ViewListener for F
where
	F: Fn(&ViewEvent),
{
	fn view_changed(&self, event: &ViewEvent) {
		self(event)
	}
}

struct ViewInner {
	model: RefCell<GraphModel>,
	config: RefCell<ViewConfig>,
	filters: FilterManager,
	selected_nodes: NodeCollection,
	selected_arcs: ArcCollection,
	matching_nodes: NodeCollection,
	highlighted: RefCell<Option<GraphNode>>,
	// follow the view from model to model
	model_listeners: RefCell<Vec<Rc<dyn GraphModelListener>>>,
	view_listeners: ListenerList<dyn ViewListener>,
	layouts: RefCell<IndexMap<String, LayoutAction>>,
	last_layout: RefCell<Option<String>>,
}

/// The current model plus everything needed to show it.
///
/// Clones share the same view.
#[derive(Clone)]
pub struct GraphView {
	inner: Rc<ViewInner>,
}

fn sync_flag<T: GraphItem + Clone + PartialEq>(event: &CollectionEvent<T>, set: impl Fn(&T, bool)) {
	for item in &event.old {
		set(item, false);
	}
	for item in &event.new {
		set(item, true);
	}
}

// the arc is already detached when its removal is announced
fn unhighlight_removed_arc(highlighted: &GraphNode, arc: &GraphArc) {
	let (source, destination) = (arc.source(), arc.destination());
	let other = if source.ptr_eq(highlighted) {
		destination
	} else if destination.ptr_eq(highlighted) {
		source
	} else {
		return;
	};
	arc.set_highlighted(false);
	if !other.ptr_eq(highlighted) && !highlighted.connected_nodes().iter().any(|n| n.ptr_eq(&other)) {
		other.set_highlighted(false);
	}
}

impl GraphView {
	/// A view of `model` with default settings.
	pub fn new(model: GraphModel) -> Self {
		Self::with_config(model, ViewConfig::default())
	}

	/// A view of `model`.
	pub fn with_config(model: GraphModel, config: ViewConfig) -> Self {
		let inner = Rc::new(ViewInner {
			model: RefCell::new(model.clone()),
			config: RefCell::new(config),
			filters: FilterManager::new(),
			selected_nodes: NodeCollection::new(),
			selected_arcs: ArcCollection::new(),
			matching_nodes: NodeCollection::new(),
			highlighted: RefCell::new(None),
			model_listeners: RefCell::new(Vec::new()),
			view_listeners: ListenerList::new(),
			layouts: RefCell::new(IndexMap::new()),
			last_layout: RefCell::new(None),
		});

		inner
			.selected_nodes
			.add_listener(Rc::new(|event: &CollectionEvent<GraphNode>| {
				sync_flag(event, |node, on| node.set_selected(on));
			}));
		inner
			.selected_arcs
			.add_listener(Rc::new(|event: &CollectionEvent<GraphArc>| {
				sync_flag(event, |arc, on| arc.set_selected(on));
			}));
		inner
			.matching_nodes
			.add_listener(Rc::new(|event: &CollectionEvent<GraphNode>| {
				sync_flag(event, |node, on| node.set_matching(on));
			}));

		let weak = Rc::downgrade(&inner);
		inner.filters.add_filter_changed_listener(Rc::new(
			move |manager: &FilterManager, _: &FilterChangedEvent| {
				if let Some(inner) = weak.upgrade() {
					let model = inner.model.borrow().clone();
					manager.apply_filters(&model);
				}
			},
		));

		let view = Self { inner };
		view.add_view_listener(view.inner.filters.type_sync());
		view.add_model_listener(view.prune_listener());
		view.add_model_listener(view.inner.filters.type_sync());
		view.inner.filters.sync_types(&model);

		view.add_layout(LayoutAction::new(LAYOUT_GRID_BY_ALPHA, Rc::new(GridLayout)));
		view.add_layout(LayoutAction::new(
			LAYOUT_FORCE_DIRECTED,
			Rc::new(ForceLayout::default()),
		));
		view
	}

	/// Drops removed items from the selections and the highlight.
	fn prune_listener(&self) -> Rc<dyn GraphModelListener> {
		let weak = Rc::downgrade(&self.inner);
		Rc::new(move |_: &GraphModel, event: &GraphModelEvent| {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			match event {
				GraphModelEvent::Cleared => {
					inner.selected_nodes.clear();
					inner.selected_arcs.clear();
					inner.matching_nodes.clear();
					inner.highlighted.take();
				}
				GraphModelEvent::NodeRemoved(node) => {
					inner.selected_nodes.remove(node);
					inner.matching_nodes.remove(node);
					let stale = inner.highlighted.borrow().as_ref().is_some_and(|h| h.ptr_eq(node));
					if stale {
						node.set_highlighted(false);
						inner.highlighted.take();
					}
				}
				GraphModelEvent::ArcRemoved(arc) => {
					inner.selected_arcs.remove(arc);
					let highlighted = inner.highlighted.borrow().clone();
					if let Some(highlighted) = highlighted {
						unhighlight_removed_arc(&highlighted, arc);
					}
				}
				_ => {}
			}
		})
	}

	/// The model currently shown.
	pub fn model(&self) -> GraphModel {
		self.inner.model.borrow().clone()
	}

	/// Show another model.
	///
	/// Listeners registered through [`GraphView::add_model_listener`] move to
	/// the new model, selections are cleared, and `ModelChanged` fires.
	/// Setting the current model again does nothing.
	pub fn set_model(&self, model: GraphModel) {
		let old = self.model();
		if old.ptr_eq(&model) {
			return;
		}
		let listeners = self.inner.model_listeners.borrow().clone();
		for listener in &listeners {
			old.remove_listener(listener);
		}
		*self.inner.model.borrow_mut() = model.clone();
		for listener in listeners {
			model.add_listener(listener);
		}
		self.clear_selection();
		self.inner.matching_nodes.clear();
		self.set_highlighted_node(None);

		info!("view switched to a model with {} nodes", model.node_count());
		let event = ViewEvent::ModelChanged { old, new: model };
		self.inner
			.view_listeners
			.dispatch(|listener| listener.view_changed(&event));
	}

	/// Register a listener on the current model and on every model shown later.
	pub fn add_model_listener(&self, listener: Rc<dyn GraphModelListener>) {
		{
			let mut listeners = self.inner.model_listeners.borrow_mut();
			if listeners.iter().any(|l| Rc::ptr_eq(l, &listener)) {
				return;
			}
			listeners.push(listener.clone());
		}
		self.model().add_listener(listener);
	}

	/// Undo [`GraphView::add_model_listener`].
	pub fn remove_model_listener(&self, listener: &Rc<dyn GraphModelListener>) {
		self.inner
			.model_listeners
			.borrow_mut()
			.retain(|l| !Rc::ptr_eq(l, listener));
		self.model().remove_listener(listener);
	}

	/// Subscribe to view events. Returns false if already subscribed.
	pub fn add_view_listener(&self, listener: Rc<dyn ViewListener>) -> bool {
		self.inner.view_listeners.add(listener)
	}

	/// Unsubscribe. Returns true if the listener was subscribed.
	pub fn remove_view_listener(&self, listener: &Rc<dyn ViewListener>) -> bool {
		self.inner.view_listeners.remove(listener)
	}

	/// The filter manager of this view. Changing its state re-applies filters
	/// to the current model.
	pub fn filter_manager(&self) -> FilterManager {
		self.inner.filters.clone()
	}

	/// Re-apply every filter to the current model.
	pub fn apply_filters(&self) {
		self.inner.filters.apply_filters(&self.model());
	}

	/// Current settings.
	pub fn config(&self) -> ViewConfig {
		self.inner.config.borrow().clone()
	}

	/// Record a new canvas size.
	pub fn set_canvas_size(&self, width: f64, height: f64) {
		let mut config = self.inner.config.borrow_mut();
		config.canvas_width = width;
		config.canvas_height = height;
	}

	/// Selected nodes, most recent first.
	pub fn selected_nodes(&self) -> NodeCollection {
		self.inner.selected_nodes.clone()
	}

	/// Selected arcs, most recent first.
	pub fn selected_arcs(&self) -> ArcCollection {
		self.inner.selected_arcs.clone()
	}

	/// Nodes matching the last search.
	pub fn matching_nodes(&self) -> NodeCollection {
		self.inner.matching_nodes.clone()
	}

	/// The most recently selected node.
	pub fn first_selected_node(&self) -> Option<GraphNode> {
		self.inner.selected_nodes.first()
	}

	/// Deselect everything.
	pub fn clear_selection(&self) {
		self.inner.selected_nodes.clear();
		self.inner.selected_arcs.clear();
	}

	/// Replace the node selection.
	pub fn set_selected_nodes(&self, nodes: impl IntoIterator<Item = GraphNode>) {
		self.inner.selected_nodes.set_items(nodes);
	}

	/// Replace the search matches.
	pub fn set_matching_nodes(&self, nodes: impl IntoIterator<Item = GraphNode>) {
		self.inner.matching_nodes.set_items(nodes);
	}

	/// The node whose neighbourhood is highlighted.
	pub fn highlighted_node(&self) -> Option<GraphNode> {
		self.inner.highlighted.borrow().clone()
	}

	/// Highlight a node, its incident arcs and its neighbours, dropping the
	/// previous highlight.
	pub fn set_highlighted_node(&self, node: Option<GraphNode>) {
		let previous = self.inner.highlighted.replace(node.clone());
		if let Some(previous) = previous {
			previous.set_highlighted(false);
			for arc in previous.arcs() {
				arc.set_highlighted(false);
			}
			for other in previous.connected_nodes() {
				other.set_highlighted(false);
			}
		}
		if let Some(node) = node {
			node.set_highlighted(true);
			for arc in node.arcs() {
				arc.set_highlighted(true);
			}
			for other in node.connected_nodes() {
				other.set_highlighted(true);
			}
		}
	}

	/// The topmost visible node under `point`.
	pub fn node_at(&self, point: Point) -> Option<GraphNode> {
		self.model()
			.visible_nodes()
			.into_iter()
			.rev()
			.find(|node| node.bounds().contains(point))
	}

	/// Tooltip of the node under `point`, when node tooltips are on.
	pub fn tooltip_at(&self, point: Point) -> Option<String> {
		if !self.inner.config.borrow().show_node_tooltips {
			return None;
		}
		self.node_at(point).map(|node| node.tooltip())
	}

	/// Register a layout. A layout with the same name is replaced. The first
	/// layout registered becomes the last-run layout.
	pub fn add_layout(&self, layout: LayoutAction) {
		let name = layout.name().to_string();
		self.inner.layouts.borrow_mut().insert(name.clone(), layout);
		let mut last = self.inner.last_layout.borrow_mut();
		if last.is_none() {
			*last = Some(name);
		}
	}

	/// Unregister a layout.
	pub fn remove_layout(&self, name: &str) -> Option<LayoutAction> {
		let removed = self.inner.layouts.borrow_mut().shift_remove(name);
		let mut last = self.inner.last_layout.borrow_mut();
		if last.as_deref() == Some(name) {
			*last = None;
		}
		removed
	}

	/// A registered layout.
	pub fn layout(&self, name: &str) -> Option<LayoutAction> {
		self.inner.layouts.borrow().get(name).cloned()
	}

	/// Names of the registered layouts, in registration order.
	pub fn layout_names(&self) -> Vec<String> {
		self.inner.layouts.borrow().keys().cloned().collect()
	}

	/// Name of the layout [`GraphView::perform_layout`] reruns.
	pub fn last_layout(&self) -> Option<String> {
		self.inner.last_layout.borrow().clone()
	}

	/// The area layouts work in, derived from the canvas size with a margin
	/// for wide and tall labels.
	pub fn layout_area(&self) -> Rect {
		let config = self.inner.config.borrow();
		let mut width = (config.canvas_width - 10.0).max(0.0);
		let mut height = (config.canvas_height - 10.0).max(0.0);
		if width > 400.0 {
			width -= 100.0;
		}
		if height > 300.0 {
			height -= 30.0;
		}
		Rect::new(0.0, 0.0, width, height)
	}

	/// Run a layout by name and remember it as the last layout.
	pub fn run_layout(&self, name: &str) -> Result<usize> {
		let layout = self
			.layout(name)
			.ok_or_else(|| GraphError::UnknownLayout(name.to_string()))?;
		*self.inner.last_layout.borrow_mut() = Some(name.to_string());
		layout.run(&self.model(), self.layout_area())
	}

	/// Apply filters, then rerun the last layout. Does nothing without one.
	pub fn perform_layout(&self) -> Result<usize> {
		let Some(name) = self.last_layout() else {
			debug!("no layout to perform");
			return Ok(0);
		};
		self.apply_filters();
		self.run_layout(&name)
	}

	/// Remove nodes without arcs or without visible arcs, then re-layout if
	/// anything went. Returns the number of nodes removed.
	pub fn clear_orphans(&self) -> Result<usize> {
		let model = self.model();
		let orphans: Vec<GraphNode> = model
			.all_nodes()
			.into_iter()
			.filter(|node| !node.arcs().iter().any(|arc| arc.is_visible()))
			.collect();
		for node in &orphans {
			model.remove_node(node.id());
		}
		if !orphans.is_empty() {
			info!("removed {} orphan nodes", orphans.len());
			self.perform_layout()?;
		}
		Ok(orphans.len())
	}

	/// Exempt every node from automatic layout.
	pub fn pin_all_nodes(&self) {
		for node in self.model().all_nodes() {
			node.set_fixed_location(true);
		}
	}

	/// Let automatic layouts move every node again.
	pub fn unpin_all_nodes(&self) {
		for node in self.model().all_nodes() {
			node.set_fixed_location(false);
		}
	}
}

impl fmt::Debug for GraphView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GraphView")
			.field("model", &*self.inner.model.borrow())
			.field("layouts", &self.layout_names())
			.field("last_layout", &*self.inner.last_layout.borrow())
			.finish_non_exhaustive()
	}
}
