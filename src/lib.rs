//! A typed node/arc graph model with change events, type filtering, arc
//! arrangement and layouts, plus a Leptos canvas that shows it.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod error;
pub mod filter;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod notify;
pub mod view;

mod components;
mod pages;

pub use components::graph_canvas::GraphCanvas;
pub use error::{GraphError, Result};
pub use filter::{FilterManager, GraphFilter, PredicateFilter};
pub use graph::{GraphArc, GraphItem, GraphModel, GraphModelEvent, GraphModelListener, GraphNode, ItemId, ItemType};
pub use view::{GraphView, ViewConfig};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the homepage and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Graph Canvas" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
