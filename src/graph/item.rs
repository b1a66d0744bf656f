//! Identity, type and the flags shared by nodes and arcs.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

use crate::error::{GraphError, Result};

/// Display name of [`ItemType::Unknown`].
pub const UNKNOWN_TYPE_NAME: &str = "Unknown";

/// The externally supplied key of a node or arc.
///
/// Equality and hashing are by value; two items with equal identities are the
/// same item as far as a model is concerned.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemId {
	/// Numeric identity.
	Int(i64),
	/// Textual identity. Must not be empty.
	Text(String),
}

impl ItemId {
	/// Reject identities that stand for "no identity".
	pub fn validate(&self) -> Result<()> {
		match self {
			ItemId::Text(text) if text.is_empty() => Err(GraphError::InvalidArgument(
				"graph items must have a non-empty identity".into(),
			)),
			_ => Ok(()),
		}
	}
}

impl fmt::Display for ItemId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ItemId::Int(id) => write!(f, "{}", id),
			ItemId::Text(id) => f.write_str(id),
		}
	}
}

impl From<&str> for ItemId {
	fn from(id: &str) -> Self {
		ItemId::Text(id.to_string())
	}
}

impl From<String> for ItemId {
	fn from(id: String) -> Self {
		ItemId::Text(id)
	}
}

impl From<&String> for ItemId {
	fn from(id: &String) -> Self {
		ItemId::Text(id.clone())
	}
}

impl From<i64> for ItemId {
	fn from(id: i64) -> Self {
		ItemId::Int(id)
	}
}

impl From<i32> for ItemId {
	fn from(id: i32) -> Self {
		ItemId::Int(id as i64)
	}
}

impl From<u32> for ItemId {
	fn from(id: u32) -> Self {
		ItemId::Int(id as i64)
	}
}

impl From<&ItemId> for ItemId {
	fn from(id: &ItemId) -> Self {
		id.clone()
	}
}

/// Classification of a node or arc, used for colouring and filtering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemType {
	/// No type was given.
	#[default]
	Unknown,
	/// A caller supplied type.
	Named(String),
}

impl ItemType {
	/// A named type. The name of the sentinel maps to [`ItemType::Unknown`] so
	/// the two never show up as separate types.
	pub fn named(name: impl Into<String>) -> Self {
		let name = name.into();
		if name == UNKNOWN_TYPE_NAME {
			ItemType::Unknown
		} else {
			ItemType::Named(name)
		}
	}

	/// The display name of this type.
	pub fn name(&self) -> &str {
		match self {
			ItemType::Unknown => UNKNOWN_TYPE_NAME,
			ItemType::Named(name) => name,
		}
	}
}

impl fmt::Display for ItemType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl From<&str> for ItemType {
	fn from(name: &str) -> Self {
		ItemType::named(name)
	}
}

impl From<String> for ItemType {
	fn from(name: String) -> Self {
		ItemType::named(name)
	}
}

/// Which half of the graph an item belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
	/// A [`GraphNode`](super::GraphNode).
	Node,
	/// A [`GraphArc`](super::GraphArc).
	Arc,
}

/// The contract shared by nodes and arcs.
///
/// Items are handles with interior mutability, so every setter takes `&self`.
pub trait GraphItem {
	/// Identity of the item within its model.
	fn id(&self) -> &ItemId;

	/// Node or arc.
	fn kind(&self) -> ItemKind;

	/// Current type, [`ItemType::Unknown`] when none was given.
	fn item_type(&self) -> ItemType;

	/// Whether the item is selected.
	fn is_selected(&self) -> bool;

	/// Select or deselect the item.
	fn set_selected(&self, selected: bool);

	/// Whether the item is highlighted (hover, neighbourhood emphasis).
	fn is_highlighted(&self) -> bool;

	/// Highlight or un-highlight the item.
	fn set_highlighted(&self, highlighted: bool);

	/// Whether the item is currently shown.
	fn is_visible(&self) -> bool;

	/// Show or hide the item, subject to the item's own rules.
	fn set_visible(&self, visible: bool);

	/// Tooltip text; falls back to a description of the item.
	fn tooltip(&self) -> String;

	/// Override the tooltip, or restore the default with `None`.
	fn set_tooltip(&self, tooltip: Option<String>);

	/// Look up a free-form attribute.
	fn attribute(&self, key: &str) -> Option<String>;

	/// Set a free-form attribute; `None` removes it.
	fn set_attribute(&self, key: &str, value: Option<String>);

	/// Whether the attribute is present.
	fn has_attribute(&self, key: &str) -> bool {
		self.attribute(key).is_some()
	}
}

/// Flags and attributes common to nodes and arcs.
#[derive(Debug)]
pub(crate) struct ItemState {
	pub selected: Cell<bool>,
	pub highlighted: Cell<bool>,
	pub visible: Cell<bool>,
	pub tooltip: RefCell<Option<String>>,
	pub attributes: RefCell<HashMap<String, String>>,
}

impl ItemState {
	pub fn new(visible: bool) -> Self {
		Self {
			selected: Cell::new(false),
			highlighted: Cell::new(false),
			visible: Cell::new(visible),
			tooltip: RefCell::new(None),
			attributes: RefCell::new(HashMap::new()),
		}
	}

	pub fn attribute(&self, key: &str) -> Option<String> {
		self.attributes.borrow().get(key).cloned()
	}

	pub fn set_attribute(&self, key: &str, value: Option<String>) {
		let mut attributes = self.attributes.borrow_mut();
		match value {
			Some(value) => {
				attributes.insert(key.to_string(), value);
			}
			None => {
				attributes.remove(key);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_identity_is_invalid() {
		assert!(ItemId::from("a").validate().is_ok());
		assert!(ItemId::from(0).validate().is_ok());
		assert!(matches!(
			ItemId::from("").validate(),
			Err(GraphError::InvalidArgument(_))
		));
		assert!(ItemId::from("  ").validate().is_ok());
	}

	#[test]
	fn test_identity_equality_is_by_value() {
		assert_eq!(ItemId::from("x"), ItemId::from(String::from("x")));
		assert_ne!(ItemId::from("1"), ItemId::from(1));
		assert_eq!(ItemId::from(7).to_string(), "7");
	}

	#[test]
	fn test_unknown_type_is_default() {
		assert_eq!(ItemType::default(), ItemType::Unknown);
		assert_eq!(ItemType::Unknown.to_string(), UNKNOWN_TYPE_NAME);
		assert_eq!(ItemType::named("is_a").name(), "is_a");
	}

	#[test]
	fn test_unknown_name_is_the_sentinel() {
		assert_eq!(ItemType::named(UNKNOWN_TYPE_NAME), ItemType::Unknown);
		assert_eq!(ItemType::from("Unknown"), ItemType::Unknown);
		assert_eq!(ItemType::from(String::from("Unknown")), ItemType::Unknown);
		assert_eq!(ItemType::from("unknown"), ItemType::named("unknown"));
	}

	#[test]
	fn test_attributes() {
		let state = ItemState::new(true);
		state.set_attribute("color", Some("red".into()));
		assert_eq!(state.attribute("color").as_deref(), Some("red"));
		state.set_attribute("color", None);
		assert_eq!(state.attribute("color"), None);
	}
}
