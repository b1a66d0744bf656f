//! Small observable lists used for selection and search matches.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::arc::GraphArc;
use super::node::GraphNode;
use crate::notify::ListenerList;

/// Contents of a collection before and after a change.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionEvent<T> {
	/// Items before the change.
	pub old: Vec<T>,
	/// Items after the change.
	pub new: Vec<T>,
}

impl<T: PartialEq> CollectionEvent<T> {
	/// Items present before the change but not after it.
	pub fn removed(&self) -> impl Iterator<Item = &T> {
		self.old.iter().filter(|item| !self.new.contains(item))
	}

	/// Items present after the change but not before it.
	pub fn added(&self) -> impl Iterator<Item = &T> {
		self.new.iter().filter(|item| !self.old.contains(item))
	}
}

/// Receives [`CollectionEvent`]s.
pub trait CollectionListener<T> {
	/// Called after every change.
	fn collection_changed(&self, event: &CollectionEvent<T>);
}

impl<T, F> CollectionListener<T> for F
where
	F: Fn(&CollectionEvent<T>),
{
	fn collection_changed(&self, event: &CollectionEvent<T>) {
		self(event)
	}
}

/// An ordered, duplicate-free list that announces its changes.
///
/// Clones share the same contents and listeners.
pub struct ItemCollection<T: 'static> {
	items: Rc<RefCell<Vec<T>>>,
	listeners: ListenerList<dyn CollectionListener<T>>,
}

/// Selected or matching nodes.
pub type NodeCollection = ItemCollection<GraphNode>;

/// Selected arcs.
pub type ArcCollection = ItemCollection<GraphArc>;

impl<T: Clone + PartialEq + 'static> ItemCollection<T> {
	/// An empty collection.
	pub fn new() -> Self {
		Self {
			items: Rc::new(RefCell::new(Vec::new())),
			listeners: ListenerList::new(),
		}
	}

	/// Subscribe to changes. Returns false if already subscribed.
	pub fn add_listener(&self, listener: Rc<dyn CollectionListener<T>>) -> bool {
		self.listeners.add(listener)
	}

	/// Unsubscribe. Returns true if the listener was subscribed.
	pub fn remove_listener(&self, listener: &Rc<dyn CollectionListener<T>>) -> bool {
		self.listeners.remove(listener)
	}

	fn replace(&self, new: Vec<T>) {
		let old = std::mem::replace(&mut *self.items.borrow_mut(), new.clone());
		let event = CollectionEvent { old, new };
		self.listeners
			.dispatch(|listener| listener.collection_changed(&event));
	}

	/// Snapshot of the contents.
	pub fn items(&self) -> Vec<T> {
		self.items.borrow().clone()
	}

	/// The front item.
	pub fn first(&self) -> Option<T> {
		self.items.borrow().first().cloned()
	}

	/// Whether the item is present.
	pub fn contains(&self, item: &T) -> bool {
		self.items.borrow().contains(item)
	}

	/// Number of items.
	pub fn len(&self) -> usize {
		self.items.borrow().len()
	}

	/// Whether the collection is empty.
	pub fn is_empty(&self) -> bool {
		self.items.borrow().is_empty()
	}

	/// Empty the collection. Fires only if something was removed.
	pub fn clear(&self) {
		if !self.is_empty() {
			self.replace(Vec::new());
		}
	}

	/// Make `item` the only entry, or clear with `None`. Fires only on change.
	pub fn set_item(&self, item: Option<T>) {
		let unchanged = {
			let items = self.items.borrow();
			match &item {
				None => items.is_empty(),
				Some(item) => items.len() == 1 && items[0] == *item,
			}
		};
		if !unchanged {
			self.replace(item.into_iter().collect());
		}
	}

	/// Replace the contents. Always fires. Duplicates are dropped.
	pub fn set_items(&self, items: impl IntoIterator<Item = T>) {
		let mut new: Vec<T> = Vec::new();
		for item in items {
			if !new.contains(&item) {
				new.push(item);
			}
		}
		self.replace(new);
	}

	/// Remove the item if present, otherwise insert it at the front. Always fires.
	pub fn toggle(&self, item: T) {
		let mut new = self.items();
		match new.iter().position(|existing| *existing == item) {
			Some(index) => {
				new.remove(index);
			}
			None => new.insert(0, item),
		}
		self.replace(new);
	}

	/// Move the item to the front, inserting it if absent.
	///
	/// Returns true and fires only when the item was not already present.
	pub fn add(&self, item: T) -> bool {
		let mut items = self.items.borrow_mut();
		match items.iter().position(|existing| *existing == item) {
			Some(index) => {
				let existing = items.remove(index);
				items.insert(0, existing);
				false
			}
			None => {
				let mut new = items.clone();
				new.insert(0, item);
				drop(items);
				self.replace(new);
				true
			}
		}
	}

	/// Remove the item. Returns true and fires if it was present.
	pub fn remove(&self, item: &T) -> bool {
		let mut new = self.items();
		let Some(index) = new.iter().position(|existing| existing == item) else {
			return false;
		};
		new.remove(index);
		self.replace(new);
		true
	}

	/// Remove every item matching the predicate, firing once if anything went.
	pub fn retain(&self, keep: impl Fn(&T) -> bool) {
		let items = self.items();
		let kept: Vec<T> = items.iter().filter(|item| keep(item)).cloned().collect();
		if kept.len() != items.len() {
			self.replace(kept);
		}
	}
}

impl<T: Clone + PartialEq + 'static> Default for ItemCollection<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: 'static> Clone for ItemCollection<T> {
	fn clone(&self) -> Self {
		Self {
			items: self.items.clone(),
			listeners: self.listeners.clone(),
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for ItemCollection<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.items.borrow().iter()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn watched() -> (ItemCollection<&'static str>, Rc<RefCell<Vec<CollectionEvent<&'static str>>>>) {
		let collection = ItemCollection::new();
		let events = Rc::new(RefCell::new(Vec::new()));
		let sink = events.clone();
		collection.add_listener(Rc::new(move |event: &CollectionEvent<&'static str>| {
			sink.borrow_mut().push(event.clone());
		}));
		(collection, events)
	}

	#[test]
	fn test_add_moves_to_front_without_event() {
		let (collection, events) = watched();
		assert!(collection.add("a"));
		assert!(collection.add("b"));
		assert!(!collection.add("a"));
		assert_eq!(collection.items(), vec!["a", "b"]);
		assert_eq!(events.borrow().len(), 2);
	}

	#[test]
	fn test_toggle() {
		let (collection, events) = watched();
		collection.toggle("a");
		collection.toggle("b");
		collection.toggle("a");
		assert_eq!(collection.items(), vec!["b"]);
		let last = events.borrow().last().cloned().unwrap();
		assert_eq!(last.old, vec!["b", "a"]);
		assert_eq!(last.removed().collect::<Vec<_>>(), vec![&"a"]);
	}

	#[test]
	fn test_set_item_fires_only_on_change() {
		let (collection, events) = watched();
		collection.set_item(None);
		collection.set_item(Some("a"));
		collection.set_item(Some("a"));
		collection.set_item(None);
		assert_eq!(events.borrow().len(), 2);
		assert!(collection.is_empty());
	}

	#[test]
	fn test_clear_and_remove() {
		let (collection, events) = watched();
		collection.clear();
		assert!(events.borrow().is_empty());
		collection.set_items(["a", "b", "a"]);
		assert_eq!(collection.len(), 2);
		assert!(!collection.remove(&"z"));
		assert!(collection.remove(&"a"));
		assert_eq!(collection.first(), Some("b"));
		collection.clear();
		assert_eq!(events.borrow().len(), 3);
	}

	#[test]
	fn test_retain_fires_once() {
		let (collection, events) = watched();
		collection.set_items(["a", "bb", "cc"]);
		collection.retain(|item| item.len() == 1);
		collection.retain(|item| item.len() == 1);
		assert_eq!(collection.items(), vec!["a"]);
		assert_eq!(events.borrow().len(), 2);
	}
}
