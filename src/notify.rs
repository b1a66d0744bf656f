//! Listener lists with copy-on-dispatch delivery.
//!
//! Every observable in the crate (models, filter managers, collections, views)
//! keeps its subscribers in a [`ListenerList`]. Dispatch snapshots the list
//! before calling anyone, so a listener that adds or removes listeners while
//! being notified only affects the next dispatch.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// An ordered, shareable list of listeners.
///
/// Cloning the list yields another handle to the same subscribers, which is
/// how a listener can manage subscriptions from inside a callback.
pub struct ListenerList<L: ?Sized> {
	listeners: Rc<RefCell<Vec<Rc<L>>>>,
}

impl<L: ?Sized> ListenerList<L> {
	/// Create an empty list.
	pub fn new() -> Self {
		Self {
			listeners: Rc::new(RefCell::new(Vec::new())),
		}
	}

	/// Append a listener. Returns false if that exact listener is already subscribed.
	pub fn add(&self, listener: Rc<L>) -> bool {
		let mut listeners = self.listeners.borrow_mut();
		if listeners.iter().any(|l| Rc::ptr_eq(l, &listener)) {
			return false;
		}
		listeners.push(listener);
		true
	}

	/// Remove a listener. Returns true if it was subscribed.
	pub fn remove(&self, listener: &Rc<L>) -> bool {
		let mut listeners = self.listeners.borrow_mut();
		let before = listeners.len();
		listeners.retain(|l| !Rc::ptr_eq(l, listener));
		listeners.len() != before
	}

	/// Whether this exact listener is subscribed.
	pub fn contains(&self, listener: &Rc<L>) -> bool {
		self.listeners.borrow().iter().any(|l| Rc::ptr_eq(l, listener))
	}

	/// Number of subscribed listeners.
	pub fn len(&self) -> usize {
		self.listeners.borrow().len()
	}

	/// Whether nobody is subscribed.
	pub fn is_empty(&self) -> bool {
		self.listeners.borrow().is_empty()
	}

	/// Drop every subscription.
	pub fn clear(&self) {
		self.listeners.borrow_mut().clear();
	}

	/// Copy of the current subscribers, in subscription order.
	pub fn snapshot(&self) -> Vec<Rc<L>> {
		self.listeners.borrow().clone()
	}

	/// Call `notify` once per listener subscribed at the time of the call.
	///
	/// The internal borrow is released before the first callback runs.
	pub fn dispatch(&self, mut notify: impl FnMut(&L)) {
		if self.is_empty() {
			return;
		}
		for listener in self.snapshot() {
			notify(&listener);
		}
	}
}

impl<L: ?Sized> Clone for ListenerList<L> {
	fn clone(&self) -> Self {
		Self {
			listeners: Rc::clone(&self.listeners),
		}
	}
}

impl<L: ?Sized> Default for ListenerList<L> {
	fn default() -> Self {
		Self::new()
	}
}

impl<L: ?Sized> fmt::Debug for ListenerList<L> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ListenerList").field("len", &self.len()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::Cell;

	trait Ping {
		fn ping(&self);
	}

	struct Counter(Cell<u32>);

	impl Ping for Counter {
		fn ping(&self) {
			self.0.set(self.0.get() + 1);
		}
	}

	#[test]
	fn test_add_is_deduplicated() {
		let list: ListenerList<dyn Ping> = ListenerList::new();
		let counter: Rc<dyn Ping> = Rc::new(Counter(Cell::new(0)));
		assert!(list.add(counter.clone()));
		assert!(!list.add(counter.clone()));
		assert_eq!(list.len(), 1);
		assert!(list.remove(&counter));
		assert!(!list.remove(&counter));
		assert!(list.is_empty());
	}

	struct SelfRemoving {
		list: ListenerList<dyn Ping>,
		me: RefCell<Option<Rc<dyn Ping>>>,
		calls: Cell<u32>,
	}

	impl Ping for SelfRemoving {
		fn ping(&self) {
			self.calls.set(self.calls.get() + 1);
			if let Some(me) = self.me.borrow_mut().take() {
				self.list.remove(&me);
			}
		}
	}

	#[test]
	fn test_mutation_during_dispatch_affects_next_pass_only() {
		let list: ListenerList<dyn Ping> = ListenerList::new();
		let remover = Rc::new(SelfRemoving {
			list: list.clone(),
			me: RefCell::new(None),
			calls: Cell::new(0),
		});
		let remover_dyn: Rc<dyn Ping> = remover.clone();
		*remover.me.borrow_mut() = Some(remover_dyn.clone());
		let counter = Rc::new(Counter(Cell::new(0)));
		list.add(remover_dyn);
		list.add(counter.clone());

		list.dispatch(|l| l.ping());
		assert_eq!(remover.calls.get(), 1);
		assert_eq!(counter.0.get(), 1);
		assert_eq!(list.len(), 1);

		list.dispatch(|l| l.ping());
		assert_eq!(remover.calls.get(), 1);
		assert_eq!(counter.0.get(), 2);
	}

	struct Subscriber {
		list: ListenerList<dyn Ping>,
		late: RefCell<Option<Rc<dyn Ping>>>,
	}

	impl Ping for Subscriber {
		fn ping(&self) {
			if let Some(late) = self.late.borrow_mut().take() {
				self.list.add(late);
			}
		}
	}

	#[test]
	fn test_listener_added_during_dispatch_waits_for_next_pass() {
		let list: ListenerList<dyn Ping> = ListenerList::new();
		let late = Rc::new(Counter(Cell::new(0)));
		list.add(Rc::new(Subscriber {
			list: list.clone(),
			late: RefCell::new(Some(late.clone())),
		}));

		list.dispatch(|l| l.ping());
		assert_eq!(late.0.get(), 0);
		assert_eq!(list.len(), 2);

		list.dispatch(|l| l.ping());
		assert_eq!(late.0.get(), 1);
	}
}
