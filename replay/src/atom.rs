//! A push-to-pull bridge for one observed quantity.
//!
//! The player pushes "this changed" events; the view layer pulls values on
//! demand. An [Atom] decouples the two cadences: [Atom::update] marks the
//! cached value stale and wakes subscribers, [Atom::read] recomputes through
//! the stored getter only when stale. Any number of updates between two reads
//! cost a single recomputation, and a read with no intervening update never
//! recomputes.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

pub struct Atom<T> {
	name: &'static str,
	getter: Arc<dyn Fn() -> T + Send + Sync>,

	// None means stale: the next read goes through the getter.
	cached: Arc<Mutex<Option<T>>>,

	// Invalidation counter for push-side subscribers.
	version: watch::Sender<u64>,
}

impl<T: Clone> Atom<T> {
	pub fn new<F: Fn() -> T + Send + Sync + 'static>(name: &'static str, getter: F) -> Self {
		Self {
			name,
			getter: Arc::new(getter),
			cached: Default::default(),
			version: watch::channel(0).0,
		}
	}

	/// Mark the value stale and wake subscribers.
	pub fn update(&self) {
		self.cached.lock().unwrap().take();
		self.version.send_modify(|version| *version += 1);
	}

	/// The current value, recomputed only if an update landed since the last read.
	pub fn read(&self) -> T {
		let mut cached = self.cached.lock().unwrap();

		match &*cached {
			Some(value) => value.clone(),
			None => {
				let value = (self.getter)();
				tracing::trace!(name = self.name, "recomputed");
				*cached = Some(value.clone());
				value
			}
		}
	}

	/// The push side: the receiver resolves whenever [Self::update] lands.
	pub fn subscribe(&self) -> watch::Receiver<u64> {
		self.version.subscribe()
	}
}

impl<T> Clone for Atom<T> {
	fn clone(&self) -> Self {
		Self {
			name: self.name,
			getter: self.getter.clone(),
			cached: self.cached.clone(),
			version: self.version.clone(),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	use std::sync::atomic::{AtomicUsize, Ordering};

	fn counted() -> (Atom<usize>, Arc<AtomicUsize>) {
		let computed = Arc::new(AtomicUsize::new(0));
		let atom = Atom::new("counted", {
			let computed = computed.clone();
			move || computed.fetch_add(1, Ordering::Relaxed)
		});
		(atom, computed)
	}

	#[test]
	fn updates_collapse() {
		let (atom, computed) = counted();

		atom.update();
		atom.update();
		atom.update();

		// Three invalidations, one recomputation.
		atom.read();
		assert_eq!(computed.load(Ordering::Relaxed), 1);

		// No update since the last read: the cache answers.
		atom.read();
		assert_eq!(computed.load(Ordering::Relaxed), 1);

		atom.update();
		atom.read();
		assert_eq!(computed.load(Ordering::Relaxed), 2);
	}

	#[tokio::test]
	async fn subscribers_wake() {
		let (atom, _computed) = counted();
		let mut version = atom.subscribe();

		atom.update();
		assert!(version.changed().await.is_ok());

		// Updates while nobody awaits coalesce into one wake.
		atom.update();
		atom.update();
		assert!(version.changed().await.is_ok());
	}
}
