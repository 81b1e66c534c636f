/// A named collection of cleanup callbacks with exactly-once release.
///
/// Entries run in registration order on the first [Self::clear]; the registry
/// is empty afterwards, so a second call (including the one from [Drop]) does
/// nothing. Names are labels for tracing, not keys: registering the same name
/// twice runs both callbacks.
#[derive(Default)]
pub struct Disposers {
	entries: Vec<(&'static str, Box<dyn FnOnce() + Send>)>,
}

impl Disposers {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add<F: FnOnce() + Send + 'static>(&mut self, name: &'static str, cleanup: F) {
		self.entries.push((name, Box::new(cleanup)));
	}

	/// Invoke every registered callback, then become inert.
	pub fn clear(&mut self) {
		for (name, cleanup) in self.entries.drain(..) {
			tracing::debug!(name, "disposing");
			cleanup();
		}
	}
}

impl Drop for Disposers {
	fn drop(&mut self) {
		self.clear();
	}
}

#[cfg(test)]
mod test {
	use super::*;

	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;

	#[test]
	fn clear_twice() {
		let fired = Arc::new(AtomicUsize::new(0));
		let mut disposers = Disposers::new();

		for name in ["one", "two", "three"] {
			let fired = fired.clone();
			disposers.add(name, move || {
				fired.fetch_add(1, Ordering::Relaxed);
			});
		}

		disposers.clear();
		assert_eq!(fired.load(Ordering::Relaxed), 3);

		// The second clear is a no-op; nothing fires twice.
		disposers.clear();
		assert_eq!(fired.load(Ordering::Relaxed), 3);
	}

	#[test]
	fn ordered() {
		let order = Arc::new(std::sync::Mutex::new(Vec::new()));
		let mut disposers = Disposers::new();

		for name in ["first", "second"] {
			let order = order.clone();
			disposers.add(name, move || order.lock().unwrap().push(name));
		}

		disposers.clear();
		assert_eq!(*order.lock().unwrap(), ["first", "second"]);
	}

	#[test]
	fn drop_after_clear() {
		let fired = Arc::new(AtomicUsize::new(0));

		{
			let mut disposers = Disposers::new();
			let fired = fired.clone();
			disposers.add("entry", move || {
				fired.fetch_add(1, Ordering::Relaxed);
			});
			disposers.clear();
		}

		assert_eq!(fired.load(Ordering::Relaxed), 1);
	}
}
