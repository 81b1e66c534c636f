//! A single-slot coalescing notification channel, split into a [SignalProducer] and [SignalConsumer] handle.
//!
//! A [SignalProducer] flags that something new is available; any number of
//! writes between two reads collapse into one pending notification, so a
//! bursty producer can never build a backlog behind a slow consumer.
//!
//! A [SignalConsumer] is the single reader. [SignalConsumer::recv] drains the
//! pending slot or suspends until the next write, and returns `None` once the
//! channel is closed. Closing is terminal and wins over a pending write.

use tokio::sync::watch;

#[derive(Default)]
struct State {
	pending: bool,
	closed: bool,
}

/// Create the channel: any number of producers, exactly one consumer.
pub fn channel() -> (SignalProducer, SignalConsumer) {
	let (state, _) = watch::channel(State::default());

	(
		SignalProducer {
			state: state.clone(),
		},
		SignalConsumer { state },
	)
}

#[derive(Clone)]
pub struct SignalProducer {
	state: watch::Sender<State>,
}

impl SignalProducer {
	/// Non-blocking write: wake a blocked reader, or leave one pending
	/// notification behind. Writing while already pending is a no-op, as is
	/// writing after close.
	pub fn notify(&self) {
		self.state.send_if_modified(|state| {
			if state.closed || state.pending {
				return false;
			}

			state.pending = true;
			true
		});
	}

	/// Terminal transition: a blocked reader resolves to "done" and every
	/// future read returns "done" immediately, pending write or not.
	pub fn close(&self) {
		self.state.send_if_modified(|state| {
			if state.closed {
				return false;
			}

			state.closed = true;
			true
		});
	}
}

// Not Clone: the channel is a single-consumer primitive.
pub struct SignalConsumer {
	state: watch::Sender<State>,
}

impl SignalConsumer {
	/// Wait for the next notification.
	///
	/// `Some(())` consumes the pending slot; `None` means the channel is
	/// closed and will never signal again.
	pub async fn recv(&mut self) -> Option<()> {
		// Subscribe before inspecting the state so a write that lands between
		// the check and the await still wakes us.
		let mut changed = self.state.subscribe();

		loop {
			let mut slot = None;

			// Consume without notifying: there is no other reader to wake.
			self.state.send_if_modified(|state| {
				if state.closed {
					slot = Some(None);
				} else if state.pending {
					state.pending = false;
					slot = Some(Some(()));
				}

				false
			});

			if let Some(result) = slot {
				return result;
			}

			if changed.changed().await.is_err() {
				return None;
			}
		}
	}
}

#[cfg(test)]
use futures::FutureExt;

#[cfg(test)]
impl SignalConsumer {
	pub fn assert_available(&mut self) {
		assert_eq!(
			self.recv().now_or_never(),
			Some(Some(())),
			"should be available"
		);
	}

	pub fn assert_blocked(&mut self) {
		assert!(self.recv().now_or_never().is_none(), "should have blocked");
	}

	pub fn assert_done(&mut self) {
		assert_eq!(self.recv().now_or_never(), Some(None), "should be done");
	}
}

#[cfg(test)]
mod test {
	use super::*;

	use std::pin::pin;
	use std::task::Poll;

	#[tokio::test]
	async fn coalesce() {
		let (producer, mut consumer) = channel();
		consumer.assert_blocked();

		// Any number of writes between two reads is one notification.
		producer.notify();
		producer.notify();
		producer.notify();

		consumer.assert_available();
		consumer.assert_blocked();
	}

	#[tokio::test]
	async fn write_wakes_reader() {
		let (producer, mut consumer) = channel();

		let mut recv = pin!(consumer.recv());
		assert!(futures::poll!(recv.as_mut()).is_pending());

		producer.notify();
		assert_eq!(futures::poll!(recv.as_mut()), Poll::Ready(Some(())));
	}

	#[tokio::test]
	async fn close_wakes_reader() {
		let (producer, mut consumer) = channel();

		let mut recv = pin!(consumer.recv());
		assert!(futures::poll!(recv.as_mut()).is_pending());

		producer.close();
		assert_eq!(futures::poll!(recv.as_mut()), Poll::Ready(None));
	}

	#[tokio::test]
	async fn close_is_terminal() {
		let (producer, mut consumer) = channel();

		producer.close();
		consumer.assert_done();
		consumer.assert_done();

		// Writes after close have no effect.
		producer.notify();
		consumer.assert_done();
	}

	#[tokio::test]
	async fn close_wins_over_pending() {
		let (producer, mut consumer) = channel();

		producer.notify();
		producer.close();

		consumer.assert_done();
	}

	#[tokio::test]
	async fn producers_clone() {
		let (producer, mut consumer) = channel();

		// Concurrent writers are safe; they only ever set the same flag.
		producer.clone().notify();
		producer.notify();

		consumer.assert_available();
		consumer.assert_blocked();
	}
}
