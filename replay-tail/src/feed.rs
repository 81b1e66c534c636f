use std::sync::{Arc, Mutex};
use std::time::Duration;

use replay::{Chunk, ChunkSource, Result, Session, Timestamp};
use tokio::sync::mpsc;

/// A recorder stand-in: chunk metadata appears on a wall-clock timer and
/// subscribers hear about each finished chunk.
#[derive(Clone, Default)]
pub struct Feed {
	state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
	chunks: Vec<Chunk>,
	subscribers: Vec<mpsc::UnboundedSender<()>>,
	finished: bool,
}

impl Feed {
	/// Start recording: `count` chunks of `chunk_seconds` media each, one
	/// finishing every `interval` of wall clock.
	pub fn record(count: u64, chunk_seconds: u64, interval: Duration) -> Self {
		let feed = Self::default();

		tokio::spawn({
			let feed = feed.clone();
			async move {
				for sequence in 0..count {
					tokio::time::sleep(interval).await;

					feed.push(Chunk::new(
						sequence,
						Timestamp::from_seconds(sequence * chunk_seconds),
						Timestamp::from_seconds(chunk_seconds),
					));
					tracing::info!(sequence, "chunk finished downloading");
				}

				feed.finish();
				tracing::info!("recording finished");
			}
		});

		feed
	}

	/// A recording that already finished; nothing further will arrive.
	pub fn recorded(count: u64, chunk_seconds: u64) -> Self {
		let feed = Self::default();

		{
			let mut state = feed.state.lock().unwrap();
			for sequence in 0..count {
				state.chunks.push(Chunk::new(
					sequence,
					Timestamp::from_seconds(sequence * chunk_seconds),
					Timestamp::from_seconds(chunk_seconds),
				));
			}
			state.finished = true;
		}

		feed
	}

	pub fn is_finished(&self) -> bool {
		self.state.lock().unwrap().finished
	}

	fn push(&self, chunk: Chunk) {
		let mut state = self.state.lock().unwrap();
		state.chunks.push(chunk);
		state.subscribers.retain(|subscriber| subscriber.send(()).is_ok());
	}

	fn finish(&self) {
		let mut state = self.state.lock().unwrap();
		state.finished = true;

		// Hang up on subscribers; the feed will never signal again.
		state.subscribers.clear();
	}
}

impl ChunkSource for Feed {
	async fn fetch(&self, _session: &Session) -> Result<Vec<Chunk>> {
		Ok(self.state.lock().unwrap().chunks.clone())
	}

	fn subscribe(&self, _session: &Session) -> mpsc::UnboundedReceiver<()> {
		let (tx, rx) = mpsc::unbounded_channel();
		self.state.lock().unwrap().subscribers.push(tx);
		rx
	}
}
