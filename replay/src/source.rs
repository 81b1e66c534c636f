use std::future::Future;

use tokio::sync::mpsc;

use crate::{Chunk, Result, Session};

/// Where chunk metadata comes from.
///
/// `fetch` returns a snapshot of everything recorded so far; it is idempotent
/// and safe to call while new chunks are still arriving. `subscribe` yields a
/// discrete event per finished chunk while the session is live, with no
/// backpressure of its own (the orchestrator coalesces). Dropping the
/// receiver unsubscribes.
pub trait ChunkSource: Send + Sync + 'static {
	fn fetch(&self, session: &Session) -> impl Future<Output = Result<Vec<Chunk>>> + Send;

	fn subscribe(&self, session: &Session) -> mpsc::UnboundedReceiver<()>;
}
