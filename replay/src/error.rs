use std::sync::Arc;

/// A list of possible errors from the playback core.
///
/// Cancellation is deliberately absent: a torn-down loop exits cleanly.
#[derive(Debug, thiserror::Error, Clone)]
pub enum Error {
	/// The chunk-metadata fetch failed. Recovery policy belongs to the integrating layer.
	#[error("fetch error: {0}")]
	Fetch(Arc<dyn std::error::Error + Send + Sync>),

	/// The media-chunk player rejected an operation.
	#[error("player error: {0}")]
	Player(Arc<dyn std::error::Error + Send + Sync>),
}

// Wrap in an Arc so the enum stays Clone.
impl Error {
	pub fn fetch<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
		Self::Fetch(Arc::new(err))
	}

	pub fn player<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
		Self::Player(Arc::new(err))
	}
}

pub type Result<T> = std::result::Result<T, Error>;
