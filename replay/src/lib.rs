//! Synchronization core for chunked live playback: keep a media-chunk player
//! fed from an incrementally growing recording, let the viewer scrub through
//! downloaded history, and expose transport state without polling.

mod atom;
mod chunk;
mod disposers;
mod error;
mod lock;
mod playback;
mod player;
mod session;
pub mod signal;
mod source;
mod timestamp;
mod transport;

pub use atom::*;
pub use chunk::*;
pub use disposers::*;
pub use error::*;
pub use lock::*;
pub use playback::*;
pub use player::*;
pub use session::*;
pub use signal::{SignalConsumer, SignalProducer};
pub use source::*;
pub use timestamp::*;
pub use transport::*;
