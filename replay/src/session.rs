use std::fmt;

/// Identity of one playback session.
///
/// A player and its orchestrator are constructed per tuple and never reused:
/// a changed room, live ID, or online flag always gets a fresh pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Session {
	pub room: u64,
	pub live: u64,

	/// Whether the recording is still in progress.
	pub online: bool,
}

impl fmt::Display for Session {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}/{} ({})",
			self.room,
			self.live,
			if self.online { "online" } else { "offline" }
		)
	}
}
