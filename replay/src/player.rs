use std::future::Future;

use tokio::sync::watch;

use crate::{Chunk, Result, Timeline, Timestamp};

/// The observable slice of player state, one channel per quantity.
///
/// Receivers are cheap to clone; `borrow()` is non-blocking, so these double
/// as the getters behind the view layer's atoms.
#[derive(Clone)]
pub struct PlayerEvents {
	pub duration: watch::Receiver<Timestamp>,
	pub part_start_time: watch::Receiver<Timestamp>,
	pub is_playing: watch::Receiver<bool>,
}

/// The media-chunk player the orchestrator drives.
///
/// Implementations own the accumulated chunk metadata and the transport
/// state. The decode/render surface behind `seek`/`play`/`pause` is theirs;
/// this crate only requires that those calls complete once applied.
pub trait MediaPlayer: Send + 'static {
	/// Merge a metadata snapshot. Known sequences are ignored.
	fn add_chunks(&mut self, chunks: Vec<Chunk>);

	fn count_chunks(&self) -> usize;

	fn duration(&self) -> Timestamp;

	/// Start of the currently loaded contiguous segment.
	fn part_start_time(&self) -> Timestamp;

	fn is_playing(&self) -> bool;

	/// The earliest valid seek target.
	fn valid_start(&self) -> Timestamp;

	/// The latest valid seek target given current buffering (the live edge).
	fn valid_end(&self) -> Timestamp;

	/// Completes once the seek has been applied.
	fn seek(&mut self, time: Timestamp) -> impl Future<Output = Result<()>> + Send;

	fn play(&mut self) -> impl Future<Output = Result<()>> + Send;

	fn pause(&mut self) -> impl Future<Output = Result<()>> + Send;

	fn events(&self) -> PlayerEvents;
}

/// A metadata-level [MediaPlayer]: tracks the timeline and transport state
/// and reports changes, leaving decode entirely to the rendering surface.
pub struct TimelinePlayer {
	timeline: Timeline,
	duration: watch::Sender<Timestamp>,
	part_start_time: watch::Sender<Timestamp>,
	is_playing: watch::Sender<bool>,
}

impl TimelinePlayer {
	pub fn new() -> Self {
		Self {
			timeline: Timeline::new(),
			duration: watch::channel(Timestamp::ZERO).0,
			part_start_time: watch::channel(Timestamp::ZERO).0,
			is_playing: watch::channel(false).0,
		}
	}
}

impl Default for TimelinePlayer {
	fn default() -> Self {
		Self::new()
	}
}

impl MediaPlayer for TimelinePlayer {
	fn add_chunks(&mut self, chunks: Vec<Chunk>) {
		if self.timeline.merge(chunks) == 0 {
			return;
		}

		let duration = self.timeline.duration();
		self.duration.send_if_modified(|current| {
			if *current == duration {
				return false;
			}

			*current = duration;
			true
		});
	}

	fn count_chunks(&self) -> usize {
		self.timeline.count()
	}

	fn duration(&self) -> Timestamp {
		*self.duration.borrow()
	}

	fn part_start_time(&self) -> Timestamp {
		*self.part_start_time.borrow()
	}

	fn is_playing(&self) -> bool {
		*self.is_playing.borrow()
	}

	fn valid_start(&self) -> Timestamp {
		self.timeline.valid_start()
	}

	fn valid_end(&self) -> Timestamp {
		self.timeline.valid_end()
	}

	async fn seek(&mut self, time: Timestamp) -> Result<()> {
		// Loading a segment at the target makes it the new partial start.
		let time = time.min(self.timeline.duration());
		self.part_start_time.send_if_modified(|current| {
			if *current == time {
				return false;
			}

			*current = time;
			true
		});

		Ok(())
	}

	async fn play(&mut self) -> Result<()> {
		self.is_playing.send_if_modified(|playing| {
			if *playing {
				return false;
			}

			*playing = true;
			true
		});

		Ok(())
	}

	async fn pause(&mut self) -> Result<()> {
		self.is_playing.send_if_modified(|playing| {
			if !*playing {
				return false;
			}

			*playing = false;
			true
		});

		Ok(())
	}

	fn events(&self) -> PlayerEvents {
		PlayerEvents {
			duration: self.duration.subscribe(),
			part_start_time: self.part_start_time.subscribe(),
			is_playing: self.is_playing.subscribe(),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn chunk(sequence: u64, start: u64, duration: u64) -> Chunk {
		Chunk::new(
			sequence,
			Timestamp::from_seconds(start),
			Timestamp::from_seconds(duration),
		)
	}

	#[tokio::test]
	async fn duration_events() {
		let mut player = TimelinePlayer::new();
		let mut events = player.events();

		player.add_chunks(vec![chunk(0, 0, 10)]);
		assert!(events.duration.has_changed().unwrap());
		assert_eq!(*events.duration.borrow_and_update(), Timestamp::from_seconds(10));

		// A duplicate snapshot adds nothing and stays silent.
		player.add_chunks(vec![chunk(0, 0, 10)]);
		assert!(!events.duration.has_changed().unwrap());
	}

	#[tokio::test]
	async fn seek_clamps() {
		let mut player = TimelinePlayer::new();
		player.add_chunks(vec![chunk(0, 0, 10)]);

		player.seek(Timestamp::from_seconds(25)).await.unwrap();
		assert_eq!(player.part_start_time(), Timestamp::from_seconds(10));

		player.seek(Timestamp::from_seconds(4)).await.unwrap();
		assert_eq!(player.part_start_time(), Timestamp::from_seconds(4));
	}

	#[tokio::test]
	async fn transport() {
		let mut player = TimelinePlayer::new();
		let mut events = player.events();

		assert!(!player.is_playing());
		player.play().await.unwrap();
		assert!(player.is_playing());
		assert!(events.is_playing.has_changed().unwrap());
		events.is_playing.borrow_and_update();

		// Idempotent: playing again reports nothing.
		player.play().await.unwrap();
		assert!(!events.is_playing.has_changed().unwrap());

		player.pause().await.unwrap();
		assert!(!player.is_playing());
	}
}
