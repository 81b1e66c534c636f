//! The state surface a rendering layer observes and drives.
//!
//! [Transport] composes the player's bridged state (duration, loaded-segment
//! start, play state) with the rendering surface's sub-segment offset into a
//! viewer-facing playhead, and forwards clamped commands to the orchestrator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{Atom, Disposers, MediaPlayer, Playback, Result, Timestamp};

pub struct Transport<P: MediaPlayer> {
	playback: Playback<P>,

	duration: Atom<Timestamp>,
	part_start_time: Atom<Timestamp>,
	is_playing: Atom<bool>,

	// The rendering surface's playback offset within the active segment,
	// attached once the surface exists.
	surface: Mutex<Option<watch::Receiver<f64>>>,

	// UI affordance only; no effect on playback.
	hovering: AtomicBool,

	disposers: Disposers,
}

// Invalidate the atom whenever the player reports a change.
fn invalidate<T: Clone + Send + Sync + 'static>(
	atom: &Atom<T>,
	mut events: watch::Receiver<T>,
) -> JoinHandle<()> {
	let atom = atom.clone();
	tokio::spawn(async move {
		while events.changed().await.is_ok() {
			atom.update();
		}
	})
}

impl<P: MediaPlayer> Transport<P> {
	pub fn new(playback: Playback<P>) -> Self {
		let events = playback.events();

		let duration = Atom::new("duration", {
			let duration = events.duration.clone();
			move || *duration.borrow()
		});

		let part_start_time = Atom::new("partial start time", {
			let part_start_time = events.part_start_time.clone();
			move || *part_start_time.borrow()
		});

		let is_playing = Atom::new("is playing", {
			let is_playing = events.is_playing.clone();
			move || *is_playing.borrow()
		});

		let mut disposers = Disposers::new();

		let sync = invalidate(&duration, events.duration);
		disposers.add("sync duration", move || sync.abort());

		let sync = invalidate(&part_start_time, events.part_start_time);
		disposers.add("sync partial start time", move || sync.abort());

		let sync = invalidate(&is_playing, events.is_playing);
		disposers.add("sync playing", move || sync.abort());

		Self {
			playback,
			duration,
			part_start_time,
			is_playing,
			surface: Mutex::new(None),
			hovering: AtomicBool::new(false),
			disposers,
		}
	}

	/// Attach the rendering surface's position feed. Reading the playhead
	/// before this is a programming error.
	pub fn attach_surface(&self, position: watch::Receiver<f64>) {
		*self.surface.lock().unwrap() = Some(position);
	}

	fn surface_time(&self) -> f64 {
		match self.surface.lock().unwrap().as_ref() {
			Some(position) => *position.borrow(),
			None => panic!("surface is not attached"),
		}
	}

	/// The viewer's playhead: loaded-segment start plus the surface offset.
	pub fn current_time(&self) -> Timestamp {
		self.part_start_time.read() + Timestamp::from_seconds_f64(self.surface_time())
	}

	pub fn duration(&self) -> Timestamp {
		self.duration.read()
	}

	/// Time left until the end of the recording.
	pub fn remaining(&self) -> Timestamp {
		self.duration().saturating_sub(self.current_time())
	}

	pub fn is_playing(&self) -> bool {
		self.is_playing.read()
	}

	pub fn set_hovering(&self, hovering: bool) {
		self.hovering.store(hovering, Ordering::Relaxed);
	}

	pub fn is_hovering(&self) -> bool {
		self.hovering.load(Ordering::Relaxed)
	}

	/// Resolves when any bridged quantity invalidates.
	pub async fn updated(&self) {
		let mut duration = self.duration.subscribe();
		let mut part_start_time = self.part_start_time.subscribe();
		let mut is_playing = self.is_playing.subscribe();

		tokio::select! {
			_ = duration.changed() => {}
			_ = part_start_time.changed() => {}
			_ = is_playing.changed() => {}
		}
	}

	pub async fn play(&self) -> Result<()> {
		self.playback.play().await
	}

	pub async fn pause(&self) -> Result<()> {
		self.playback.pause().await
	}

	/// Absolute seek in seconds, clamped into [0, duration].
	pub async fn set_current_time(&self, seconds: f64) -> Result<()> {
		let duration = self.duration.read();
		let time = Timestamp::from_seconds_f64(seconds.clamp(0.0, duration.as_seconds_f64()));
		self.playback.seek(time).await
	}

	/// Relative seek: equivalent to `set_current_time(current_time + delta)`
	/// for any delta, including ones that overshoot the recording.
	pub async fn offset_current_time(&self, delta: f64) -> Result<()> {
		self.set_current_time(self.current_time().as_seconds_f64() + delta).await
	}

	/// Seek to a fraction of the total duration.
	pub async fn set_percent(&self, percent: f64) -> Result<()> {
		self.set_current_time(percent * self.duration.read().as_seconds_f64()).await
	}

	/// Release the event subscriptions and tear down the orchestrator.
	pub fn stop(&mut self) {
		self.disposers.clear();
		self.playback.stop();
	}
}

#[cfg(test)]
mod test {
	use super::*;

	use std::sync::Arc;
	use std::time::Duration;

	use tokio::sync::mpsc;

	use crate::{Chunk, ChunkSource, Session, TimelinePlayer};

	#[derive(Clone)]
	struct FixedSource {
		chunks: Arc<Vec<Chunk>>,
	}

	impl ChunkSource for FixedSource {
		async fn fetch(&self, _session: &Session) -> crate::Result<Vec<Chunk>> {
			Ok(self.chunks.to_vec())
		}

		fn subscribe(&self, _session: &Session) -> mpsc::UnboundedReceiver<()> {
			mpsc::unbounded_channel().1
		}
	}

	async fn settle() {
		tokio::time::sleep(Duration::from_millis(1)).await;
	}

	// A bootstrapped one-minute replay.
	async fn transport() -> Transport<TimelinePlayer> {
		let source = FixedSource {
			chunks: Arc::new(vec![Chunk::new(
				0,
				Timestamp::ZERO,
				Timestamp::from_seconds(60),
			)]),
		};

		let session = Session {
			room: 1,
			live: 1,
			online: false,
		};

		let transport = Transport::new(Playback::start(TimelinePlayer::new(), source, session));
		settle().await;
		transport
	}

	#[tokio::test(start_paused = true)]
	async fn playhead_tracks_surface() {
		let transport = transport().await;
		assert_eq!(transport.duration(), Timestamp::from_seconds(60));

		let (surface, position) = watch::channel(0.0);
		transport.attach_surface(position);

		surface.send(12.5).unwrap();
		assert_eq!(transport.current_time(), Timestamp::from_millis(12_500));

		transport.set_current_time(30.0).await.unwrap();
		settle().await;
		assert_eq!(transport.current_time(), Timestamp::from_millis(42_500));
		assert_eq!(transport.remaining(), Timestamp::from_millis(17_500));
	}

	#[tokio::test(start_paused = true)]
	async fn seeks_clamp() {
		let transport = transport().await;
		let (_surface, position) = watch::channel(0.0);
		transport.attach_surface(position);

		transport.set_current_time(1000.0).await.unwrap();
		settle().await;
		assert_eq!(transport.current_time(), Timestamp::from_seconds(60));

		transport.set_current_time(-5.0).await.unwrap();
		settle().await;
		assert_eq!(transport.current_time(), Timestamp::ZERO);
	}

	#[tokio::test(start_paused = true)]
	async fn offsets_are_relative_seeks() {
		let transport = transport().await;
		let (_surface, position) = watch::channel(0.0);
		transport.attach_surface(position);

		transport.set_current_time(30.0).await.unwrap();
		settle().await;

		transport.offset_current_time(15.0).await.unwrap();
		settle().await;
		assert_eq!(transport.current_time(), Timestamp::from_seconds(45));

		// Overshooting clamps, exactly like the absolute form.
		transport.offset_current_time(1000.0).await.unwrap();
		settle().await;
		assert_eq!(transport.current_time(), Timestamp::from_seconds(60));

		transport.offset_current_time(-1000.0).await.unwrap();
		settle().await;
		assert_eq!(transport.current_time(), Timestamp::ZERO);
	}

	#[tokio::test(start_paused = true)]
	async fn percent_maps_to_duration() {
		let transport = transport().await;
		let (_surface, position) = watch::channel(0.0);
		transport.attach_surface(position);

		transport.set_percent(0.5).await.unwrap();
		settle().await;
		assert_eq!(transport.current_time(), Timestamp::from_seconds(30));

		transport.set_percent(7.0).await.unwrap();
		settle().await;
		assert_eq!(transport.current_time(), Timestamp::from_seconds(60));
	}

	#[tokio::test(start_paused = true)]
	#[should_panic(expected = "surface is not attached")]
	async fn surface_required() {
		let transport = transport().await;
		transport.current_time();
	}

	#[tokio::test(start_paused = true)]
	async fn observers_wake() {
		use std::pin::pin;

		let transport = transport().await;

		let mut updated = pin!(transport.updated());
		assert!(futures::poll!(updated.as_mut()).is_pending());

		transport.pause().await.unwrap();
		settle().await;
		assert!(futures::poll!(updated.as_mut()).is_ready());
	}

	#[tokio::test(start_paused = true)]
	async fn hovering() {
		let transport = transport().await;

		assert!(!transport.is_hovering());
		transport.set_hovering(true);
		assert!(transport.is_hovering());
	}
}
