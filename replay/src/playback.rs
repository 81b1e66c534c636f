//! The playback orchestrator: bootstrap the player from a metadata snapshot,
//! then follow the live feed until it ends or the session is torn down.

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
	signal, ChunkSource, Disposers, Lock, MediaPlayer, PlayerEvents, Result, Session, SignalConsumer, SignalProducer,
	Timestamp,
};

/// Owns a media-chunk player for the lifetime of one [Session].
///
/// Construction spawns the bootstrap-then-follow loop; [Self::stop] (or drop)
/// cancels it cooperatively. Transport commands are safe in any state,
/// including before bootstrapping completes.
pub struct Playback<P: MediaPlayer> {
	player: Lock<P>,
	events: PlayerEvents,
	cancel: CancellationToken,
	notify: SignalProducer,
	disposers: Disposers,
	done: watch::Receiver<bool>,
}

impl<P: MediaPlayer> Playback<P> {
	pub fn start<S: ChunkSource>(player: P, source: S, session: Session) -> Self {
		let events = player.events();
		let player = Lock::new(player);
		let cancel = CancellationToken::new();
		let (notify, updates) = signal::channel();
		let mut disposers = Disposers::new();

		// Drain the availability feed into the coalescing slot. The feed
		// applies no backpressure; the slot is what keeps us from building a
		// backlog behind a slow fetch.
		if session.online {
			let mut feed = source.subscribe(&session);
			let producer = notify.clone();
			let forwarder = tokio::spawn(async move {
				while feed.recv().await.is_some() {
					producer.notify();
				}
			});
			disposers.add("chunk availability", move || forwarder.abort());
		}

		let (finished, done) = watch::channel(false);
		let run = Self::run(player.clone(), source, session, updates, cancel.clone());
		tokio::spawn(async move {
			if let Err(err) = run.await {
				tracing::warn!(%err, %session, "playback loop failed");
			}

			finished.send_modify(|done| *done = true);
		});

		Self {
			player,
			events,
			cancel,
			notify,
			disposers,
			done,
		}
	}

	// The cancellation token is checked immediately after every suspension
	// point: a torn-down session must not touch the player again, even if a
	// stale fetch resolves much later.
	async fn run<S: ChunkSource>(
		player: Lock<P>,
		source: S,
		session: Session,
		mut updates: SignalConsumer,
		cancel: CancellationToken,
	) -> Result<()> {
		let chunks = source.fetch(&session).await?;
		if cancel.is_cancelled() {
			return Ok(());
		}

		let mut loaded;
		{
			let mut player = player.lock().await;
			player.add_chunks(chunks);
			loaded = player.count_chunks();

			// A live viewer starts at the live edge; a replay starts at the top.
			let target = if session.online {
				player.valid_end()
			} else {
				player.valid_start()
			};
			player.seek(target).await?;
		}
		if cancel.is_cancelled() {
			return Ok(());
		}

		player.lock().await.play().await?;
		if cancel.is_cancelled() {
			return Ok(());
		}

		if !session.online {
			tracing::debug!(%session, "recording finished; nothing to follow");
			return Ok(());
		}

		tracing::debug!(%session, "following the live edge");

		loop {
			if updates.recv().await.is_none() {
				return Ok(());
			}
			if cancel.is_cancelled() {
				return Ok(());
			}

			let chunks = source.fetch(&session).await?;
			if cancel.is_cancelled() {
				return Ok(());
			}

			let mut player = player.lock().await;
			player.add_chunks(chunks);

			let prev = loaded;
			loaded = player.count_chunks();

			// Only the very first merge moves the playhead: a viewer who
			// joined an empty feed is caught up to the live edge. After that
			// they may be watching history and are left alone.
			if prev == 0 && loaded > 0 {
				let live_edge = player.valid_end();
				player.seek(live_edge).await?;
			}
		}
	}

	/// Observable player state; getters for the view layer's atoms.
	pub fn events(&self) -> PlayerEvents {
		self.events.clone()
	}

	pub async fn play(&self) -> Result<()> {
		self.player.lock().await.play().await
	}

	pub async fn pause(&self) -> Result<()> {
		self.player.lock().await.pause().await
	}

	/// Absolute seek, clamped into the recorded range.
	pub async fn seek(&self, time: Timestamp) -> Result<()> {
		let mut player = self.player.lock().await;
		let time = time.min(player.duration());
		player.seek(time).await
	}

	/// Seek to a fraction of the total duration.
	pub async fn set_percent(&self, percent: f64) -> Result<()> {
		let mut player = self.player.lock().await;
		let duration = player.duration();
		let time = Timestamp::from_seconds_f64(percent.clamp(0.0, 1.0) * duration.as_seconds_f64());
		player.seek(time).await
	}

	/// Resolves once the loop has settled, whether it ran to completion,
	/// failed, or was torn down.
	pub async fn finished(&self) {
		let mut done = self.done.clone();
		done.wait_for(|done| *done).await.ok();
	}

	/// Tear down: arm the cancellation guard, close the channel so a blocked
	/// read resolves, release the subscriptions. Idempotent.
	pub fn stop(&mut self) {
		self.cancel.cancel();
		self.notify.close();
		self.disposers.clear();
	}
}

impl<P: MediaPlayer> Drop for Playback<P> {
	fn drop(&mut self) {
		self.stop();
	}
}
