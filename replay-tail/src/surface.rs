use std::time::Duration;

use replay::PlayerEvents;
use tokio::sync::watch;

/// A stand-in for the decode surface: reports seconds of playback within the
/// loaded segment, advancing while the player plays and restarting from zero
/// whenever a seek loads a fresh segment.
pub fn run(mut events: PlayerEvents) -> watch::Receiver<f64> {
	let (position, offset) = watch::channel(0.0);

	tokio::spawn(async move {
		let mut tick = tokio::time::interval(Duration::from_millis(100));

		loop {
			tokio::select! {
				_ = tick.tick() => {
					if *events.is_playing.borrow() {
						position.send_modify(|offset| *offset += 0.1);
					}
				}
				changed = events.part_start_time.changed() => {
					if changed.is_err() {
						return;
					}

					position.send_modify(|offset| *offset = 0.0);
				}
			}
		}
	});

	offset
}
