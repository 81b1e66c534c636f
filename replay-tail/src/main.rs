use std::time::Duration;

use clap::Parser;
use replay::{MediaPlayer, Playback, Session, TimelinePlayer, Transport};

mod feed;
mod log;
mod surface;

#[derive(Parser, Clone)]
pub struct Config {
	/// How many chunks the recorder produces.
	#[arg(long, default_value = "8")]
	pub chunks: u64,

	/// Seconds of media per chunk.
	#[arg(long, default_value = "2")]
	pub chunk_seconds: u64,

	/// Wall-clock seconds between finished chunks.
	#[arg(long, default_value = "1")]
	pub interval: u64,

	/// Replay a finished recording instead of following the live edge.
	#[arg(long)]
	pub offline: bool,

	/// Jump this many seconds back into history once, partway through.
	#[arg(long)]
	pub rewind: Option<f64>,

	/// The log configuration.
	#[command(flatten)]
	pub log: log::Log,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let config = Config::parse();
	config.log.init();

	let session = Session {
		room: 1,
		live: 1,
		online: !config.offline,
	};

	let feed = if session.online {
		feed::Feed::record(
			config.chunks,
			config.chunk_seconds,
			Duration::from_secs(config.interval),
		)
	} else {
		feed::Feed::recorded(config.chunks, config.chunk_seconds)
	};

	tracing::info!(%session, "tailing");

	let player = TimelinePlayer::new();
	let events = player.events();

	let playback = Playback::start(player, feed.clone(), session);
	let mut transport = Transport::new(playback);
	transport.attach_surface(surface::run(events));

	let mut rewind = config.rewind;

	loop {
		tokio::select! {
			_ = transport.updated() => {}
			_ = tokio::time::sleep(Duration::from_secs(1)) => {}
		}

		let current = transport.current_time();
		let duration = transport.duration();
		let state = if transport.is_playing() { "playing" } else { "paused" };
		println!("{} / {} [{}]", current, duration, state);

		// One scripted scrub into history to show the transport at work.
		if let Some(seconds) = rewind {
			if current.as_seconds_f64() > seconds {
				tracing::info!(seconds, "rewinding");
				transport.offset_current_time(-seconds).await?;
				rewind = None;
			}
		}

		if feed.is_finished() && current >= duration {
			break;
		}
	}

	transport.pause().await?;
	transport.stop();
	tracing::info!("caught up; bye");

	Ok(())
}
