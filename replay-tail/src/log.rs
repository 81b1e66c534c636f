use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, clap::Parser)]
pub struct Log {
	/// The level filter to use.
	#[arg(id = "log-level", long = "log-level", default_value = "info")]
	pub level: Level,
}

impl Log {
	pub fn init(&self) {
		let filter = EnvFilter::builder()
			.with_default_directive(LevelFilter::from_level(self.level).into()) // Default to our --log-level arg
			.from_env_lossy(); // Allow overriding with RUST_LOG

		let logger = tracing_subscriber::FmtSubscriber::builder()
			.with_writer(std::io::stderr)
			.with_env_filter(filter)
			.finish();

		tracing::subscriber::set_global_default(logger).unwrap();
	}
}
