// crates.io
use tracing_subscriber::{
	EnvFilter, fmt,
	layer::SubscriberExt,
	util::{SubscriberInitExt, TryInitError},
};

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. With `json` set, events are emitted as one JSON
/// object per line.
pub fn init_tracing(level: &str, json: bool) -> Result<(), TryInitError> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	let registry = tracing_subscriber::registry().with(filter);

	if json {
		registry.with(fmt::layer().json().with_target(true).with_thread_ids(false)).try_init()
	} else {
		registry.with(fmt::layer().with_target(false).with_thread_ids(false)).try_init()
	}
}
