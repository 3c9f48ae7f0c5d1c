use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Lets the level be raised once the config file has been read.
pub struct LogHandle {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogHandle {
    pub fn enable_debug(&self) {
        if let Err(e) = self.handle.reload(env_filter(true)) {
            tracing::warn!("Failed to raise log level: {}", e);
        }
    }
}

/// Console logging on stderr so stdout only carries prompts and the report.
/// `RUST_LOG` overrides the level picked here.
pub fn init_logging(debug: bool) -> LogHandle {
    let (filter, handle) = reload::Layer::new(env_filter(debug));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    LogHandle { handle }
}

fn env_filter(debug: bool) -> EnvFilter {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}
