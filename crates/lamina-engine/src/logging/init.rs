use std::sync::Once;

static INSTALL: Once = Once::new();

/// How the process-wide logger gets set up.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Filter directives in `env_logger` syntax, e.g.
    /// `"info,wgpu_core=warn"`. `None` defers to `RUST_LOG`, then to the
    /// built-in default.
    pub env_filter: Option<String>,

    /// ANSI color behavior for the log writer.
    pub write_style: env_logger::WriteStyle,
}

/// Installs the global logger. The first call wins; repeats are no-ops, so
/// libraries and tests may call this freely.
///
/// Filter precedence: explicit `env_filter`, then `RUST_LOG`, then a
/// default of info with the wgpu internals capped at warn.
pub fn init_logging(config: LoggingConfig) {
    INSTALL.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.write_style(config.write_style);

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(directives) => {
                builder.parse_filters(&directives);
            }
            None => {
                builder
                    .filter_level(log::LevelFilter::Info)
                    .filter_module("wgpu_core", log::LevelFilter::Warn)
                    .filter_module("wgpu_hal", log::LevelFilter::Warn)
                    .filter_module("naga", log::LevelFilter::Warn);
            }
        }

        builder.init();
        log::debug!("logger installed");
    });
}
