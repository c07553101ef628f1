use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// stdout carries command output, so logs go to stderr.
pub fn init_logging(verbose: bool) {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let default_filter = if verbose {
        "warn,kemblog_cli=debug,kemblog_client=debug"
    } else {
        "warn,kemblog_cli=info,kemblog_client=info"
    };
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    tracing::debug!("Logging initialized");
}
