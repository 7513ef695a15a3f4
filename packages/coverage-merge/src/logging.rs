use tracing_subscriber::fmt::format::FmtSpan;

use crate::MergeLogOptions;

fn parse_level(level: Option<&str>) -> Option<tracing::Level> {
    match level {
        Some("error") => Some(tracing::Level::ERROR),
        Some("debug") => Some(tracing::Level::DEBUG),
        Some("info") => Some(tracing::Level::INFO),
        Some("warn") => Some(tracing::Level::WARN),
        Some("trace") => Some(tracing::Level::TRACE),
        _ => None,
    }
}

/// Installs a stderr subscriber at the configured level. An unset or
/// unrecognised level (e.g. `"off"`) leaves logging disabled. Safe to call
/// more than once; only the first subscriber is kept.
pub fn initialize_merge_log(log_options: &MergeLogOptions) {
    let Some(log_level) = parse_level(log_options.level.as_deref()) else {
        return;
    };

    let builder = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false);

    let builder = if log_options.enable_trace {
        builder.with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
    } else {
        builder
    };

    let _ = builder.with_ansi(false).try_init();
}
