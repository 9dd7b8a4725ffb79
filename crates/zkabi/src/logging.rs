// Purpose: Tracing subscriber setup for hosts embedding circuit operations

use crate::config::CircuitConfig;
use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    EnvFilter, Registry,
};

/// Environment variable that overrides the configured log filter
pub const LOG_ENV_VAR: &str = "ZKABI_LOG";

/// Crates whose events a bare level applies to
pub const LOG_TARGETS: [&str; 3] = ["zkabi", "zkabi_schema", "zkabi_witness"];

/// Level for every target outside [`LOG_TARGETS`]
const OTHER_TARGETS_LEVEL: &str = "warn";

//-----------------------------------------------------------------------------
// Tracing Initialization
//-----------------------------------------------------------------------------

/// Expand a bare level such as "debug" into directives scoped to this
/// project's crates, leaving dependencies at `warn`. Anything that already
/// names a target or lists several directives passes through unchanged.
pub fn filter_directives(log_level: &str) -> String {
    let level = log_level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    let level = if level.is_empty() { "info" } else { level };
    let mut directives = OTHER_TARGETS_LEVEL.to_string();
    for target in LOG_TARGETS {
        directives.push_str(&format!(",{}={}", target, level));
    }
    directives
}

/// Installs the global tracing subscriber.
///
/// # Arguments
///
/// * `log_level`: Level or filter directives used when `ZKABI_LOG` is unset.
///                Defaults to "info". A bare level is scoped to the zkabi
///                crates by [`filter_directives`]; full directives such as
///                "zkabi_witness=trace,info" are used as given.
/// * `json_output`: Emit JSON lines instead of the pretty human format.
///                  Defaults to `false`.
///
/// Fails when the filter is malformed or a global subscriber already exists.
pub fn init_tracing(log_level: Option<&str>, json_output: Option<bool>) -> Result<()> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(filter_directives(log_level.unwrap_or("info"))))?;

    let subscriber = Registry::default().with(env_filter);

    if json_output.unwrap_or(false) {
        let json_layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_span_list(false)
            .flatten_event(true);
        tracing::subscriber::set_global_default(subscriber.with(json_layer))?;
    } else {
        let fmt_layer = fmt::layer()
            .compact()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_level(true);
        tracing::subscriber::set_global_default(subscriber.with(fmt_layer))?;
    }

    Ok(())
}

/// [`init_tracing`] driven by a [`CircuitConfig`]
pub fn init_from_config(config: &CircuitConfig) -> Result<()> {
    init_tracing(Some(&config.log_level), Some(config.log_json))
}
