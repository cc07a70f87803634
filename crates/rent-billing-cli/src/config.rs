use std::env;

use rent_billing_core::billing::rates::{RateSettings, UtilityRateConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::input;

/// Path to the property's rate settings file (JSON or YAML).
pub const RATES_ENV: &str = "RENT_BILLING_RATES";

/// Log filter directive, e.g. `debug` or `rent_billing_core=debug`.
pub const LOG_ENV: &str = "RENT_BILLING_LOG";

/// Resolve rate settings: inline settings win, then `--rates`, then the
/// `RENT_BILLING_RATES` file. The result is validated before use.
pub fn resolve_rates(
    inline: Option<RateSettings>,
    rates_path: Option<&str>,
) -> Result<UtilityRateConfig, Box<dyn std::error::Error>> {
    let settings = match inline {
        Some(settings) => settings,
        None => {
            let path = match rates_path {
                Some(p) => p.to_string(),
                None => env::var(RATES_ENV).map_err(|_| {
                    format!("rate settings are required: pass --rates <file> or set {RATES_ENV}")
                })?,
            };
            debug!(path = %path, "Loading rate settings");
            input::file::read_config(&path)?
        }
    };
    Ok(settings.validate()?)
}

/// Install the stderr log subscriber. stdout carries command output only.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
