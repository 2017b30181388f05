//! Subscriber installation for hosts that do not bring their own.
//!
//! Library code only emits `tracing` events: `debug!` while compiling and
//! merging, `warn!` for id-less redefinition nodes and malformed step maps.
//! Compiling a source runs inside an `add_source` span and merging inside a
//! `redefine` span, so every line names the resource it came from.

use std::io;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::PlanConfig;

/// Plain-text subscriber at `config.log_level` writing to `writer`.
pub(crate) fn subscriber<W>(
    config: &PlanConfig,
    writer: W,
) -> impl Subscriber + Send + Sync + use<W>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.as_filter_str()))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .finish()
}

/// Install a stderr subscriber filtered at `config.log_level`.
///
/// Stdout is left to the host, so serialized plans stay machine readable.
/// The level comes from `BDD_PLAN_LOG_LEVEL` unless overridden with
/// [`PlanConfig::apply_overrides`].
///
/// Returns `false`, leaving the existing subscriber in place, when a global
/// subscriber is already set.
pub fn init_logging(config: &PlanConfig) -> bool {
    tracing::subscriber::set_global_default(subscriber(config, io::stderr)).is_ok()
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::builder::PlanBuilder;
    use crate::config::LogLevel;
    use crate::test_support::capture_logs;

    const PAY: &str = "Feature: Pay\n  Scenario: Card\n    Given a card\n";

    fn build_pay_plan() {
        let mut builder = PlanBuilder::new(PlanConfig::default())
            .unwrap_or_else(|err| panic!("builder: {err}"));
        builder
            .add_source("pay.feature", PAY)
            .unwrap_or_else(|err| panic!("source: {err}"));
        builder.build().unwrap_or_else(|err| panic!("build: {err}"));
    }

    #[test]
    fn debug_level_reports_compilation_inside_source_span() {
        let ((), logs) = capture_logs(LogLevel::Debug, build_pay_plan);
        let compiled = logs
            .lines()
            .find(|line| line.contains("compiled feature"))
            .unwrap_or_else(|| panic!("no compilation event in:\n{logs}"));
        assert!(compiled.contains("DEBUG"));
        assert!(compiled.contains("add_source"));
        assert!(compiled.contains("pay.feature"));
        assert!(logs.contains("built plan"));
    }

    #[test]
    fn warn_level_hides_debug_events() {
        let ((), logs) = capture_logs(LogLevel::Warn, build_pay_plan);
        assert_eq!(logs, "");
    }

    #[test]
    #[serial]
    fn only_the_first_installation_wins() {
        let config = PlanConfig::default();
        init_logging(&config);
        assert!(!init_logging(&config));
    }
}
