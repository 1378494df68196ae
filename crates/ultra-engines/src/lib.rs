//! Components C9-C10: the evolution driver and the multi-run search
//! orchestrator (spec §4.9, §4.10).

pub mod driver;
pub mod search;
pub mod strategy;

pub use driver::EvolutionDriver;
pub use search::{Search, SearchStatistics};
pub use strategy::{AlpsDeStrategy, AlpsGaStrategy, EvolutionStrategy};

/// Installs a process-wide `tracing` subscriber exactly once. Library code
/// in the other `ultra-*` crates never calls this itself (only emits
/// events); it exists for binaries/examples/tests that want a default
/// subscriber without repeating the boilerplate, matching the teacher's
/// `radiate_engines::init_logging`.
pub fn init_logging() {
    use std::sync::Once;
    static INIT_LOGGING: Once = Once::new();

    INIT_LOGGING.call_once(|| {
        use tracing_subscriber::fmt::format::FmtSpan;
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                    .with_target(false)
                    .with_level(true)
                    .compact(),
            )
            .init();
    });
}
