//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (diagnostic tracing events, stderr)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stderr, separate from the report record stream)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Diagnostic logs never share a stream with report records
//! - Request ID flows through the trace layer and into every record
//! - Metrics are cheap and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
