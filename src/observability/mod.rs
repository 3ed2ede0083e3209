//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Every gateway operation runs inside a span carrying an operation ID
//! - Keys, secrets and document contents are never logged

pub mod logging;
pub mod metrics;
