//! CSP violation report collector library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod report;
pub mod sink;

pub use config::schema::CollectorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use report::{AckResponse, ReportPipeline, RequestEnvelope};
pub use sink::LogSink;
