//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → request.rs (request ID, HTTP request → RequestEnvelope)
//!     → ReportPipeline
//!     → response.rs (AckResponse → HTTP response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{envelope_from_parts, with_body_bytes, X_REQUEST_ID};
pub use server::HttpServer;
