//! HTTP middleware.
//!
//! # Layer Order (outermost first)
//!
//! 1. Sentry hub and HTTP transaction layers (binary only)
//! 2. CORS
//! 3. `TraceLayer` (request span)
//! 4. Request ID

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
