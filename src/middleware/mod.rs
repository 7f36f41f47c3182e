// ABOUTME: HTTP middleware for CORS and request tracing
// ABOUTME: Layers shared by every router of the server

/// CORS configuration
pub mod cors;
/// Request ID generation and HTTP trace spans
pub mod tracing;

pub use cors::setup_cors;
pub use self::tracing::{make_request_span, request_id_layers, REQUEST_ID_HEADER};
