//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CSP nonce (generate per-request nonce for the inline notice script)
//! 5. Security headers (CSP built from the nonce, framing, sniffing)
//! 6. Session layer (tower-sessions, in-memory store, signed cookie)

pub mod csp;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{SessionLayerError, create_session_layer};
