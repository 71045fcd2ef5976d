//! Cross-origin access for the browser client.

use actix_cors::Cors;

/// Any origin, method and header; the browser UI is served from another origin.
pub fn cors_layer() -> Cors {
    Cors::permissive()
}
