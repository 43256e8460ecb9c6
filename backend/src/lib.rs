//! Virtual pet backend library modules.
//!
//! The crate follows a hexagonal layout: `domain` holds the aggregates,
//! services, and ports; `inbound` the HTTP adapters; `outbound` the
//! persistence and security adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware applied to every route.
pub use middleware::Trace;
