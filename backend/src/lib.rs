//! Foodgram backend: recipes, favourites, shopping carts and subscriptions.
//!
//! The crate follows a hexagonal layout. [`domain`] holds types, ports and
//! services; [`inbound`] adapts HTTP onto the driving ports; [`outbound`]
//! implements the driven ports with Diesel and the filesystem.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
