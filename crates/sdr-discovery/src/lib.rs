//! sdr-discovery
//!
//! Service-discovery reconciliation engine.
//!
//! Architectural decisions:
//! - Each `ServiceDiscovery` owns its endpoint view; there is no shared table
//! - Endpoints are compared by identity; a target change is UNREGISTER then REGISTER
//! - Events are delivered synchronously, one view mutation per event
//! - Registry access goes through the narrow `RegistryClient` seam
//!
//! Deterministic, synchronous logic. The only IO happens behind `RegistryClient`.

mod discovery;
mod endpoint;
mod engine;
mod error;
mod resolver;
pub mod snapshot_adapter;
mod types;
mod view;

pub use discovery::{RegistryEvent, ServiceDiscovery};
pub use endpoint::{Endpoint, EndpointBuilder, EndpointRecord};
pub use engine::{reconcile, EventHandler, HandlerError};
pub use error::{DiscoveryError, RegistryError};
pub use resolver::{FileRegistry, RegistryClient, Resolver, StaticRegistry};
pub use snapshot_adapter::{
    parse_registry_json, RawApplication, RawInstance, RawPort, SnapshotAdapterError,
};
pub use types::*;
pub use view::EndpointView;
