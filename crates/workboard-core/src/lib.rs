//! Workboard Core — domain models, per-operation tenant context,
//! tenant scoping, and repository traits for the multi-tenant
//! access-control core.

pub mod context;
pub mod error;
pub mod models;
pub mod repository;
pub mod scope;

pub use context::{Caller, TenantContext};
pub use error::{WorkboardError, WorkboardResult};
pub use scope::{ScopedQuery, TenantScope};
