//! Purpose: Request-side payload types for the app endpoints.
//! Exports: list filters, create/patch bodies, and the shared primitives they compose.
//! Role: Wire shapes plus their declared rules (`Validate`) and translations (`ToCommand`).
//! Invariants: JSON bodies reject unknown fields; query filters follow `ResourceTable` policy.

pub mod app;
pub mod lifecycle;
pub mod lists;
pub mod metadata;
pub mod pagination;
pub mod relationship;

pub use app::{
    AppCreate, AppPatch, AppPatchEnvVars, AppRelationships, AppScope, AppSetCurrentDroplet,
    CreateContext,
};
pub use lifecycle::{Lifecycle, LifecycleData, LifecycleDataPatch, LifecyclePatch};
pub use lists::{
    AppDropletsList, AppGuid, AppList, AppPackagesList, AppProcessList, AppRoutesList,
};
pub use metadata::{Metadata, MetadataPatch, RESERVED_DOMAIN};
pub use pagination::Pagination;
pub use relationship::{Relationship, RelationshipData};
