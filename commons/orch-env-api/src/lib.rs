//! Data contract of the `Environment` managed resource.
//!
//! Two incompatible schema generations live side by side: [`v1`] and [`v2`].
//! They are tied together by the [`scheme`] registry, the [`VersionedEnvironment`]
//! union and the conversions in [`migrate`].

pub mod common;
pub mod error;
pub mod identity;
pub mod migrate;
pub mod observed;
pub mod resource;
pub mod scheme;
pub mod v1;
pub mod v2;
pub mod validate;


pub use error::ContractError;
pub use identity::TypeIdentity;
pub use migrate::{LossyField, MigrationReport, Migrated, MissingRequiredPolicy, UnknownPolicy};
pub use resource::{EnvironmentResource, SchemaVersion, VersionedEnvironment};
pub use scheme::{Scheme, SchemeBuilder};
pub use validate::{FieldViolation, ValidationError};
