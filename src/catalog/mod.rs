//! Catalog data model.
//!
//! Sources are described by a [`SourceRegistry`]; the loader turns each
//! source document into [`Record`]s and concatenates them into a
//! [`Catalog`]. [`TagIndex`] is derived from a finished catalog.

pub mod identity;
pub mod index;
pub mod model;
pub mod registry;

pub use identity::{ALL_CATEGORIES, CategoryFilter, SourceId};
pub use index::TagIndex;
pub use model::{Catalog, Record, ScalarKind, SourcePayload};
pub use registry::{SourceDescriptor, SourceRegistry};
