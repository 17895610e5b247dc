//! Data model for the vaccination coverage pipeline.
//!
//! Holds the layout descriptions shared by ingestion and loading, the
//! dimension and fact rows of the normalized schema, and the
//! [`CoverageWriter`] trait the loader writes through.

#![deny(unsafe_code)]

pub mod dimension;
pub mod error;
pub mod fact;
pub mod index;
pub mod store;
pub mod structure;
pub mod table;
pub mod warning;

pub use dimension::{AgeCohort, AreaType, FinancialYear, GeographicArea, ProgramType, Vaccine};
pub use error::{ModelError, Result};
pub use fact::{CoverageFact, FactKey, FactTable, Measurement, UpsertOutcome};
pub use index::DimensionIndex;
pub use store::CoverageWriter;
pub use structure::{HeaderPattern, IdentifierKind, LayoutConfig, StructureKind, ValueAxis};
pub use table::{SheetRole, TableId};
pub use warning::{LoadWarning, ReferenceKind};
