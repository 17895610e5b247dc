//! Vaccine name resolution.
//!
//! Column headers across the published tables spell the same vaccine many
//! ways (`DTaP/IPV/Hib/HepB Prim`, `Coverage at 12 months DTaP/IPV/Hib/HepB
//! (%)`, ...). [`VaccineNameResolver`] maps them onto the canonical table in
//! [`CANONICAL_VACCINES`].

#![deny(unsafe_code)]

mod canonical;
mod clean;
mod error;
mod resolver;

pub use canonical::{CANONICAL_VACCINES, CanonicalVaccine, canonical_vaccine};
pub use clean::clean_header;
pub use error::{MapError, Result};
pub use resolver::{
    DEFAULT_FUZZY_THRESHOLD, MatchMethod, Resolution, ResolverStats, VaccineNameResolver,
    similarity,
};
