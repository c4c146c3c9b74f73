//! Verb catalog: document decoding and catalog construction.

pub mod builder;
pub mod documents;

pub use builder::{build_verb_catalog, VerbCatalogOutcome};
pub use documents::{NameMap, StateNode, VerbRecord};
