pub mod catalog;
pub mod errors;

pub use catalog::{
    AddonPackage, AddonSignature, ContentSummary, VerbCatalog, VerbEntry, VerbKind,
};
pub use errors::{InspectError, InspectResult};
