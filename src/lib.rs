//! addonscan inspects content packages ("addons") for a legacy 3D
//! animation/authoring application and builds a normalized catalog of their
//! contents: identity signature, verb/animation table, and a
//! container-independent content fingerprint.

pub mod services;
pub mod types;
pub mod wellknown;

pub use services::package::{inspect_package, InspectOptions};
pub use services::source::PackageSource;
pub use types::{AddonPackage, AddonSignature, InspectError, InspectResult};
