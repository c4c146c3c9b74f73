//! Well-known filenames, roots, and sentinel strings for addon packages.
//!
//! All filename comparisons against these values are case-insensitive; all
//! normalized entry paths are forward-slash, package-root-relative.

/// Binary signature file at the package root (mandatory).
pub const SIGNATURE_FILE: &str = "package.addon";

/// Asset-data archive at the package root (mandatory, zip format).
pub const ASSET_ARCHIVE_FILE: &str = "data.jar";

/// Compiled mesh-data file at the package root (optional).
pub const MESH_DATA_FILE: &str = "meshes.dat";

/// Descriptor filename, excluded from the content fingerprint wherever it
/// appears under the content subtree.
pub const DESCRIPTOR_FILE: &str = "descriptor.xml";

/// Root of the substantive content subtree.
pub const CONTENT_ROOT: &str = "data/";

/// Root of puppet model content.
pub const PUPPET_ROOT: &str = "data/puppets/";

/// Root of prop model content.
pub const PROP_ROOT: &str = "data/props/";

/// Animation file extension (with dot).
pub const ANIMATION_EXT: &str = ".caf";

/// Path segment stripped when normalizing animation lookup keys.
pub const ANIMATIONS_SEGMENT: &str = "animations";

/// Optional catalog sources inside the asset-data archive.
pub const VERBS_FILE: &str = "verbs.xml";
pub const STATE_MACHINE_FILE: &str = "statemachine.xml";
pub const VERSION_FILE: &str = "version.txt";
pub const PROPERTIES_FILE: &str = "properties.txt";

/// Extensions (without dot) never included in the content fingerprint:
/// templates, parts, mesh sources, compiled meshes.
pub const FINGERPRINT_EXCLUDED_EXTS: &[&str] = &["template", "part", "xmf", "cmf"];

/// Material / sound extensions (without dot), used by the content summary.
pub const MATERIAL_EXTS: &[&str] = &["crf", "xrf"];
pub const SOUND_EXTS: &[&str] = &["wav", "ogg"];

/// Archive container extensions a package may ship as.
pub const PACKAGE_ARCHIVE_EXTS: &[&str] = &["zip", "addon"];

/// Model sentinel: multiple/ambiguous owner (the standard puppet pair).
pub const WILDCARD_MODEL: &str = "*";

/// Model sentinel: animation could not be resolved to any owner.
pub const UNRESOLVED_MODEL: &str = "?";

/// Model sentinel: no animation reference at all.
pub const NO_ANIMATION: &str = "^";

/// Suffix appended to prop owner labels in the animation file index, flagging
/// gait/gesture usage outside the puppet domain.
pub const IMPROPER_OWNER_MARKER: &str = "!?";

/// Joiner for derived verb sort keys.
pub const SORT_KEY_JOINER: char = '^';

/// The standard puppet pair that collapses to [`WILDCARD_MODEL`].
pub const STANDARD_PUPPETS: (&str, &str) = ("Male01", "Female01");

/// Digest stand-in for zero-length files. Not a hex string, so it can never
/// collide with a real digest.
pub const EMPTY_FILE_TAG: &str = "empty";
