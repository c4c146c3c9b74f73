pub mod animation;
pub mod fingerprint;
pub mod package;
pub mod signature;
pub mod source;
pub mod verbs;
