//! Library side of the `predef` command line tool

pub mod resolve;
pub mod validate;

pub use resolve::{load_config, resolve_snapshot, resolve_snapshot_file};
pub use validate::{check_bundle, check_bundle_file, CheckReport};
