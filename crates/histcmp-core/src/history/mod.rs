//! Locating, classifying and pairing model history files.

pub mod enumerate;
pub mod extension;
pub mod latest;
pub mod matcher;

pub use enumerate::{EnumerateError, all_hist_files, hist_file_patterns};
pub use extension::{ExtensionClassifier, extension_for};
pub use latest::{hist_timestamp, latest_hist_files, select_latest, supersedes};
pub use matcher::{HistMatch, match_hists, normalize_hist_name};
