//! Matching and bit-for-bit comparison of model history files against
//! suffixed copies and stored baselines.

pub mod baseline;
pub mod case;
pub mod compare;
pub mod domain;
pub mod history;

pub use baseline::{
    CopiedHist, HistCopyReport, compare_baseline, compare_test, generate_baseline, move_hists,
};
pub use case::{CaseConfig, CaseConfigError};
pub use compare::{BitComparator, BitComparison, Cprnc, HistComparison, compare_hists};
pub use domain::{HistError, HistErrorCategory, HistFile, HistResult};
