pub mod errors;

pub use errors::{HistError, HistErrorCategory, HistResult};

use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Token of the coupler component, always compared in addition to the case components.
pub const COUPLER_MODEL: &str = "cpl";

/// Date-time stamp embedded in a history file name as `YYYY-MM-DD-SSSSS`.
///
/// Fields are kept as the fixed-width digit strings found in the name, so the
/// derived ordering (year, month, day, seconds) matches numeric ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HistTimestamp {
    pub year: String,
    pub month: String,
    pub day: String,
    pub seconds: String,
}

impl Display for HistTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}-{}", self.year, self.month, self.day, self.seconds)
    }
}

/// One history file found on disk, parsed once at enumeration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistFile {
    pub path: PathBuf,
    pub model: String,
    pub extension: String,
    pub timestamp: Option<HistTimestamp>,
    pub suffix: Option<String>,
}

impl HistFile {
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// File name from the last occurrence of the model token onward.
    ///
    /// This is the name a baseline copy of the file is stored under.
    pub fn model_relative_name(&self) -> Option<&str> {
        let name = self.path.file_name()?.to_str()?;
        name.rfind(&self.model).map(|index| &name[index..])
    }
}

#[cfg(test)]
mod tests {
    use super::{HistFile, HistTimestamp};
    use std::path::PathBuf;

    fn stamp(year: &str, month: &str, day: &str, seconds: &str) -> HistTimestamp {
        HistTimestamp {
            year: year.to_string(),
            month: month.to_string(),
            day: day.to_string(),
            seconds: seconds.to_string(),
        }
    }

    #[test]
    fn timestamps_order_by_year_then_month_then_day_then_seconds() {
        assert!(stamp("2020", "01", "02", "00000") > stamp("2020", "01", "01", "86399"));
        assert!(stamp("2021", "01", "01", "00000") > stamp("2020", "12", "31", "86399"));
        assert!(stamp("2020", "02", "01", "00000") > stamp("2020", "01", "31", "00000"));
        assert!(stamp("2020", "01", "01", "00010") > stamp("2020", "01", "01", "00009"));
        assert_eq!(stamp("0001", "01", "01", "00000").to_string(), "0001-01-01-00000");
    }

    #[test]
    fn model_relative_name_uses_last_model_occurrence() {
        let file = HistFile {
            path: PathBuf::from("/run/cpl-case.cpl.hi.0001-01-01-00000.nc"),
            model: "cpl".to_string(),
            extension: "hi".to_string(),
            timestamp: None,
            suffix: None,
        };

        assert_eq!(
            file.model_relative_name(),
            Some("cpl.hi.0001-01-01-00000.nc")
        );
    }
}
