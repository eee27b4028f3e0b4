use crate::domain::{COUPLER_MODEL, HistError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings of one model case, read once and handed to every operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CaseConfig {
    #[serde(rename = "case")]
    pub case_name: String,
    pub rundir: PathBuf,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(rename = "baselineRoot", default)]
    pub baseline_root: Option<PathBuf>,
    #[serde(rename = "basecmpCase", default)]
    pub basecmp_case: Option<String>,
    #[serde(rename = "basegenCase", default)]
    pub basegen_case: Option<String>,
    #[serde(default = "default_cprnc")]
    pub cprnc: PathBuf,
}

fn default_cprnc() -> PathBuf {
    PathBuf::from("cprnc")
}

#[derive(Debug, thiserror::Error)]
pub enum CaseConfigError {
    #[error("failed to read case configuration '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse case configuration '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("case configuration does not set '{0}'")]
    MissingSetting(&'static str),
}

impl From<CaseConfigError> for HistError {
    fn from(error: CaseConfigError) -> Self {
        let message = error.to_string();
        match error {
            CaseConfigError::Read { .. } => HistError::io_system("IO.CASE_CONFIG", message),
            CaseConfigError::Parse { .. } | CaseConfigError::MissingSetting(_) => {
                HistError::input_validation("INPUT.CASE_CONFIG", message)
            }
        }
    }
}

impl CaseConfig {
    pub fn new(case_name: impl Into<String>, rundir: impl Into<PathBuf>) -> Self {
        Self {
            case_name: case_name.into(),
            rundir: rundir.into(),
            components: Vec::new(),
            baseline_root: None,
            basecmp_case: None,
            basegen_case: None,
            cprnc: default_cprnc(),
        }
    }

    /// Loads the configuration, resolving relative paths against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CaseConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CaseConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|source| CaseConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolved_against(base_dir))
    }

    pub fn from_json(json: &str) -> Result<Self, CaseConfigError> {
        serde_json::from_str(json).map_err(|source| CaseConfigError::Parse {
            path: PathBuf::from("<inline-case>"),
            source,
        })
    }

    pub fn with_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_baselines(
        mut self,
        baseline_root: impl Into<PathBuf>,
        basecmp_case: impl Into<String>,
        basegen_case: impl Into<String>,
    ) -> Self {
        self.baseline_root = Some(baseline_root.into());
        self.basecmp_case = Some(basecmp_case.into());
        self.basegen_case = Some(basegen_case.into());
        self
    }

    /// Component tokens followed by the coupler.
    pub fn model_tokens(&self) -> Vec<&str> {
        self.components
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(COUPLER_MODEL))
            .collect()
    }

    pub fn baseline_root(&self) -> Result<&Path, CaseConfigError> {
        self.baseline_root
            .as_deref()
            .ok_or(CaseConfigError::MissingSetting("baselineRoot"))
    }

    pub fn baseline_compare_dir(&self) -> Result<PathBuf, CaseConfigError> {
        let case = self
            .basecmp_case
            .as_deref()
            .ok_or(CaseConfigError::MissingSetting("basecmpCase"))?;
        Ok(self.baseline_root()?.join(case))
    }

    pub fn baseline_generate_dir(&self) -> Result<PathBuf, CaseConfigError> {
        let case = self
            .basegen_case
            .as_deref()
            .ok_or(CaseConfigError::MissingSetting("basegenCase"))?;
        Ok(self.baseline_root()?.join(case))
    }

    fn resolved_against(mut self, base_dir: &Path) -> Self {
        self.rundir = resolve(base_dir, &self.rundir);
        self.baseline_root = self.baseline_root.map(|root| resolve(base_dir, &root));
        // A bare program name is looked up on PATH rather than next to the file.
        if self.cprnc.components().count() > 1 {
            self.cprnc = resolve(base_dir, &self.cprnc);
        }
        self
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{CaseConfig, CaseConfigError};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn parses_camel_case_settings() {
        let config = CaseConfig::from_json(
            r#"
            {
              "case": "FOO.G",
              "rundir": "/scratch/FOO.G/run",
              "components": ["cam", "pop"],
              "baselineRoot": "/baselines",
              "basecmpCase": "cmp",
              "basegenCase": "gen",
              "cprnc": "/opt/cprnc"
            }
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.case_name, "FOO.G");
        assert_eq!(config.model_tokens(), vec!["cam", "pop", "cpl"]);
        assert_eq!(
            config.baseline_compare_dir().unwrap(),
            PathBuf::from("/baselines/cmp")
        );
        assert_eq!(
            config.baseline_generate_dir().unwrap(),
            PathBuf::from("/baselines/gen")
        );
        assert_eq!(config.cprnc, PathBuf::from("/opt/cprnc"));
    }

    #[test]
    fn coupler_is_always_a_model() {
        let config = CaseConfig::new("CASE", "run");
        assert_eq!(config.model_tokens(), vec!["cpl"]);
        assert_eq!(config.cprnc, PathBuf::from("cprnc"));
    }

    #[test]
    fn missing_baseline_settings_are_reported() {
        let config = CaseConfig::new("CASE", "run");
        assert!(matches!(
            config.baseline_compare_dir(),
            Err(CaseConfigError::MissingSetting("basecmpCase"))
        ));

        let config = config.with_baselines("/b", "cmp", "gen");
        assert!(config.baseline_compare_dir().is_ok());
    }

    #[test]
    fn relative_paths_resolve_against_config_directory() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("case.json");
        fs::write(
            &path,
            r#"{ "case": "CASE", "rundir": "run", "baselineRoot": "base", "cprnc": "tools/cprnc" }"#,
        )
        .expect("config should be written");

        let config = CaseConfig::from_path(&path).expect("config should load");
        assert_eq!(config.rundir, temp.path().join("run"));
        assert_eq!(config.baseline_root, Some(temp.path().join("base")));
        assert_eq!(config.cprnc, temp.path().join("tools/cprnc"));
    }

    #[test]
    fn bare_cprnc_name_is_left_for_path_lookup() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("case.json");
        fs::write(&path, r#"{ "case": "CASE", "rundir": "/run" }"#)
            .expect("config should be written");

        let config = CaseConfig::from_path(&path).expect("config should load");
        assert_eq!(config.rundir, PathBuf::from("/run"));
        assert_eq!(config.cprnc, PathBuf::from("cprnc"));
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let temp = TempDir::new().expect("tempdir should be created");
        let result = CaseConfig::from_path(temp.path().join("absent.json"));
        assert!(matches!(result, Err(CaseConfigError::Read { .. })));
    }
}
