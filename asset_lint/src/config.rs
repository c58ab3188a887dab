use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::LintError;

pub const CONFIG_FILE_NAME: &str = "asset_lint.toml";

const DEFAULT_SCAN_ROOT: &str = "Assets/_Project";
const DEFAULT_SCRIPTS_ROOT: &str = "Assets/_Project/Scripts";

/// Per-project overrides. Everything has a sensible default; an
/// absent config file is the common case.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    #[serde(default = "default_scan_root")]
    pub scan_root: String,

    #[serde(default = "default_scripts_root")]
    pub scripts_root: String,

    #[serde(default)]
    pub extra_skip_dirs: Vec<String>,

    #[serde(default)]
    pub extra_builtin_tags: Vec<String>,
}

fn default_scan_root() -> String {
    DEFAULT_SCAN_ROOT.to_string()
}

fn default_scripts_root() -> String {
    DEFAULT_SCRIPTS_ROOT.to_string()
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            scan_root: default_scan_root(),
            scripts_root: default_scripts_root(),
            extra_skip_dirs: Vec::new(),
            extra_builtin_tags: Vec::new(),
        }
    }
}

impl LintConfig {
    /// Loads `asset_lint.toml` from the project root. Absent file
    /// falls back to defaults; a present but malformed file is fatal,
    /// a silently ignored config must not relax checks.
    pub fn load(project_root: &Path) -> Result<Self, LintError> {
        let path = project_root.join(CONFIG_FILE_NAME);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(LintError::Read {
                    path,
                    source: err,
                });
            }
        };
        Self::parse(&path, &contents)
    }

    pub fn parse(path: &Path, contents: &str) -> Result<Self, LintError> {
        toml::from_str(contents).map_err(|err| LintError::InvalidConfig {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    pub fn scan_root_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.scan_root)
    }

    pub fn scripts_root_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.scripts_root)
    }
}
