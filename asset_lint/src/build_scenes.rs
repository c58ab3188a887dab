use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::error::LintError;
use crate::guid::Guid;
use crate::guid_index;
use crate::report::{CheckReport, Finding};

pub const BUILD_SETTINGS_REL: &str = "ProjectSettings/EditorBuildSettings.asset";

/// One registered scene, in packaging order. The declared guid must
/// agree with the scene's own sidecar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneEntry {
    pub enabled: bool,
    pub path: String,
    pub guid: Guid,
}

fn scene_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Anchored on the enabled-flag line; path and guid follow on the
    // next two lines in the serializer's fixed layout.
    PATTERN.get_or_init(|| {
        Regex::new(r"-\s*enabled:\s*(\d+)\s*\n\s*path:\s*(.+\.unity)\s*\n\s*guid:\s*([0-9a-f]{32})")
            .expect("scene block pattern")
    })
}

/// Extracts scene entries from the build manifest text, in declared
/// order.
pub fn parse_scene_entries(contents: &str) -> Vec<SceneEntry> {
    scene_block_pattern()
        .captures_iter(contents)
        .filter_map(|capture| {
            let guid = Guid::parse(&capture[3]).ok()?;
            Some(SceneEntry {
                enabled: capture[1].trim() == "1",
                path: capture[2].trim().to_string(),
                guid,
            })
        })
        .collect()
}

/// Validates each entry against the tree: the scene file must exist,
/// its sidecar must exist, and the sidecar guid must equal the
/// declared one. Checks for an entry stop at its first failure; a
/// sidecar comparison is meaningless without the scene file.
pub fn validate_scene_entries(project_root: &Path, entries: &[SceneEntry]) -> CheckReport {
    let mut report = CheckReport::default();
    if entries.is_empty() {
        report.push(Finding::warning(
            BUILD_SETTINGS_REL,
            None,
            "no scenes found in build settings",
        ));
        return report;
    }

    for entry in entries {
        let scene_path = project_root.join(&entry.path);
        if !scene_path.exists() {
            report.push(Finding::error(
                BUILD_SETTINGS_REL,
                None,
                format!("build scene not found on disk: {}", entry.path),
            ));
            continue;
        }

        let meta_path = project_root.join(format!("{}.meta", entry.path));
        if !meta_path.exists() {
            report.push(Finding::error(
                BUILD_SETTINGS_REL,
                None,
                format!("scene .meta file missing: {}.meta", entry.path),
            ));
            continue;
        }

        match guid_index::read_sidecar_guid(&meta_path) {
            None => {
                report.push(Finding::error(
                    BUILD_SETTINGS_REL,
                    None,
                    format!("cannot read guid from {}.meta", entry.path),
                ));
            }
            Some(actual) if actual != entry.guid => {
                report.push(Finding::error(
                    BUILD_SETTINGS_REL,
                    None,
                    format!(
                        "guid mismatch for {}: build settings has {}, .meta has {}",
                        entry.path, entry.guid, actual
                    ),
                ));
            }
            Some(_) => {}
        }
    }
    report
}

/// Reads the build manifest and validates every registered scene.
pub fn check_build_scenes(project_root: &Path) -> Result<CheckReport, LintError> {
    let manifest_path = project_root.join(BUILD_SETTINGS_REL);
    let contents = match std::fs::read_to_string(&manifest_path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(LintError::MissingBuildManifest(manifest_path));
        }
        Err(err) => {
            return Err(LintError::Read {
                path: manifest_path,
                source: err,
            });
        }
    };

    let entries = parse_scene_entries(&contents);
    info!(scenes = entries.len(), "parsed build manifest");
    Ok(validate_scene_entries(project_root, &entries))
}
