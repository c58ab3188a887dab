use std::path::Path;

use tracing::info;

use crate::config::LintConfig;
use crate::error::LintError;
use crate::guid_index::META_SUFFIX;
use crate::report::{CheckReport, Finding};
use crate::walk;

/// Verifies the bijection between content entries and sidecars under
/// `Assets/`: every file and every directory needs exactly one
/// `.meta` beside it, and every `.meta` needs its content entry.
pub fn check_meta_files(project_root: &Path, config: &LintConfig) -> Result<CheckReport, LintError> {
    let assets_dir = project_root.join("Assets");
    if !assets_dir.is_dir() {
        return Err(LintError::MissingContentRoot(assets_dir));
    }

    let mut missing = Vec::new();
    let mut orphaned = Vec::new();

    for entry in walk::content_entries(&assets_dir, &config.extra_skip_dirs) {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy();

        if entry.file_type().is_dir() || !name.ends_with(META_SUFFIX) {
            // Content entry (file or directory): demand its sidecar.
            let mut meta_name = entry.file_name().to_os_string();
            meta_name.push(META_SUFFIX);
            let meta_path = path.with_file_name(meta_name);
            if !meta_path.exists() {
                missing.push(walk::relative_display(project_root, path));
            }
        } else {
            // Sidecar: demand its content entry, file or directory.
            let content_name = &name[..name.len() - META_SUFFIX.len()];
            let content_path = path.with_file_name(content_name);
            if !content_path.exists() {
                orphaned.push(walk::relative_display(project_root, path));
            }
        }
    }

    missing.sort();
    orphaned.sort();

    let mut report = CheckReport::default();
    for file in missing {
        report.push(Finding::error(file, None, "missing .meta file"));
    }
    for file in orphaned {
        report.push(Finding::warning(
            file,
            None,
            "orphaned .meta (asset deleted but .meta remains)",
        ));
    }

    info!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "meta file integrity check done"
    );
    Ok(report)
}
