use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::config::LintConfig;
use crate::error::LintError;
use crate::guid::Guid;
use crate::guid_index::{Coverage, GuidIndex};
use crate::report::{CheckReport, Finding};
use crate::walk;

/// Asset formats that embed guid references.
const SCANNABLE_EXTENSIONS: [&str; 10] = [
    "asset",
    "controller",
    "lighting",
    "mat",
    "overridecontroller",
    "playable",
    "prefab",
    "signal",
    "spriteatlasv2",
    "unity",
];

fn guid_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"guid:\s*([0-9a-f]{32})").expect("guid ref pattern"))
}

pub fn is_scannable(path: &Path) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = ext.to_string_lossy().to_ascii_lowercase();
    SCANNABLE_EXTENSIONS.contains(&ext.as_str())
}

/// Scans one content file for guid references that do not resolve
/// against `index`. The severity of an unresolved reference depends
/// on nothing but `coverage`: under full coverage it is certainly
/// broken, under partial coverage it may be a package guid this run
/// cannot see.
pub fn scan_file_for_guid_refs(
    path: &Path,
    rel_path: &str,
    index: &GuidIndex,
    coverage: Coverage,
) -> Vec<Finding> {
    let Ok(file) = File::open(path) else {
        return Vec::new();
    };
    let mut findings = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let Ok(line) = line else {
            // Undecodable content: skip the rest of the file, the
            // tree walk must go on.
            debug!(path = rel_path, "undecodable file skipped");
            return findings;
        };
        for capture in guid_ref_pattern().captures_iter(&line) {
            let Ok(guid) = Guid::parse(&capture[1]) else {
                continue;
            };
            if guid.is_ignorable() || index.contains(&guid) {
                continue;
            }
            let finding = match coverage {
                Coverage::Full => Finding::error(
                    rel_path,
                    Some(idx + 1),
                    format!("broken guid reference: {}", guid),
                ),
                Coverage::Partial => Finding::warning(
                    rel_path,
                    Some(idx + 1),
                    format!("unresolvable guid (package?): {}", guid),
                ),
            };
            findings.push(finding);
        }
    }
    findings
}

/// Builds the guid index from every source available in this run and
/// scans the project scan root for unresolved references.
pub fn check_guid_refs(project_root: &Path, config: &LintConfig) -> Result<CheckReport, LintError> {
    let assets_dir = project_root.join("Assets");
    if !assets_dir.is_dir() {
        return Err(LintError::MissingContentRoot(assets_dir));
    }
    let scan_dir = config.scan_root_path(project_root);
    if !scan_dir.is_dir() {
        return Err(LintError::MissingScanRoot(scan_dir));
    }

    let mut index = GuidIndex::default();
    index.add_root(&assets_dir);
    index.add_root(&project_root.join("Packages"));

    // The package cache exists locally but is gitignored, so CI runs
    // without it. Its presence decides whether an unresolved guid is
    // a certain breakage or merely ambiguous.
    let package_cache = project_root.join("Library").join("PackageCache");
    let coverage = if package_cache.is_dir() {
        index.add_root(&package_cache);
        Coverage::Full
    } else {
        Coverage::Partial
    };
    info!(guids = index.len(), coverage = ?coverage, "guid index built");

    let mut report = CheckReport::default();
    let mut files_scanned = 0usize;
    for entry in walk::content_entries(&scan_dir, &config.extra_skip_dirs) {
        if !entry.file_type().is_file() || !is_scannable(entry.path()) {
            continue;
        }
        files_scanned += 1;
        let rel_path = walk::relative_display(project_root, entry.path());
        report
            .findings
            .extend(scan_file_for_guid_refs(entry.path(), &rel_path, &index, coverage));
    }
    info!(
        files = files_scanned,
        errors = report.error_count(),
        warnings = report.warning_count(),
        "guid reference scan done"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use std::fs;

    const KNOWN: &str = "0af04ab0b44f44cb389830a4f54e1df4";
    const UNKNOWN: &str = "9bf04ab0b44f44cb389830a4f54e1df4";

    fn index_with_known(dir: &Path) -> GuidIndex {
        fs::write(
            dir.join("known.png.meta"),
            format!("fileFormatVersion: 2\nguid: {}\n", KNOWN),
        )
        .unwrap();
        GuidIndex::build(&[dir])
    }

    fn write_scene(dir: &Path, guid: &str) -> std::path::PathBuf {
        let path = dir.join("scene.unity");
        fs::write(
            &path,
            format!("  m_Script: {{fileID: 11500000, guid: {}, type: 3}}\n", guid),
        )
        .unwrap();
        path
    }

    #[test]
    fn resolved_reference_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let index = index_with_known(dir.path());
        let scene = write_scene(dir.path(), KNOWN);
        let findings = scan_file_for_guid_refs(&scene, "scene.unity", &index, Coverage::Full);
        assert!(findings.is_empty());
    }

    #[test]
    fn unresolved_is_error_under_full_coverage() {
        let dir = tempfile::tempdir().unwrap();
        let index = index_with_known(dir.path());
        let scene = write_scene(dir.path(), UNKNOWN);
        let findings = scan_file_for_guid_refs(&scene, "scene.unity", &index, Coverage::Full);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].line, Some(1));
        assert!(findings[0].message.contains(UNKNOWN));
    }

    #[test]
    fn unresolved_is_warning_under_partial_coverage() {
        let dir = tempfile::tempdir().unwrap();
        let index = index_with_known(dir.path());
        let scene = write_scene(dir.path(), UNKNOWN);
        let findings = scan_file_for_guid_refs(&scene, "scene.unity", &index, Coverage::Partial);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn null_and_builtin_guids_never_report() {
        let dir = tempfile::tempdir().unwrap();
        let index = GuidIndex::default();
        let path = dir.path().join("scene.unity");
        fs::write(
            &path,
            "guid: 00000000000000000000000000000000\n\
             guid: 0000000000000000f000000000000000\n",
        )
        .unwrap();
        for coverage in [Coverage::Full, Coverage::Partial] {
            let findings = scan_file_for_guid_refs(&path, "scene.unity", &index, coverage);
            assert!(findings.is_empty());
        }
    }

    #[test]
    fn multiple_refs_on_one_line_all_checked() {
        let dir = tempfile::tempdir().unwrap();
        let index = index_with_known(dir.path());
        let path = dir.path().join("combo.mat");
        fs::write(
            &path,
            format!("a: {{guid: {}}} b: {{guid: {}}}\n", KNOWN, UNKNOWN),
        )
        .unwrap();
        let findings = scan_file_for_guid_refs(&path, "combo.mat", &index, Coverage::Full);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains(UNKNOWN));
    }

    #[test]
    fn scannable_extension_allowlist() {
        assert!(is_scannable(Path::new("a/b.prefab")));
        assert!(is_scannable(Path::new("a/b.overrideController")));
        assert!(is_scannable(Path::new("a/b.spriteatlasv2")));
        assert!(!is_scannable(Path::new("a/b.png")));
        assert!(!is_scannable(Path::new("a/noext")));
    }
}
