use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::config::LintConfig;
use crate::error::LintError;
use crate::report::{CheckReport, Finding, Severity};
use crate::settings::{self, TagSettings};
use crate::walk;

/// Tags the engine always provides, independent of the project's
/// declared tag list.
pub const BUILTIN_TAGS: [&str; 8] = [
    "Untagged",
    "Respawn",
    "Finish",
    "EditorOnly",
    "MainCamera",
    "Player",
    "GameController",
    "Enemy",
];

fn name_to_layer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"LayerMask\.NameToLayer\(\s*"([^"]+)"\s*\)"#).expect("NameToLayer pattern")
    })
}

fn get_mask_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"LayerMask\.GetMask\(([^)]*)\)").expect("GetMask pattern"))
}

fn quoted_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("quoted pattern"))
}

fn sorting_layer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"sortingLayerName\s*=\s*"([^"]+)""#).expect("sortingLayerName pattern")
    })
}

fn compare_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r#"CompareTag\(\s*"([^"]+)"\s*\)"#).expect("CompareTag pattern"))
}

/// Editor-only code never ships, so a dangling name there is a
/// workflow nuisance rather than a product defect.
pub fn is_editor_path(rel_path: &str) -> bool {
    rel_path
        .split('/')
        .any(|segment| segment == "Editor" || segment == "editor")
}

/// Scans one C# source text for layer, sorting-layer, and tag
/// references and validates each against the parsed settings.
pub fn scan_script(
    contents: &str,
    rel_path: &str,
    severity: Severity,
    settings: &TagSettings,
    all_tags: &BTreeSet<String>,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut push = |line: usize, message: String| {
        findings.push(Finding {
            severity,
            file: rel_path.to_string(),
            line: Some(line),
            message,
        });
    };

    for (idx, line) in contents.lines().enumerate() {
        let line_no = idx + 1;

        for capture in name_to_layer_pattern().captures_iter(line) {
            let name = &capture[1];
            if !settings.has_layer(name) {
                push(line_no, format!("layer \"{}\" not defined in TagManager", name));
            }
        }

        // Every quoted argument of the call is a layer name, not just
        // the first.
        for capture in get_mask_pattern().captures_iter(line) {
            for inner in quoted_pattern().captures_iter(&capture[1]) {
                let name = &inner[1];
                if !settings.has_layer(name) {
                    push(line_no, format!("layer \"{}\" not defined in TagManager", name));
                }
            }
        }

        for capture in sorting_layer_pattern().captures_iter(line) {
            let name = &capture[1];
            if !settings.has_sorting_layer(name) {
                push(
                    line_no,
                    format!("sorting layer \"{}\" not defined in TagManager", name),
                );
            }
        }

        for capture in compare_tag_pattern().captures_iter(line) {
            let name = &capture[1];
            if !all_tags.contains(name) {
                push(line_no, format!("tag \"{}\" not defined in TagManager", name));
            }
        }
    }
    findings
}

/// Parses TagManager and cross-checks every layer/sorting-layer/tag
/// reference found in the project's C# sources.
pub fn check_layer_consistency(
    project_root: &Path,
    config: &LintConfig,
) -> Result<CheckReport, LintError> {
    let settings = settings::load_tag_settings(project_root)?;

    let mut scripts_dir = config.scripts_root_path(project_root);
    if !scripts_dir.is_dir() {
        warn!(
            path = %scripts_dir.display(),
            "scripts root not found, scanning Assets/ instead"
        );
        scripts_dir = project_root.join("Assets");
        if !scripts_dir.is_dir() {
            return Err(LintError::MissingContentRoot(scripts_dir));
        }
    }

    let mut all_tags: BTreeSet<String> = settings.tags.clone();
    all_tags.extend(BUILTIN_TAGS.iter().map(|tag| tag.to_string()));
    all_tags.extend(config.extra_builtin_tags.iter().cloned());

    let mut report = CheckReport::default();
    let mut files_scanned = 0usize;
    for entry in walk::content_entries(&scripts_dir, &config.extra_skip_dirs) {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().map(|ext| ext == "cs") != Some(true) {
            continue;
        }
        let Ok(contents) = std::fs::read_to_string(entry.path()) else {
            continue;
        };
        files_scanned += 1;
        let rel_path = walk::relative_display(project_root, entry.path());
        let severity = if is_editor_path(&rel_path) {
            Severity::Warning
        } else {
            Severity::Error
        };
        report
            .findings
            .extend(scan_script(&contents, &rel_path, severity, &settings, &all_tags));
    }
    info!(
        files = files_scanned,
        errors = report.error_count(),
        warnings = report.warning_count(),
        "layer/tag consistency check done"
    );
    Ok(report)
}
