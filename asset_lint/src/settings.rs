use std::collections::BTreeSet;
use std::path::Path;

use tracing::info;

use crate::error::LintError;

pub const TAG_MANAGER_REL: &str = "ProjectSettings/TagManager.asset";

/// Names declared centrally by the project: physics layers (ordered,
/// sparse, unnamed slots are simply absent), sorting layers
/// (ordered), and custom tags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSettings {
    pub layers: Vec<String>,
    pub sorting_layers: Vec<String>,
    pub tags: BTreeSet<String>,
}

impl TagSettings {
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer == name)
    }

    pub fn has_sorting_layer(&self, name: &str) -> bool {
        self.sorting_layers.iter().any(|layer| layer == name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains(name)
    }
}

/// Which section of the settings file the parser is inside. A single
/// tagged value instead of independent booleans, so illegal
/// combinations cannot exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    None,
    Tags,
    Layers,
    Sorting,
}

/// Parses the restricted TagManager subset line by line. This is a
/// state machine over known section headers, not a YAML parser; the
/// file shape is fixed by the editor serializer.
pub fn parse_tag_settings(contents: &str) -> TagSettings {
    let mut settings = TagSettings::default();
    let mut section = Section::None;
    for line in contents.lines() {
        section = step(section, line.trim(), &mut settings);
    }
    settings
}

/// One transition per physical line. Header rules are evaluated
/// before content rules, so a line matching both is a header.
fn step(section: Section, stripped: &str, out: &mut TagSettings) -> Section {
    if stripped.starts_with("tags:") {
        // An inline empty list ("tags: []") never enters the
        // itemized branch.
        return if stripped.contains("[]") {
            Section::None
        } else {
            Section::Tags
        };
    }
    if stripped == "layers:" {
        return Section::Layers;
    }
    if stripped == "m_SortingLayers:" {
        return Section::Sorting;
    }
    if stripped.starts_with("m_RenderingLayers:") {
        // Always follows sorting layers and terminates that section.
        return Section::None;
    }

    match section {
        Section::None => Section::None,
        Section::Tags => {
            if let Some(value) = bullet_value(stripped) {
                out.tags.insert(value.to_string());
            }
            Section::Tags
        }
        Section::Layers => {
            if let Some(value) = bullet_value(stripped) {
                out.layers.push(value.to_string());
                Section::Layers
            } else if stripped.starts_with('-') {
                // Unnamed slot: stays in the section, adds nothing.
                Section::Layers
            } else {
                // The layers section has no explicit terminator; the
                // first non-bulleted line ends it.
                Section::None
            }
        }
        Section::Sorting => {
            if let Some(rest) = stripped.strip_prefix('-') {
                if let Some(value) = rest.trim_start().strip_prefix("name:") {
                    let value = value.trim();
                    if !value.is_empty() {
                        out.sorting_layers.push(value.to_string());
                    }
                }
            }
            Section::Sorting
        }
    }
}

fn bullet_value(stripped: &str) -> Option<&str> {
    let value = stripped.strip_prefix("- ")?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Reads and parses `ProjectSettings/TagManager.asset`. Absence is
/// fatal: no layer or tag can be validated without it.
pub fn load_tag_settings(project_root: &Path) -> Result<TagSettings, LintError> {
    let path = project_root.join(TAG_MANAGER_REL);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(LintError::MissingSettings(path));
        }
        Err(err) => return Err(LintError::Read { path, source: err }),
    };
    let settings = parse_tag_settings(&contents);
    info!(
        layers = settings.layers.len(),
        sorting_layers = settings.sorting_layers.len(),
        tags = settings.tags.len(),
        "parsed TagManager"
    );
    Ok(settings)
}
