use std::path::Path;

use walkdir::{DirEntry, WalkDir};

/// Directories that never hold project content: version control,
/// build output, editor caches and per-user state.
pub const SKIP_DIRS: [&str; 16] = [
    ".git",
    ".github",
    ".gradle",
    ".idea",
    ".vs",
    ".vscode",
    "Build",
    "Builds",
    "Library",
    "Logs",
    "MemoryCaptures",
    "Temp",
    "UserSettings",
    "ci",
    "obj",
    "target",
];

fn is_skipped(entry: &DirEntry, extra: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    SKIP_DIRS.contains(&name.as_ref()) || extra.iter().any(|dir| dir == name.as_ref())
}

/// Walk `root`, pruning skip directories. Entries come back in sorted
/// order so findings are deterministic across platforms.
pub fn content_entries(root: &Path, extra_skip: &[String]) -> Vec<DirEntry> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry, extra_skip))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.depth() > 0)
        .collect()
}

/// Relative path with `/` separators, for findings and annotations.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}
