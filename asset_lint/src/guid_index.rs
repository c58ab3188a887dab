use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::guid::Guid;
use crate::walk;

pub const META_SUFFIX: &str = ".meta";

/// Whether the index saw every possible source of guids. Partial
/// coverage means the local package cache was unavailable in this
/// run, so an unresolved reference may be a legitimate package guid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coverage {
    Full,
    Partial,
}

/// Set of every guid declared by a sidecar beneath the indexed roots.
/// Guids are globally unique within a project, so disjoint roots
/// union cleanly.
#[derive(Clone, Debug, Default)]
pub struct GuidIndex {
    guids: HashSet<Guid>,
}

impl GuidIndex {
    pub fn build<P: AsRef<Path>>(roots: &[P]) -> Self {
        let mut index = Self::default();
        for root in roots {
            index.add_root(root.as_ref());
        }
        index
    }

    pub fn add_root(&mut self, root: &Path) {
        if !root.is_dir() {
            return;
        }
        for entry in walk::content_entries(root, &[]) {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !name.ends_with(META_SUFFIX) {
                continue;
            }
            match read_sidecar_guid(entry.path()) {
                Some(guid) => {
                    self.guids.insert(guid);
                }
                None => {
                    debug!(path = %entry.path().display(), "sidecar without readable guid, skipped");
                }
            }
        }
    }

    pub fn contains(&self, guid: &Guid) -> bool {
        self.guids.contains(guid)
    }

    pub fn len(&self) -> usize {
        self.guids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guids.is_empty()
    }
}

/// Reads the guid from a sidecar file. The layout is fixed:
///
///   line 1: fileFormatVersion: 2
///   line 2: guid: <32 hex chars>
///
/// Only the first 38 bytes of line 2 matter. Malformed or undecodable
/// files yield `None`; a corrupt sidecar must not abort the walk.
pub fn read_sidecar_guid(path: &Path) -> Option<Guid> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    line.clear();
    // Bounded read so a binary file with no newline cannot drag the
    // whole body into memory.
    reader.take(256).read_line(&mut line).ok()?;
    parse_guid_line(line.trim_end())
}

fn parse_guid_line(line: &str) -> Option<Guid> {
    let rest = line.strip_prefix("guid: ")?;
    // get() rather than slicing: byte 32 of arbitrary file content may
    // land inside a multibyte character, and a corrupt sidecar must be
    // skipped, not panic the walk.
    Guid::parse(rest.get(..32)?).ok()
}
