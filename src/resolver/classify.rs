//! Artifact classification by path segment.

use std::fmt;

/// What kind of artifact a processed source becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Part of the combined document.
    Content,
    /// Lives under a `commands` directory.
    Command,
    /// Lives under a `skills` directory.
    Skill,
    /// A `.sh` file under a `bin` directory.
    Bin,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Content => write!(f, "content"),
            Classification::Command => write!(f, "command"),
            Classification::Skill => write!(f, "skill"),
            Classification::Bin => write!(f, "bin"),
        }
    }
}

/// Classify a file by its path segments (the last segment is the file name).
///
/// Directory segments are checked in priority order: `commands`, then
/// `skills`, then `bin` (which also needs a `.sh` file name).
pub fn classify(segments: &[String]) -> Classification {
    let Some((file_name, dirs)) = segments.split_last() else {
        return Classification::Content;
    };
    let has_dir = |name: &str| dirs.iter().any(|d| d == name);

    if has_dir("commands") {
        Classification::Command
    } else if has_dir("skills") {
        Classification::Skill
    } else if has_dir("bin") && file_name.ends_with(".sh") {
        Classification::Bin
    } else {
        Classification::Content
    }
}

/// Whether any directory segment is literally `skills`.
pub fn under_skills_dir(segments: &[String]) -> bool {
    segments
        .split_last()
        .is_some_and(|(_, dirs)| dirs.iter().any(|d| d == "skills"))
}

/// Segments after the first directory segment named `dir`.
pub fn after_dir<'s>(segments: &'s [String], dir: &str) -> Option<&'s [String]> {
    let dirs = segments.len().checked_sub(1)?;
    let idx = segments[..dirs].iter().position(|s| s == dir)?;
    Some(&segments[idx + 1..])
}
