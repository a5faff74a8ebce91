//! Pure helpers used per file during a walk: size buckets, extension
//! normalization and human readable sizes.

use crate::types::SizeBucket;

pub const KB: u64 = 1024;
pub const MB: u64 = 1024 * KB;
pub const FIVE_MB: u64 = 5 * MB;
pub const HUNDRED_MB: u64 = 100 * MB;
pub const FIVE_TWELVE_MB: u64 = 512 * MB;
/// Decimal thousand of MiB, not 1024.
pub const GB: u64 = 1000 * MB;

/// Extensions with at least this many characters collapse into `<long ext>`.
pub const EXTENSION_LIMIT: usize = 24;

pub const NO_EXTENSION: &str = "<no ext>";
pub const HIDDEN_EXTENSION: &str = "<hidden>";
pub const LONG_EXTENSION: &str = "<long ext>";

impl SizeBucket {
    /// Picks the highest bucket whose threshold `size` strictly exceeds.
    pub fn classify(size: u64) -> Self {
        match size {
            s if s > GB => SizeBucket::Over1Gb,
            s if s > FIVE_TWELVE_MB => SizeBucket::Over512Mb,
            s if s > HUNDRED_MB => SizeBucket::Over100Mb,
            s if s > FIVE_MB => SizeBucket::Over5Mb,
            s if s > MB => SizeBucket::Over1Mb,
            s if s > KB => SizeBucket::Over1Kb,
            _ => SizeBucket::UpTo1Kb,
        }
    }
}

/// Last extension segment of `file_name`, dot included.
///
/// A leading dot only names a dotfile, so `.bashrc` yields the bare `"."`.
fn extension_segment(file_name: &str) -> Option<&str> {
    match file_name.rfind('.') {
        None => None,
        Some(0) => Some("."),
        Some(idx) => Some(&file_name[idx..]),
    }
}

/// Normalizes the extension of a file name for grouping.
///
/// Returns `.ext` in lowercase, or one of the sentinels: `<no ext>` when the
/// name has no dot, `<long ext>` when the extension is 24 characters or more,
/// `<hidden>` when nothing follows the dot (dotfiles, `name.`).
pub fn file_extension(file_name: &str) -> String {
    let Some(segment) = extension_segment(file_name) else {
        return NO_EXTENSION.to_string();
    };

    let ext = segment[1..].to_lowercase();
    if ext.chars().count() >= EXTENSION_LIMIT {
        return LONG_EXTENSION.to_string();
    }
    if ext.is_empty() {
        return HIDDEN_EXTENSION.to_string();
    }
    format!(".{}", ext)
}

/// Formats a byte count with binary units and two decimals, e.g. `2.00 MB`.
pub fn format_size(bytes: u64) -> String {
    const SUFFIXES: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut idx = 0;
    while size >= 1024.0 && idx < SUFFIXES.len() - 1 {
        size /= 1024.0;
        idx += 1;
    }
    format!("{:.2} {}", size, SUFFIXES[idx])
}
