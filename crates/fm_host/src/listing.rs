//! Directory-listing entry model and the preview-eligibility rule.

use serde::{Deserialize, Serialize};

/// Placeholder shown in the size column when no size is known yet.
pub const SIZE_PLACEHOLDER: &str = "-";

/// Lowercase extensions rendered by the text previewer.
pub const TEXT_PREVIEW_EXTENSIONS: [&str; 8] =
    ["txt", "md", "py", "js", "html", "css", "json", "xml"];

/// Lowercase extensions rendered by the image previewer.
pub const IMAGE_PREVIEW_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "svg", "webp"];

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Previewer used for an eligible entry.
pub enum PreviewKind {
    /// Plain-text / source document preview.
    Text,
    /// Inline image preview.
    Image,
}

/// Returns the lowercase extension of `name`, if it has one.
///
/// Dotfiles without a further dot (`.bashrc`) have no extension.
pub fn extension_of(name: &str) -> Option<String> {
    let idx = name.rfind('.')?;
    if idx == 0 || idx + 1 == name.len() {
        return None;
    }
    Some(name[idx + 1..].to_ascii_lowercase())
}

/// Resolves the previewer for an entry, or `None` when it is not previewable.
///
/// Directories are never previewable; files are previewable iff their lowercase extension is in
/// [`TEXT_PREVIEW_EXTENSIONS`] or [`IMAGE_PREVIEW_EXTENSIONS`].
pub fn preview_kind(name: &str, is_dir: bool) -> Option<PreviewKind> {
    if is_dir {
        return None;
    }
    let ext = extension_of(name)?;
    if TEXT_PREVIEW_EXTENSIONS.contains(&ext.as_str()) {
        Some(PreviewKind::Text)
    } else if IMAGE_PREVIEW_EXTENSIONS.contains(&ext.as_str()) {
        Some(PreviewKind::Image)
    } else {
        None
    }
}

/// Returns `true` when [`preview_kind`] resolves a previewer.
pub fn is_previewable(name: &str, is_dir: bool) -> bool {
    preview_kind(name, is_dir).is_some()
}

/// Formats a byte count with two decimals in the largest unit below 1024 (`1536` -> `1.50 KB`).
pub fn format_size_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = SIZE_UNITS[0];
    for candidate in SIZE_UNITS {
        unit = candidate;
        if value < 1024.0 {
            break;
        }
        if candidate != SIZE_UNITS[SIZE_UNITS.len() - 1] {
            value /= 1024.0;
        }
    }
    format!("{value:.2} {unit}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Size column value as sent by the server: raw bytes or preformatted text.
pub enum EntrySize {
    /// Raw byte count.
    Bytes(u64),
    /// Preformatted label (`"1.50 KB"`, or [`SIZE_PLACEHOLDER`] for directories).
    Text(String),
}

impl EntrySize {
    /// Returns the display text for this size.
    pub fn display(&self) -> String {
        match self {
            Self::Bytes(bytes) => format_size_bytes(*bytes),
            Self::Text(text) if text.trim().is_empty() => SIZE_PLACEHOLDER.to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    /// Returns `true` when the value carries no real size.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty() || text == SIZE_PLACEHOLDER)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One file or folder of a directory listing.
pub struct ListingEntry {
    /// Base name, unique within the parent directory.
    pub name: String,
    /// Root-relative slash-joined path.
    pub path: String,
    /// Directory flag.
    pub is_dir: bool,
    /// Size column value; absent or placeholder for directories until computed.
    #[serde(default)]
    pub size: Option<EntrySize>,
    /// Server-side preview eligibility.
    #[serde(default)]
    pub previewable: bool,
}

impl ListingEntry {
    /// Builds a file entry, deriving preview eligibility from `name`.
    pub fn file(name: impl Into<String>, path: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        let previewable = is_previewable(&name, false);
        Self {
            name,
            path: path.into(),
            is_dir: false,
            size: Some(EntrySize::Bytes(size_bytes)),
            previewable,
        }
    }

    /// Builds a directory entry with a placeholder size.
    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_dir: true,
            size: Some(EntrySize::Text(SIZE_PLACEHOLDER.to_string())),
            previewable: false,
        }
    }

    /// Returns the size column text.
    pub fn size_text(&self) -> String {
        self.size
            .as_ref()
            .map(EntrySize::display)
            .unwrap_or_else(|| SIZE_PLACEHOLDER.to_string())
    }

    /// Returns `true` when a directory's size has not been computed.
    pub fn has_size_placeholder(&self) -> bool {
        self.size.as_ref().map_or(true, EntrySize::is_placeholder)
    }

    /// Orders entries directories-first, then by lowercase name.
    pub fn listing_order(&self, other: &Self) -> std::cmp::Ordering {
        other
            .is_dir
            .cmp(&self.is_dir)
            .then_with(|| self.name.to_lowercase().cmp(&other.name.to_lowercase()))
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Sorts entries in listing order.
pub fn sort_listing(entries: &mut [ListingEntry]) {
    entries.sort_by(ListingEntry::listing_order);
}
