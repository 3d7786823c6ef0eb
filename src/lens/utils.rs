//! Terminal output helpers shared by the lenses
//!
//! The HTTP service negotiates JSON or HTML on its own. Everything here only
//! concerns what the `metaserv` binary prints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Widest description shown in a table cell
pub const DEFAULT_DESCRIPTION_MAX_LEN: usize = 48;

const ELLIPSIS: &str = "...";

/// Output format for the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Rounded table (default)
    #[default]
    Table,
    /// Markdown table, for pasting into documentation
    Markdown,
    /// One JSON document per line
    Json,
    /// Indented JSON
    JsonPretty,
}

impl OutputFormat {
    const NAMES: [(&'static str, OutputFormat); 4] = [
        ("table", OutputFormat::Table),
        ("markdown", OutputFormat::Markdown),
        ("json", OutputFormat::Json),
        ("json-pretty", OutputFormat::JsonPretty),
    ];

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty)
    }

    pub fn is_table(&self) -> bool {
        !self.is_json()
    }

    /// Canonical names accepted by `--format`
    pub fn all_names() -> Vec<&'static str> {
        Self::NAMES.iter().map(|(name, _)| *name).collect()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = Self::NAMES
            .iter()
            .find(|(_, format)| format == self)
            .map(|(name, _)| *name)
            .unwrap_or("table");
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        if wanted == "md" {
            return Ok(Self::Markdown);
        }
        Self::NAMES
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, format)| *format)
            .ok_or_else(|| {
                format!(
                    "unknown format '{}', expected one of: {}",
                    s,
                    Self::all_names().join(", ")
                )
            })
    }
}

/// Shorten a description to at most `max_chars` characters for a table cell
///
/// Line breaks are flattened first. When the text is cut, it ends in `...`
/// and the cut prefers the last word boundary.
///
/// ```
/// use metaserv::lens::utils::shorten_description;
///
/// assert_eq!(shorten_description("Detected sources", 40), "Detected sources");
/// assert_eq!(shorten_description("Position of the source in RA", 20), "Position of the...");
/// ```
pub fn shorten_description(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }

    let budget = max_chars.saturating_sub(ELLIPSIS.len());
    let head: String = flat.chars().take(budget).collect();
    let head = match head.rfind(' ') {
        Some(cut) if cut > 0 => head[..cut].to_string(),
        _ => head,
    };
    format!("{}{}", head.trim_end(), ELLIPSIS)
}
