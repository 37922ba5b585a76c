//! Keyword list loading
//!
//! The keyword file is a plain newline-delimited list. Loading it also
//! rewrites it in canonical form (trimmed, deduplicated, sorted) so later runs
//! and hand edits stay normalized.

use crate::KeywordError;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path};

/// A normalized, non-empty search keyword
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keyword(String);

impl Keyword {
    /// Normalizes a raw line into a keyword, or `None` if nothing is left
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_start_matches('\u{feff}').trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the keyword names exactly one directory under a root
    ///
    /// Absolute paths, `.`, `..` and nested paths would escape or collapse
    /// the `{root}/{keyword}` layout.
    pub fn is_directory_name(&self) -> bool {
        let mut components = Path::new(&self.0).components();
        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for Keyword {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// Loads the keyword list and rewrites the file in canonical form
///
/// # Arguments
///
/// * `path` - Path to the newline-delimited keyword file
///
/// # Returns
///
/// * `Ok(Vec<Keyword>)` - Sorted, deduplicated keywords
/// * `Err(KeywordError)` - The file could not be read or rewritten
pub fn load_keywords(path: &Path) -> Result<Vec<Keyword>, KeywordError> {
    let content = std::fs::read_to_string(path).map_err(|source| KeywordError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let keywords: Vec<Keyword> = content
        .lines()
        .filter_map(Keyword::parse)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    tracing::info!(
        "{} keywords found: {:?}",
        keywords.len(),
        keywords.iter().map(Keyword::as_str).collect::<Vec<_>>()
    );

    let mut canonical = String::new();
    for keyword in &keywords {
        canonical.push_str(keyword.as_str());
        canonical.push('\n');
    }

    std::fs::write(path, canonical).map_err(|source| KeywordError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(keywords)
}
