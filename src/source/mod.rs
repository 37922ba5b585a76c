//! Image source definitions
//!
//! A source variant pairs a search engine family with the resolution it is
//! asked for. The family determines the collector dispatch key, the output
//! filename prefix, and the face-search query modifier.

use std::fmt;

/// Search engine family an image link is collected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceFamily {
    Google,
    Naver,
}

impl SourceFamily {
    /// All families in planning order
    pub const ALL: [SourceFamily; 2] = [SourceFamily::Google, SourceFamily::Naver];

    /// Name used as collector dispatch key and output filename prefix
    pub fn name(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Naver => "naver",
        }
    }

    /// Query modifier appended to searches in face-search mode
    pub fn face_modifier(&self) -> &'static str {
        match self {
            Self::Google => "&tbs=itp:face",
            Self::Naver => "&face=1",
        }
    }
}

impl fmt::Display for SourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Requested image resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Thumbnail,
    Full,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumbnail => "thumbnail",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete source a download task collects from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceVariant {
    Google,
    GoogleFull,
    Naver,
    NaverFull,
}

impl SourceVariant {
    /// Builds the variant for a family at the given resolution
    pub fn new(family: SourceFamily, resolution: Resolution) -> Self {
        match (family, resolution) {
            (SourceFamily::Google, Resolution::Thumbnail) => Self::Google,
            (SourceFamily::Google, Resolution::Full) => Self::GoogleFull,
            (SourceFamily::Naver, Resolution::Thumbnail) => Self::Naver,
            (SourceFamily::Naver, Resolution::Full) => Self::NaverFull,
        }
    }

    pub fn family(&self) -> SourceFamily {
        match self {
            Self::Google | Self::GoogleFull => SourceFamily::Google,
            Self::Naver | Self::NaverFull => SourceFamily::Naver,
        }
    }

    pub fn resolution(&self) -> Resolution {
        match self {
            Self::Google | Self::Naver => Resolution::Thumbnail,
            Self::GoogleFull | Self::NaverFull => Resolution::Full,
        }
    }

    /// Display name; full and thumbnail variants of a family share it
    pub fn name(&self) -> &'static str {
        self.family().name()
    }

    /// Query modifier for this variant, empty unless face mode is on
    pub fn query_modifier(&self, face: bool) -> &'static str {
        if face {
            self.family().face_modifier()
        } else {
            ""
        }
    }
}

impl fmt::Display for SourceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolution() {
            Resolution::Thumbnail => write!(f, "{}", self.name()),
            Resolution::Full => write!(f, "{} (full)", self.name()),
        }
    }
}
