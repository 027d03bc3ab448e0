//! Inline style tags.
//!
//! Style tags are a closed set. Unknown tags are rejected when parsed or
//! deserialized, never at render time.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::DocError;

/// An inline style that can annotate a range of characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StyleTag {
    Bold,
    Italic,
    Underline,
    /// Custom color style rendered with a red foreground
    RedText,
}

impl StyleTag {
    /// Every tag, in declaration order.
    pub const ALL: [StyleTag; 4] = [
        StyleTag::Bold,
        StyleTag::Italic,
        StyleTag::Underline,
        StyleTag::RedText,
    ];

    /// Returns the canonical tag name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleTag::Bold => "BOLD",
            StyleTag::Italic => "ITALIC",
            StyleTag::Underline => "UNDERLINE",
            StyleTag::RedText => "RED_TEXT",
        }
    }
}

impl std::fmt::Display for StyleTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleTag {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StyleTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| DocError::UnknownStyle(s.to_string()))
    }
}

/// An insertion-ordered set of style tags.
///
/// Order matters: it is the order styles are reported to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle(Vec<StyleTag>);

impl InlineStyle {
    /// Creates an empty style set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, tag: StyleTag) -> bool {
        self.0.contains(&tag)
    }

    /// Adds a tag at the end if it is not already present.
    pub fn insert(&mut self, tag: StyleTag) {
        if !self.contains(tag) {
            self.0.push(tag);
        }
    }

    pub fn remove(&mut self, tag: StyleTag) {
        self.0.retain(|&t| t != tag);
    }

    /// Flips a tag. Returns true if the tag is now present.
    pub fn toggle(&mut self, tag: StyleTag) -> bool {
        if self.contains(tag) {
            self.remove(tag);
            false
        } else {
            self.0.push(tag);
            true
        }
    }

    /// Keeps only the tags also present in `other`, preserving our order.
    pub fn intersect(&self, other: &InlineStyle) -> InlineStyle {
        Self(self.0.iter().copied().filter(|t| other.contains(*t)).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = StyleTag> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<StyleTag> for InlineStyle {
    fn from_iter<I: IntoIterator<Item = StyleTag>>(iter: I) -> Self {
        let mut style = InlineStyle::new();
        for tag in iter {
            style.insert(tag);
        }
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_unknown_tags() {
        assert_eq!("RED_TEXT".parse::<StyleTag>().unwrap(), StyleTag::RedText);
        assert_eq!(
            "SPARKLE".parse::<StyleTag>(),
            Err(DocError::UnknownStyle("SPARKLE".into()))
        );
    }

    #[test]
    fn test_serde_rejects_unknown_tag() {
        let tag: StyleTag = serde_json::from_str("\"UNDERLINE\"").unwrap();
        assert_eq!(tag, StyleTag::Underline);
        assert!(serde_json::from_str::<StyleTag>("\"bold\"").is_err());
    }

    #[test]
    fn test_toggle_keeps_insertion_order() {
        let mut style = InlineStyle::new();
        assert!(style.toggle(StyleTag::Underline));
        assert!(style.toggle(StyleTag::Bold));
        assert_eq!(
            style.iter().collect::<Vec<_>>(),
            vec![StyleTag::Underline, StyleTag::Bold]
        );

        assert!(!style.toggle(StyleTag::Underline));
        assert_eq!(style.iter().collect::<Vec<_>>(), vec![StyleTag::Bold]);
    }

    #[test]
    fn test_collect_dedups() {
        let style: InlineStyle = [StyleTag::Bold, StyleTag::Italic, StyleTag::Bold]
            .into_iter()
            .collect();
        assert_eq!(style.len(), 2);
    }
}
