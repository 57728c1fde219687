//! URL slug type for blog posts.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input is longer than [`Slug::MAX_LENGTH`].
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains something other than ASCII letters, digits, `-` or `_`.
    #[error("slug may only contain letters, digits, hyphens and underscores")]
    InvalidCharacter(char),
}

/// A URL-safe identifier, unique per blog post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a slug.
    pub const MAX_LENGTH: usize = 200;

    /// Parse a `Slug` exactly as given.
    ///
    /// # Errors
    ///
    /// Returns a [`SlugError`] for empty, over-long, or non `[A-Za-z0-9_-]` input.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(SlugError::InvalidCharacter(bad));
        }
        Ok(Self(s.to_owned()))
    }

    /// Derive a slug from a title: lowercase ASCII words joined by hyphens.
    ///
    /// ```
    /// use nexussphere_core::Slug;
    ///
    /// let slug = Slug::from_title("Shipping LMS 2.0: What's New?").unwrap();
    /// assert_eq!(slug.as_str(), "shipping-lms-20-whats-new");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] when the title has no ASCII letters or digits.
    pub fn from_title(title: &str) -> Result<Self, SlugError> {
        let mut slug = String::with_capacity(title.len());
        for word in title.split(|c: char| c.is_whitespace() || c == '-' || c == '_') {
            let cleaned: String = word
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .collect();
            if cleaned.is_empty() {
                continue;
            }
            if !slug.is_empty() {
                slug.push('-');
            }
            slug.push_str(&cleaned);
        }
        let truncated: String = slug.chars().take(Self::MAX_LENGTH).collect();
        Self::parse(truncated.trim_end_matches('-'))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert!(Slug::parse("case-study_2026").is_ok());
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
        assert_eq!(Slug::parse("a/b"), Err(SlugError::InvalidCharacter('/')));
    }

    #[test]
    fn test_from_title_collapses_separators() {
        let slug = Slug::from_title("  Geoscience --  Platforms  ");
        assert_eq!(slug.map(|s| s.0), Ok("geoscience-platforms".to_owned()));
    }

    #[test]
    fn test_from_title_without_ascii() {
        assert_eq!(Slug::from_title("!!! ???"), Err(SlugError::Empty));
    }
}
