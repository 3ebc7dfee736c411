//! Heading anchor generation.

use std::collections::HashSet;

/// Issues unique, URL-safe anchors for the headings of one page.
///
/// A fresh generator is used per page. Collisions get `-1`, `-2`, ...
/// appended until the anchor is unique within the page.
#[derive(Clone, Debug, Default)]
pub struct SlugGenerator {
    issued: HashSet<String>,
}

impl SlugGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next unique slug for `text`.
    pub fn slugify(&mut self, text: &str) -> String {
        let mut base = slug_base(text);
        if base.is_empty() {
            base = format!("section-{}", self.issued.len());
        }

        let slug = if self.issued.contains(&base) {
            (1..)
                .map(|n| format!("{base}-{n}"))
                .find(|candidate| !self.issued.contains(candidate))
                .unwrap_or(base)
        } else {
            base
        };

        self.issued.insert(slug.clone());
        slug
    }

    /// Whether `slug` was issued by this generator.
    #[must_use]
    pub fn contains(&self, slug: &str) -> bool {
        self.issued.contains(slug)
    }

    /// Number of slugs issued so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

/// Slug for `text` without deduplication.
///
/// Lowercases, keeps ASCII letters, digits, underscores and whitespace,
/// then joins the remaining words with single hyphens.
#[must_use]
pub fn slug_base(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_base() {
        assert_eq!(slug_base("Hello World"), "hello-world");
        assert_eq!(slug_base("What's New?"), "whats-new");
        assert_eq!(slug_base("  Spaces  "), "spaces");
        assert_eq!(slug_base("Multiple \t Spaces"), "multiple-spaces");
        assert_eq!(slug_base("snake_case"), "snake_case");
        assert_eq!(slug_base("kebab-case"), "kebabcase");
        assert_eq!(slug_base("Task#cancel()"), "taskcancel");
    }

    #[test]
    fn test_duplicates_get_suffix() {
        let mut slugs = SlugGenerator::new();
        assert_eq!(slugs.slugify("Setup"), "setup");
        assert_eq!(slugs.slugify("Setup"), "setup-1");
        assert_eq!(slugs.slugify("Setup"), "setup-2");
    }

    #[test]
    fn test_suffix_skips_existing_slug() {
        let mut slugs = SlugGenerator::new();
        assert_eq!(slugs.slugify("Setup 1"), "setup-1");
        assert_eq!(slugs.slugify("Setup"), "setup");
        assert_eq!(slugs.slugify("Setup"), "setup-2");
    }

    #[test]
    fn test_empty_slug_falls_back_to_position() {
        let mut slugs = SlugGenerator::new();
        assert_eq!(slugs.slugify("Intro"), "intro");
        assert_eq!(slugs.slugify("⚠️"), "section-1");
        assert_eq!(slugs.slugify("???"), "section-2");
        assert_eq!(slugs.len(), 3);
    }

    #[test]
    fn test_contains() {
        let mut slugs = SlugGenerator::new();
        slugs.slugify("Config");
        assert!(slugs.contains("config"));
        assert!(!slugs.contains("config-1"));
    }
}
