//! Ordered term mapping — the replacement table driving a rebrand.
//!
//! Pairs are held sorted longest-`from`-first so a longer term is never
//! partially shadowed by a shorter term it contains ("Reyeets" resolves
//! before "Yeet" ever sees its substring). Replacement is literal, not
//! regex. Replacement runs sequentially over a working copy, so a later
//! pair sees text already rewritten by earlier pairs; the built-in table
//! is curated so that never produces an unwanted re-match.

use serde::Serialize;

use crate::error::{Error, Result};

/// One replacement pair, applied to both contents and path components.
#[derive(Debug, Clone, Serialize)]
pub struct TermPair {
    pub from: String,
    pub to: String,
}

impl TermPair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// An ordered, validated set of replacement pairs.
#[derive(Debug, Clone)]
pub struct TermMapping {
    pairs: Vec<TermPair>,
}

impl TermMapping {
    /// Build a mapping from explicit pairs.
    ///
    /// Rejects any pair with an empty `from`. Pairs are re-ordered
    /// longest-`from`-first; insertion order is preserved among pairs of
    /// equal length.
    pub fn new(pairs: Vec<TermPair>) -> Result<Self> {
        for pair in &pairs {
            if pair.from.is_empty() {
                return Err(Error::validation_invalid_argument(
                    "from",
                    "Mapping term cannot be empty",
                    Some(format!("→ {}", pair.to)),
                ));
            }
        }

        let mut pairs = pairs;
        pairs.sort_by(|a, b| b.from.len().cmp(&a.from.len()));

        Ok(Self { pairs })
    }

    /// The built-in Pika → Bee table, including multi-word taglines, the
    /// mascot glyph, and both dotted and slashed package forms.
    pub fn pika_to_bee() -> Self {
        let pairs = vec![
            // App name
            TermPair::new("Pika", "Bee"),
            TermPair::new("pika", "bee"),
            TermPair::new("PIKA", "BEE"),
            // Core concepts
            TermPair::new("Yeet", "Buzz"),
            TermPair::new("yeet", "buzz"),
            TermPair::new("Yeets", "Buzzes"),
            TermPair::new("yeets", "buzzes"),
            TermPair::new("yeeting", "buzzing"),
            TermPair::new("Yeeted", "Buzzed"),
            TermPair::new("yeeted", "buzzed"),
            // Interactions
            TermPair::new("Reyeet", "Rebuzz"),
            TermPair::new("reyeet", "rebuzz"),
            TermPair::new("Reyeets", "Rebuzzes"),
            TermPair::new("reyeets", "rebuzzes"),
            // Features
            TermPair::new("Friends Notes", "Hive Notes"),
            TermPair::new("FriendsNotes", "HiveNotes"),
            TermPair::new("friends_notes", "hive_notes"),
            TermPair::new("friendsNotes", "hiveNotes"),
            TermPair::new("Topic Zones", "Hive Sections"),
            TermPair::new("TopicZones", "HiveSections"),
            TermPair::new("topic_zones", "hive_sections"),
            TermPair::new("topicZones", "hiveSections"),
            // UI elements
            TermPair::new("Lightning", "Sting"),
            TermPair::new("lightning", "sting"),
            // Branding
            TermPair::new("Where conversations spark", "Where conversations buzz"),
            TermPair::new("⚡", "🐝"),
            // Package names
            TermPair::new("com.pika.app", "com.bee.app"),
            TermPair::new("com/pika/app", "com/bee/app"),
        ];

        // Built-in table contains no empty terms
        Self::new(pairs).expect("built-in mapping is valid")
    }

    pub fn pairs(&self) -> &[TermPair] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Apply every pair to `text`, longest `from` first, and return the
    /// rewritten text plus the total occurrence count.
    ///
    /// Each pair's count is taken against the working text at the moment
    /// that pair is applied, so the total is the number of individual
    /// substitutions actually performed.
    pub fn replace_in_content(&self, text: &str) -> (String, usize) {
        let mut modified = text.to_string();
        let mut total = 0;

        for pair in &self.pairs {
            let count = modified.matches(pair.from.as_str()).count();
            if count > 0 {
                total += count;
                modified = modified.replace(pair.from.as_str(), &pair.to);
            }
        }

        (modified, total)
    }

    /// Apply the mapping to a single file or directory name.
    pub fn rename_component(&self, name: &str) -> String {
        let mut new_name = name.to_string();

        for pair in &self.pairs {
            if new_name.contains(pair.from.as_str()) {
                new_name = new_name.replace(pair.from.as_str(), &pair.to);
            }
        }

        new_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_from_term() {
        let result = TermMapping::new(vec![TermPair::new("", "bee")]);
        assert!(result.is_err());
    }

    #[test]
    fn pairs_sorted_longest_first() {
        let mapping = TermMapping::new(vec![
            TermPair::new("Yeet", "Buzz"),
            TermPair::new("Reyeets", "Rebuzzes"),
            TermPair::new("yeets", "buzzes"),
        ])
        .unwrap();

        let froms: Vec<&str> = mapping.pairs().iter().map(|p| p.from.as_str()).collect();
        assert_eq!(froms, vec!["Reyeets", "yeets", "Yeet"]);
    }

    #[test]
    fn longest_match_wins_over_contained_term() {
        let mapping = TermMapping::new(vec![
            TermPair::new("Reyeets", "Rebuzzes"),
            TermPair::new("Yeet", "Buzz"),
            TermPair::new("yeets", "buzzes"),
        ])
        .unwrap();

        let (out, count) = mapping.replace_in_content("Reyeets are cool yeets");
        assert_eq!(out, "Rebuzzes are cool buzzes");
        assert_eq!(count, 2);
    }

    #[test]
    fn counts_every_occurrence() {
        let mapping = TermMapping::new(vec![TermPair::new("yeet", "buzz")]).unwrap();
        let (out, count) = mapping.replace_in_content("yeet yeet yeet");
        assert_eq!(out, "buzz buzz buzz");
        assert_eq!(count, 3);
    }

    #[test]
    fn untouched_text_counts_zero() {
        let mapping = TermMapping::pika_to_bee();
        let (out, count) = mapping.replace_in_content("nothing to see here");
        assert_eq!(out, "nothing to see here");
        assert_eq!(count, 0);
    }

    #[test]
    fn rename_component_applies_longest_first() {
        let mapping = TermMapping::new(vec![
            TermPair::new("Reyeet", "Rebuzz"),
            TermPair::new("Yeet", "Buzz"),
        ])
        .unwrap();

        assert_eq!(mapping.rename_component("ReyeetButton.kt"), "RebuzzButton.kt");
        assert_eq!(mapping.rename_component("YeetCard.kt"), "BuzzCard.kt");
        assert_eq!(mapping.rename_component("README.md"), "README.md");
    }

    #[test]
    fn built_in_table_is_idempotent_on_its_own_output() {
        let mapping = TermMapping::pika_to_bee();
        let (first, count) = mapping.replace_in_content("Pika says yeet, reyeets abound ⚡");
        assert!(count > 0);

        let (second, count_again) = mapping.replace_in_content(&first);
        assert_eq!(second, first);
        assert_eq!(count_again, 0);
    }

    #[test]
    fn package_paths_replace_in_content() {
        let mapping = TermMapping::pika_to_bee();
        let (out, _) = mapping.replace_in_content("package com.pika.app.feed");
        assert_eq!(out, "package com.bee.app.feed");
    }
}
