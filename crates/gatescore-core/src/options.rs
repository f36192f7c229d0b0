//! Displayed-to-canonical option letter mapping.
//!
//! The portal shuffles option labels per candidate, but each option's image
//! filename still ends in the canonical letter (`..._daq25b.png` is option B
//! of question 25 whatever label it was shown under).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static OPTION_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)([ABCD])\.\s*<img[^>]*name="[^"]*_(?:ga\d*q\d+|daq\d+)([abcd])(?:v\d+)?\.png""#,
    )
    .expect("valid option row regex")
});

/// Option letters of one question block, displayed label -> canonical label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionMap {
    letters: HashMap<char, char>,
}

impl OptionMap {
    /// Scan a question block for option rows.
    pub fn from_block(block: &str) -> Self {
        let letters = OPTION_ROW
            .captures_iter(block)
            .filter_map(|caps| {
                let displayed = caps[1].chars().next()?.to_ascii_uppercase();
                let canonical = caps[2].chars().next()?.to_ascii_uppercase();
                Some((displayed, canonical))
            })
            .collect();
        Self { letters }
    }

    /// Canonical letter for a displayed one. Accepts either case.
    pub fn resolve(&self, displayed: char) -> Option<char> {
        self.letters.get(&displayed.to_ascii_uppercase()).copied()
    }

    /// Resolve a displayed label given as text (`"B"`, `" c "`).
    pub fn resolve_label(&self, label: &str) -> Option<char> {
        let mut chars = label.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.resolve(c),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}
