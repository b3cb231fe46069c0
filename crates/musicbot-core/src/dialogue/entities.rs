//! Artist name recognition against a fixed dictionary.
//!
//! Every dictionary line is one artist, split on whitespace into the exact
//! token sequence that must appear in a message. Matching is case-sensitive:
//! the dictionary's casing is authoritative.

use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{BotError, Result};
use crate::nlp::AnnotatedDoc;

/// Compiled, immutable artist matcher.
#[derive(Debug, Clone, Default)]
pub struct EntityRecognizer {
    patterns: Vec<Vec<String>>,
    /// First token -> indices into `patterns`.
    by_first: HashMap<String, Vec<usize>>,
}

impl EntityRecognizer {
    /// Compile a matcher from artist names. Blank names are skipped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut recognizer = Self::default();
        for name in names {
            let tokens: Vec<String> = name
                .as_ref()
                .split_whitespace()
                .map(str::to_owned)
                .collect();
            let Some(first) = tokens.first() else {
                continue;
            };
            recognizer
                .by_first
                .entry(first.clone())
                .or_default()
                .push(recognizer.patterns.len());
            recognizer.patterns.push(tokens);
        }
        recognizer
    }

    /// Load a newline-delimited UTF-8 dictionary, one artist per line.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| BotError::Dictionary {
            path: path.to_path_buf(),
            source,
        })?;
        let recognizer = Self::new(content.lines());
        info!(
            path = %path.display(),
            entries = recognizer.len(),
            "Loaded artist dictionary"
        );
        Ok(recognizer)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Token spans of every artist mention, left to right.
    ///
    /// All matches are collected first; overlapping matches are then merged
    /// into one span covering both. Touching spans stay separate.
    pub fn find_spans(&self, doc: &AnnotatedDoc) -> Vec<Range<usize>> {
        let tokens = doc.tokens();
        let mut matches: Vec<Range<usize>> = Vec::new();

        for start in 0..tokens.len() {
            let Some(candidates) = self.by_first.get(&tokens[start].text) else {
                continue;
            };
            for &idx in candidates {
                let pattern = &self.patterns[idx];
                let end = start + pattern.len();
                if end > tokens.len() {
                    continue;
                }
                let hit = tokens[start..end]
                    .iter()
                    .zip(pattern)
                    .all(|(token, expected)| token.text == *expected);
                if hit {
                    matches.push(start..end);
                }
            }
        }

        matches.sort_by_key(|m| (m.start, m.end));
        let mut merged: Vec<Range<usize>> = Vec::with_capacity(matches.len());
        for m in matches {
            match merged.last_mut() {
                Some(last) if m.start < last.end => last.end = last.end.max(m.end),
                _ => merged.push(m),
            }
        }
        merged
    }

    /// Surface text of every artist mention, in order, duplicates kept.
    pub fn find_artists(&self, doc: &AnnotatedDoc) -> Vec<String> {
        let artists: Vec<String> = self
            .find_spans(doc)
            .into_iter()
            .map(|span| doc.span_text(span).to_owned())
            .collect();
        for artist in &artists {
            debug!(artist = %artist, "Recognized artist");
        }
        artists
    }
}
