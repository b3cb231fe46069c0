//! Annotation boundary: tokens, part-of-speech tags and noun chunks.
//!
//! The dialogue engine only ever sees an [`AnnotatedDoc`]. Where it comes
//! from is hidden behind the [`Annotator`] trait; [`lexicon::LexiconAnnotator`]
//! is the built-in rule-based implementation.

pub mod lexicon;

use std::ops::Range;

use crate::error::Result;

/// Coarse part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pos {
    Verb,
    Noun,
    Propn,
    Pron,
    Adj,
    Adv,
    Punct,
    Other,
}

/// A single token with its surface form, lowercased form and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub lower: String,
    pub pos: Pos,
    /// Byte offset of `text` inside the source message.
    pub offset: usize,
}

impl Token {
    pub fn new(text: &str, pos: Pos, offset: usize) -> Self {
        Self {
            text: text.to_owned(),
            lower: text.to_lowercase(),
            pos,
            offset,
        }
    }

    fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// An annotated message. Immutable once built.
#[derive(Debug, Clone)]
pub struct AnnotatedDoc {
    text: String,
    tokens: Vec<Token>,
    noun_chunks: Vec<Range<usize>>,
}

impl AnnotatedDoc {
    /// Build a document from the source text, its tokens and noun-chunk
    /// spans (token index ranges, end exclusive).
    pub fn new(text: impl Into<String>, tokens: Vec<Token>, noun_chunks: Vec<Range<usize>>) -> Self {
        Self {
            text: text.into(),
            tokens,
            noun_chunks,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Noun-chunk spans in document order.
    pub fn noun_chunks(&self) -> &[Range<usize>] {
        &self.noun_chunks
    }

    /// Original surface text covered by a token span, inner whitespace
    /// included. Empty or out-of-range spans render as "".
    pub fn span_text(&self, span: Range<usize>) -> &str {
        if span.start >= span.end || span.end > self.tokens.len() {
            return "";
        }
        let start = self.tokens[span.start].offset;
        let end = self.tokens[span.end - 1].end();
        self.text.get(start..end).unwrap_or("")
    }
}

/// Turns raw message text into an [`AnnotatedDoc`].
pub trait Annotator: Send + Sync {
    fn annotate(&self, text: &str) -> Result<AnnotatedDoc>;
}
