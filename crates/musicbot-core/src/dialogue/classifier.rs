//! Message signals: greeting, question mark, artists, part-of-speech breakdown.

use super::entities::EntityRecognizer;
use super::phrases::GREETING_WORDS;
use crate::nlp::{AnnotatedDoc, Pos};

/// Lowercased words of a message grouped by part of speech.
///
/// `noun_chunks` keep their surface casing so they can be echoed back;
/// compare them with `to_lowercase()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosBreakdown {
    pub verbs: Vec<String>,
    pub nouns: Vec<String>,
    pub pronouns: Vec<String>,
    pub adjectives: Vec<String>,
    pub adverbs: Vec<String>,
    pub noun_chunks: Vec<String>,
    pub words: Vec<String>,
}

impl PosBreakdown {
    pub fn from_doc(doc: &AnnotatedDoc) -> Self {
        let mut pb = Self::default();
        for token in doc.tokens() {
            pb.words.push(token.lower.clone());
            let bucket = match token.pos {
                Pos::Verb => &mut pb.verbs,
                Pos::Noun | Pos::Propn => &mut pb.nouns,
                Pos::Pron => &mut pb.pronouns,
                Pos::Adj => &mut pb.adjectives,
                Pos::Adv => &mut pb.adverbs,
                Pos::Punct | Pos::Other => continue,
            };
            bucket.push(token.lower.clone());
        }
        pb.noun_chunks = doc
            .noun_chunks()
            .iter()
            .map(|span| doc.span_text(span.clone()).to_owned())
            .collect();
        pb
    }

    pub fn has_verb(&self, verb: &str) -> bool {
        self.verbs.iter().any(|v| v == verb)
    }

    pub fn has_any_verb(&self, verbs: &[&str]) -> bool {
        self.verbs.iter().any(|v| verbs.contains(&v.as_str()))
    }

    pub fn has_any_noun(&self, nouns: &[&str]) -> bool {
        self.nouns.iter().any(|n| nouns.contains(&n.as_str()))
    }

    pub fn has_pronoun(&self, pronoun: &str) -> bool {
        self.pronouns.iter().any(|p| p == pronoun)
    }

    pub fn has_adverb(&self, adverb: &str) -> bool {
        self.adverbs.iter().any(|a| a == adverb)
    }

    pub fn has_any_word(&self, words: &[&str]) -> bool {
        self.words.iter().any(|w| words.contains(&w.as_str()))
    }

    /// First noun chunk whose lowercased text is not in `skip`.
    pub fn first_chunk_except(&self, skip: &[&str]) -> Option<&str> {
        self.noun_chunks
            .iter()
            .find(|chunk| !skip.contains(&chunk.to_lowercase().as_str()))
            .map(String::as_str)
    }
}

/// Extracts dialogue signals from annotated messages.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    recognizer: EntityRecognizer,
}

impl Classifier {
    pub fn new(recognizer: EntityRecognizer) -> Self {
        Self { recognizer }
    }

    pub fn contains_greeting(&self, doc: &AnnotatedDoc) -> bool {
        doc.tokens()
            .iter()
            .any(|t| GREETING_WORDS.contains(&t.lower.as_str()))
    }

    /// Only a literal `?` token counts.
    pub fn contains_question(&self, doc: &AnnotatedDoc) -> bool {
        doc.tokens().iter().any(|t| t.text == "?")
    }

    pub fn extract_artists(&self, doc: &AnnotatedDoc) -> Vec<String> {
        self.recognizer.find_artists(doc)
    }

    pub fn pos_breakdown(&self, doc: &AnnotatedDoc) -> PosBreakdown {
        PosBreakdown::from_doc(doc)
    }
}
