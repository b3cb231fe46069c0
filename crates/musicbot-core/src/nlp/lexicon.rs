//! Rule-based English annotator.
//!
//! Closed-class words come from small word lists; everything else is tagged
//! from its shape (capitalisation, suffix). Good enough for chat-sized
//! messages, and fully deterministic.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use super::{AnnotatedDoc, Annotator, Pos, Token};
use crate::error::{BotError, Result};

const PRONOUNS: &[&str] = &[
    "i", "me", "myself", "you", "yourself", "he", "him", "she", "her", "it", "we", "us", "they",
    "them", "something", "anything", "nothing", "everything", "somebody",
    "anybody", "nobody", "everybody", "someone", "anyone", "everyone",
];

// Wh-pronouns act as nominal heads so they show up among nouns and noun chunks.
const WH_NOUNS: &[&str] = &["who", "what"];

/// Common nouns whose shape would otherwise mislead the suffix rules.
const NOUNS: &[&str] = &[
    "music", "musician", "musicians", "band", "bands", "artist", "artists", "song", "songs",
    "album", "albums", "genre", "logic", "topic", "comic", "magic", "lyric", "lyrics", "thing",
    "things", "morning", "evening", "wedding", "ceiling",
];

const VERBS: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "do", "does", "did", "have", "has",
    "had", "can", "could", "would", "will", "shall", "should", "may", "might", "must", "'re",
    "'s", "'m", "'ve", "'ll", "'d", "’re", "’s", "’m", "can't", "won't", "like",
    "love", "know", "think", "recognize", "recognise", "recommend", "suggest", "listen", "hear",
    "tell", "help", "want", "need", "play", "sing", "go", "get", "make", "see", "say", "enjoy",
    "hate", "prefer", "give", "find", "let", "try", "mean", "look", "sound", "sounds",
];

const ADVERBS: &[&str] = &[
    "how", "why", "where", "when", "not", "n't", "very", "really", "so", "too", "also", "just",
    "now", "then", "here", "there", "always", "never", "often", "sometimes", "well", "maybe",
    "again", "still", "already", "even", "only", "almost", "quite", "pretty",
];

const ADJECTIVES: &[&str] = &[
    "good", "bad", "great", "cool", "nice", "awesome", "stupid", "dumb", "smart", "funny",
    "boring", "new", "old", "best", "worst", "favorite", "favourite", "little", "big", "weird",
    "crazy", "amazing", "terrible", "horrible", "lazy", "silly", "fine", "happy", "sad", "slow",
    "fast", "clever", "rude", "cute", "popular", "underground", "similar", "other",
];

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "my", "your", "his", "its", "our", "their", "this", "that", "these",
    "those", "some", "any", "no", "every", "each", "all", "which",
];

const FUNCTION_WORDS: &[&str] = &[
    "and", "or", "but", "to", "of", "in", "on", "at", "for", "with", "about", "from", "by", "if",
    "as", "than", "because", "please", "thanks", "yes", "oh", "ok", "okay", "lol", "hi", "hello",
    "hey", "yo", "sup", "hiya", "howdy",
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ish"];

/// Enclitics split off the end of a word, as in "Queen's" or "you're".
const CLITICS: &[&str] = &["'s", "'re", "'m", "'ve", "'ll", "'d", "’s", "’re", "’m"];

/// Stems that keep their "n't" attached ("can't", "won't").
const IRREGULAR_NEGATIONS: &[&str] = &["ca", "wo", "sha"];

/// Characters split off the front of a word.
const LEADING_PUNCT: &[char] = &['"', '(', '[', '\'', '‘'];

/// Characters split off the end of a word.
const TRAILING_PUNCT: &[char] = &['.', ',', '!', '?', ';', ':', '"', ')', ']'];

/// Punctuation that ends a sentence; the next word is sentence-initial.
const SENTENCE_END: &[&str] = &[".", "!", "?"];

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\S+").expect("static regex"))
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+([.,:]\d+)*$").expect("static regex"))
}

/// The default [`Annotator`]: whitespace tokenizer, lexicon tagger and a
/// greedy noun-chunk segmenter.
#[derive(Debug, Clone, Default)]
pub struct LexiconAnnotator;

impl LexiconAnnotator {
    pub fn new() -> Self {
        Self
    }

    fn tokenize(text: &str) -> Vec<(usize, &str)> {
        let mut pieces = Vec::new();
        // A single quote opened at the start of an earlier word closes at
        // the end of a later one: 'Pink Floyd'.
        let mut open_quote = false;

        for m in word_regex().find_iter(text) {
            let mut word = m.as_str();
            let mut offset = m.start();

            while let Some(c) = word.chars().next() {
                if !LEADING_PUNCT.contains(&c) || word.len() == c.len_utf8() || Self::is_clitic(word) {
                    break;
                }
                if c == '\'' || c == '‘' {
                    open_quote = true;
                }
                pieces.push((offset, &word[..c.len_utf8()]));
                offset += c.len_utf8();
                word = &word[c.len_utf8()..];
            }

            let mut trailing = Vec::new();
            while let Some(c) = word.chars().next_back() {
                let closes_quote = open_quote && (c == '\'' || c == '’');
                if !(TRAILING_PUNCT.contains(&c) || closes_quote) || word.len() == c.len_utf8() {
                    break;
                }
                if closes_quote {
                    open_quote = false;
                }
                let cut = word.len() - c.len_utf8();
                trailing.push((offset + cut, &word[cut..]));
                word = &word[..cut];
            }

            if let Some(cut) = Self::clitic_split(word) {
                pieces.push((offset, &word[..cut]));
                pieces.push((offset + cut, &word[cut..]));
            } else if !word.is_empty() {
                pieces.push((offset, word));
            }
            pieces.extend(trailing.into_iter().rev());
        }
        pieces
    }

    fn is_clitic(word: &str) -> bool {
        CLITICS.iter().any(|c| word.eq_ignore_ascii_case(c)) || word.eq_ignore_ascii_case("n't")
    }

    /// Byte index where a trailing clitic starts, if the word has one.
    fn clitic_split(word: &str) -> Option<usize> {
        let ends_with = |suffix: &str| {
            word.len() > suffix.len()
                && word.is_char_boundary(word.len() - suffix.len())
                && word[word.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
        };

        if ends_with("n't") {
            let stem = &word[..word.len() - 3];
            if IRREGULAR_NEGATIONS.iter().any(|s| stem.eq_ignore_ascii_case(s)) {
                return None;
            }
            return Some(stem.len());
        }
        CLITICS
            .iter()
            .find(|&&c| ends_with(c))
            .map(|c| word.len() - c.len())
    }

    /// `initial` is true for the first word of a sentence, whose capital
    /// letter says nothing about it being a name.
    fn tag(word: &str, lower: &str, initial: bool) -> Pos {
        if !word.chars().any(char::is_alphanumeric) {
            return Pos::Punct;
        }
        if number_regex().is_match(word) {
            return Pos::Other;
        }
        if PRONOUNS.contains(&lower) {
            return Pos::Pron;
        }
        if WH_NOUNS.contains(&lower) || NOUNS.contains(&lower) {
            return Pos::Noun;
        }
        if VERBS.contains(&lower) {
            return Pos::Verb;
        }
        if ADVERBS.contains(&lower) {
            return Pos::Adv;
        }
        if ADJECTIVES.contains(&lower) {
            return Pos::Adj;
        }
        if DETERMINERS.contains(&lower) || FUNCTION_WORDS.contains(&lower) {
            return Pos::Other;
        }
        if !initial && word.chars().next().is_some_and(char::is_uppercase) {
            return Pos::Propn;
        }
        if lower.ends_with("ly") {
            return Pos::Adv;
        }
        if ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
            return Pos::Adj;
        }
        if lower.ends_with("ing") || lower.ends_with("ed") {
            return Pos::Verb;
        }
        Pos::Noun
    }

    /// Maximal runs of determiners, adjectives and nouns that end in a noun,
    /// plus every lone pronoun.
    fn noun_chunks(tokens: &[Token]) -> Vec<Range<usize>> {
        let mut chunks = Vec::new();
        let mut run_start: Option<usize> = None;
        let mut last_noun: Option<usize> = None;

        let close = |chunks: &mut Vec<Range<usize>>, start: Option<usize>, noun: Option<usize>| {
            if let (Some(s), Some(n)) = (start, noun) {
                chunks.push(s..n + 1);
            }
        };

        for (i, token) in tokens.iter().enumerate() {
            let nominal = matches!(token.pos, Pos::Noun | Pos::Propn);
            let modifier = token.pos == Pos::Adj || DETERMINERS.contains(&token.lower.as_str());

            if nominal || modifier {
                if run_start.is_none() {
                    run_start = Some(i);
                }
                if nominal {
                    last_noun = Some(i);
                }
                continue;
            }

            close(&mut chunks, run_start.take(), last_noun.take());
            if token.pos == Pos::Pron {
                chunks.push(i..i + 1);
            }
        }
        close(&mut chunks, run_start, last_noun);
        chunks
    }
}

impl Annotator for LexiconAnnotator {
    fn annotate(&self, text: &str) -> Result<AnnotatedDoc> {
        if text.trim().is_empty() {
            return Err(BotError::Annotation("message has no text".into()));
        }

        let mut initial = true;
        let tokens: Vec<Token> = Self::tokenize(text)
            .into_iter()
            .map(|(offset, word)| {
                let lower = word.to_lowercase();
                let pos = Self::tag(word, &lower, initial);
                if pos != Pos::Punct {
                    initial = false;
                } else if SENTENCE_END.contains(&word) {
                    initial = true;
                }
                Token {
                    text: word.to_owned(),
                    lower,
                    pos,
                    offset,
                }
            })
            .collect();

        let chunks = Self::noun_chunks(&tokens);
        Ok(AnnotatedDoc::new(text, tokens, chunks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotate(text: &str) -> AnnotatedDoc {
        LexiconAnnotator::new().annotate(text).unwrap()
    }

    fn texts(doc: &AnnotatedDoc) -> Vec<&str> {
        doc.tokens().iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_splits_trailing_punctuation() {
        let doc = annotate("hi, who are you?");
        assert_eq!(texts(&doc), vec!["hi", ",", "who", "are", "you", "?"]);
        assert_eq!(doc.tokens()[5].pos, Pos::Punct);
    }

    #[test]
    fn test_keeps_inner_punctuation() {
        let doc = annotate("I love AC/DC and Guns N' Roses!");
        assert_eq!(
            texts(&doc),
            vec!["I", "love", "AC/DC", "and", "Guns", "N'", "Roses", "!"]
        );
    }

    #[test]
    fn test_offsets_point_into_source() {
        let text = "  do you know  Pink Floyd?";
        let doc = annotate(text);
        for token in doc.tokens() {
            assert_eq!(&text[token.offset..token.offset + token.text.len()], token.text);
        }
    }

    #[test]
    fn test_closed_class_tags() {
        let doc = annotate("how are you");
        let tags: Vec<Pos> = doc.tokens().iter().map(|t| t.pos).collect();
        assert_eq!(tags, vec![Pos::Adv, Pos::Verb, Pos::Pron]);

        let doc = annotate("can you recommend music");
        let tags: Vec<Pos> = doc.tokens().iter().map(|t| t.pos).collect();
        assert_eq!(tags, vec![Pos::Verb, Pos::Pron, Pos::Verb, Pos::Noun]);
    }

    #[test]
    fn test_open_class_heuristics() {
        let doc = annotate("yes Radiohead sounds quickly delicious 42");
        let tags: Vec<Pos> = doc.tokens().iter().map(|t| t.pos).collect();
        assert_eq!(
            tags,
            vec![Pos::Other, Pos::Propn, Pos::Verb, Pos::Adv, Pos::Adj, Pos::Other]
        );
    }

    #[test]
    fn test_sentence_initial_capital_is_not_a_name() {
        let doc = annotate("Robots rule. Tell me about Radiohead");
        let tags: Vec<Pos> = doc.tokens().iter().map(|t| t.pos).collect();
        assert_eq!(
            tags,
            vec![Pos::Noun, Pos::Noun, Pos::Punct, Pos::Verb, Pos::Pron, Pos::Other, Pos::Propn]
        );
    }

    #[test]
    fn test_ic_words_are_nouns() {
        for text in ["I love music", "the logic", "a comic", "my topic"] {
            let doc = annotate(text);
            assert_eq!(doc.tokens().last().unwrap().pos, Pos::Noun, "{}", text);
        }
        let doc = annotate("do you know the logic?");
        let chunks: Vec<&str> = doc
            .noun_chunks()
            .iter()
            .map(|c| doc.span_text(c.clone()))
            .collect();
        assert_eq!(chunks, vec!["you", "the logic"]);
    }

    #[test]
    fn test_splits_clitics() {
        let doc = annotate("I like Queen's songs");
        assert_eq!(texts(&doc), vec!["I", "like", "Queen", "'s", "songs"]);

        let doc = annotate("you're slow, I don't care");
        assert_eq!(
            texts(&doc),
            vec!["you", "'re", "slow", ",", "I", "do", "n't", "care"]
        );

        let doc = annotate("I can't");
        assert_eq!(texts(&doc), vec!["I", "can't"]);
    }

    #[test]
    fn test_single_quotes_around_names() {
        let doc = annotate("I like 'Pink Floyd' a lot");
        assert_eq!(
            texts(&doc),
            vec!["I", "like", "'", "Pink", "Floyd", "'", "a", "lot"]
        );
        for token in doc.tokens() {
            assert_eq!(&doc.text()[token.offset..token.offset + token.text.len()], token.text);
        }
    }

    #[test]
    fn test_noun_chunks() {
        let doc = annotate("you are a stupid robot");
        let chunks: Vec<&str> = doc
            .noun_chunks()
            .iter()
            .map(|c| doc.span_text(c.clone()))
            .collect();
        assert_eq!(chunks, vec!["you", "a stupid robot"]);
    }

    #[test]
    fn test_adjective_only_run_is_not_a_chunk() {
        let doc = annotate("you are stupid");
        let chunks: Vec<&str> = doc
            .noun_chunks()
            .iter()
            .map(|c| doc.span_text(c.clone()))
            .collect();
        assert_eq!(chunks, vec!["you"]);
    }

    #[test]
    fn test_empty_text_fails() {
        assert!(LexiconAnnotator::new().annotate("   ").is_err());
    }
}
