//! Dialogue engine: one decision per inbound message.
//!
//! The engine:
//! 1. Annotates the message text
//! 2. Extracts signals (greeting, artists, question mark)
//! 3. Picks exactly one branch, in priority order:
//!    greeting → artist mention → question → statement
//! 4. Sends the replies for that branch to a [`ReplySink`], in order, as
//!    soon as each one is ready
//! 5. Remembers the sender once the branch has finished

pub mod classifier;
pub mod entities;
pub mod lists;
pub mod memory;
pub mod phrases;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::catalog::recommend::Recommender;
use crate::error::Result;
use crate::nlp::Annotator;
use classifier::{Classifier, PosBreakdown};
use lists::or_list;
use memory::UserMemory;
use phrases::{PhraseBank, MUSIC_WORDS};

/// Noun chunks never echoed back by the "you are ..." retort.
const SELF_REFERENCES: &[&str] = &["you", "i"];

/// Noun chunks never echoed back by the "I don't know ..." answer.
const VAGUE_OBJECTS: &[&str] = &[
    "what",
    "who",
    "you",
    "anything",
    "something",
    "anybody",
    "somebody",
];

const ABILITY_VERBS: &[&str] = &["can", "could", "would"];
const RECOMMEND_VERBS: &[&str] = &["recommend", "suggest"];
const KNOWLEDGE_VERBS: &[&str] = &["know", "recognize", "recognise", "think"];
const IDENTITY_NOUNS: &[&str] = &["who", "what"];

/// Which branch handled a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueAct {
    Greeting,
    ArtistMention,
    Question,
    Statement,
}

/// Where the engine delivers replies for the message being handled.
///
/// Replies arrive one at a time in send order. A reply is delivered before
/// any slower work for the same message starts, so the acknowledgement of an
/// artist mention goes out ahead of the catalog lookups.
#[async_trait]
pub trait ReplySink: Send {
    async fn send(&mut self, reply: String);
}

#[async_trait]
impl ReplySink for Vec<String> {
    async fn send(&mut self, reply: String) {
        self.push(reply);
    }
}

pub struct DialogueEngine {
    annotator: Box<dyn Annotator>,
    classifier: Classifier,
    recommender: Recommender,
    phrases: PhraseBank,
    users: UserMemory,
}

impl DialogueEngine {
    pub fn new(
        annotator: Box<dyn Annotator>,
        classifier: Classifier,
        recommender: Recommender,
        phrases: PhraseBank,
        users: UserMemory,
    ) -> Self {
        Self {
            annotator,
            classifier,
            recommender,
            phrases,
            users,
        }
    }

    pub fn users(&self) -> &UserMemory {
        &self.users
    }

    /// Handle one message from `sender_id`, sending replies to `out`.
    ///
    /// Replies already sent stay sent when a later step fails. On error
    /// nothing is remembered about the sender.
    pub async fn respond(
        &mut self,
        text: &str,
        sender_id: &str,
        sender_name: &str,
        out: &mut dyn ReplySink,
    ) -> Result<DialogueAct> {
        let doc = self.annotator.annotate(text)?;
        let greeting = self.classifier.contains_greeting(&doc);
        let artists = self.classifier.extract_artists(&doc);

        let act = if greeting {
            if self.users.contains(sender_id) {
                out.send(self.phrases.greeting_for(sender_name)).await;
            } else {
                out.send(self.phrases.greeting().to_owned()).await;
                out.send(phrases::INTRODUCTION.to_owned()).await;
            }
            out.send(self.phrases.ask_for_artists().to_owned()).await;
            DialogueAct::Greeting
        } else if !artists.is_empty() {
            let ack = format!(
                "{}{}...",
                self.phrases.pick(phrases::LOOKING_FOR_ARTISTS),
                or_list(&artists)
            );
            out.send(ack).await;
            let recommendation = self.recommender.recommend(&artists, &mut self.phrases).await?;
            out.send(recommendation).await;
            DialogueAct::ArtistMention
        } else if self.classifier.contains_question(&doc) {
            let pb = self.classifier.pos_breakdown(&doc);
            out.send(self.answer_question(&pb)).await;
            DialogueAct::Question
        } else {
            let pb = self.classifier.pos_breakdown(&doc);
            out.send(self.answer_statement(&pb)).await;
            DialogueAct::Statement
        };

        info!(user_id = sender_id, act = ?act, "Message handled");
        self.users.remember(sender_id, sender_name);
        Ok(act)
    }

    /// Reply to a statement. "You are X" gets "No, you are X!"; anything
    /// else gets a generic acknowledgement.
    pub fn answer_statement(&mut self, pb: &PosBreakdown) -> String {
        if !(pb.has_pronoun("you") && pb.has_verb("are")) {
            return self.phrases.unknown_statement().to_owned();
        }

        let candidate = pb
            .first_chunk_except(SELF_REFERENCES)
            .or_else(|| pb.adverbs.first().map(String::as_str))
            .or_else(|| pb.adjectives.first().map(String::as_str));

        match candidate {
            Some(c) => format!("No, you are {}!", c),
            None => self.phrases.unknown_statement().to_owned(),
        }
    }

    /// Reply to a question addressed to the bot.
    pub fn answer_question(&mut self, pb: &PosBreakdown) -> String {
        if !pb.has_pronoun("you") {
            return self.phrases.unknown_question().to_owned();
        }

        let about_music = pb.has_any_word(MUSIC_WORDS);

        if pb.has_any_verb(ABILITY_VERBS) {
            debug!(about_music, "Ability question");
            let lead = match (about_music, pb.has_any_verb(RECOMMEND_VERBS)) {
                (true, true) => phrases::CAN_RECOMMEND,
                (true, false) => phrases::CAN_ONLY_RECOMMEND,
                (false, _) => phrases::CANNOT_DO_THAT,
            };
            return self.phrases.with_artist_prompt(lead);
        }

        if pb.has_verb("are") {
            if pb.has_any_noun(IDENTITY_NOUNS) {
                return self.phrases.with_artist_prompt(phrases::WHO_AM_I);
            }
            if pb.has_adverb("how") {
                return self.phrases.with_artist_prompt(phrases::DOING_GREAT);
            }
            return self.phrases.unknown_question().to_owned();
        }

        if pb.has_any_verb(KNOWLEDGE_VERBS) {
            if about_music {
                return self.phrases.with_artist_prompt(phrases::KNOW_MUSIC);
            }
            let subject = pb.first_chunk_except(VAGUE_OBJECTS).unwrap_or("that");
            return format!(
                "I don't know {}. My knowledge is limited to musicians and bands only.. 🙁",
                subject
            );
        }

        self.phrases.unknown_question().to_owned()
    }
}
