//! Canned response pools and the random source that picks from them.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Words that mark a message as a greeting (compared lowercased).
pub const GREETING_WORDS: &[&str] = &["hi", "hello", "yo", "sup", "howdy", "hey", "hiya"];

/// Words that tie a question to music (compared against lowercased tokens).
pub const MUSIC_WORDS: &[&str] = &[
    "music",
    "musician",
    "musicians",
    "band",
    "artist",
    "artists",
    "bands",
];

pub const GREETINGS: &[&str] = &["Hey there!", "Hello!", "Hiya!"];

/// Templates with a single `{}` slot for the user's name.
pub const GREETINGS_WITH_NAME: &[&str] =
    &["Hey {}", "Hi {}!", "Hello again, {}", "Welcome back, {}"];

pub const INTRODUCTION: &str =
    "I am MusicBot 1.0. I can recommend some artist if you tell me what you like.";

pub const ASK_FOR_ARTISTS: &[&str] = &[
    "What artists or bands do you like?",
    "Can you tell me some artists that you like?",
    "Which artists do you listen to?",
];

pub const LOOKING_FOR_ARTISTS: &[&str] = &[
    "Okay, I'm going to look for artists similar to ",
    "I might know something kinda like ",
    "Let me see, I might know ",
];

pub const UNKNOWN_QUESTION: &[&str] = &[
    "I don't know that, but I can help you find some artists if you tell me what you listen to!",
    "I'm not sure.. I only know about musicians and bands. Tell me, which artists do you like?",
    "My knowledge is limited to music only.. maybe you could tell me what kind of artists you like?",
];

pub const UNKNOWN_STATEMENT: &[&str] = &["Okay, great!", "Cool 😊"];

/// "If you like ..." openers for a recommendation list.
pub const IF_YOU_LIKE: &[&str] = &["If you like ", "Since you listen to ", "Similar to "];

/// "... you might also like:" closers, each ending in a newline.
pub const YOU_MIGHT_LIKE: &[&str] = &[", you might also like:\n", ", I can recommend:\n"];

pub const CAN_RECOMMEND: &str = "Yes, I can recommend some artists! ";
pub const CAN_ONLY_RECOMMEND: &str = "No, but I can recommend some music for you. ";
pub const CANNOT_DO_THAT: &str = "Unfortunately not. I can only recommend music. ";
pub const WHO_AM_I: &str = "I am MusicBot 1.0. I can help you with recommending artists. ";
pub const DOING_GREAT: &str = "I am doing great, how are you? 😊 ";
pub const KNOW_MUSIC: &str = "I can recommend some artists! ";

/// Picks canned phrases uniformly at random.
///
/// The generator is injected so tests can seed it.
#[derive(Debug, Clone)]
pub struct PhraseBank {
    rng: StdRng,
}

impl PhraseBank {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Pick one entry of `pool`. An empty pool yields "".
    pub fn pick(&mut self, pool: &[&'static str]) -> &'static str {
        pool.choose(&mut self.rng).copied().unwrap_or_default()
    }

    pub fn greeting(&mut self) -> &'static str {
        self.pick(GREETINGS)
    }

    pub fn greeting_for(&mut self, name: &str) -> String {
        self.pick(GREETINGS_WITH_NAME).replacen("{}", name, 1)
    }

    pub fn ask_for_artists(&mut self) -> &'static str {
        self.pick(ASK_FOR_ARTISTS)
    }

    /// A fixed lead-in followed by a request for the user's artists.
    pub fn with_artist_prompt(&mut self, lead: &str) -> String {
        format!("{}{}", lead, self.ask_for_artists())
    }

    pub fn unknown_question(&mut self) -> &'static str {
        self.pick(UNKNOWN_QUESTION)
    }

    pub fn unknown_statement(&mut self) -> &'static str {
        self.pick(UNKNOWN_STATEMENT)
    }
}

impl Default for PhraseBank {
    fn default() -> Self {
        Self::from_entropy()
    }
}
