//! musicbot-core: the rule-based music recommendation chat bot.
//!
//! - [`config`] — Typed configuration loading from JSON
//! - [`nlp`] — Annotation boundary and the built-in lexicon annotator
//! - [`dialogue`] — Classifier, entity recognizer, phrase bank and the dialogue engine
//! - [`catalog`] — Music catalog trait, Spotify client and the recommender
//! - [`bus`] — Message bus between transports and the engine
//! - [`gateway`] — Dialogue bridge and chat transports
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use musicbot_core::catalog::recommend::Recommender;
//! use musicbot_core::catalog::spotify::SpotifyCatalog;
//! use musicbot_core::config::Config;
//! use musicbot_core::dialogue::classifier::Classifier;
//! use musicbot_core::dialogue::entities::EntityRecognizer;
//! use musicbot_core::dialogue::memory::UserMemory;
//! use musicbot_core::dialogue::phrases::PhraseBank;
//! use musicbot_core::dialogue::DialogueEngine;
//! use musicbot_core::nlp::lexicon::LexiconAnnotator;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let recognizer = EntityRecognizer::from_file(&config.artists_path())?;
//! let catalog = SpotifyCatalog::new(reqwest::Client::new(), &config.catalog);
//!
//! let mut engine = DialogueEngine::new(
//!     Box::new(LexiconAnnotator::new()),
//!     Classifier::new(recognizer),
//!     Recommender::new(Arc::new(catalog), 10, 10),
//!     PhraseBank::from_entropy(),
//!     UserMemory::new(),
//! );
//!
//! let mut replies: Vec<String> = Vec::new();
//! engine.respond("I like Pink Floyd", "42", "Ada", &mut replies).await?;
//! for reply in replies {
//!     println!("{}", reply);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod catalog;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod gateway;
pub mod nlp;

pub use error::{BotError, Result};
