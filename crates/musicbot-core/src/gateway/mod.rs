//! Gateway: chat transports and the bridge that feeds them to the engine.

pub mod bridge;
pub mod channels;

pub use bridge::DialogueBridge;
