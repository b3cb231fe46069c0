//! Chat transports.

#[cfg(feature = "telegram")]
pub mod telegram;
