//! Error types for the bot.
//!
//! This module provides the application's error hierarchy. The `AppError` enum
//! serves as the top-level error type that wraps configuration, Discord, and
//! voice-transport errors. Most variants use `#[from]` for automatic conversion.

pub mod config;

use thiserror::Error;

use crate::error::config::ConfigError;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Voice channel join/leave error from Songbird.
    #[error(transparent)]
    VoiceErr(#[from] songbird::error::JoinError),

    /// The songbird voice client was not registered on the Serenity client.
    ///
    /// Indicates a startup wiring problem rather than a user mistake.
    #[error("voice client was not initialised at startup")]
    VoiceNotInitialized,

    /// An interaction arrived without the data a command requires.
    ///
    /// # Fields
    /// - Message describing what was missing or malformed
    #[error("{0}")]
    InvalidInteraction(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
