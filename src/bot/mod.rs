//! Discord bot integration.
//!
//! This module wires the bot to the Discord gateway and dispatches the three
//! application commands (`ping`, `join`, `leave`) to the voice and scheduler
//! subsystems. The bot registers its commands against a single configured
//! guild on `ready` and keeps at most one alarm session alive at a time.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Receive guild and interaction events
//! - `GUILD_VOICE_STATES` - Required by Songbird to track voice connections

pub mod commands;
pub mod start;
