//! Application command definitions and dispatch.
//!
//! `/ping` replies immediately; `/join` opens a voice connection and arms the
//! alarm; `/leave` cancels the alarm and tears the connection down. Failures
//! in `/join` and `/leave` are logged and reported back to the invoking user
//! instead of being swallowed.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Timelike};
use serenity::all::{
    ChannelId, ChannelType, CommandDataOptionValue, CommandInteraction, CommandOptionType,
    Context, CreateCommand, CreateCommandOption, CreateInteractionResponse,
    CreateInteractionResponseMessage,
};
use tokio::sync::Mutex;

use crate::bot::start::{Handler, Session};
use crate::error::AppError;
use crate::scheduler::{self, AlarmScheduler};
use crate::voice;

/// Builds the three guild application commands.
pub fn registration() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("ping").description("Replies with Pong!"),
        CreateCommand::new("join")
            .description("Join a voice channel and arm the hourly alarm")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Channel,
                    "channel",
                    "The voice channel to join",
                )
                .channel_types(vec![ChannelType::Voice])
                .required(true),
            ),
        CreateCommand::new("leave")
            .description("Cancel the alarm and leave the voice channel")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Channel,
                    "channel",
                    "The voice channel to leave",
                )
                .channel_types(vec![ChannelType::Voice])
                .required(true),
            ),
    ]
}

/// Routes a command interaction to its handler and sends the reply.
///
/// Every recognized command gets exactly one response: the handler's message
/// on success, or a short description of the failure. Errors are also logged.
pub async fn dispatch(handler: &Handler, ctx: &Context, command: CommandInteraction) {
    let outcome = match command.data.name.as_str() {
        "ping" => Ok("Pong!".to_string()),
        "join" => join(handler, ctx, &command).await,
        "leave" => leave(handler, ctx, &command).await,
        other => {
            tracing::warn!("Ignoring unrecognized command: {other}");
            return;
        }
    };

    let content = match outcome {
        Ok(message) => message,
        Err(e) => {
            tracing::error!("Command /{} failed: {e}", command.data.name);
            format!("Sorry, that didn't work: {e}")
        }
    };

    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new().content(content),
    );
    if let Err(e) = command.create_response(&ctx.http, response).await {
        tracing::error!("Failed to respond to /{}: {e}", command.data.name);
    }
}

/// Handles `/join`: connect, arm the alarm chain, report the initial delay.
async fn join(
    handler: &Handler,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<String, AppError> {
    let guild_id = command.guild_id.ok_or_else(|| {
        AppError::InvalidInteraction("/join only works inside a server".to_string())
    })?;
    let channel_id = voice_channel_option(command)?;

    let manager = songbird::get(ctx)
        .await
        .ok_or(AppError::VoiceNotInitialized)?;

    // A repeated /join replaces the previous session, alarms included,
    // instead of stranding its timers.
    if let Some(previous) = handler.session.lock().await.take() {
        previous.scheduler.lock().await.cancel_all();
        let _ = voice::disconnect(&manager, previous.guild_id).await;
    }

    let call = voice::connect(&manager, guild_id, channel_id).await?;

    let minute = Local::now().minute();
    let delay = scheduler::initial_delay(
        minute,
        handler.config.boundary_minute,
        handler.config.alignment,
    );
    tracing::info!(
        minute,
        delay_ms = delay.as_millis() as u64,
        "Arming alarm for the next boundary"
    );

    let alarm_scheduler = Arc::new(Mutex::new(AlarmScheduler::new()));
    let period = handler.config.repeat_interval;
    let audio_path = handler.config.audio_path.clone();
    let chained = alarm_scheduler.clone();
    alarm_scheduler.lock().await.arm(delay, move || async move {
        voice::play_clip(&call, &audio_path).await;
        chained
            .lock()
            .await
            .arm_repeating(period, move || {
                let call = call.clone();
                let path = audio_path.clone();
                async move {
                    voice::play_clip(&call, &path).await;
                }
            });
    });

    *handler.session.lock().await = Some(Session {
        guild_id,
        scheduler: alarm_scheduler,
    });

    Ok(join_reply(delay))
}

/// Handles `/leave`: cancel the alarms and close the voice connection.
///
/// The channel option is accepted for parity with `/join` but the active
/// session decides what is actually torn down.
async fn leave(
    handler: &Handler,
    ctx: &Context,
    _command: &CommandInteraction,
) -> Result<String, AppError> {
    let manager = songbird::get(ctx)
        .await
        .ok_or(AppError::VoiceNotInitialized)?;

    let Some(session) = handler.session.lock().await.take() else {
        return Ok("There is no alarm session to leave.".to_string());
    };

    session.scheduler.lock().await.cancel_all();
    voice::disconnect(&manager, session.guild_id).await?;

    Ok("Alarm cleared, leaving the voice channel.".to_string())
}

/// Extracts the required voice-channel option from the interaction.
fn voice_channel_option(command: &CommandInteraction) -> Result<ChannelId, AppError> {
    for option in &command.data.options {
        if option.name == "channel" {
            if let CommandDataOptionValue::Channel(channel_id) = &option.value {
                return Ok(*channel_id);
            }
        }
    }
    Err(AppError::InvalidInteraction(
        "missing required channel option".to_string(),
    ))
}

/// The user-facing `/join` confirmation, with the delay rounded down to
/// whole minutes (the on-boundary 1-second case reads as 0 minutes).
fn join_reply(delay: Duration) -> String {
    format!(
        "The alarm will first ring in about {} minute(s).",
        delay.as_secs() / 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests the /join reply for a mid-hour delay.
    ///
    /// Expected: 35 minutes for the 10:15 → 10:50 case
    #[test]
    fn join_reply_reports_whole_minutes() {
        let reply = join_reply(Duration::from_millis(2_100_000));
        assert_eq!(reply, "The alarm will first ring in about 35 minute(s).");
    }

    /// Tests the /join reply when the boundary is hit exactly.
    ///
    /// Expected: the 1-second immediate fire reads as 0 minutes
    #[test]
    fn join_reply_on_boundary_rounds_to_zero() {
        let reply = join_reply(scheduler::IMMEDIATE_FIRE);
        assert_eq!(reply, "The alarm will first ring in about 0 minute(s).");
    }
}
