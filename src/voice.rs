//! Voice session management.
//!
//! Thin glue over Songbird: joining and leaving a guild voice channel and
//! playing the configured alarm clip on a live call. Codec and container
//! handling is entirely Songbird's concern (mp3 enabled via symphonia).

use std::path::Path;
use std::sync::Arc;

use serenity::all::{ChannelId, GuildId};
use songbird::input::File;
use songbird::{Call, Songbird};
use tokio::sync::Mutex;

use crate::error::AppError;

/// Joins the given voice channel, neither self-deafened nor self-muted.
///
/// On failure any partially-created call is removed before the error is
/// propagated, so a failed join leaves no voice state behind.
///
/// # Arguments
/// - `manager` - the Songbird voice manager registered on the client
/// - `guild_id` - guild owning the channel
/// - `channel_id` - voice channel to join
///
/// # Returns
/// - `Ok` with the call handle, ready to play audio
/// - `Err(AppError)` if the gateway join or the deafen/mute update fails
pub async fn connect(
    manager: &Songbird,
    guild_id: GuildId,
    channel_id: ChannelId,
) -> Result<Arc<Mutex<Call>>, AppError> {
    let call = match manager.join(guild_id, channel_id).await {
        Ok(call) => call,
        Err(e) => {
            // A failed join can leave a half-open call registered
            let _ = manager.remove(guild_id).await;
            return Err(e.into());
        }
    };

    {
        let mut handle = call.lock().await;
        handle.deafen(false).await?;
        handle.mute(false).await?;
    }

    tracing::info!("Joined voice channel {channel_id} in guild {guild_id}");

    Ok(call)
}

/// Leaves the guild's voice channel and drops its call.
///
/// Safe to call once per successful [`connect`].
pub async fn disconnect(manager: &Songbird, guild_id: GuildId) -> Result<(), AppError> {
    manager.remove(guild_id).await?;
    tracing::info!("Left voice channel in guild {guild_id}");
    Ok(())
}

/// Plays the alarm clip on the call.
///
/// The file is read lazily by Songbird's driver; a missing or undecodable
/// file surfaces as a playback log line, not an error here.
pub async fn play_clip(call: &Arc<Mutex<Call>>, path: &Path) {
    tracing::info!("Playing alarm clip {}", path.display());
    let input = File::new(path.to_path_buf());
    let _track = call.lock().await.play_input(input.into());
}
