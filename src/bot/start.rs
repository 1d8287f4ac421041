use std::sync::Arc;

use serenity::all::{Client, Context, EventHandler, GatewayIntents, GuildId, Interaction, Ready};
use serenity::async_trait;
use songbird::SerenityInit;
use tokio::sync::Mutex;

use crate::bot::commands;
use crate::config::Config;
use crate::error::AppError;
use crate::scheduler::AlarmScheduler;

/// An active alarm session: one voice connection with its armed alarms.
///
/// Created by `/join`, consumed by `/leave`. The scheduler sits behind an
/// `Arc<Mutex<…>>` so the one-shot fire can arm the repeating alarm from
/// inside its own callback.
pub struct Session {
    pub guild_id: GuildId,
    pub scheduler: Arc<Mutex<AlarmScheduler>>,
}

/// Discord bot event handler
pub struct Handler {
    pub config: Config,
    /// At most one session at a time; a new `/join` replaces the old one.
    pub session: Mutex<Option<Session>>,
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    ///
    /// Registers the guild application commands. A registration failure is
    /// logged and the bot stays online with whatever commands Discord already
    /// has for it.
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!("{} is connected to Discord!", ready.user.name);

        let guild_id = GuildId::new(self.config.guild_id);
        match guild_id
            .set_commands(&ctx.http, commands::registration())
            .await
        {
            Ok(registered) => {
                tracing::info!(
                    "Registered {} application commands in guild {guild_id}",
                    registered.len()
                );
            }
            Err(e) => {
                tracing::error!("Failed to register application commands: {e}");
            }
        }
    }

    /// Called for every inbound interaction; dispatches slash commands
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        commands::dispatch(self, &ctx, command).await;
    }
}

/// Starts the Discord bot in a blocking manner
///
/// Builds the Serenity client with Songbird registered for voice and runs it
/// until shutdown. The bot authenticates with the token from configuration.
///
/// # Arguments
/// - `config` - Application configuration
///
/// # Returns
/// - `Ok(())` if the bot runs to a clean shutdown
/// - `Err(AppError)` if client construction or the gateway connection fails
pub async fn start_bot(config: Config) -> Result<(), AppError> {
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_VOICE_STATES;

    let token = config.discord_bot_token.clone();
    let handler = Handler {
        config,
        session: Mutex::new(None),
    };

    let mut client = Client::builder(&token, intents)
        .event_handler(handler)
        .register_songbird()
        .await?;

    tracing::info!("Starting Discord bot...");

    // Blocks until shutdown
    client.start().await?;

    Ok(())
}
