use std::path::PathBuf;
use std::time::Duration;

use crate::error::{config::ConfigError, AppError};
use crate::scheduler::Alignment;

const DEFAULT_BOUNDARY_MINUTE: u32 = 50;
const DEFAULT_REPEAT_INTERVAL_SECS: u64 = 3600;
const DEFAULT_AUDIO_PATH: &str = "sound/music.mp3";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_bot_token: String,
    pub guild_id: u64,

    pub boundary_minute: u32,
    pub repeat_interval: Duration,
    pub audio_path: PathBuf,
    pub alignment: Alignment,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let discord_bot_token = std::env::var("DISCORD_BOT_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?;
        let guild_id = std::env::var("DISCORD_GUILD_ID")
            .map_err(|_| ConfigError::MissingEnvVar("DISCORD_GUILD_ID".to_string()))
            .and_then(|raw| parse_guild_id(&raw))?;

        let boundary_minute = match std::env::var("ALARM_BOUNDARY_MINUTE") {
            Ok(raw) => parse_boundary_minute(&raw)?,
            Err(_) => DEFAULT_BOUNDARY_MINUTE,
        };
        let repeat_interval = match std::env::var("ALARM_REPEAT_INTERVAL_SECS") {
            Ok(raw) => parse_repeat_interval(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_REPEAT_INTERVAL_SECS),
        };
        let audio_path = std::env::var("ALARM_AUDIO_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_AUDIO_PATH));
        let alignment = match std::env::var("ALARM_ALIGN_NEXT_HOUR") {
            Ok(raw) => {
                if parse_flag("ALARM_ALIGN_NEXT_HOUR", &raw)? {
                    Alignment::NextHour
                } else {
                    Alignment::Compat
                }
            }
            Err(_) => Alignment::Compat,
        };

        Ok(Self {
            discord_bot_token,
            guild_id,
            boundary_minute,
            repeat_interval,
            audio_path,
            alignment,
        })
    }
}

fn parse_guild_id(raw: &str) -> Result<u64, ConfigError> {
    // Serenity's GuildId rejects zero, so catch it here with a better message
    match raw.parse() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ConfigError::InvalidEnvVar {
            name: "DISCORD_GUILD_ID".to_string(),
            reason: format!("expected a non-zero numeric guild id, got {raw:?}"),
        }),
    }
}

fn parse_boundary_minute(raw: &str) -> Result<u32, ConfigError> {
    let minute: u32 = raw.parse().map_err(|_| ConfigError::InvalidEnvVar {
        name: "ALARM_BOUNDARY_MINUTE".to_string(),
        reason: format!("expected an integer, got {raw:?}"),
    })?;
    if minute > 59 {
        return Err(ConfigError::InvalidEnvVar {
            name: "ALARM_BOUNDARY_MINUTE".to_string(),
            reason: format!("minute-of-hour must be 0-59, got {minute}"),
        });
    }
    Ok(minute)
}

fn parse_repeat_interval(raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidEnvVar {
        name: "ALARM_REPEAT_INTERVAL_SECS".to_string(),
        reason: format!("expected an integer number of seconds, got {raw:?}"),
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            name: "ALARM_REPEAT_INTERVAL_SECS".to_string(),
            reason: "repeat interval must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            reason: format!("expected a boolean (true/false), got {raw:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_boundary_minute() {
        assert_eq!(parse_boundary_minute("50").unwrap(), 50);
        assert_eq!(parse_boundary_minute("0").unwrap(), 0);
        assert_eq!(parse_boundary_minute("59").unwrap(), 59);
    }

    #[test]
    fn rejects_out_of_range_boundary_minute() {
        assert!(parse_boundary_minute("60").is_err());
        assert!(parse_boundary_minute("-1").is_err());
        assert!(parse_boundary_minute("fifty").is_err());
    }

    #[test]
    fn parses_repeat_interval_seconds() {
        assert_eq!(parse_repeat_interval("3600").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn rejects_zero_repeat_interval() {
        assert!(parse_repeat_interval("0").is_err());
        assert!(parse_repeat_interval("hourly").is_err());
    }

    #[test]
    fn parses_alignment_flag_spellings() {
        assert!(parse_flag("ALARM_ALIGN_NEXT_HOUR", "true").unwrap());
        assert!(parse_flag("ALARM_ALIGN_NEXT_HOUR", "1").unwrap());
        assert!(!parse_flag("ALARM_ALIGN_NEXT_HOUR", "FALSE").unwrap());
        assert!(parse_flag("ALARM_ALIGN_NEXT_HOUR", "maybe").is_err());
    }

    #[test]
    fn rejects_malformed_guild_id() {
        assert!(parse_guild_id("not-a-number").is_err());
        assert!(parse_guild_id("0").is_err());
        assert_eq!(parse_guild_id("1016695172718923776").unwrap(), 1016695172718923776);
    }
}
