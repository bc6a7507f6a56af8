use std::str::FromStr;

use serde::Deserialize;

use crate::{
    sender::{ConsoleSender, Sender, TelegramSender},
    storage::DEFAULT_HISTORY_FILE,
    ConfigError,
};

const ENV_CLIENT_ID: &str = "NAVER_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "NAVER_CLIENT_SECRET";
const ENV_BOT_TOKEN: &str = "BOT_TOKEN";

/// Upper bound for `news.time_window_hours`, one year
pub const MAX_WINDOW_HOURS: i64 = 24 * 366;

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    pub chat_ids: Vec<String>,
    /// Pause after every message sent, to stay under the Bot API flood limits
    #[serde(default)]
    pub delay_seconds: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewsConfig {
    /// Search terms, announced and fetched in this order
    pub query_list: Vec<String>,
    /// Articles published longer ago than this are ignored at fetch time
    pub time_window_hours: i64,
    pub pull_interval_seconds: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub news: NewsConfig,
    pub history_file: Option<String>,
}

impl AppConfig {
    pub fn from_file(file_name: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(file_name).map_err(|source| ConfigError::Read {
            path: file_name.to_string(),
            source,
        })?;
        contents.parse()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.news.query_list.is_empty() {
            return Err(ConfigError::Invalid("news.query_list is empty".to_string()));
        }
        if self.news.query_list.iter().any(|q| q.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "news.query_list contains a blank query".to_string(),
            ));
        }
        if self.news.time_window_hours <= 0 {
            return Err(ConfigError::Invalid(
                "news.time_window_hours must be positive".to_string(),
            ));
        }
        if self.news.time_window_hours > MAX_WINDOW_HOURS {
            return Err(ConfigError::Invalid(format!(
                "news.time_window_hours must not exceed {MAX_WINDOW_HOURS}"
            )));
        }
        if self.news.pull_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "news.pull_interval_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Telegram when a bot token is given, the console otherwise
    #[must_use]
    pub fn get_sender(&self, bot_token: Option<&str>) -> Sender {
        match bot_token {
            Some(token) => Sender::Telegram(TelegramSender::new(token, &self.telegram)),
            None => Sender::Console(ConsoleSender {}),
        }
    }

    #[must_use]
    pub fn get_history_file(&self) -> String {
        self.history_file
            .clone()
            .unwrap_or_else(|| DEFAULT_HISTORY_FILE.to_string())
    }
}

impl FromStr for AppConfig {
    type Err = ConfigError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        let config: AppConfig = serde_json::from_str(contents)?;
        config.validate()?;

        Ok(config)
    }
}

#[derive(Clone, Debug)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Secrets taken from the environment rather than the config file
#[derive(Clone, Debug)]
pub struct Credentials {
    pub naver: NaverCredentials,
    pub bot_token: Option<String>,
}

impl Credentials {
    pub fn from_env(require_bot_token: bool) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), require_bot_token)
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        require_bot_token: bool,
    ) -> Result<Self, ConfigError> {
        let get = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnv(key))
        };

        Ok(Self {
            naver: NaverCredentials {
                client_id: get(ENV_CLIENT_ID)?,
                client_secret: get(ENV_CLIENT_SECRET)?,
            },
            bot_token: if require_bot_token {
                Some(get(ENV_BOT_TOKEN)?)
            } else {
                None
            },
        })
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    const CONFIG: &str = r#"{
        "telegram": { "chat_ids": ["123456", "-100200300"], "delay_seconds": 1 },
        "news": {
            "query_list": ["단독", "rust"],
            "time_window_hours": 24,
            "pull_interval_seconds": 120
        }
    }"#;

    #[test]
    fn test_parse_config() {
        let config: AppConfig = CONFIG.parse().unwrap();
        assert_eq!(config.telegram.chat_ids, vec!["123456", "-100200300"]);
        assert_eq!(config.telegram.delay_seconds, 1);
        assert_eq!(config.news.query_list, vec!["단독", "rust"]);
        assert_eq!(config.news.time_window_hours, 24);
        assert_eq!(config.news.pull_interval_seconds, 120);
        assert_eq!(config.get_history_file(), DEFAULT_HISTORY_FILE);
    }

    #[test]
    fn test_history_file_override() {
        let contents = CONFIG.replacen('{', r#"{ "history_file": "/tmp/seen.json","#, 1);
        let config: AppConfig = contents.parse().unwrap();
        assert_eq!(config.get_history_file(), "/tmp/seen.json");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let contents = CONFIG.replace("\"delay_seconds\"", "\"delay_secs\"");
        assert!(matches!(
            contents.parse::<AppConfig>(),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let contents = CONFIG.replace("\"pull_interval_seconds\": 120", "\"time_window_hours\": 2");
        assert!(contents.parse::<AppConfig>().is_err());
    }

    #[test]
    fn test_invalid_values() {
        for (from, to) in [
            (r#"["단독", "rust"]"#, "[]"),
            (r#"["단독", "rust"]"#, r#"["단독", "  "]"#),
            ("\"time_window_hours\": 24", "\"time_window_hours\": 0"),
            ("\"time_window_hours\": 24", "\"time_window_hours\": 9000000000000000"),
            ("\"pull_interval_seconds\": 120", "\"pull_interval_seconds\": 0"),
        ] {
            let contents = CONFIG.replace(from, to);
            assert!(
                matches!(contents.parse::<AppConfig>(), Err(ConfigError::Invalid(_))),
                "{to} should be rejected"
            );
        }
    }

    #[test]
    fn test_window_upper_bound() {
        let longest = format!("\"time_window_hours\": {MAX_WINDOW_HOURS}");
        let config: AppConfig = CONFIG
            .replace("\"time_window_hours\": 24", &longest)
            .parse()
            .unwrap();
        assert_eq!(config.news.time_window_hours, MAX_WINDOW_HOURS);

        let too_long = format!("\"time_window_hours\": {}", MAX_WINDOW_HOURS + 1);
        assert!(CONFIG
            .replace("\"time_window_hours\": 24", &too_long)
            .parse::<AppConfig>()
            .is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            AppConfig::from_file("./does/not/exist.json"),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_get_sender() {
        let config: AppConfig = CONFIG.parse().unwrap();
        assert!(matches!(config.get_sender(None), Sender::Console(_)));
        assert!(matches!(
            config.get_sender(Some("123:abc")),
            Sender::Telegram(_)
        ));
    }

    #[test]
    fn test_credentials() {
        let env: HashMap<&str, &str> = [
            (ENV_CLIENT_ID, "id"),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_BOT_TOKEN, ""),
        ]
        .into_iter()
        .collect();
        let lookup = |key: &str| env.get(key).map(ToString::to_string);

        let credentials = Credentials::from_lookup(lookup, false).unwrap();
        assert_eq!(credentials.naver.client_id, "id");
        assert_eq!(credentials.naver.client_secret, "secret");
        assert!(credentials.bot_token.is_none());

        // an empty variable counts as unset
        assert!(matches!(
            Credentials::from_lookup(lookup, true),
            Err(ConfigError::MissingEnv(ENV_BOT_TOKEN))
        ));
        assert!(matches!(
            Credentials::from_lookup(|_| None, false),
            Err(ConfigError::MissingEnv(ENV_CLIENT_ID))
        ));
    }
}
