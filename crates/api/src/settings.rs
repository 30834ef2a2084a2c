use crate::ApiConfig;
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use school_chat_core::{CompletionConfig, CoreConfig};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "SCHOOL_CHAT";
pub const CONFIG_FILE: &str = "school-chat";

/// Process settings: optional `school-chat.toml`, then `SCHOOL_CHAT_*`
/// environment variables (`__` separates nested keys), then `PORT`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiConfig,
    pub completion: CompletionConfig,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.port", std::env::var("PORT").ok())?;

        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    pub fn core_config(&self) -> CoreConfig {
        CoreConfig {
            completion: self.completion.clone(),
        }
    }
}
