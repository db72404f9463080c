use std::env;

/// Process-wide configuration, read once at startup and passed in explicitly
/// so the pipeline stays testable without touching the environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Bot token used by the delivery adapter.
    pub telegram_bot_token: Option<String>,
    /// Chat the finished report is delivered to.
    pub telegram_chat_id: Option<String>,
    /// Shared secret required in the x-api-key header when set.
    pub api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            telegram_bot_token: non_empty_var("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: non_empty_var("TELEGRAM_CHAT_ID"),
            api_key: non_empty_var("API_KEY"),
        }
    }
}

/// An empty variable counts as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
