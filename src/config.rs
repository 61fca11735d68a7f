//! Service settings, read from an optional `settings.toml` and overridden by
//! `SHAREDMONEY__*` environment variables (e.g. `SHAREDMONEY__AUTH__SECRET`).
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub username: String,
    /// Hex encoded SHA-256 of the password.
    pub password_sha256: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub secret: String,
    pub token_ttl_secs: u64,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file("settings")
    }

    pub fn from_file(name: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.bind", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("auth.token_ttl_secs", 3600)?
            .set_default("log.level", "info")?
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix("SHAREDMONEY").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn server_addr(&self) -> (String, u16) {
        (self.server.bind.clone(), self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_mandatory() {
        assert!(Settings::from_file("does-not-exist").is_err());
    }

    #[test]
    fn reads_accounts_from_toml() {
        let settings: Settings = Config::builder()
            .set_default("server.bind", "0.0.0.0")
            .unwrap()
            .set_default("server.port", 8080)
            .unwrap()
            .set_default("log.level", "info")
            .unwrap()
            .add_source(File::from_str(
                r#"
                [auth]
                secret = "s3cret"
                token_ttl_secs = 120

                [[auth.accounts]]
                username = "linh"
                password_sha256 = "abcd"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.server_addr(), ("0.0.0.0".to_string(), 8080));
        assert_eq!(settings.auth.token_ttl_secs, 120);
        assert_eq!(settings.auth.accounts[0].username, "linh");
        assert!(settings.server.allowed_origins.is_empty());
    }
}
