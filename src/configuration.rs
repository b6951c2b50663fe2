use std::time::Duration;

use crate::error::ConfigError;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
    #[serde(default)]
    pub revocation: RevocationSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// JWT authentication settings
#[derive(serde::Deserialize, Clone, Debug)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry: i64, // seconds (e.g., 900 for 15 minutes)
    pub issuer: String,
}

/// Revocation housekeeping. Zero disables the corresponding task.
#[derive(serde::Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RevocationSettings {
    #[serde(default)]
    pub sweep_interval_seconds: u64,
    #[serde(default)]
    pub mark_retention_seconds: u64,
}

impl RevocationSettings {
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_seconds > 0).then(|| Duration::from_secs(self.sweep_interval_seconds))
    }

    pub fn mark_retention(&self) -> Option<Duration> {
        (self.mark_retention_seconds > 0).then(|| Duration::from_secs(self.mark_retention_seconds))
    }
}

impl Settings {
    /// Reject combinations that would silently weaken revocation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < 32 {
            return Err(ConfigError::InvalidValue(
                "jwt.secret must be at least 32 characters".to_string(),
            ));
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "jwt.access_token_expiry must be positive".to_string(),
            ));
        }

        // A mark may only go once every token it could revoke has expired.
        let retention = self.revocation.mark_retention_seconds;
        let window = crate::auth::acceptance_window_secs(&self.jwt);
        if retention > 0 && i64::try_from(retention).unwrap_or(i64::MAX) < window {
            return Err(ConfigError::InvalidValue(format!(
                "revocation.mark_retention_seconds ({}) is shorter than the token acceptance window ({}s)",
                retention, window
            )));
        }
        if retention > 0 && self.revocation.sweep_interval_seconds == 0 {
            tracing::warn!("mark_retention_seconds is set but the sweeper is disabled");
        }

        Ok(())
    }
}

/// Load `configuration.*` (optional) then `APP_*` environment overrides,
/// e.g. `APP_JWT__SECRET` or `APP_REVOCATION__SWEEP_INTERVAL_SECONDS`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = settings.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}
