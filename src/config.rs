use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub admin: AdminConfig,
    pub bind_address: String,
    /// Directory where uploaded file content is persisted
    pub local_storage_path: String,
    /// Maximum upload size in bytes
    pub max_upload_size: u64,
    /// Fixed session lifetime; sessions expire regardless of activity
    pub session_ttl_secs: i64,
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let local_storage_path =
            std::env::var("LOCAL_STORAGE_PATH").unwrap_or_else(|_| "./files".to_string());

        let admin_username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());

        let session_ttl_secs = std::env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86_400); // 24 hours

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(50 * 1024 * 1024); // 50MB

        let config = Config {
            admin: AdminConfig {
                username: admin_username,
                password: admin_password,
            },
            bind_address,
            local_storage_path,
            max_upload_size,
            session_ttl_secs,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.username.is_empty() {
            return Err(ConfigError::ValidationError(
                "ADMIN_USERNAME cannot be empty".to_string(),
            ));
        }

        if self.admin.password.is_empty() {
            return Err(ConfigError::ValidationError(
                "ADMIN_PASSWORD cannot be empty".to_string(),
            ));
        }

        if self.admin.password == DEFAULT_ADMIN_PASSWORD {
            tracing::warn!(
                "ADMIN_PASSWORD is the well-known default. \
                 Set it before exposing this server."
            );
        }

        if self.session_ttl_secs <= 0 {
            return Err(ConfigError::ValidationError(
                "SESSION_TTL_SECS must be greater than 0".to_string(),
            ));
        }

        if self.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
