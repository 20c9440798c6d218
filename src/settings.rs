use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

/// Errors raised while assembling [`HomebaseSettings`]
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] basic_toml::Error),
    #[error("failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("invalid redirect_base_url '{url}': {reason}")]
    InvalidOrigin { url: String, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HomebaseSettings {
    pub application: ApplicationSettings,
    pub identity: IdentitySettings,
    pub cookies: CookieSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Public origin of the application. Redirects after sign-in are built on
    /// this value, never on request headers.
    pub redirect_base_url: String,
    pub cors_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    /// Base URL of the hosted identity backend
    pub url: String,
    pub anon_key: Option<String>,
    /// Name of an environment variable holding the anon key
    pub anon_key_env: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieSettings {
    pub secure: bool,
    /// Prefix for the auth cookies, e.g. `sb-<project>`
    pub name_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            redirect_base_url: "http://localhost:8080".to_string(),
            cors_origins: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: None,
            anon_key_env: None,
            timeout_seconds: 10,
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: true,
            name_prefix: "sb-homebase".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl HomebaseSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Logger initialization fails
    /// - Settings file cannot be read or parsed
    /// - `redirect_base_url` is not an absolute http(s) URL
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_env_file();

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        // Logger filter comes from settings, so it starts after overrides are applied
        settings.logging.logger_builder().try_init()?;
        settings.normalize_origin()?;

        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `HOMEBASE_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read or parsed
    pub fn load_base_settings() -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            settings = Self::from_file(&default_config_path)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(secrets_dir) = std::env::var("HOMEBASE_SECRETS_DIR") {
            let secrets_path = std::path::Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                settings = Self::from_file(&secrets_path)?;
                println!("✓ Overriding settings from {}", secrets_path.display());
            } else {
                println!(
                    "ℹ HOMEBASE_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse a TOML settings file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_file(path: &std::path::Path) -> Result<Self, SettingsError> {
        let toml_content = fs::read_to_string(path)?;
        Ok(basic_toml::from_str(&toml_content)?)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_identity_env_overrides(&mut settings.identity);
        Self::apply_cookie_env_overrides(&mut settings.cookies);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
        if let Ok(redirect_base_url) = std::env::var("REDIRECT_BASE_URL") {
            app_settings.redirect_base_url = redirect_base_url;
        }
        if let Ok(cors_origins) = std::env::var("CORS_ORIGINS") {
            app_settings.cors_origins = cors_origins;
        }
    }

    fn apply_identity_env_overrides(identity_settings: &mut IdentitySettings) {
        if let Ok(url) = std::env::var("IDENTITY_URL") {
            identity_settings.url = url;
        }
        if let Ok(anon_key) = std::env::var("IDENTITY_ANON_KEY") {
            if !anon_key.is_empty() {
                identity_settings.anon_key = Some(anon_key);
            }
        }
    }

    fn apply_cookie_env_overrides(cookie_settings: &mut CookieSettings) {
        if let Ok(cookie_secure_str) = std::env::var("COOKIE_SECURE") {
            if let Ok(cookie_secure) = cookie_secure_str.parse::<bool>() {
                cookie_settings.secure = cookie_secure;
            }
        }
        if let Ok(prefix) = std::env::var("COOKIE_NAME_PREFIX") {
            cookie_settings.name_prefix = prefix;
        }
    }

    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                if line.trim_start().starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Reduce `redirect_base_url` to its origin (`scheme://host[:port]`)
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed, is not http(s), or has no host
    pub fn normalize_origin(&mut self) -> Result<(), SettingsError> {
        let raw = self.application.redirect_base_url.trim();
        let invalid = |reason: &str| SettingsError::InvalidOrigin {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let parsed = url::Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.host_str().is_none() {
            return Err(invalid("missing host"));
        }

        self.application.redirect_base_url = parsed.origin().ascii_serialization();
        Ok(())
    }

    /// Trusted origin that post-login redirects are built on
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.application.redirect_base_url
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    /// Get CORS origins as a vector of strings
    #[must_use]
    pub fn get_cors_origins(&self) -> Vec<String> {
        self.application
            .cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Name of the cookie holding the backend session
    #[must_use]
    pub fn auth_cookie_name(&self) -> String {
        format!("{}-auth-token", self.cookies.name_prefix)
    }

    /// Name of the cookie holding the PKCE code verifier
    #[must_use]
    pub fn code_verifier_cookie_name(&self) -> String {
        format!("{}-auth-token-code-verifier", self.cookies.name_prefix)
    }
}

impl LoggingSettings {
    /// Logger configured with `level` as an `env_logger` filter string
    #[must_use]
    pub fn logger_builder(&self) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&self.level);
        builder
    }
}

impl IdentitySettings {
    /// Get the anon key, checking the named environment variable first
    #[must_use]
    pub fn get_anon_key(&self) -> Option<String> {
        if let Some(env_var) = &self.anon_key_env {
            if let Ok(value) = std::env::var(env_var) {
                return Some(value);
            }
        }
        self.anon_key.clone()
    }

    /// Token endpoint for the PKCE code exchange
    #[must_use]
    pub fn token_url(&self) -> String {
        format!(
            "{}/auth/v1/token?grant_type=pkce",
            self.url.trim_end_matches('/')
        )
    }
}
