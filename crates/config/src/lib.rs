use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "circle.toml",
    "config/circle.toml",
    "crates/config/circle.toml",
    "../circle.toml",
    "../config/circle.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub blob_store: BlobStoreConfig,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
    /// Origins allowed to make credentialed cross-origin requests.
    #[serde(default = "HttpConfig::default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

impl HttpConfig {
    fn default_cors_allowed_origins() -> Vec<String> {
        vec![
            "http://localhost:3000".to_string(),
            "http://localhost:5173".to_string(),
        ]
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8000,
            cors_allowed_origins: Self::default_cors_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://circle.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Session token settings.
///
/// `token_secret` has no default: the server refuses to start without one.
///
/// ```
/// use circle_config::AuthConfig;
///
/// let auth = AuthConfig::default();
/// assert!(auth.token_secret.is_none());
/// assert_eq!(auth.session_ttl_seconds, 86_400);
/// assert_eq!(auth.cookie_name, "token");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token_secret: Option<String>,
    #[serde(default = "AuthConfig::default_session_ttl")]
    pub session_ttl_seconds: u64,
    #[serde(default = "AuthConfig::default_issuer")]
    pub issuer: String,
    #[serde(default = "AuthConfig::default_audience")]
    pub audience: String,
    #[serde(default = "AuthConfig::default_cookie_name")]
    pub cookie_name: String,
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            session_ttl_seconds: Self::default_session_ttl(),
            issuer: Self::default_issuer(),
            audience: Self::default_audience(),
            cookie_name: Self::default_cookie_name(),
            cookie_secure: false,
        }
    }
}

impl AuthConfig {
    const fn default_session_ttl() -> u64 {
        86_400
    }

    fn default_issuer() -> String {
        "circle".to_string()
    }

    fn default_audience() -> String {
        "circle-users".to_string()
    }

    fn default_cookie_name() -> String {
        "token".to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobStoreProvider {
    /// Image uploads are rejected.
    #[default]
    None,
    /// Keeps uploads in process memory. Only useful for tests and local runs.
    Memory,
    Cloudinary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlobStoreConfig {
    #[serde(default)]
    pub provider: BlobStoreProvider,
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
}

/// Settings for unsigned uploads to Cloudinary.
///
/// ```
/// use circle_config::CloudinaryConfig;
///
/// let cloudinary = CloudinaryConfig::default();
/// assert_eq!(cloudinary.base_url, "https://api.cloudinary.com/v1_1");
/// assert_eq!(cloudinary.request_timeout_seconds, 30);
/// assert!(cloudinary.cloud_name.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudinaryConfig {
    #[serde(default)]
    pub cloud_name: Option<String>,
    #[serde(default)]
    pub upload_preset: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default = "CloudinaryConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "CloudinaryConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl CloudinaryConfig {
    fn default_base_url() -> String {
        "https://api.cloudinary.com/v1_1".to_string()
    }

    const fn default_request_timeout() -> u64 {
        30
    }
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: None,
            upload_preset: None,
            folder: None,
            base_url: Self::default_base_url(),
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    #[serde(default = "SuggestionConfig::default_limit")]
    pub limit: u32,
}

impl SuggestionConfig {
    const fn default_limit() -> u32 {
        5
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            limit: Self::default_limit(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use circle_config::load;
///
/// std::env::remove_var("CIRCLE_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let session_ttl = i64::try_from(defaults.auth.session_ttl_seconds).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("auth.session_ttl_seconds", session_ttl)?
        .set_default("auth.issuer", defaults.auth.issuer.clone())?
        .set_default("auth.audience", defaults.auth.audience.clone())?
        .set_default("auth.cookie_name", defaults.auth.cookie_name.clone())?
        .set_default("suggestions.limit", i64::from(defaults.suggestions.limit))?;

    let environment_overrides = config::Environment::with_prefix("CIRCLE").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("CIRCLE_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via CIRCLE_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.auth.session_ttl_seconds > i64::MAX as u64 {
        config.auth.session_ttl_seconds = i64::MAX as u64;
    }

    if config
        .auth
        .token_secret
        .as_deref()
        .is_some_and(|secret| secret.trim().is_empty())
    {
        config.auth.token_secret = None;
    }

    debug!(
        http = ?config.http,
        database = ?config.database,
        blob_store = ?config.blob_store.provider,
        "loaded backend configuration"
    );
    Ok(config)
}
