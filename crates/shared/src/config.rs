//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Outbound email configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Google Sheets configuration.
    pub sheets: SheetsConfig,
    /// Site-wide settings.
    #[serde(default)]
    pub app: SiteConfig,
    /// CSV import settings.
    #[serde(default)]
    pub import: ImportConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing session tokens.
    pub secret: String,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_expiry")]
    pub session_expiry_secs: u64,
}

fn default_session_expiry() -> u64 {
    1_209_600 // 14 days
}

/// SMTP configuration for outbound email.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "info@trantrac.local".to_string()
}

fn default_from_name() -> String {
    "TranTrac".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

/// Google Sheets service-account configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    /// Target spreadsheet ID.
    pub spreadsheet_id: String,
    /// Service account email (`client_email` in the key file).
    pub client_email: String,
    /// PEM-encoded RSA private key. Literal `\n` sequences are accepted.
    pub private_key: String,
    /// OAuth token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// Sheets API base URL.
    #[serde(default = "default_sheets_api")]
    pub api_base_url: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_sheets_api() -> String {
    "https://sheets.googleapis.com".to_string()
}

impl SheetsConfig {
    /// Returns the private key with escaped newlines expanded.
    #[must_use]
    pub fn private_key_pem(&self) -> String {
        self.private_key.replace("\\n", "\n")
    }
}

/// Site-wide settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Public base URL, used to build links in emails.
    #[serde(default)]
    pub site_url: Option<String>,
    /// IANA time zone used for form defaults.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Whether the session cookie is marked `Secure`.
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_time_zone() -> String {
    "Europe/Rome".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: None,
            time_zone: default_time_zone(),
            secure_cookies: false,
        }
    }
}

/// One sender-inference rule: descriptions containing `pattern` get `label`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SenderRuleConfig {
    /// Case-sensitive substring searched in the description.
    pub pattern: String,
    /// Sender label written to the sheet.
    pub label: String,
}

/// CSV import settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Ordered sender rules for credit rows.
    #[serde(default = "default_sender_rules")]
    pub sender_rules: Vec<SenderRuleConfig>,
    /// Sender used when no rule matches.
    #[serde(default = "default_fallback_sender")]
    pub fallback_sender: String,
    /// Tag marking debit rows as shared household expenses.
    #[serde(default = "default_shared_tag")]
    pub shared_tag: String,
}

fn default_sender_rules() -> Vec<SenderRuleConfig> {
    [("VIVIANA", "Viviana"), ("ENRICO", "Enrico"), ("APPLE", "Enrico")]
        .into_iter()
        .map(|(pattern, label)| SenderRuleConfig {
            pattern: pattern.to_string(),
            label: label.to_string(),
        })
        .collect()
}

fn default_fallback_sender() -> String {
    "Altro".to_string()
}

fn default_shared_tag() -> String {
    "Comune".to_string()
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            sender_rules: default_sender_rules(),
            fallback_sender: default_fallback_sender(),
            shared_tag: default_shared_tag(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TRANTRAC").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
