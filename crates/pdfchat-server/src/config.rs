use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use pdfchat_agent::AgentSettings;
use pdfchat_agent::client::DEFAULT_ENDPOINT;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfchatConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub agent_id: String,
    /// Agent session the whole transcript belongs to. Generated when absent.
    #[serde(default = "new_session_id")]
    pub session_id: String,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Redacted config info safe to send to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub endpoint: String,
    pub user_id: String,
    pub agent_id: String,
    pub session_id: String,
    pub api_key_hint: Option<String>,
}

impl Default for PdfchatConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            endpoint: default_endpoint(),
            api_key: String::new(),
            user_id: String::new(),
            agent_id: String::new(),
            session_id: new_session_id(),
            bind: default_bind(),
            log_format: LogFormat::default(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PdfchatConfig {
    /// Apply `PDFCHAT_*` environment overrides via `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("PDFCHAT_API_KEY") {
            self.api_key = key;
        }
        if let Some(endpoint) = lookup("PDFCHAT_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(bind) = lookup("PDFCHAT_BIND") {
            self.bind = bind;
        }
    }

    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            user_id: self.user_id.clone(),
            agent_id: self.agent_id.clone(),
            session_id: self.session_id.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// `PDFCHAT_CONFIG` if set, else the platform config directory.
pub fn config_path() -> eyre::Result<PathBuf> {
    if let Ok(path) = std::env::var("PDFCHAT_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("pdfchat").join("config.json"))
}

/// Load the config at `path`, writing defaults there first if it does not
/// exist yet. A config that was migrated or lacked a session id is saved
/// back, so the session id survives restarts.
pub fn load_or_init(path: &Path) -> eyre::Result<PdfchatConfig> {
    if !path.exists() {
        let config = PdfchatConfig::default();
        save_config_to(path, &config)?;
        tracing::info!(path = %path.display(), "wrote default config");
        return Ok(config);
    }

    let (config, stale) = read_config(path)?;
    if stale {
        save_config_to(path, &config)?;
        tracing::info!(path = %path.display(), "rewrote migrated config");
    }
    Ok(config)
}

pub fn load_config_from(path: &Path) -> eyre::Result<PdfchatConfig> {
    read_config(path).map(|(config, _)| config)
}

/// Parse and migrate the config at `path`. The flag is set when the file on
/// disk is older than [`CURRENT_VERSION`] or has no `session_id`.
fn read_config(path: &Path) -> eyre::Result<(PdfchatConfig, bool)> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;
    let has_session = json
        .get("session_id")
        .and_then(|v| v.as_str())
        .is_some_and(|s| !s.is_empty());

    let migrated = migrate(json, on_disk_version)?;
    let mut config: PdfchatConfig = serde_json::from_value(migrated)?;
    if config.session_id.is_empty() {
        config.session_id = new_session_id();
    }
    Ok((config, on_disk_version < CURRENT_VERSION || !has_session))
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update pdfchat."
        ));
    }

    // v0 → v1: `api_url` renamed to `endpoint`; `agent_id` added.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(url) = obj.remove("api_url") {
            obj.entry("endpoint").or_insert(url);
        }
        obj.entry("agent_id")
            .or_insert(serde_json::Value::String(String::new()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (renamed api_url, added agent_id)");
    }

    Ok(json)
}

pub fn save_config_to(path: &Path, config: &PdfchatConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // The file holds the API key.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

pub fn config_info(config: &PdfchatConfig) -> ConfigInfo {
    let api_key_hint = (!config.api_key.is_empty()).then(|| redact_api_key(&config.api_key));
    ConfigInfo {
        endpoint: config.endpoint.clone(),
        user_id: config.user_id.clone(),
        agent_id: config.agent_id.clone(),
        session_id: config.session_id.clone(),
        api_key_hint,
    }
}

fn redact_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
