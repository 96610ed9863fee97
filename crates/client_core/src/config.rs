use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

use crate::{HostContext, Session};

pub const SETTINGS_FILE: &str = "customers.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub site_url: String,
    pub list_name: String,
    pub description: String,
    pub access_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_url: "http://127.0.0.1:8080".into(),
            list_name: "Customers".into(),
            description: "Customer Management".into(),
            access_token: None,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn host_context(&self) -> HostContext {
        HostContext {
            caption: self.description.clone(),
            session: Session {
                bearer_token: self.access_token.clone(),
            },
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    site_url: Option<String>,
    list_name: Option<String>,
    description: Option<String>,
    access_token: Option<String>,
    request_timeout_secs: Option<u64>,
}

pub fn load_settings() -> Settings {
    load_settings_from(SETTINGS_FILE)
}

/// Defaults, then the TOML file at `path` if it exists and parses, then
/// environment overrides.
pub fn load_settings_from(path: impl AsRef<Path>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path.as_ref()) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(err) => warn!(
                path = %path.as_ref().display(),
                "config: ignoring unreadable settings file: {err}"
            ),
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.site_url {
        settings.site_url = v;
    }
    if let Some(v) = file_cfg.list_name {
        settings.list_name = v;
    }
    if let Some(v) = file_cfg.description {
        settings.description = v;
    }
    if let Some(v) = file_cfg.access_token {
        settings.access_token = Some(v);
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = var("SITE_URL") {
        settings.site_url = v;
    }
    if let Some(v) = var("APP__SITE_URL") {
        settings.site_url = v;
    }

    if let Some(v) = var("LIST_NAME") {
        settings.list_name = v;
    }
    if let Some(v) = var("APP__LIST_NAME") {
        settings.list_name = v;
    }

    if let Some(v) = var("APP__DESCRIPTION") {
        settings.description = v;
    }

    if let Some(v) = var("ACCESS_TOKEN") {
        settings.access_token = Some(v);
    }
    if let Some(v) = var("APP__ACCESS_TOKEN") {
        settings.access_token = Some(v);
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_settings_file(tag: &str, contents: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("customers_settings_{tag}_{suffix}.toml"));
        fs::write(&path, contents).expect("write settings");
        path
    }

    #[test]
    fn file_values_replace_defaults() {
        let path = temp_settings_file(
            "values",
            r#"
site_url = "https://contoso.example/sites/ops"
list_name = "Rig Customers"
request_timeout_secs = 5
"#,
        );

        let mut settings = Settings::default();
        let raw = fs::read_to_string(&path).expect("read");
        apply_file_settings(&mut settings, toml::from_str(&raw).expect("parse"));
        fs::remove_file(path).expect("cleanup");

        assert_eq!(settings.site_url, "https://contoso.example/sites/ops");
        assert_eq!(settings.list_name, "Rig Customers");
        assert_eq!(settings.description, "Customer Management");
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn malformed_file_keeps_defaults() {
        let path = temp_settings_file("malformed", "site_url = [not toml");
        let settings = load_settings_from(&path);
        fs::remove_file(path).expect("cleanup");

        assert_eq!(settings.list_name, Settings::default().list_name);
    }

    #[test]
    fn app_prefixed_env_wins_and_blank_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SITE_URL", "https://plain.example"),
            ("APP__SITE_URL", "https://app.example"),
            ("APP__LIST_NAME", "   "),
            ("ACCESS_TOKEN", "token-123"),
            ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
        ]);

        let mut settings = Settings::default();
        apply_env_overrides(&mut settings, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.site_url, "https://app.example");
        assert_eq!(settings.list_name, "Customers");
        assert_eq!(settings.access_token.as_deref(), Some("token-123"));
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn host_context_carries_caption_and_token() {
        let settings = Settings {
            access_token: Some("abc".into()),
            ..Settings::default()
        };
        let context = settings.host_context();
        assert_eq!(context.caption, "Customer Management");
        assert_eq!(context.session.bearer_token.as_deref(), Some("abc"));
    }
}
