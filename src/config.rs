use config::Config;
use serde::Deserialize;

/// Application configuration, loaded from a TOML file with `APP_*`
/// environment overrides. Every section has usable defaults so a missing
/// file only matters when the defaults do not fit the deployment.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FirebaseConfig {
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_template_dir")]
    pub template_dir: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_credentials_path() -> String {
    "serviceAccountKey.json".to_string()
}

fn default_template_dir() -> String {
    "web/templates".to_string()
}

fn default_static_dir() -> String {
    "web/static".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self { credentials_path: default_credentials_path() }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
            static_dir: default_static_dir(),
        }
    }
}

impl AppConfig {
    pub fn load(file: &str) -> Result<Self, config::ConfigError> {
        // double underscore separates nesting levels so snake_case keys
        // stay addressable, e.g. APP_FIREBASE__CREDENTIALS_PATH
        let config = Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        config.try_deserialize::<AppConfig>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // process environment is shared; tests touching it must not interleave
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_apply_without_a_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        let cfg = AppConfig::load("/nonexistent/app-config").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.firebase.credentials_path, "serviceAccountKey.json");
        assert_eq!(cfg.site.template_dir, "web/templates");
    }

    #[test]
    fn environment_overrides_reach_nested_snake_case_keys() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("APP_SERVER__PORT", "9100");
        std::env::set_var("APP_FIREBASE__CREDENTIALS_PATH", "/run/secrets/fb.json");

        let cfg = AppConfig::load("/nonexistent/app-config").unwrap();

        std::env::remove_var("APP_SERVER__PORT");
        std::env::remove_var("APP_FIREBASE__CREDENTIALS_PATH");

        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.firebase.credentials_path, "/run/secrets/fb.json");
    }

    #[test]
    fn file_values_override_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app-config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nhost = \"0.0.0.0\"\nport = 9001\n\n[firebase]\ncredentials_path = \"/etc/fb/key.json\""
        )
        .unwrap();

        let cfg = AppConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9001);
        assert_eq!(cfg.firebase.credentials_path, "/etc/fb/key.json");
        // untouched section keeps its defaults
        assert_eq!(cfg.site.static_dir, "web/static");
    }
}
