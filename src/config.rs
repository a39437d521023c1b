//! Process configuration, resolved once at startup.

use crate::core::error::GozelleError;
use std::path::PathBuf;
use tracing::warn;

/// File name of the store inside the data directory.
pub const DB_FILE_NAME: &str = "db.bin";
const APP_DIR: &str = "gozelle";

pub const ENV_DATA_DIR: &str = "GOZELLE_DATA_DIR";
pub const ENV_ECHO: &str = "GOZELLE_ECHO";
const ENV_XDG_DATA_HOME: &str = "XDG_DATA_HOME";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Location of the persisted store.
    pub data_file: PathBuf,
    /// Print the chosen directory on stderr before jumping.
    pub echo: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, GozelleError> {
        Self::from_lookup(|key| std::env::var(key).ok(), dirs::data_dir())
    }

    /// Resolves configuration from `lookup` (an environment stand-in) with
    /// `platform_data_dir` as the last fallback for the store location.
    pub fn from_lookup<F>(lookup: F, platform_data_dir: Option<PathBuf>) -> Result<Self, GozelleError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let data_file = if let Some(dir) = non_empty(ENV_DATA_DIR) {
            PathBuf::from(dir).join(DB_FILE_NAME)
        } else if let Some(xdg) = non_empty(ENV_XDG_DATA_HOME) {
            PathBuf::from(xdg).join(APP_DIR).join(DB_FILE_NAME)
        } else if let Some(dir) = platform_data_dir {
            dir.join(APP_DIR).join(DB_FILE_NAME)
        } else {
            return Err(GozelleError::Config(format!(
                "cannot locate a data directory; set {ENV_DATA_DIR}"
            )));
        };

        let echo = match lookup(ENV_ECHO).as_deref() {
            None | Some("") | Some("false") => false,
            Some("true") => true,
            Some(other) => {
                warn!(value = other, "{ENV_ECHO} must be true or false; using false");
                false
            }
        };

        Ok(Self { data_file, echo })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(vars: &[(&str, &str)], platform: Option<&str>) -> Result<Config, GozelleError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| vars.get(k).cloned(), platform.map(PathBuf::from))
    }

    #[test]
    fn test_data_dir_override_wins() {
        let config = resolve(
            &[(ENV_DATA_DIR, "/custom"), (ENV_XDG_DATA_HOME, "/xdg")],
            Some("/platform"),
        )
        .unwrap();
        assert_eq!(config.data_file, PathBuf::from("/custom/db.bin"));
        assert!(!config.echo);
    }

    #[test]
    fn test_xdg_then_platform_fallback() {
        let config = resolve(&[(ENV_XDG_DATA_HOME, "/xdg")], Some("/platform")).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/xdg/gozelle/db.bin"));

        let config = resolve(&[(ENV_DATA_DIR, "")], Some("/platform")).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/platform/gozelle/db.bin"));
    }

    #[test]
    fn test_no_location_is_a_config_error() {
        assert!(matches!(resolve(&[], None), Err(GozelleError::Config(_))));
    }

    #[test]
    fn test_echo_values() {
        let on = resolve(&[(ENV_ECHO, "true")], Some("/p")).unwrap();
        assert!(on.echo);
        let off = resolve(&[(ENV_ECHO, "false")], Some("/p")).unwrap();
        assert!(!off.echo);
        let bogus = resolve(&[(ENV_ECHO, "yes")], Some("/p")).unwrap();
        assert!(!bogus.echo);
    }
}
