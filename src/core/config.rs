//! Configuration management

use config::{File, FileFormat, Map, Source, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::errors::ConfigError;

/// INI section holding every setting
pub const SECTION: &str = "OpenAI";

/// Config location on Windows hosts
pub const WINDOWS_CONFIG_PATH: &str = r"D:\GoldenDict-ng\goldendict-openai-translator\config.ini";

/// Config location on Linux hosts
pub const LINUX_CONFIG_PATH: &str = "~/.config/goldendict-openai-translator/config.ini";

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TEMPERATURE: f64 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 1500;
const DEFAULT_LANGUAGES: &str = "English,Chinese";

/// Settings for one invocation, read from the `[OpenAI]` section
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub languages: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            languages: parse_language_list(DEFAULT_LANGUAGES),
        }
    }
}

/// Resolve the config file location for an OS identifier as reported by
/// `std::env::consts::OS`
pub fn config_path_for(os: &str) -> Result<PathBuf, ConfigError> {
    match os {
        "windows" => Ok(PathBuf::from(WINDOWS_CONFIG_PATH)),
        "linux" => Ok(PathBuf::from(LINUX_CONFIG_PATH)),
        other => Err(ConfigError::UnsupportedPlatform {
            os: other.to_string(),
        }),
    }
}

/// Current user's home directory from the environment
pub fn home_dir() -> Option<String> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
        .filter(|home| !home.is_empty())
}

/// Replace a leading `~` with `home`. Other paths are returned unchanged.
pub fn expand_home(path: &str, home: Option<&str>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };

    if path == "~" {
        return PathBuf::from(home);
    }

    match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        Some(rest) => Path::new(home).join(rest),
        None => PathBuf::from(path),
    }
}

/// Split a comma-separated language list, trimming each entry
pub fn parse_language_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|lang| lang.trim().to_string()).collect()
}

impl Settings {
    /// Load settings from the INI file at `path` (`~` is expanded).
    ///
    /// Absent keys take their defaults. Keys that are present must parse.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = path.as_ref().to_string_lossy();
        let path = expand_home(&raw, home_dir().as_deref());

        if !path.is_file() {
            return Err(ConfigError::NotFound { path });
        }

        debug!("Loading configuration from {}", path.display());

        let root = config::Config::builder()
            .add_source(File::from(path.as_path()).format(FileFormat::Ini))
            .build()?
            .collect()?;

        let section = lookup(&root, SECTION)
            .cloned()
            .ok_or_else(|| ConfigError::MissingSection { path: path.clone() })?
            .into_table()
            .map_err(|_| ConfigError::MissingSection { path: path.clone() })?;

        Self::from_section(&section)
    }

    /// Build settings from an already-parsed `[OpenAI]` table
    pub fn from_section(section: &Map<String, Value>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let settings = Self {
            api_key: string_field(section, "OPENAI_API_KEY")?.unwrap_or(defaults.api_key),
            base_url: string_field(section, "OPENAI_BASE_URL")?.unwrap_or(defaults.base_url),
            timeout_secs: positive_field(section, "OPENAI_REQUEST_TIMEOUT")?
                .unwrap_or(defaults.timeout_secs),
            model: string_field(section, "OPENAI_MODEL")?.unwrap_or(defaults.model),
            temperature: float_field(section, "OPENAI_TEMPERATURE")?
                .unwrap_or(defaults.temperature),
            max_tokens: match positive_field(section, "OPENAI_MAX_TOKENS")? {
                Some(value) => u32::try_from(value).map_err(|e| invalid("OPENAI_MAX_TOKENS", e))?,
                None => defaults.max_tokens,
            },
            languages: string_field(section, "LANGUAGE_RELATED")?
                .map(|raw| parse_language_list(&raw))
                .unwrap_or(defaults.languages),
        };

        debug!(
            "Settings: model={}, timeout={}s, temperature={}, max_tokens={}, languages={:?}",
            settings.model,
            settings.timeout_secs,
            settings.temperature,
            settings.max_tokens,
            settings.languages
        );

        Ok(settings)
    }

    /// Replace the language list, e.g. from a command-line override
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }
}

fn lookup<'a>(table: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    table
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

fn invalid(key: &str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: err.to_string(),
    }
}

fn string_field(section: &Map<String, Value>, key: &str) -> Result<Option<String>, ConfigError> {
    lookup(section, key)
        .map(|v| v.clone().into_string().map_err(|e| invalid(key, e)))
        .transpose()
}

fn float_field(section: &Map<String, Value>, key: &str) -> Result<Option<f64>, ConfigError> {
    string_field(section, key)?
        .map(|raw| raw.trim().parse::<f64>().map_err(|e| invalid(key, e)))
        .transpose()
}

// Parsed from the raw text: the config crate would read `yes`/`off` as 1/0.
fn positive_field(section: &Map<String, Value>, key: &str) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = string_field(section, key)? else {
        return Ok(None);
    };

    let n = raw.trim().parse::<i64>().map_err(|e| invalid(key, e))?;
    match u64::try_from(n) {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(invalid(key, format!("expected a positive integer, got {}", n))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_for_absent_keys() {
        let file = write_config("[OpenAI]\nOPENAI_API_KEY = sk-test\n");
        let settings = Settings::load(file.path()).unwrap();

        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.base_url, "");
        assert_eq!(settings.timeout_secs, 15);
        assert_eq!(settings.model, "gpt-3.5-turbo");
        assert_eq!(settings.temperature, 0.3);
        assert_eq!(settings.max_tokens, 1500);
        assert_eq!(settings.languages, vec!["English", "Chinese"]);
    }

    #[test]
    fn test_all_keys_read() {
        let file = write_config(
            "[OpenAI]\n\
             OPENAI_API_KEY = sk-abc\n\
             OPENAI_BASE_URL = https://api.example.com/v1\n\
             OPENAI_REQUEST_TIMEOUT = 30\n\
             OPENAI_MODEL = gpt-4o-mini\n\
             OPENAI_TEMPERATURE = 0.7\n\
             OPENAI_MAX_TOKENS = 800\n\
             LANGUAGE_RELATED = Japanese , German\n",
        );
        let settings = Settings::load(file.path()).unwrap();

        assert_eq!(settings.base_url, "https://api.example.com/v1");
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.temperature, 0.7);
        assert_eq!(settings.max_tokens, 800);
        assert_eq!(settings.languages, vec!["Japanese", "German"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ini");
        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_missing_section() {
        let file = write_config("[Other]\nKEY = value\n");
        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSection { .. }));
    }

    #[test]
    fn test_malformed_numbers_fail_fast() {
        for body in [
            "OPENAI_REQUEST_TIMEOUT = soon",
            "OPENAI_TEMPERATURE = warm",
            "OPENAI_MAX_TOKENS = 1.5",
            "OPENAI_REQUEST_TIMEOUT = 0",
            "OPENAI_MAX_TOKENS = -10",
            "OPENAI_MAX_TOKENS = yes",
            "OPENAI_REQUEST_TIMEOUT = on",
            "OPENAI_TEMPERATURE = off",
            "OPENAI_TEMPERATURE = true",
        ] {
            let file = write_config(&format!("[OpenAI]\n{}\n", body));
            let err = Settings::load(file.path()).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { .. }),
                "{} should be rejected, got {}",
                body,
                err
            );
        }
    }

    #[test]
    fn test_invalid_ini_is_read_error() {
        let file = write_config("[OpenAI\nOPENAI_MODEL = gpt-4o\n");
        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)), "got {}", err);
        assert!(err.to_string().starts_with("Failed to load configuration: "));
    }

    #[test]
    fn test_section_name_case_insensitive() {
        let file = write_config("[openai]\nOPENAI_MODEL = gpt-4o\n");
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.model, "gpt-4o");
    }

    #[test]
    fn test_config_path_for_os() {
        assert_eq!(
            config_path_for("linux").unwrap(),
            PathBuf::from("~/.config/goldendict-openai-translator/config.ini")
        );
        assert_eq!(
            config_path_for("windows").unwrap(),
            PathBuf::from(r"D:\GoldenDict-ng\goldendict-openai-translator\config.ini")
        );
        assert!(matches!(
            config_path_for("macos"),
            Err(ConfigError::UnsupportedPlatform { .. })
        ));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(
            expand_home("~/.config/x.ini", Some("/home/ann")),
            PathBuf::from("/home/ann/.config/x.ini")
        );
        assert_eq!(expand_home("~", Some("/home/ann")), PathBuf::from("/home/ann"));
        assert_eq!(expand_home("/etc/x.ini", Some("/home/ann")), PathBuf::from("/etc/x.ini"));
        assert_eq!(expand_home("~/x.ini", None), PathBuf::from("~/x.ini"));
    }

    #[test]
    fn test_parse_language_list_trims() {
        assert_eq!(parse_language_list(" English,  Chinese "), vec!["English", "Chinese"]);
        assert_eq!(parse_language_list("Chinese"), vec!["Chinese"]);
        assert_eq!(parse_language_list("A,B,C").len(), 3);
    }
}
