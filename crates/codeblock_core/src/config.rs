//! Editor configuration loading from environment variables.

use crate::constants::{
    DEFAULT_EDIT_DEBOUNCE_MS, DEFAULT_FONT_SIZE, DEFAULT_LINE_HEIGHT_FACTOR, DEFAULT_THEME_KEY,
    ENV_DEBOUNCE_MS, ENV_FONT_SIZE, ENV_SHOW_LINE_NUMBERS, ENV_THEME, ENV_TRACE_LAYOUT,
};
use crate::error::CodeBlockError;
use std::env;
use std::time::Duration;

/// Runtime configuration shared by every block in a window.
///
/// Built once and passed into each [`crate::EditSession`]; nothing reads the
/// environment after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub debounce: Duration,
    pub font_size: f32,
    pub theme_key: String,
    pub show_line_numbers: bool,
    pub trace_layout: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_EDIT_DEBOUNCE_MS),
            font_size: DEFAULT_FONT_SIZE,
            theme_key: DEFAULT_THEME_KEY.to_string(),
            show_line_numbers: true,
            trace_layout: false,
        }
    }
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn invalid(name: &str, value: &str) -> CodeBlockError {
    CodeBlockError::InvalidConfig {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl EditorConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable values are ignored and the default is kept.
    ///
    /// # Returns
    /// A populated [`EditorConfig`].
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            debounce: read_var(ENV_DEBOUNCE_MS)
                .and_then(|ms| ms.trim().parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
            font_size: read_var(ENV_FONT_SIZE)
                .and_then(|size| size.trim().parse::<f32>().ok())
                .filter(|size| size.is_finite() && *size > 0.0)
                .unwrap_or(defaults.font_size),
            theme_key: read_var(ENV_THEME)
                .map(|theme| theme.trim().to_string())
                .unwrap_or(defaults.theme_key),
            show_line_numbers: read_var(ENV_SHOW_LINE_NUMBERS)
                .and_then(|value| parse_env_flag(&value))
                .unwrap_or(defaults.show_line_numbers),
            trace_layout: env_flag_enabled(ENV_TRACE_LAYOUT),
        }
    }

    /// Load configuration from environment variables, rejecting bad values.
    ///
    /// # Errors
    /// Returns [`CodeBlockError::InvalidConfig`] naming the first variable
    /// whose value cannot be parsed.
    pub fn try_from_env() -> Result<Self, CodeBlockError> {
        let mut config = Self::default();
        if let Some(raw) = read_var(ENV_DEBOUNCE_MS) {
            let ms: u64 = raw
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_DEBOUNCE_MS, &raw))?;
            config.debounce = Duration::from_millis(ms);
        }
        if let Some(raw) = read_var(ENV_FONT_SIZE) {
            let size: f32 = raw
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_FONT_SIZE, &raw))?;
            if !size.is_finite() || size <= 0.0 {
                return Err(invalid(ENV_FONT_SIZE, &raw));
            }
            config.font_size = size;
        }
        if let Some(raw) = read_var(ENV_THEME) {
            config.theme_key = raw.trim().to_string();
        }
        if let Some(raw) = read_var(ENV_SHOW_LINE_NUMBERS) {
            config.show_line_numbers =
                parse_env_flag(&raw).ok_or_else(|| invalid(ENV_SHOW_LINE_NUMBERS, &raw))?;
        }
        if let Some(raw) = read_var(ENV_TRACE_LAYOUT) {
            config.trace_layout =
                parse_env_flag(&raw).ok_or_else(|| invalid(ENV_TRACE_LAYOUT, &raw))?;
        }
        Ok(config)
    }

    /// Line height used before any row has been measured.
    pub fn fallback_line_height(&self) -> f32 {
        (self.font_size * DEFAULT_LINE_HEIGHT_FACTOR).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScopedEnv;

    const ALL_VARS: [&str; 5] = [
        ENV_DEBOUNCE_MS,
        ENV_FONT_SIZE,
        ENV_THEME,
        ENV_SHOW_LINE_NUMBERS,
        ENV_TRACE_LAYOUT,
    ];

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn from_env_uses_defaults_when_unset() {
        let _env = ScopedEnv::cleared(&ALL_VARS);
        assert_eq!(EditorConfig::from_env(), EditorConfig::default());
        assert_eq!(
            EditorConfig::default().debounce,
            Duration::from_millis(DEFAULT_EDIT_DEBOUNCE_MS)
        );
    }

    #[test]
    fn from_env_reads_overrides_and_skips_bad_values() {
        let mut env = ScopedEnv::cleared(&ALL_VARS);
        env.set(ENV_DEBOUNCE_MS, "120")
            .set(ENV_FONT_SIZE, "not-a-number")
            .set(ENV_THEME, " Solarized (dark) ")
            .set(ENV_SHOW_LINE_NUMBERS, "off");

        let config = EditorConfig::from_env();

        assert_eq!(config.debounce, Duration::from_millis(120));
        assert_eq!(config.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(config.theme_key, "Solarized (dark)");
        assert!(!config.show_line_numbers);
    }

    #[test]
    fn try_from_env_reports_invalid_variable() {
        let mut env = ScopedEnv::cleared(&ALL_VARS);
        env.set(ENV_FONT_SIZE, "-3");

        let err = EditorConfig::try_from_env().expect_err("negative size rejected");

        match err {
            CodeBlockError::InvalidConfig { name, value } => {
                assert_eq!(name, ENV_FONT_SIZE);
                assert_eq!(value, "-3");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn fallback_line_height_scales_with_font_size() {
        let config = EditorConfig {
            font_size: 16.0,
            ..EditorConfig::default()
        };
        assert_eq!(config.fallback_line_height(), 20.0);
    }
}
