//! Rule and preference file loading
//!
//! Rule files come in two shapes: JSON as exported by the browser
//! extension, and TOML for hand-written configurations. The default rule
//! set is embedded in the binary and parsed once.

use crate::error::{ApiError, Result};
use glyphmark_core::{Preferences, RawRuleConfig, RuleConfig};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

static DEFAULT_RULES: OnceLock<RuleConfig> = OnceLock::new();

const DEFAULT_RULES_TOML: &str = include_str!("../configs/rules/default.toml");

/// Serialization format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON
    Json,
    /// TOML
    Toml,
}

impl ConfigFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(ApiError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Source text of the embedded default rule set
pub fn default_rules_source() -> &'static str {
    DEFAULT_RULES_TOML
}

/// The embedded default rule set
pub fn default_rules() -> &'static RuleConfig {
    DEFAULT_RULES.get_or_init(|| match toml::from_str::<RawRuleConfig>(DEFAULT_RULES_TOML) {
        Ok(raw) => RuleConfig::from_raw(raw),
        Err(e) => {
            tracing::error!(error = %e, "embedded default rules failed to parse");
            RuleConfig::default()
        }
    })
}

/// Parse raw rule file contents
pub fn parse_raw_rules(content: &str, format: ConfigFormat) -> Result<RawRuleConfig> {
    Ok(match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    })
}

/// Parse and validate rule file contents. Issues are logged once, by
/// validation.
pub fn parse_rules(content: &str, format: ConfigFormat) -> Result<RuleConfig> {
    Ok(RuleConfig::from_raw(parse_raw_rules(content, format)?))
}

/// Load a rule file, choosing the format by extension
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleConfig> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), ?format, "loading rule file");
    parse_rules(&content, format)
}

/// Parse preference file contents
pub fn parse_preferences(content: &str, format: ConfigFormat) -> Result<Preferences> {
    Ok(match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    })
}

/// Load a preference file, choosing the format by extension
pub fn load_preferences(path: impl AsRef<Path>) -> Result<Preferences> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), ?format, "loading preferences");
    parse_preferences(&content, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphmark_core::ModeFlag;
    use std::io::Write;

    #[test]
    fn test_default_rules_parse_cleanly() {
        let rules = default_rules();
        assert!(rules.issues().is_empty(), "{:?}", rules.issues());
        assert!(rules.group("mirror_letters1").is_some());
        assert_eq!(rules.group_display_color("mirror_letters1"), "#4A90E2");
        assert_eq!(rules.vowel_display_color(), "#E57373");
        assert!(rules.bounds().font_size.is_some());
    }

    #[test]
    fn test_default_rules_resolve_default_preference_colors() {
        let rules = default_rules();
        let prefs = Preferences::default();
        assert_eq!(rules.palette().get(&prefs.background_color), Some("#FFFFFF"));
        assert_eq!(rules.palette().get(&prefs.text_color), Some("#000000"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("rules.JSON")).unwrap(),
            ConfigFormat::Json
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/b/rules.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("rules")),
            Err(ApiError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_extension_json_shape() {
        let json = r##"{
            "letterGroups": { "mirror_letters1": ["b", "d"], "broken": null },
            "highlightColors": { "mirror_letters1": "soft-blue" },
            "colors": { "soft-blue": "#4a90e2" },
            "vowelColor": "soft-red",
            "somethingElse": true
        }"##;
        let rules = parse_rules(json, ConfigFormat::Json).unwrap();

        assert_eq!(rules.group_count(), 1);
        assert_eq!(rules.issues().len(), 1);
    }

    #[test]
    fn test_parse_preferences_json() {
        let json = r#"{
            "fontSize": 20,
            "activeModes": ["boldStarts", "sparkles"],
            "activeLetterGroups": ["mirror_letters2", "mirror_letters1"]
        }"#;
        let prefs = parse_preferences(json, ConfigFormat::Json).unwrap();

        assert_eq!(prefs.font_size, 20.0);
        assert!(prefs.bold_starts());
        assert!(!prefs.vowel_coloring());
        assert_eq!(prefs.activation_order(), ["mirror_letters2", "mirror_letters1"]);
        assert_eq!(prefs.font, "Arial");
    }

    #[test]
    fn test_parse_preferences_toml() {
        let toml = r#"
            active_modes = ["vowel_coloring"]
            line_spacing = 2.0
        "#;
        let prefs = parse_preferences(toml, ConfigFormat::Toml).unwrap();
        assert!(prefs.has_mode(ModeFlag::VowelColoring));
        assert_eq!(prefs.line_spacing, 2.0);
    }

    #[test]
    fn test_load_rules_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            "[letter_groups]\nround = [\"o\"]\n[highlight_colors]\nround = \"c\"\n[palette]\nc = \"#123456\"\n"
        )
        .unwrap();

        let rules = load_rules(file.path()).unwrap();
        assert_eq!(rules.group_display_color("round"), "#123456");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_rules("/nonexistent/rules.json").unwrap_err();
        assert!(matches!(err, ApiError::Io(_)));
    }

    #[test]
    fn test_malformed_toml_is_reported() {
        let err = parse_rules("letter_groups = [", ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ApiError::Toml(_)));
    }
}
