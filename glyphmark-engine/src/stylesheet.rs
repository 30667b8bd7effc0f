//! CSS generation for annotated markup
//!
//! Output is byte-stable for a given configuration: rules follow group
//! key order and every declaration is written in a fixed order.

use crate::preview::PreviewStyle;
use glyphmark_core::{Classification, Preferences, RuleConfig};
use regex::Regex;
use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};

/// Class of the element wrapping an annotated text node
pub const WRAPPER_CLASS: &str = "gm-annotated";
/// Class of the preview container
pub const PREVIEW_CLASS: &str = "gm-preview";
/// Class of anchor-bold runs
pub const ANCHOR_CLASS: &str = "gm-anchor";
/// Class of vowel-colored runs
pub const VOWEL_CLASS: &str = "gm-vowel";
/// Prefix of letter-group run classes
pub const GROUP_CLASS_PREFIX: &str = "gm-group-";

/// Alpha suffix for the faint group background
const FAINT_ALPHA: &str = "1a";

static HEX6: OnceLock<Option<Regex>> = OnceLock::new();

fn is_hex6(value: &str) -> bool {
    HEX6.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

/// Class name for a letter group. Characters outside `[A-Za-z0-9_-]`
/// become `_`.
pub fn group_class(key: &str) -> String {
    let mut class = String::with_capacity(GROUP_CLASS_PREFIX.len() + key.len());
    class.push_str(GROUP_CLASS_PREFIX);
    class.extend(key.chars().map(|c| {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            c
        } else {
            '_'
        }
    }));
    class
}

/// Classes carried by a styled run
pub fn run_classes(classification: &Classification, bold: bool) -> Vec<String> {
    let mut classes = Vec::with_capacity(2);
    if bold {
        classes.push(ANCHOR_CLASS.to_string());
    }
    match classification {
        Classification::None => {}
        Classification::Vowel => classes.push(VOWEL_CLASS.to_string()),
        Classification::Group(key) => classes.push(group_class(key)),
    }
    classes
}

/// Faint background for a highlight color: the color at `1a` alpha,
/// or `transparent` when it is not a `#rrggbb` value
pub fn faint_background(color: &str) -> String {
    if is_hex6(color) {
        format!("{color}{FAINT_ALPHA}")
    } else {
        "transparent".to_string()
    }
}

/// Quote a font family name for CSS
pub(crate) fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Declarations styling one run. Group runs are bold on a faint
/// background; anchor runs are bold. The stylesheet and the inline
/// preview both draw from this.
pub fn run_declarations(
    classification: &Classification,
    color: Option<&str>,
    bold: bool,
) -> Vec<(&'static str, String)> {
    let is_group = matches!(classification, Classification::Group(_));
    let mut declarations = Vec::with_capacity(3);
    if let Some(color) = color {
        declarations.push(("color", color.to_string()));
    }
    if is_group || bold {
        declarations.push(("font-weight", "bold".to_string()));
    }
    if let (true, Some(color)) = (is_group, color) {
        declarations.push(("background-color", faint_background(color)));
    }
    declarations
}

/// Declarations as an inline `style` value
pub(crate) fn inline_declarations(declarations: &[(&str, String)]) -> String {
    let mut out = String::new();
    for (property, value) in declarations {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "{property}: {value};");
    }
    out
}

fn write_rule(out: &mut String, selector: &str, declarations: &[(&str, String)]) {
    let _ = writeln!(out, "{selector} {{");
    for (property, value) in declarations {
        let _ = writeln!(out, "  {property}: {value};");
    }
    out.push_str("}\n");
}

/// Stylesheet for group, vowel and anchor classes
pub fn group_stylesheet(config: &RuleConfig) -> String {
    let mut out = String::new();

    for group in config.groups() {
        let classification = Classification::Group(Arc::from(group.key()));
        let color = config.group_display_color(group.key());
        write_rule(
            &mut out,
            &format!(".{}", group_class(group.key())),
            &run_declarations(&classification, Some(color), false),
        );
    }

    write_rule(
        &mut out,
        &format!(".{VOWEL_CLASS}"),
        &run_declarations(
            &Classification::Vowel,
            Some(config.vowel_display_color()),
            false,
        ),
    );
    write_rule(
        &mut out,
        &format!(".{ANCHOR_CLASS}"),
        &run_declarations(&Classification::None, None, true),
    );

    out
}

/// Stylesheet applying clamped preference typography to `selector`
pub fn typography_stylesheet(
    config: &RuleConfig,
    preferences: &Preferences,
    selector: &str,
) -> String {
    let style = PreviewStyle::from_preferences(config, preferences);
    let mut out = String::new();
    write_rule(&mut out, selector, &style.declarations());
    out
}
