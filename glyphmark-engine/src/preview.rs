//! Isolated preview rendering
//!
//! A [`PreviewTree`] is the backend-neutral result: container style plus
//! an ordered list of plain text and styled span nodes. It serializes to
//! a self-contained HTML fragment with inline styles, or to JSON.

use crate::sink::{emit, RunSink};
use crate::stylesheet::{
    css_string, inline_declarations, run_classes, run_declarations, PREVIEW_CLASS,
};
use glyphmark_core::{
    AnnotatedRun, Classification, ColorContext, Preferences, RuleConfig, WordUnit,
};
use serde::Serialize;
use std::fmt::Write as _;

/// Container style derived from clamped preferences
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewStyle {
    /// Font family name
    pub font: String,
    /// Font size in pixels
    pub font_size: f64,
    /// Line height multiplier
    pub line_spacing: f64,
    /// Letter spacing in pixels
    pub letter_spacing: f64,
    /// Word spacing in pixels
    pub word_spacing: f64,
    /// Resolved text color
    pub color: String,
    /// Resolved background color
    pub background_color: String,
}

impl PreviewStyle {
    /// Clamp preferences into the configured bounds and resolve colors
    pub fn from_preferences(config: &RuleConfig, preferences: &Preferences) -> Self {
        let prefs = preferences.clamped(config.bounds());
        let resolver = config.resolver();

        Self {
            color: resolver
                .resolve(&prefs.text_color, ColorContext::Foreground)
                .to_string(),
            background_color: resolver
                .resolve(&prefs.background_color, ColorContext::Background)
                .to_string(),
            font: prefs.font,
            font_size: prefs.font_size,
            line_spacing: prefs.line_spacing,
            letter_spacing: prefs.letter_spacing,
            word_spacing: prefs.word_spacing,
        }
    }

    /// CSS declarations in fixed order
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("font-family", css_string(&self.font)),
            ("font-size", format!("{}px", self.font_size)),
            ("line-height", self.line_spacing.to_string()),
            ("letter-spacing", format!("{}px", self.letter_spacing)),
            ("word-spacing", format!("{}px", self.word_spacing)),
            ("color", self.color.clone()),
            ("background-color", self.background_color.clone()),
        ]
    }

    /// Declarations as an inline `style` value
    pub fn inline(&self) -> String {
        let mut out = String::new();
        for (property, value) in self.declarations() {
            let _ = write!(out, "{property}: {value}; ");
        }
        out.push_str("white-space: pre-wrap;");
        out
    }
}

/// One node of a preview
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewNode {
    /// Unstyled text
    Text {
        /// Literal text
        text: String,
    },
    /// A styled run
    Span {
        /// Literal text
        text: String,
        /// Resolved color, when the run is colored
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        /// Anchor-bold
        bold: bool,
        /// Classification tag of the run
        classification: Classification,
    },
}

impl PreviewNode {
    /// Literal text of the node
    pub fn text(&self) -> &str {
        match self {
            PreviewNode::Text { text } | PreviewNode::Span { text, .. } => text,
        }
    }
}

/// Rendered preview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewTree {
    /// Container style
    pub style: PreviewStyle,
    /// Content in source order
    pub nodes: Vec<PreviewNode>,
}

#[derive(Default)]
struct NodeCollector(Vec<PreviewNode>);

impl RunSink for NodeCollector {
    fn push_text(&mut self, text: &str) {
        self.0.push(PreviewNode::Text {
            text: text.to_string(),
        });
    }

    fn push_run(&mut self, run: &AnnotatedRun, color: Option<&str>) {
        self.0.push(PreviewNode::Span {
            text: run.text.clone(),
            color: color.map(str::to_string),
            bold: run.bold,
            classification: run.classification.clone(),
        });
    }
}

impl PreviewTree {
    /// Build a preview from annotated units
    pub fn build(units: &[WordUnit], config: &RuleConfig, preferences: &Preferences) -> Self {
        let mut collector = NodeCollector::default();
        emit(units, config, &mut collector);
        Self {
            style: PreviewStyle::from_preferences(config, preferences),
            nodes: collector.0,
        }
    }

    /// Concatenated text of every node
    pub fn text(&self) -> String {
        self.nodes.iter().map(PreviewNode::text).collect()
    }

    /// Self-contained HTML fragment with inline styles
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<div class=\"{PREVIEW_CLASS}\" style=\"{}\">",
            html_escape::encode_double_quoted_attribute(&self.style.inline())
        );

        for node in &self.nodes {
            match node {
                PreviewNode::Text { text } => out.push_str(&html_escape::encode_text(text)),
                PreviewNode::Span {
                    text,
                    color,
                    bold,
                    classification,
                } => {
                    let classes = run_classes(classification, *bold).join(" ");
                    let style = inline_declarations(&run_declarations(
                        classification,
                        color.as_deref(),
                        *bold,
                    ));
                    let _ = write!(
                        out,
                        "<span class=\"{}\" style=\"{}\">{}</span>",
                        html_escape::encode_double_quoted_attribute(&classes),
                        html_escape::encode_double_quoted_attribute(&style),
                        html_escape::encode_text(text)
                    );
                }
            }
        }

        out.push_str("</div>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphmark_core::{annotate, ModeFlag};

    fn config() -> RuleConfig {
        RuleConfig::builder()
            .group("mirror_letters1", ['b', 'd'], Some("soft-blue"))
            .color("soft-blue", "#4a90e2")
            .color("cream", "#fdf6e3")
            .color("ink", "#222222")
            .line_spacing(1.0, 3.0)
            .build()
    }

    fn prefs() -> Preferences {
        let mut prefs = Preferences::default().with_group("mirror_letters1");
        prefs.background_color = "cream".to_string();
        prefs.text_color = "ink".to_string();
        prefs
    }

    #[test]
    fn test_nodes_follow_runs() {
        let config = config();
        let prefs = prefs();
        let tree = PreviewTree::build(&annotate("a bed", &config, &prefs), &config, &prefs);

        assert_eq!(tree.nodes.len(), 4);
        assert_eq!(tree.nodes[0].text(), "a ");
        assert!(matches!(
            &tree.nodes[1],
            PreviewNode::Span { text, color: Some(c), bold: false, .. } if text == "b" && c == "#4a90e2"
        ));
        assert_eq!(tree.text(), "a bed");
    }

    #[test]
    fn test_style_resolves_and_clamps() {
        let config = config();
        let mut prefs = prefs();
        prefs.line_spacing = 9.0;
        let style = PreviewStyle::from_preferences(&config, &prefs);

        assert_eq!(style.color, "#222222");
        assert_eq!(style.background_color, "#fdf6e3");
        assert_eq!(style.line_spacing, 3.0);
        assert_eq!(style.font_size, 16.0);
    }

    #[test]
    fn test_unknown_preference_colors_fall_back() {
        let config = RuleConfig::default();
        let style = PreviewStyle::from_preferences(&config, &Preferences::default());
        assert_eq!(style.color, "#000000");
        assert_eq!(style.background_color, "#FFFFFF");
    }

    #[test]
    fn test_html_escapes_and_styles() {
        let config = config();
        let prefs = prefs().with_mode(ModeFlag::BoldStarts);
        let tree = PreviewTree::build(&annotate("<b>", &config, &prefs), &config, &prefs);
        let html = tree.to_html();

        assert!(html.starts_with("<div class=\"gm-preview\" style=\"font-family: 'Arial'; font-size: 16px; line-height: 1.5;"));
        assert!(html.contains("white-space: pre-wrap;\">"));
        assert!(html.contains(
            "<span class=\"gm-anchor\" style=\"font-weight: bold;\">&lt;</span>"
        ));
        assert!(html.contains(
            "<span class=\"gm-anchor gm-group-mirror_letters1\" style=\"color: #4a90e2; font-weight: bold; background-color: #4a90e21a;\">b</span>"
        ));
        assert!(html.ends_with("&gt;</div>"));
    }

    #[test]
    fn test_group_span_matches_stylesheet_rule() {
        let config = config();
        let prefs = prefs();
        let tree = PreviewTree::build(&annotate("bed", &config, &prefs), &config, &prefs);
        let html = tree.to_html();

        let inline = "color: #4a90e2; font-weight: bold; background-color: #4a90e21a;";
        assert!(html.contains(&format!(
            "<span class=\"gm-group-mirror_letters1\" style=\"{inline}\">b</span>"
        )));

        let css = crate::stylesheet::group_stylesheet(&config);
        let rule: Vec<String> = inline
            .split("; ")
            .map(|d| format!("  {};\n", d.trim_end_matches(';')))
            .collect();
        assert!(css.contains(&format!(
            ".gm-group-mirror_letters1 {{\n{}}}\n",
            rule.concat()
        )));
    }

    #[test]
    fn test_preview_serializes() {
        let config = config();
        let prefs = prefs();
        let tree = PreviewTree::build(&annotate("bx", &config, &prefs), &config, &prefs);
        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(json["nodes"][0]["kind"], "span");
        assert_eq!(json["nodes"][0]["classification"], "group:mirror_letters1");
        assert_eq!(json["nodes"][1]["kind"], "text");
        assert_eq!(json["style"]["background_color"], "#fdf6e3");
    }
}
