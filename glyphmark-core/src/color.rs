//! Color key resolution with fixed per-context fallbacks

use crate::config::ColorPalette;

/// Fallback for a group highlight whose color key is unknown
pub const HIGHLIGHT_FALLBACK: &str = "#000000";
/// Fallback for an unknown vowel color key
pub const VOWEL_FALLBACK: &str = "#000000";
/// Fallback for an unknown text color key
pub const FOREGROUND_FALLBACK: &str = "#000000";
/// Fallback for an unknown background color key
pub const BACKGROUND_FALLBACK: &str = "#FFFFFF";

/// Call site asking for a color; each has its own fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorContext {
    /// Letter-group highlight
    Highlight,
    /// Vowel coloring
    Vowel,
    /// Preferred text color
    Foreground,
    /// Preferred background color
    Background,
}

impl ColorContext {
    /// The value returned when a key does not resolve
    pub const fn fallback(self) -> &'static str {
        match self {
            ColorContext::Highlight => HIGHLIGHT_FALLBACK,
            ColorContext::Vowel => VOWEL_FALLBACK,
            ColorContext::Foreground => FOREGROUND_FALLBACK,
            ColorContext::Background => BACKGROUND_FALLBACK,
        }
    }
}

/// Resolves symbolic color keys against a palette
#[derive(Debug, Clone, Copy)]
pub struct ColorResolver<'a> {
    palette: &'a ColorPalette,
}

impl<'a> ColorResolver<'a> {
    /// Create a resolver over a palette
    pub fn new(palette: &'a ColorPalette) -> Self {
        Self { palette }
    }

    /// Resolve a key, falling back to the context's documented value
    pub fn resolve(&self, key: &str, context: ColorContext) -> &'a str {
        match self.palette.get(key) {
            Some(value) => value,
            None => {
                tracing::debug!(key, ?context, "color key not in palette, using fallback");
                context.fallback()
            }
        }
    }

    /// Resolve an optional key; `None` takes the fallback directly
    pub fn resolve_opt(&self, key: Option<&str>, context: ColorContext) -> &'a str {
        match key {
            Some(key) => self.resolve(key, context),
            None => context.fallback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> ColorPalette {
        [("soft-blue", "#4a90e2"), ("cream", "#fdf6e3")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_resolve_known_key() {
        let palette = palette();
        let resolver = ColorResolver::new(&palette);
        assert_eq!(resolver.resolve("soft-blue", ColorContext::Highlight), "#4a90e2");
        assert_eq!(resolver.resolve("cream", ColorContext::Background), "#fdf6e3");
    }

    #[test]
    fn test_unknown_highlight_key_uses_highlight_fallback() {
        let palette = palette();
        let resolver = ColorResolver::new(&palette);
        let value = resolver.resolve("unknown-color", ColorContext::Highlight);
        assert_eq!(value, HIGHLIGHT_FALLBACK);
        assert!(!value.is_empty());
    }

    #[test]
    fn test_each_context_has_fixed_fallback() {
        let palette = ColorPalette::new();
        let resolver = ColorResolver::new(&palette);
        for context in [
            ColorContext::Highlight,
            ColorContext::Vowel,
            ColorContext::Foreground,
            ColorContext::Background,
        ] {
            assert_eq!(resolver.resolve("missing", context), context.fallback());
            assert_eq!(resolver.resolve_opt(None, context), context.fallback());
        }
        assert_eq!(
            resolver.resolve("missing", ColorContext::Background),
            "#FFFFFF"
        );
    }
}
