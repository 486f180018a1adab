//! syntect-backed engine using the bundled syntaxes and themes.

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::highlight::engine::{Fragment, HighlightError, HighlightedLine, Rgb, SyntaxEngine};
use crate::highlight::loader::{EngineError, EngineLoader};

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Tags used in card decks that the bundled syntaxes don't know by name.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("jsx", "js"),
    ("tsx", "js"),
    ("ts", "js"),
    ("typescript", "js"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("golang", "go"),
];

pub struct SyntectEngine {
    syntaxes: SyntaxSet,
    theme: Theme,
    theme_name: String,
}

impl SyntectEngine {
    /// Build the engine. Blocking: deserializes every bundled syntax.
    pub fn load(theme_name: &str) -> Result<Self, EngineError> {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .remove(theme_name)
            .ok_or_else(|| EngineError::UnknownTheme(theme_name.to_string()))?;
        let syntaxes = SyntaxSet::load_defaults_newlines();
        debug!(
            "syntect loaded: {} syntaxes, theme {}",
            syntaxes.syntaxes().len(),
            theme_name
        );
        Ok(Self {
            syntaxes,
            theme,
            theme_name: theme_name.to_string(),
        })
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    fn find_syntax(&self, language: &str) -> &SyntaxReference {
        let token = LANGUAGE_ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(language))
            .map(|(_, target)| *target)
            .unwrap_or(language);
        self.syntaxes
            .find_syntax_by_token(token)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }
}

impl SyntaxEngine for SyntectEngine {
    fn name(&self) -> &str {
        "syntect"
    }

    fn highlight(&self, language: &str, code: &str) -> Result<Vec<HighlightedLine>, HighlightError> {
        let mut hl = HighlightLines::new(self.find_syntax(language), &self.theme);
        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let ranges = hl
                .highlight_line(line, &self.syntaxes)
                .map_err(|e| HighlightError::Engine {
                    language: language.to_string(),
                    message: e.to_string(),
                })?;
            let fragments = ranges
                .into_iter()
                .filter_map(|(style, frag)| {
                    let text = frag.trim_end_matches(['\n', '\r']).replace('\t', "    ");
                    if text.is_empty() {
                        return None;
                    }
                    Some(Fragment {
                        text,
                        color: Some(Rgb(
                            style.foreground.r,
                            style.foreground.g,
                            style.foreground.b,
                        )),
                        bold: style.font_style.contains(FontStyle::BOLD),
                        italic: style.font_style.contains(FontStyle::ITALIC),
                    })
                })
                .collect();
            lines.push(fragments);
        }
        Ok(lines)
    }
}

/// Loads a `SyntectEngine` on tokio's blocking pool.
pub struct SyntectLoader {
    theme: String,
}

impl SyntectLoader {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
        }
    }
}

#[async_trait]
impl EngineLoader for SyntectLoader {
    fn name(&self) -> &str {
        "syntect"
    }

    async fn load(&self) -> Result<Arc<dyn SyntaxEngine>, EngineError> {
        let theme = self.theme.clone();
        let engine = tokio::task::spawn_blocking(move || SyntectEngine::load(&theme))
            .await
            .map_err(|e| EngineError::Join(e.to_string()))??;
        Ok(Arc::new(engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(lines: &[HighlightedLine]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.iter().map(|f| f.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_known_language_is_coloured() {
        let engine = SyntectEngine::load(DEFAULT_THEME).unwrap();
        let lines = engine.highlight("js", "const x = 1;\nlet y = 'a';").unwrap();
        assert_eq!(joined(&lines), vec!["const x = 1;", "let y = 'a';"]);
        let colors: std::collections::HashSet<_> =
            lines[0].iter().filter_map(|f| f.color).collect();
        assert!(colors.len() > 1, "expected several token colours, got {:?}", colors);
    }

    #[test]
    fn test_jsx_alias_resolves() {
        let engine = SyntectEngine::load(DEFAULT_THEME).unwrap();
        assert_eq!(engine.find_syntax("jsx").name, "JavaScript");
        assert_eq!(engine.find_syntax("JSX").name, "JavaScript");
    }

    #[test]
    fn test_unknown_language_is_plain_text() {
        let engine = SyntectEngine::load(DEFAULT_THEME).unwrap();
        assert_eq!(engine.find_syntax("klingon").name, "Plain Text");
        let lines = engine.highlight("klingon", "Qapla'\n\nbatlh").unwrap();
        assert_eq!(joined(&lines), vec!["Qapla'", "", "batlh"]);
    }

    #[test]
    fn test_tabs_expanded() {
        let engine = SyntectEngine::load(DEFAULT_THEME).unwrap();
        let lines = engine.highlight("python", "if x:\n\treturn 1").unwrap();
        let second: String = lines[1].iter().map(|f| f.text.as_str()).collect();
        assert_eq!(second, "    return 1");
    }

    #[test]
    fn test_unknown_theme_fails() {
        let err = SyntectEngine::load("no-such-theme").err().unwrap();
        assert_eq!(err, EngineError::UnknownTheme("no-such-theme".to_string()));
    }

    #[tokio::test]
    async fn test_loader_produces_engine() {
        let loader = SyntectLoader::new(DEFAULT_THEME);
        let engine = loader.load().await.unwrap();
        assert_eq!(engine.name(), "syntect");
    }

    #[tokio::test]
    async fn test_loader_reports_bad_theme() {
        let loader = SyntectLoader::new("missing");
        let err = loader.load().await.err().unwrap();
        assert!(matches!(err, EngineError::UnknownTheme(ref t) if t == "missing"));
    }
}
