use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

const RESET: &str = "\x1b[0m";

/// Highlights text with one fixed grammar, whatever the text actually is.
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    syntax_name: String,
}

impl CodeHighlighter {
    /// `language` is a file extension or syntax name ("rs", "rust", "py").
    /// Unknown languages fall back to plain text; unknown themes to the
    /// first bundled theme.
    pub fn new(language: &str, theme_name: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();

        let syntax_name = match syntax_set.find_syntax_by_token(language) {
            Some(syntax) => syntax.name.clone(),
            None => {
                tracing::warn!("no grammar for '{}', replies will not be colored", language);
                syntax_set.find_syntax_plain_text().name.clone()
            }
        };

        let theme = match theme_set.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                tracing::warn!("unknown theme '{}', using default", theme_name);
                theme_set.themes.into_values().next().unwrap_or_default()
            }
        };

        Self { syntax_set, theme, syntax_name }
    }

    /// Name of the grammar actually in use
    pub fn syntax_name(&self) -> &str {
        &self.syntax_name
    }

    fn syntax(&self) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_name(&self.syntax_name)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Render `lines` as 24-bit ANSI. Lines are highlighted in order so
    /// multi-line constructs keep their state.
    pub fn highlight_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        let mut highlighter = HighlightLines::new(self.syntax(), &self.theme);
        let mut out = Vec::with_capacity(lines.len());

        for line in lines {
            let mut line_with_ending = line.as_ref().to_string();
            line_with_ending.push('\n');

            let rendered = match highlighter.highlight_line(&line_with_ending, &self.syntax_set) {
                Ok(ranges) => {
                    let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
                    format!("{}{}", escaped.trim_end_matches('\n'), RESET)
                }
                Err(e) => {
                    tracing::debug!("highlighting failed: {}", e);
                    line.as_ref().to_string()
                }
            };
            out.push(rendered);
        }
        out
    }

    /// Highlight a whole block of text
    pub fn highlight(&self, text: &str) -> String {
        let lines: Vec<&str> = LinesWithEndings::from(text)
            .map(|line| line.trim_end_matches(['\n', '\r']))
            .collect();
        self.highlight_lines(&lines).join("\n")
    }
}
