use colored::Colorize;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use unicode_width::UnicodeWidthStr;

use airychat_chat::{Locale, SessionEvent, SessionObserver};
use airychat_models::Turn;

pub mod highlight;
pub use highlight::CodeHighlighter;

pub const APP_TITLE: &str = "Airy AI";

const DEFAULT_WIDTH: usize = 80;
const MIN_WIDTH: usize = 20;

/// Presentation settings taken from the command line
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub highlight_lang: String,
    pub theme: String,
    pub color: bool,
    /// Fixed render width; the terminal width is used when None
    pub width: Option<usize>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            highlight_lang: "rust".to_string(),
            theme: "base16-ocean.dark".to_string(),
            color: true,
            width: None,
        }
    }
}

struct Output {
    writer: Box<dyn Write + Send>,
    status_visible: bool,
}

/// Renders the session to a terminal as it changes.
///
/// New turns are printed as they are appended, which keeps the newest turn
/// at the bottom of the scrollback. User turns are right-aligned plain text;
/// assistant turns are left-aligned and always syntax highlighted.
pub struct TerminalView {
    highlighter: CodeHighlighter,
    locale: Locale,
    color: bool,
    width: usize,
    output: Mutex<Output>,
}

impl TerminalView {
    pub fn new(options: &ViewOptions, locale: Locale, writer: Box<dyn Write + Send>) -> Self {
        let width = options
            .width
            .unwrap_or_else(terminal_width)
            .max(MIN_WIDTH);

        Self {
            highlighter: CodeHighlighter::new(&options.highlight_lang, &options.theme),
            locale,
            color: options.color,
            width,
            output: Mutex::new(Output { writer, status_visible: false }),
        }
    }

    pub fn stdout(options: &ViewOptions, locale: Locale) -> Self {
        Self::new(options, locale, Box::new(io::stdout()))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn render_header(&self) -> String {
        let rule = "─".repeat(self.width);
        if self.color {
            format!("{}\n{}\n{}", rule.bright_black(), APP_TITLE.bright_white().bold(), rule.bright_black())
        } else {
            format!("{}\n{}\n{}", rule, APP_TITLE, rule)
        }
    }

    pub fn render_turn(&self, turn: &Turn) -> String {
        if turn.is_user() {
            self.render_user(turn.content())
        } else {
            self.render_assistant(turn.content())
        }
    }

    fn wrap_width(&self) -> usize {
        // Leave a margin so right-aligned text never touches the edge
        self.width.saturating_sub(2).max(MIN_WIDTH / 2)
    }

    fn render_user(&self, content: &str) -> String {
        let label = "You";
        let mut lines = vec![self.align_right(label, if self.color { label.bright_green().bold().to_string() } else { label.to_string() })];

        for line in content.lines() {
            for piece in textwrap::wrap(line, self.wrap_width()) {
                lines.push(self.align_right(&piece, piece.to_string()));
            }
        }
        lines.join("\n")
    }

    fn render_assistant(&self, content: &str) -> String {
        let label = if self.color {
            APP_TITLE.bright_cyan().bold().to_string()
        } else {
            APP_TITLE.to_string()
        };

        let wrapped: Vec<String> = content
            .lines()
            .flat_map(|line| {
                if line.is_empty() {
                    vec![String::new()]
                } else {
                    textwrap::wrap(line, self.wrap_width())
                        .into_iter()
                        .map(|piece| piece.into_owned())
                        .collect()
                }
            })
            .collect();

        let body = if self.color {
            self.highlighter.highlight_lines(&wrapped)
        } else {
            wrapped
        };

        let mut lines = Vec::with_capacity(body.len() + 1);
        lines.push(label);
        lines.extend(body);
        lines.join("\n")
    }

    /// Right-align `rendered` using the display width of `plain`
    fn align_right(&self, plain: &str, rendered: String) -> String {
        let pad = self.width.saturating_sub(UnicodeWidthStr::width(plain));
        format!("{}{}", " ".repeat(pad), rendered)
    }

    pub fn render_status(&self) -> String {
        let message = self.locale.waiting_message();
        if self.color {
            message.bright_black().italic().to_string()
        } else {
            message.to_string()
        }
    }

    fn write_turn(&self, turn: &Turn) {
        let rendered = self.render_turn(turn);
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        if output.status_visible {
            clear_status(&mut output);
        }
        if let Err(e) = writeln!(output.writer, "{}\n", rendered).and_then(|_| output.writer.flush()) {
            tracing::warn!("failed to render turn: {}", e);
        }
    }

    fn set_status(&self, busy: bool) {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        if busy && !output.status_visible {
            let status = self.render_status();
            let _ = write!(output.writer, "{}", status).and_then(|_| output.writer.flush());
            output.status_visible = true;
        } else if !busy && output.status_visible {
            clear_status(&mut output);
        }
    }
}

fn clear_status(output: &mut Output) {
    // Carriage return + erase line
    let _ = write!(output.writer, "\r\x1b[2K").and_then(|_| output.writer.flush());
    output.status_visible = false;
}

impl SessionObserver for TerminalView {
    fn on_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::TurnAppended { turn, .. } => self.write_turn(turn),
            SessionEvent::BusyChanged(busy) => self.set_status(*busy),
        }
    }
}

fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn plain_options(width: usize) -> ViewOptions {
        ViewOptions { color: false, width: Some(width), ..ViewOptions::default() }
    }

    fn plain_view(width: usize) -> (TerminalView, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let view = TerminalView::new(&plain_options(width), Locale::En, Box::new(buffer.clone()));
        (view, buffer)
    }

    #[test]
    fn test_user_turn_is_right_aligned() {
        let (view, _) = plain_view(30);
        let rendered = view.render_turn(&Turn::user("2+2?"));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines, vec![format!("{}You", " ".repeat(27)), format!("{}2+2?", " ".repeat(26))]);
    }

    #[test]
    fn test_assistant_turn_is_left_aligned() {
        let (view, _) = plain_view(30);
        let rendered = view.render_turn(&Turn::assistant("4\n\nfn main() {}"));

        assert_eq!(rendered, "Airy AI\n4\n\nfn main() {}");
    }

    #[test]
    fn test_long_lines_are_wrapped() {
        let (view, _) = plain_view(20);
        let rendered = view.render_turn(&Turn::assistant("one two three four five six seven eight"));

        assert!(rendered.lines().count() > 2);
        assert!(rendered.lines().all(|line| line.width() <= 20));
    }

    #[test]
    fn test_colored_assistant_turn_is_highlighted() {
        let options = ViewOptions { width: Some(40), ..ViewOptions::default() };
        let view = TerminalView::new(&options, Locale::En, Box::new(io::sink()));
        let rendered = view.render_turn(&Turn::assistant("let x = 1;"));

        assert!(rendered.contains("\x1b[38;2;"));
    }

    #[test]
    fn test_status_line_shown_and_cleared() {
        let (view, buffer) = plain_view(30);

        view.on_event(&SessionEvent::BusyChanged(true));
        assert_eq!(buffer.contents(), "Waiting response...");

        view.on_event(&SessionEvent::TurnAppended { index: 1, turn: Turn::assistant("4") });
        view.on_event(&SessionEvent::BusyChanged(false));

        assert_eq!(buffer.contents(), "Waiting response...\r\x1b[2KAiry AI\n4\n\n");
    }

    #[test]
    fn test_status_uses_locale() {
        let buffer = SharedBuffer::default();
        let view = TerminalView::new(&plain_options(30), Locale::Id, Box::new(buffer.clone()));

        view.on_event(&SessionEvent::BusyChanged(true));
        view.on_event(&SessionEvent::BusyChanged(false));

        assert_eq!(buffer.contents(), "Menunggu respons...\r\x1b[2K");
    }

    #[test]
    fn test_header_plain() {
        let (view, _) = plain_view(20);
        let header = view.render_header();
        assert_eq!(header.lines().nth(1), Some("Airy AI"));
    }
}
