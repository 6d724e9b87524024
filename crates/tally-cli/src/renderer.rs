//! Terminal rendering of markdown output via termimad.

use std::fmt::Display;

use termimad::{crossterm::style::Color, MadSkin};

/// Prints markdown either styled for the terminal or as plain text.
pub struct TerminalRenderer {
    skin: Option<MadSkin>,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let skin = rich_enabled.then(|| {
            let mut skin = MadSkin::default();
            skin.set_headers_fg(Color::Blue);
            skin.bold.set_fg(Color::Yellow);
            skin.italic.set_fg(Color::Magenta);
            skin
        });
        Self { skin }
    }

    pub fn is_rich(&self) -> bool {
        self.skin.is_some()
    }

    /// Renders anything whose `Display` output is markdown.
    pub fn render(&self, content: &impl Display) {
        let markdown = content.to_string();
        match &self.skin {
            Some(skin) => print!("{}", skin.term_text(&markdown)),
            None => print!("{markdown}"),
        }
    }
}
