use std::io::Write;

use super::automaton::Automaton;
use super::driver::Renderer;

/// One glyph per state; states past the end reuse the last glyph.
const GLYPHS: &[char] = &['.', '#', '+', '*', 'o', '%', '@'];

/// Renders the grid as text, one character per cell.
#[derive(Debug, Default)]
pub struct TextRenderer {
    frame: String,
    frames: u64,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent frame.
    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn write_to(&self, out: &mut impl Write) -> std::io::Result<()> {
        out.write_all(self.frame.as_bytes())
    }
}

pub fn glyph(state: u8) -> char {
    GLYPHS[(state as usize).min(GLYPHS.len() - 1)]
}

impl Renderer for TextRenderer {
    fn render(&mut self, automaton: &Automaton) {
        let grid = automaton.grid();
        self.frame.clear();
        self.frame.push_str(&format!(
            "gen {} | {} | {}\n",
            automaton.generation(),
            automaton.rule_name().unwrap_or("custom"),
            automaton
                .census()
                .iter()
                .enumerate()
                .map(|(s, n)| format!("{}:{}", glyph(s as u8), n))
                .collect::<Vec<_>>()
                .join(" ")
        ));
        for row in grid.rows() {
            self.frame.extend(row.iter().map(|&s| glyph(s)));
            self.frame.push('\n');
        }
        self.frames += 1;
    }
}
