/// Plain-text terminal output: boards, instructions and the stats block
use crossterm::{
    style::{Color, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::{self, stdout, Stdout, Write};

use crate::game::{Board, Cell, Identities, Mark, Party, SessionStats};

pub struct TerminalContext<W: Write = Stdout> {
    out: W,
}

impl TerminalContext<Stdout> {
    pub fn new() -> Self {
        Self { out: stdout() }
    }
}

impl Default for TerminalContext<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalContext<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn print_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Print colored text with automatic reset
    pub fn print_colored(&mut self, text: &str, color: TerminalColor) -> io::Result<()> {
        self.out.queue(SetForegroundColor(color.into()))?;
        write!(self.out, "{text}")?;
        self.out.queue(ResetColor)?;
        Ok(())
    }

    pub fn print_colored_line(&mut self, text: &str, color: TerminalColor) -> io::Result<()> {
        self.print_colored(text, color)?;
        self.print_line("")
    }

    /// Draws the grid as `|X|O| |` rows.
    pub fn draw_board(&mut self, board: &Board) -> io::Result<()> {
        for row in board.rows() {
            write!(self.out, "|")?;
            for cell in row {
                match cell {
                    Cell::Empty => write!(self.out, " ")?,
                    Cell::Marked(mark) => self.print_colored(&mark.to_string(), mark_color(*mark))?,
                }
                write!(self.out, "|")?;
            }
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    pub fn draw_instructions(&mut self) -> io::Result<()> {
        self.print_colored_line("Instructions--------------------------------", TerminalColor::Yellow)?;
        self.print_line("Enter number 1-9 corresponding to squares as shown below to place marker:")?;
        for row in [["1", "2", "3"], ["4", "5", "6"], ["7", "8", "9"]] {
            self.print_line(&format!("|{}|", row.join("|")))?;
        }
        Ok(())
    }

    pub fn draw_stats(&mut self, stats: &SessionStats, identities: &Identities) -> io::Result<()> {
        let last = stats.last_mover.map_or("", |party: Party| identities.name_of(party));
        self.print_colored_line("Game Statistics:", TerminalColor::Cyan)?;
        self.print_line(&format!("Your username: {}", identities.local))?;
        self.print_line(&format!("Opponent's username: {}", identities.peer))?;
        self.print_line(&format!("Last move: {last}"))?;
        self.print_line(&format!("Games played: {}", stats.games_played))?;
        self.print_line(&format!("Wins: {}", stats.wins))?;
        self.print_line(&format!("Losses: {}", stats.losses))?;
        self.print_line(&format!("Ties: {}", stats.ties))
    }
}

fn mark_color(mark: Mark) -> TerminalColor {
    match mark {
        Mark::X => TerminalColor::Red,
        Mark::O => TerminalColor::Blue,
    }
}

#[derive(Clone, Copy)]
pub enum TerminalColor {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
}

impl From<TerminalColor> for Color {
    fn from(color: TerminalColor) -> Self {
        match color {
            TerminalColor::Red => Color::Red,
            TerminalColor::Green => Color::Green,
            TerminalColor::Blue => Color::Blue,
            TerminalColor::Yellow => Color::Yellow,
            TerminalColor::Cyan => Color::Cyan,
        }
    }
}
