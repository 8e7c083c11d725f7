//! Interactive local player: dialoguer prompts for input, `TerminalContext`
//! for everything printed.
use async_trait::async_trait;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::io;
use tracing::warn;

use crate::core::lobby::validate_username;
use crate::core::terminal::{TerminalColor, TerminalContext};
use crate::game::{Board, GameResult, Identities, IllegalMove, LocalPlayer, Mark, Party, Position, SessionReport, Waiting};

#[derive(Default)]
pub struct ConsolePlayer {
    term: TerminalContext,
    identities: Option<Identities>,
}

impl ConsolePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn peer(&self) -> &str {
        self.identities.as_ref().map_or("opponent", |ids| ids.peer.as_str())
    }

    fn show(&mut self, draw: impl FnOnce(&mut TerminalContext) -> io::Result<()>) {
        if let Err(e) = draw(&mut self.term) {
            warn!(error = %e, "terminal write failed");
        }
    }
}

#[async_trait]
impl LocalPlayer for ConsolePlayer {
    async fn choose_move(&mut self, board: &Board, mark: Mark) -> io::Result<Position> {
        self.show(|t| t.print_line(&format!("Your turn. Your marker is: {mark}")));
        let board = board.clone();
        tokio::task::spawn_blocking(move || read_move(&board))
            .await
            .map_err(io::Error::other)?
    }

    async fn choose_continue(&mut self) -> io::Result<bool> {
        tokio::task::spawn_blocking(|| {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Play again?")
                .interact()
                .map_err(io::Error::other)
        })
        .await
        .map_err(io::Error::other)?
    }

    fn session_started(&mut self, identities: &Identities, _mark: Mark) {
        self.identities = Some(identities.clone());
        self.show(|t| t.draw_instructions());
    }

    fn move_rejected(&mut self, _position: Position, reason: &IllegalMove) {
        let text = format!("{reason}, try again");
        self.show(|t| t.print_colored_line(&text, TerminalColor::Yellow));
    }

    fn waiting(&mut self, on: Waiting) {
        let text = match on {
            Waiting::PeerMove => format!("Waiting for {}'s move...", self.peer()),
            Waiting::PeerDecision => format!("Asking if {} wants to keep playing...", self.peer()),
        };
        self.show(|t| t.print_line(&text));
    }

    fn board_updated(&mut self, board: &Board, mover: Party) {
        let heading = match mover {
            Party::Local => "Your move:".to_string(),
            Party::Peer => format!("{} has made a move:", self.peer()),
        };
        self.show(|t| {
            t.print_line(&heading)?;
            t.draw_board(board)
        });
    }

    fn game_finished(&mut self, result: GameResult) {
        let (text, color) = match result {
            GameResult::Won => ("You win!".to_string(), TerminalColor::Green),
            GameResult::Lost => ("You lose.".to_string(), TerminalColor::Red),
            GameResult::Tied => (format!("You and {} tied.", self.peer()), TerminalColor::Yellow),
        };
        self.show(|t| t.print_colored_line(&text, color));
    }

    fn continuing(&mut self, keep_playing: bool) {
        let text = if keep_playing { "Board Reset." } else { "Disconnecting..." };
        self.show(|t| t.print_line(text));
    }

    fn session_ended(&mut self, report: &SessionReport) {
        self.show(|t| {
            if let Some(e) = &report.error {
                t.print_colored_line(&format!("Session ended: {e}"), TerminalColor::Red)?;
            }
            t.draw_stats(&report.stats, &report.identities)?;
            t.print_line("Goodbye!")
        });
    }
}

/// Parses one line of move input against the current board.
pub fn parse_move(text: &str, board: &Board) -> Result<Position, String> {
    let value: u8 = text.trim().parse().map_err(|_| "Invalid entry, try again".to_string())?;
    let position = Position::new(value).map_err(|_| "Invalid entry, try again".to_string())?;
    if !board.is_empty(position) {
        return Err("This spot is not empty, try again".to_string());
    }
    Ok(position)
}

fn read_move(board: &Board) -> io::Result<Position> {
    let text: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter your move (1-9)")
        .validate_with(|text: &String| parse_move(text, board).map(|_| ()))
        .interact_text()
        .map_err(io::Error::other)?;
    parse_move(&text, board).map_err(io::Error::other)
}

/// Asks for a username until a valid one is entered.
pub fn prompt_username(default: Option<&str>) -> io::Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt("Enter your username")
        .validate_with(|name: &String| validate_username(name).map_err(|e| e.to_string()));
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    input.interact_text().map_err(io::Error::other)
}

pub fn prompt_address(default: &str) -> io::Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Address (host:port)")
        .default(default.to_string())
        .interact_text()
        .map_err(io::Error::other)
}

pub fn confirm(prompt: &str) -> io::Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact()
        .map_err(io::Error::other)
}
