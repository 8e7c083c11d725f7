pub mod core {
	pub mod lobby;
	pub mod network;
	pub mod terminal;
}

pub mod cli;
pub mod console;
pub mod game;

// Re-export for convenience
pub use crate::game::{Board, Mark, Position, Role, Session, SessionReport, SessionStats};
