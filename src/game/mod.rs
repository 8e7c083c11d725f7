pub mod board;
pub mod error;
pub mod player;
pub mod protocol;
pub mod role;
pub mod session;
pub mod stats;

pub use board::{Board, Cell, GameOutcome, IllegalMove, Mark, Position};
pub use error::SessionError;
pub use player::{LocalPlayer, Waiting};
pub use protocol::{DecodeError, Message, MessageKind};
pub use role::Role;
pub use session::{Phase, Session, SessionReport};
pub use stats::{GameResult, Identities, Party, SessionStats};
