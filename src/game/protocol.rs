//! Wire encoding for the in-game messages.
//!
//! Every message is exactly one ASCII byte: a digit `'1'..='9'` for a move,
//! `'y'` or `'n'` for the answer to "play again?". There is no tag and no
//! length prefix, so the receiver must already know which kind it expects.
use crate::game::board::Position;
use std::fmt;
use thiserror::Error;

/// Length in bytes of every encoded message.
pub const MESSAGE_LEN: usize = 1;

const CONTINUE_YES: u8 = b'y';
const CONTINUE_NO: u8 = b'n';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Move(Position),
    ContinueYes,
    ContinueNo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Move,
    Continue,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Move => f.write_str("move"),
            MessageKind::Continue => f.write_str("continue decision"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty payload")]
    Empty,
    #[error("expected a single byte, got {0}")]
    WrongLength(usize),
    #[error("unrecognized byte {0:#04x}")]
    UnknownByte(u8),
}

impl Message {
    pub fn continue_with(keep_playing: bool) -> Self {
        if keep_playing {
            Message::ContinueYes
        } else {
            Message::ContinueNo
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Move(_) => MessageKind::Move,
            Message::ContinueYes | Message::ContinueNo => MessageKind::Continue,
        }
    }

    pub fn encode(&self) -> [u8; MESSAGE_LEN] {
        match self {
            Message::Move(position) => [b'0' + position.value()],
            Message::ContinueYes => [CONTINUE_YES],
            Message::ContinueNo => [CONTINUE_NO],
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let byte = match bytes {
            [] => return Err(DecodeError::Empty),
            [byte] => *byte,
            _ => return Err(DecodeError::WrongLength(bytes.len())),
        };

        match byte {
            CONTINUE_YES => Ok(Message::ContinueYes),
            CONTINUE_NO => Ok(Message::ContinueNo),
            b'1'..=b'9' => Position::new(byte - b'0')
                .map(Message::Move)
                .map_err(|_| DecodeError::UnknownByte(byte)),
            _ => Err(DecodeError::UnknownByte(byte)),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Move(position) => write!(f, "move {position}"),
            Message::ContinueYes => f.write_str("continue"),
            Message::ContinueNo => f.write_str("stop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_are_ascii_digits() {
        for position in Position::all() {
            let encoded = Message::Move(position).encode();
            assert_eq!(encoded[0], b'0' + position.value());
            assert_eq!(Message::decode(&encoded), Ok(Message::Move(position)));
        }
    }

    #[test]
    fn continue_answers_are_y_and_n() {
        assert_eq!(Message::ContinueYes.encode(), *b"y");
        assert_eq!(Message::ContinueNo.encode(), *b"n");
        assert_eq!(Message::decode(b"y"), Ok(Message::ContinueYes));
        assert_eq!(Message::decode(b"n"), Ok(Message::ContinueNo));
        assert_eq!(Message::continue_with(true), Message::ContinueYes);
        assert_eq!(Message::continue_with(false), Message::ContinueNo);
    }

    #[test]
    fn rejects_anything_else() {
        assert_eq!(Message::decode(b""), Err(DecodeError::Empty));
        assert_eq!(Message::decode(b"12"), Err(DecodeError::WrongLength(2)));
        assert_eq!(Message::decode(b"3y"), Err(DecodeError::WrongLength(2)));
        for byte in [b'0', b'x', b'Y', b'N', b' ', b'\n', 0xff] {
            assert_eq!(Message::decode(&[byte]), Err(DecodeError::UnknownByte(byte)));
        }
    }

    #[test]
    fn kinds() {
        let five = Position::new(5).unwrap();
        assert_eq!(Message::Move(five).kind(), MessageKind::Move);
        assert_eq!(Message::ContinueNo.kind(), MessageKind::Continue);
    }
}
