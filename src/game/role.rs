//! The two ends of a session. Both run the same state machine; the role only
//! fixes the mark, who opens each game and who decides whether to play again.
use serde::{Deserialize, Serialize};

use crate::core::network::{Active, NetworkManager, Transport};
use crate::game::board::Mark;
use crate::game::player::LocalPlayer;
use crate::game::session::{Phase, Session};
use crate::game::stats::Identities;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Joins the host, plays X, opens every game and decides on rematches.
    Initiator,
    /// Hosts the connection, plays O and follows the initiator's decision.
    Responder,
}

impl Role {
    pub fn from_host_flag(is_host: bool) -> Self {
        if is_host {
            Role::Responder
        } else {
            Role::Initiator
        }
    }

    pub fn is_host(self) -> bool {
        self == Role::Responder
    }

    pub fn mark(self) -> Mark {
        match self {
            Role::Initiator => Mark::X,
            Role::Responder => Mark::O,
        }
    }

    pub fn peer_mark(self) -> Mark {
        self.mark().opponent()
    }

    pub fn moves_first(self) -> bool {
        self == Role::Initiator
    }

    /// The side that asks "play again?" and sends the answer. Fixed to the
    /// first mover so exactly one side ever sends a continuation byte.
    pub fn decides_continuation(self) -> bool {
        self.moves_first()
    }

    /// Phase each game starts in for this role.
    pub fn opening_phase(self) -> Phase {
        if self.moves_first() {
            Phase::AwaitingLocalMove
        } else {
            Phase::AwaitingRemoteMove
        }
    }
}

pub fn initiator<T: Transport, P: LocalPlayer>(
    net: NetworkManager<T, Active>,
    player: P,
    identities: Identities,
) -> Session<T, P> {
    Session::new(Role::Initiator, net, player, identities)
}

pub fn responder<T: Transport, P: LocalPlayer>(
    net: NetworkManager<T, Active>,
    player: P,
    identities: Identities,
) -> Session<T, P> {
    Session::new(Role::Responder, net, player, identities)
}
