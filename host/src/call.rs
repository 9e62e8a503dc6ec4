//! Call results, reentry descriptors and checkpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use templ_types::{Address, Asset};

/// Handle returned by [`crate::Host::checkpoint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Checkpoint(pub u64);

/// The Templ entry point a callback tried to reach.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplCall {
    Join { recipient: Address },
    Claim { asset: Asset },
    Vote { proposal_id: u64 },
    Execute { proposal_id: u64 },
    Propose,
}

impl fmt::Display for TemplCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Join { recipient } => write!(f, "join({recipient})"),
            Self::Claim { asset } => write!(f, "claim({asset})"),
            Self::Vote { proposal_id } => write!(f, "vote({proposal_id})"),
            Self::Execute { proposal_id } => write!(f, "execute({proposal_id})"),
            Self::Propose => f.write_str("propose"),
        }
    }
}

/// A callback into the Templ attempted while the host was running a
/// transfer or call on its behalf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reentry {
    /// Contract or account that made the callback.
    pub from: Address,
    pub call: TemplCall,
}

/// Result of a successful outbound call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOutcome {
    pub return_data: Vec<u8>,
    pub reentries: Vec<Reentry>,
}

impl CallOutcome {
    pub fn returning(return_data: Vec<u8>) -> Self {
        Self {
            return_data,
            reentries: Vec::new(),
        }
    }
}
