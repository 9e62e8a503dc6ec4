//! Assets a Templ can hold and distribute.

use crate::address::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A transferable asset.
///
/// `Native` is the chain's base currency (the zero-address sentinel in EVM
/// terms); `Token` is any fungible token identified by its contract address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Asset {
    Native,
    Token(Address),
}

impl Asset {
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Contract address of a token asset, `None` for the native currency.
    pub fn token_address(&self) -> Option<Address> {
        match self {
            Self::Native => None,
            Self::Token(addr) => Some(*addr),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Token(addr) => write!(f, "token:{addr}"),
        }
    }
}
