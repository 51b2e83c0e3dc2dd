//! Change events emitted after mutations

use serde::{Deserialize, Serialize};

use crate::address::Target;

/// Capacity of the broadcast channel handed to subscribers. Slow
/// subscribers past this depth observe a lag error from the channel; the
/// store never blocks on them.
pub(crate) const CHANNEL_CAPACITY: usize = 64;

/// Signal emitted after every successful insert/update/delete, identifying
/// the affected address. No payload beyond the address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub target: Target,
}
