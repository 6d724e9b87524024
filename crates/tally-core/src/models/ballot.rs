//! Ballot model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One participant's ranking of one option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ballot {
    pub id: u64,

    /// Who cast the ballot; authenticated upstream
    pub participant_id: String,

    /// Option being ranked
    pub option_id: u64,

    /// Position in the participant's ranking, 0 being most preferred
    pub rank: u32,

    /// Timestamp when the ballot was cast (UTC)
    pub created_at: Timestamp,
}
