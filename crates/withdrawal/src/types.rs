use std::fmt;

/// Where an L2→L1 withdrawal stands on L1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalStatus {
    /// The batch holding the message is not confirmed on L1 yet
    Unconfirmed { send_count: u64 },
    /// Provable and executable through the outbox
    Confirmed { send_count: u64 },
    /// Already executed through the outbox
    Executed,
}

impl WithdrawalStatus {
    pub const fn is_finalizable(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfirmed { send_count } => {
                write!(f, "unconfirmed ({send_count} sends confirmed)")
            }
            Self::Confirmed { send_count } => {
                write!(f, "ready to finalize ({send_count} sends confirmed)")
            }
            Self::Executed => write!(f, "finalized"),
        }
    }
}
