//! Lifecycle of one send attempt.
//!
//! ```text
//! Built -> Signed -> Submitted -> Confirmed
//!            |          |    \--> Rejected
//!            |          \-------> TimedOut -> {Submitted | Confirmed | Rejected}
//!            \--> Rejected | TimedOut
//! ```
//!
//! The core only performs `Built -> Signed`. Every later transition records
//! what the broadcaster reported. Nothing here resubmits or re-signs: a
//! retry is a new attempt built from fresh network parameters.

use core::fmt;

use crate::error::{Error, Result};
use crate::network::TxStatus;
use crate::transaction::{SignedTransaction, UnsignedTransaction};

/// State of a send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendState {
    /// Assembled, not yet signed.
    Built,
    /// Signed, not yet handed to the network.
    Signed,
    /// Accepted by the network, not yet final.
    Submitted,
    /// Final and successful.
    Confirmed,
    /// Refused at submission or failed on-chain.
    Rejected,
    /// Submission did not answer in time; the outcome is unknown.
    TimedOut,
}

impl SendState {
    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Rejected)
    }

    /// Whether `self -> to` is a legal move.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Built, Self::Signed)
                | (Self::Signed, Self::Submitted | Self::Rejected | Self::TimedOut)
                | (
                    Self::Submitted,
                    Self::Confirmed | Self::Rejected | Self::TimedOut
                )
                | (
                    Self::TimedOut,
                    Self::Submitted | Self::Confirmed | Self::Rejected
                )
        )
    }
}

impl fmt::Display for SendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Built => "built",
            Self::Signed => "signed",
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::TimedOut => "timed out",
        };
        f.write_str(name)
    }
}

/// One attempt to move funds, from build to final outcome.
#[derive(Debug, Clone)]
pub struct SendAttempt {
    state: SendState,
    unsigned: UnsignedTransaction,
    signed: Option<SignedTransaction>,
    reference: Option<String>,
    rejection: Option<String>,
}

impl SendAttempt {
    /// Start an attempt in [`SendState::Built`].
    #[must_use]
    pub const fn new(unsigned: UnsignedTransaction) -> Self {
        Self {
            state: SendState::Built,
            unsigned,
            signed: None,
            reference: None,
            rejection: None,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> SendState {
        self.state
    }

    /// The transaction as built.
    #[inline]
    #[must_use]
    pub const fn unsigned(&self) -> &UnsignedTransaction {
        &self.unsigned
    }

    /// The signed transaction, once signed.
    #[inline]
    #[must_use]
    pub const fn signed(&self) -> Option<&SignedTransaction> {
        self.signed.as_ref()
    }

    /// Reference to poll with: the broadcaster's, or the one fixed at signing.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .or_else(|| self.signed.as_ref().map(SignedTransaction::reference))
    }

    /// Rejection reason, if rejected.
    #[must_use]
    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    fn advance(&mut self, to: SendState) -> Result<()> {
        if !self.state.can_transition_to(to) {
            return Err(Error::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    /// `Built -> Signed`.
    pub fn mark_signed(&mut self, signed: SignedTransaction) -> Result<()> {
        self.advance(SendState::Signed)?;
        self.signed = Some(signed);
        Ok(())
    }

    /// `Signed | TimedOut -> Submitted`.
    pub fn mark_submitted(&mut self, reference: String) -> Result<()> {
        self.advance(SendState::Submitted)?;
        self.reference = Some(reference);
        Ok(())
    }

    /// Any non-terminal post-signing state `-> Rejected`.
    pub fn mark_rejected(&mut self, reason: String) -> Result<()> {
        self.advance(SendState::Rejected)?;
        self.rejection = Some(reason);
        Ok(())
    }

    /// `Signed | Submitted -> TimedOut`.
    pub fn mark_timed_out(&mut self) -> Result<()> {
        self.advance(SendState::TimedOut)
    }

    /// Apply a polled status. `Pending` leaves a submitted attempt unchanged
    /// and promotes a timed-out one to submitted.
    pub fn record_status(&mut self, status: TxStatus) -> Result<SendState> {
        match status {
            TxStatus::Pending => {
                if self.state == SendState::TimedOut {
                    self.advance(SendState::Submitted)?;
                } else if self.state != SendState::Submitted {
                    return Err(Error::InvalidTransition {
                        from: self.state,
                        to: SendState::Submitted,
                    });
                }
            }
            TxStatus::Confirmed => self.advance(SendState::Confirmed)?,
            TxStatus::Failed => {
                self.advance(SendState::Rejected)?;
                self.rejection = Some("failed on-chain".into());
            }
        }
        Ok(self.state)
    }
}
