//! Disclosure status of a leaf column, and the table of allowed transitions
//! between statuses.

use crate::error::StatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a leaf column is disclosed to the verifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Status {
    /// The column is not part of the protocol anymore. It has been replaced
    /// by other columns by a compilation step.
    Ignored = 0,
    /// Committed to by the prover and never revealed.
    Committed = 1,
    /// Sent in clear to the verifier as part of the proof.
    Proof = 2,
    /// Known at setup time but committed to, the verifier only sees the
    /// commitment.
    Precomputed = 3,
    /// Part of the public statement.
    PublicInput = 4,
    /// Known in clear to the verifier at setup time.
    VerifyingKey = 5,
    /// Computed by the verifier itself.
    VerifierDefined = 6,
}

impl Status {
    pub const ALL: [Status; 7] = [
        Status::Ignored,
        Status::Committed,
        Status::Proof,
        Status::Precomputed,
        Status::PublicInput,
        Status::VerifyingKey,
        Status::VerifierDefined,
    ];

    /// Whether the verifier gets to see the values of the column.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Status::Proof | Status::PublicInput | Status::VerifyingKey | Status::VerifierDefined
        )
    }

    /// Statuses that cannot be left once set, except toward
    /// [`Status::Ignored`].
    pub fn is_sticky(&self) -> bool {
        matches!(
            self,
            Status::VerifyingKey | Status::PublicInput | Status::VerifierDefined
        )
    }

    /// Check that a column with status `self` may be moved to `new`.
    pub fn check_transition(self, new: Status) -> Result<(), StatusError> {
        if TRANSITIONS[self as usize][new as usize] {
            Ok(())
        } else {
            Err(StatusError::IllegalTransition { old: self, new })
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Ignored => "IGNORED",
            Status::Committed => "COMMITTED",
            Status::Proof => "PROOF",
            Status::Precomputed => "PRECOMPUTED",
            Status::PublicInput => "PUBLIC_INPUT",
            Status::VerifyingKey => "VERIFYING_KEY",
            Status::VerifierDefined => "VERIFIER_DEFINED",
        };
        write!(f, "{s}")
    }
}

const T: bool = true;
const F: bool = false;

/// `TRANSITIONS[old][new]` tells whether `old -> new` is allowed. Rows and
/// columns follow the declaration order of [`Status`].
///
/// Every status can move to `Ignored`, including the sticky ones. Keeping a
/// status is always allowed.
#[rustfmt::skip]
pub const TRANSITIONS: [[bool; 7]; 7] = [
    //  new: Ign Com Prf Pre PI  VK  VD       old:
    [T,  T,  T,  T,  T,  T,  T], // Ignored
    [T,  T,  T,  T,  T,  T,  T], // Committed
    [T,  T,  T,  T,  T,  T,  T], // Proof
    [T,  T,  T,  T,  T,  T,  T], // Precomputed
    [T,  F,  F,  F,  T,  F,  F], // PublicInput
    [T,  F,  F,  F,  F,  T,  F], // VerifyingKey
    [T,  F,  F,  F,  F,  F,  T], // VerifierDefined
];
