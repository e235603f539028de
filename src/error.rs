use thiserror::Error;

use crate::packet::OperatorKind;

/// Everything that can go wrong between reading the hex text and evaluating the
/// outermost packet. None of these are recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitsError {
    /// `offset` is the byte offset into the raw input line.
    #[error("invalid hex character {found:?} at offset {offset}")]
    InvalidHex { offset: usize, found: char },

    #[error("truncated packet stream: needed bit {index} of a {len}-bit stream")]
    Truncated { index: usize, len: usize },

    #[error("unknown operator type id {0}")]
    UnknownTypeId(u8),

    #[error("subpackets overran their declared length: {consumed} bits decoded, {declared} declared")]
    LengthOverrun { declared: usize, consumed: usize },

    #[error("{kind} packet takes exactly 2 subpackets, found {found}")]
    Arity { kind: OperatorKind, found: usize },

    #[error("{kind} packet has no subpackets")]
    NoOperands { kind: OperatorKind },
}

pub type BitsResult<T> = Result<T, BitsError>;
