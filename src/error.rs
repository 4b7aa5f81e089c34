//! Errors reported by the sorts.

#![cfg(feature = "alloc")]

use alloc::collections::TryReserveError;
use thiserror::Error;

/// Why a sort was rejected or could not finish.
///
/// Range errors are reported before any element moved. An allocation error while the run stack
/// grows leaves the array a permutation of its input.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
	/// The range to sort starts after it ends.
	#[error("range start {start} is greater than range end {end}")]
	InvalidRange {
		/// Start of the rejected range.
		start: usize,
		/// End of the rejected range.
		end: usize,
	},
	/// The range to sort reaches beyond the array.
	#[error("range end {end} is out of bounds for array of length {len}")]
	OutOfBounds {
		/// End of the rejected range.
		end: usize,
		/// Length of the array.
		len: usize,
	},
	/// Scratch memory for blocks or pending runs could not be reserved.
	#[error("cannot reserve scratch memory: {0}")]
	Allocation(TryReserveError),
}

impl From<TryReserveError> for Error {
	#[inline]
	fn from(err: TryReserveError) -> Self {
		Self::Allocation(err)
	}
}
