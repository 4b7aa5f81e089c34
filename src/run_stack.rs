//! Stack of pending runs.

#![cfg(feature = "alloc")]

use crate::error::Error;
use alloc::vec::Vec;

/// `len` sorted elements starting at `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
	pub start: usize,
	pub len: usize,
}

impl Run {
	#[inline]
	pub fn end(&self) -> usize {
		self.start + self.len
	}
}

/// Pending runs ordered by start, adjacent and gap-free, the most recent on top.
///
/// Capacity doubles once more than half of it is used and drops to a quarter once less than a
/// quarter is used, never below four runs. Growing is fallible, so pushing never aborts on
/// allocation failure.
pub struct RunStack {
	runs: Vec<Run>,
	capacity: usize,
}

impl RunStack {
	const MIN_CAPACITY: usize = 4;

	pub fn new() -> Result<Self, Error> {
		let mut runs = Vec::new();
		runs.try_reserve_exact(Self::MIN_CAPACITY)?;
		Ok(Self {
			runs,
			capacity: Self::MIN_CAPACITY,
		})
	}

	pub fn push(&mut self, run: Run) -> Result<(), Error> {
		debug_assert!(self.runs.last().is_none_or(|top| top.end() == run.start));
		// Room for one more run is kept in reserve, see below.
		self.runs.push(run);
		if 2 * self.runs.len() > self.capacity {
			self.capacity *= 2;
			self.runs.try_reserve_exact(self.capacity - self.runs.len())?;
		}
		Ok(())
	}

	pub fn pop(&mut self) -> Option<Run> {
		let run = self.runs.pop();
		if 4 * self.runs.len() < self.capacity && self.capacity > Self::MIN_CAPACITY {
			self.capacity = usize::max(self.capacity / 4, Self::MIN_CAPACITY);
			self.runs.shrink_to(self.capacity);
		}
		run
	}

	/// Pops the top run `x` and the run `y` below it, returned as `(y, x)`.
	pub fn pop_pair(&mut self) -> Option<(Run, Run)> {
		if self.runs.len() < 2 {
			return None;
		}
		let x = self.pop()?;
		let y = self.pop()?;
		Some((y, x))
	}

	#[inline]
	pub fn as_slice(&self) -> &[Run] {
		&self.runs
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.runs.len()
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::{Run, RunStack};

	#[test]
	fn grows_and_shrinks() {
		let mut stack = RunStack::new().unwrap();
		for start in 0..40 {
			stack.push(Run { start, len: 1 }).unwrap();
			assert!(2 * stack.len() <= stack.capacity);
			assert!(stack.runs.capacity() >= stack.capacity);
		}
		assert_eq!(stack.capacity, 128);
		for start in (20..40).rev() {
			assert_eq!(stack.pop(), Some(Run { start, len: 1 }));
			assert!(stack.len() < stack.capacity);
		}
		assert_eq!(stack.capacity, 32);
		while stack.pop().is_some() {}
		assert_eq!(stack.capacity, RunStack::MIN_CAPACITY);
		assert_eq!(stack.pop_pair(), None);
	}

	#[test]
	fn pops_pairs_in_order() {
		let mut stack = RunStack::new().unwrap();
		stack.push(Run { start: 0, len: 3 }).unwrap();
		stack.push(Run { start: 3, len: 2 }).unwrap();
		stack.push(Run { start: 5, len: 1 }).unwrap();
		assert_eq!(
			stack.pop_pair(),
			Some((Run { start: 3, len: 2 }, Run { start: 5, len: 1 }))
		);
		assert_eq!(stack.as_slice(), &[Run { start: 0, len: 3 }]);
		assert_eq!(stack.pop_pair(), None);
		assert_eq!(stack.len(), 1);
	}
}
