//! Adaptive natural-run merge sort over a 1-dimensional view.

#![cfg(feature = "alloc")]

use crate::{
	block_merge::{Scratch, block_merge},
	error::Error,
	params::{Merge, Params},
	run_stack::{Run, RunStack},
	runs::next_run,
};
use core::mem;
use log::debug;
use ndarray::{ArrayViewMut1, s};

/// What one sort did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortStats {
	/// Runs found and pushed onto the run stack.
	pub runs: usize,
	/// Pairs of adjacent runs merged.
	pub merges: usize,
	/// Times a merge switched into galloping mode.
	pub gallops: usize,
	/// Most runs pending at once.
	pub max_stack_depth: usize,
}

/// Sorts `v` stably with `is_less` as strict weak ordering, tuned by `params`.
///
/// The array is scanned once for natural runs, which are made ascending and extended to
/// [`Params::min_run`] by insertion sort. Each run is pushed onto a stack of pending runs, and
/// adjacent runs on top of it are merged as [`Params::what_merge`] and [`Params::need_merge`]
/// decide. Finally, the remaining runs are merged top down.
///
/// Merges cut both runs into blocks of about the square root of their combined length, so apart
/// from the run stack the only scratch memory is one block of elements and one index per block.
///
/// # Errors
///
/// Returns [`Error::Allocation`] if scratch memory cannot be reserved. If that happens before
/// the first element moved, `v` is left untouched, otherwise `v` is left a permutation of its
/// input.
pub fn block_sort<T, F, P>(
	mut v: ArrayViewMut1<'_, T>,
	is_less: &mut F,
	params: &P,
) -> Result<SortStats, Error>
where
	F: FnMut(&T, &T) -> bool,
	P: Params + ?Sized,
{
	let mut stats = SortStats::default();
	let len = v.len();

	if mem::size_of::<T>() == 0 || len < 2 {
		// Sorting has no meaningful behavior on zero-sized types or single elements.
		return Ok(stats);
	}

	let min_run = params.min_run(len).max(1);
	let mut scratch = Scratch::new(len, params.gallop())?;
	let mut runs = RunStack::new()?;

	let mut start = 0;
	while start < len {
		let end = next_run(v.view_mut(), start, min_run, is_less);
		runs.push(Run {
			start,
			len: end - start,
		})?;
		start = end;
		stats.runs += 1;
		stats.max_stack_depth = stats.max_stack_depth.max(runs.len());

		collapse(&mut v, &mut runs, &mut scratch, params, is_less, &mut stats)?;
	}

	while runs.len() > 1 {
		merge_top_two(&mut v, &mut runs, &mut scratch, is_less, &mut stats)?;
	}

	// Finally, exactly one run must remain in the stack.
	debug_assert!(runs.as_slice() == [Run { start: 0, len }]);

	stats.gallops = scratch.gallops();
	debug!(
		"sorted {} elements with minimum run {}: {:?}",
		len, min_run, stats
	);
	Ok(stats)
}

/// Merges pending runs until the top three of them satisfy the balance policy, and the top two
/// if only two remain.
fn collapse<T, F, P>(
	v: &mut ArrayViewMut1<'_, T>,
	runs: &mut RunStack,
	scratch: &mut Scratch<T>,
	params: &P,
	is_less: &mut F,
	stats: &mut SortStats,
) -> Result<(), Error>
where
	F: FnMut(&T, &T) -> bool,
	P: Params + ?Sized,
{
	while let &[.., z, y, x] = runs.as_slice() {
		match params.what_merge(x.len, y.len, z.len) {
			Merge::Defer => return Ok(()),
			Merge::TopTwo => merge_top_two(v, runs, scratch, is_less, stats)?,
			Merge::SecondThird => {
				if let Some(x) = runs.pop() {
					merge_top_two(v, runs, scratch, is_less, stats)?;
					runs.push(x)?;
				}
			}
		}
	}

	if let &[y, x] = runs.as_slice() {
		if params.need_merge(x.len, y.len) {
			merge_top_two(v, runs, scratch, is_less, stats)?;
		}
	}
	Ok(())
}

/// Replaces the top two runs with their merge.
fn merge_top_two<T, F>(
	v: &mut ArrayViewMut1<'_, T>,
	runs: &mut RunStack,
	scratch: &mut Scratch<T>,
	is_less: &mut F,
	stats: &mut SortStats,
) -> Result<(), Error>
where
	F: FnMut(&T, &T) -> bool,
{
	let Some((y, x)) = runs.pop_pair() else {
		return Ok(());
	};
	debug_assert_eq!(y.end(), x.start);

	block_merge(v.slice_mut(s![y.start..x.end()]), y.len, scratch, is_less);
	stats.merges += 1;

	runs.push(Run {
		start: y.start,
		len: y.len + x.len,
	})
}
