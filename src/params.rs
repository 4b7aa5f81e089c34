//! Pluggable tuning of the run detection, the merge-balance policy and galloping.

/// Which neighbours among the top three pending runs `x` (top), `y` and `z` to merge next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Merge {
	/// The stack is balanced, push the next run.
	Defer,
	/// Merge `x` into `y`.
	TopTwo,
	/// Merge `y` into `z`, keeping `x` on top.
	SecondThird,
}

/// Tuning of the sort.
///
/// Every method has a default, so implementing the trait for a unit struct yields
/// [`DefaultParams`]. The parameters only affect how much work the sort does, never the order
/// it produces. A minimum run of zero is treated as one, as is a gallop threshold of zero.
///
/// # Examples
///
/// ```
/// use ndarray_blocksort::{BlockSort1Ext, Params, ndarray::arr1};
///
/// // Never extend runs and gallop early.
/// struct Eager;
///
/// impl Params for Eager {
/// 	fn min_run(&self, _len: usize) -> usize {
/// 		1
/// 	}
/// 	fn gallop(&self) -> usize {
/// 		2
/// 	}
/// }
///
/// let mut v = arr1(&[3, 1, 4, 1, 5, 9, 2, 6]);
/// v.block_sort_with(&Eager, i32::lt).unwrap();
/// assert_eq!(v, arr1(&[1, 1, 2, 3, 4, 5, 6, 9]));
/// ```
pub trait Params {
	/// Minimum length runs of an array of `len` elements get extended to.
	///
	/// Defaults to [`min_run_with_threshold`]`(len, 64)`.
	#[inline]
	fn min_run(&self, len: usize) -> usize {
		min_run_with_threshold(len, 64)
	}
	/// Whether the only two pending runs, `x` on top of `y`, get merged right away.
	///
	/// Defaults to merging unless `y` is longer than `x`.
	#[inline]
	fn need_merge(&self, x: usize, y: usize) -> bool {
		y <= x
	}
	/// Which neighbours among the top three pending runs of lengths `x` (top), `y` and `z` get
	/// merged next.
	///
	/// Defaults to deferring while `z > x + y` and `y > x`, otherwise merging `x` into `y` if
	/// `x < z` and `y` into `z` if not.
	#[inline]
	fn what_merge(&self, x: usize, y: usize, z: usize) -> Merge {
		if z > x + y && y > x {
			Merge::Defer
		} else if x < z {
			Merge::TopTwo
		} else {
			Merge::SecondThird
		}
	}
	/// Number of consecutive wins of one run after which a merge starts galloping.
	///
	/// Defaults to 7.
	#[inline]
	fn gallop(&self) -> usize {
		7
	}
}

/// Halves `len` while it is at least `threshold`, adding one if any halving dropped a set bit.
///
/// For arrays of at least `threshold` elements this yields a minimum run in
/// `threshold / 2..=threshold`, chosen such that the number of runs is a power of two or just
/// below. Thresholds below 2 are treated as 2.
///
/// # Examples
///
/// ```
/// use ndarray_blocksort::min_run_with_threshold;
///
/// assert_eq!(min_run_with_threshold(63, 64), 63);
/// assert_eq!(min_run_with_threshold(64, 64), 32);
/// assert_eq!(min_run_with_threshold(65, 64), 33);
/// assert_eq!(min_run_with_threshold(1000, 4), 4);
/// assert_eq!(min_run_with_threshold(1024, 4), 2);
/// ```
#[must_use]
pub fn min_run_with_threshold(mut len: usize, threshold: usize) -> usize {
	let threshold = threshold.max(2);
	let mut dropped = 0;
	while len >= threshold {
		dropped |= len & 1;
		len >>= 1;
	}
	len + dropped
}

/// Minimum runs of 32 to 64 elements, the three-run balance policy and a gallop threshold of 7.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultParams;

impl Params for DefaultParams {}

/// Like [`DefaultParams`] but halving the array length only while it is at least 4, which
/// yields minimum runs of 2 to 4 elements and leaves nearly all work to merging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompactParams;

impl Params for CompactParams {
	#[inline]
	fn min_run(&self, len: usize) -> usize {
		min_run_with_threshold(len, 4)
	}
}

/// Like [`DefaultParams`] but never extends natural runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChaoticParams;

impl Params for ChaoticParams {
	#[inline]
	fn min_run(&self, _len: usize) -> usize {
		1
	}
}
