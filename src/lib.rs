//! Stable, adaptive block merge sort for non-contiguous (sub)views into *n*-dimensional arrays.
//!
//! The sort scans the array for natural runs, keeps them on a stack balanced by a pluggable
//! [`Params`] policy and merges neighbours blockwise, galloping through long streaks. Apart from
//! the run stack, it only needs scratch memory for about the square root of the array length.
//!
//! # Example
//!
//! ```
//! use ndarray_blocksort::{BlockSort1Ext, ndarray::arr2};
//!
//! // 2-dimensional array of 4 rows and 5 columns.
//! let mut v = arr2(&[[-5, 4, 1, -3,  2],   // row 0, axis 0
//!                    [ 8, 3, 2,  4,  8],   // row 1, axis 0
//!                    [38, 9, 3,  0,  3],   // row 2, axis 0
//!                    [ 4, 9, 0,  8, -1]]); // row 3, axis 0
//! //                    \     \       \
//! //                  column 0 \    column 4         axis 1
//! //                         column 2                axis 1
//!
//! // Mutable subview into the last column.
//! let mut column = v.column_mut(4);
//!
//! // Due to row-major memory layout, columns are non-contiguous
//! // and hence cannot be sorted by viewing them as mutable slices.
//! assert_eq!(column.as_slice_mut(), None);
//!
//! // Instead, sorting is specifically implemented for non-contiguous
//! // mutable (sub)views.
//! column.block_sort().unwrap();
//!
//! assert!(v == arr2(&[[-5, 4, 1, -3, -1],
//!                     [ 8, 3, 2,  4,  2],
//!                     [38, 9, 3,  0,  3],
//!                     [ 4, 9, 0,  8,  8]]));
//! //                                   \
//! //                                 column 4 sorted, others untouched
//! ```
//!
//! # Current Implementation
//!
//! Complexities where *n* is the length of the (sub)view.
//!
//! | Resource | Complexity | Sorting (stable)     |
//! |----------|------------|----------------------|
//! | Time     | Best       | *O*(*n*)             |
//! | Time     | Average    | *O*(*n* log *n*)     |
//! | Time     | Worst      | *O*(*n* log *n*)     |
//! | Space    | Best       | *O*(1)               |
//! | Space    | Average    | *O*(√*n*)            |
//! | Space    | Worst      | *O*(√*n*)            |
//!
//! # Logging
//!
//! Every sort emits one `debug` record with its [`SortStats`] and every merge one `trace` record
//! via the [`log`](https://docs.rs/log) facade. No logger is installed.
//!
//! # Features
//!
//!   * `alloc` for all sorts. Enabled by `std`.
//!   * `std` for `std::error::Error` on [`Error`]. Enabled by `default`.
//!
//! Without `alloc`, only [`reverse`](BlockSort1Ext::reverse) and the
//! [`is_sorted`](BlockSort1Ext::is_sorted) family are available.

#![deny(
	missing_docs,
	rustdoc::broken_intra_doc_links,
	rustdoc::missing_crate_level_docs
)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(feature = "alloc")]
extern crate alloc;

mod block;
mod block_merge;
mod block_sort;
mod error;
mod gallop_merge;
mod insertion_sort;
mod params;
mod run_stack;
mod runs;

#[cfg(feature = "alloc")]
pub use crate::{block_sort::SortStats, block_sort::block_sort, error::Error};
pub use crate::params::{
	ChaoticParams, CompactParams, DefaultParams, Merge, Params, min_run_with_threshold,
};

use crate::{block::reverse, runs::is_sorted};
#[cfg(feature = "alloc")]
use core::ops::Range;
use core::cmp::Ordering;
#[cfg(feature = "alloc")]
use core::cmp::Ordering::Less;
#[cfg(feature = "alloc")]
use ndarray::s;
use ndarray::{ArrayBase, Data, DataMut, Ix1};

pub use ndarray;

/// Extension trait for 1-dimensional [`ArrayBase<S, Ix1>`](`ArrayBase`) array or (sub)view with
/// arbitrary memory layout (e.g., non-contiguous) providing stable block merge sorting.
pub trait BlockSort1Ext<A, S>
where
	S: Data<Elem = A>,
{
	/// Sorts the array.
	///
	/// This sort is stable (i.e., does not reorder equal elements) and *O*(*n* log *n*) worst-case.
	///
	/// # Current Implementation
	///
	/// The current algorithm is an adaptive, iterative merge sort inspired by
	/// [timsort](https://en.wikipedia.org/wiki/Timsort), tuned by [`DefaultParams`].
	/// It is designed to be very fast in cases where the array is nearly sorted, or consists of
	/// two or more sorted sequences concatenated one after another.
	///
	/// Instead of temporary storage half the size of `self`, runs are merged in blocks of about
	/// √*n* elements, so it allocates only one such block and one index per block.
	///
	/// # Errors
	///
	/// Returns [`Error::Allocation`] if the scratch memory cannot be reserved.
	///
	/// # Examples
	///
	/// ```
	/// use ndarray_blocksort::{BlockSort1Ext, ndarray::arr1};
	///
	/// let mut v = arr1(&[-5, 4, 1, -3, 2]);
	///
	/// v.block_sort().unwrap();
	/// assert!(v == arr1(&[-5, -3, 1, 2, 4]));
	/// ```
	#[cfg(feature = "alloc")]
	fn block_sort(&mut self) -> Result<SortStats, Error>
	where
		A: Ord,
		S: DataMut;
	/// Sorts the array with a comparator function.
	///
	/// This sort is stable (i.e., does not reorder equal elements) and *O*(*n* log *n*) worst-case.
	///
	/// The comparator function must define a total ordering for the elements in the array. If
	/// the ordering is not total, the order of the elements is unspecified. An order is a
	/// total order if it is (for all `a`, `b` and `c`):
	///
	/// * total and antisymmetric: exactly one of `a < b`, `a == b` or `a > b` is true, and
	/// * transitive, `a < b` and `b < c` implies `a < c`. The same must hold for both `==` and `>`.
	///
	/// For example, while [`f64`] doesn't implement [`Ord`] because `NaN != NaN`, we can use
	/// `partial_cmp` as our sort function when we know the array doesn't contain a `NaN`.
	///
	/// ```
	/// use ndarray_blocksort::{BlockSort1Ext, ndarray::arr1};
	///
	/// let mut floats = arr1(&[5f64, 4.0, 1.0, 3.0, 2.0]);
	/// floats.block_sort_by(|a, b| a.partial_cmp(b).unwrap()).unwrap();
	/// assert_eq!(floats, arr1(&[1.0, 2.0, 3.0, 4.0, 5.0]));
	/// ```
	///
	/// If `compare` panics, the array is left a permutation of its input.
	///
	/// # Errors
	///
	/// Returns [`Error::Allocation`] if the scratch memory cannot be reserved.
	///
	/// # Examples
	///
	/// ```
	/// use ndarray_blocksort::{BlockSort1Ext, ndarray::arr1};
	///
	/// let mut v = arr1(&[5, 4, 1, 3, 2]);
	/// v.block_sort_by(|a, b| a.cmp(b)).unwrap();
	/// assert!(v == arr1(&[1, 2, 3, 4, 5]));
	///
	/// // reverse sorting
	/// v.block_sort_by(|a, b| b.cmp(a)).unwrap();
	/// assert!(v == arr1(&[5, 4, 3, 2, 1]));
	/// ```
	#[cfg(feature = "alloc")]
	fn block_sort_by<F>(&mut self, compare: F) -> Result<SortStats, Error>
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut;
	/// Sorts the array with a key extraction function.
	///
	/// This sort is stable (i.e., does not reorder equal elements) and *O*(*mn* log *n*)
	/// worst-case, where the key function is *O*(*m*).
	///
	/// # Errors
	///
	/// Returns [`Error::Allocation`] if the scratch memory cannot be reserved.
	///
	/// # Examples
	///
	/// ```
	/// use ndarray_blocksort::{BlockSort1Ext, ndarray::arr1};
	///
	/// let mut v = arr1(&[-5i32, 4, 1, -3, 2, -1]);
	///
	/// v.block_sort_by_key(|k| k.abs()).unwrap();
	/// assert!(v == arr1(&[1, -1, 2, -3, 4, -5]));
	/// ```
	#[cfg(feature = "alloc")]
	fn block_sort_by_key<K, F>(&mut self, f: F) -> Result<SortStats, Error>
	where
		K: Ord,
		F: FnMut(&A) -> K,
		S: DataMut;
	/// Sorts the array with a custom policy and a strict weak ordering `is_less`.
	///
	/// The policy only changes how the work is split into runs and merges, the result is the
	/// same stable order for every policy. See [`Params`].
	///
	/// # Errors
	///
	/// Returns [`Error::Allocation`] if the scratch memory cannot be reserved.
	///
	/// # Examples
	///
	/// ```
	/// use ndarray_blocksort::{BlockSort1Ext, ChaoticParams, ndarray::arr1};
	///
	/// let mut v = arr1(&[4, 5, 6, 1, 2, 3]);
	///
	/// let stats = v.block_sort_with(&ChaoticParams, i32::lt).unwrap();
	/// assert!(v == arr1(&[1, 2, 3, 4, 5, 6]));
	/// assert_eq!((stats.runs, stats.merges), (2, 1));
	/// ```
	#[cfg(feature = "alloc")]
	fn block_sort_with<P, F>(&mut self, params: &P, is_less: F) -> Result<SortStats, Error>
	where
		P: Params + ?Sized,
		F: FnMut(&A, &A) -> bool,
		S: DataMut;
	/// Sorts the subview `range` of the array with a comparator function, leaving the rest of the
	/// array untouched.
	///
	/// Equivalent to [`block_sort_by`](BlockSort1Ext::block_sort_by) on
	/// `slice_mut(s![range])`, except that an invalid `range` is reported instead of panicking.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidRange`] if `range` starts after it ends and [`Error::OutOfBounds`]
	/// if it ends beyond the array, both before any element moved. Returns
	/// [`Error::Allocation`] if the scratch memory cannot be reserved.
	///
	/// # Examples
	///
	/// ```
	/// use ndarray_blocksort::{BlockSort1Ext, Error, ndarray::arr1};
	///
	/// let mut v = arr1(&[9, 5, 3, 4, 1, 0]);
	///
	/// v.block_sort_range_by(1..5, |a, b| a.cmp(b)).unwrap();
	/// assert!(v == arr1(&[9, 1, 3, 4, 5, 0]));
	///
	/// assert_eq!(
	/// 	v.block_sort_range_by(2..7, |a, b| a.cmp(b)),
	/// 	Err(Error::OutOfBounds { end: 7, len: 6 })
	/// );
	/// ```
	#[cfg(feature = "alloc")]
	fn block_sort_range_by<F>(
		&mut self,
		range: Range<usize>,
		compare: F,
	) -> Result<SortStats, Error>
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut;

	/// Checks if the elements of this array are sorted.
	///
	/// That is, for each element `a` and its following element `b`, `a <= b` must hold. If the
	/// array yields exactly zero or one element, `true` is returned.
	///
	/// Note that if `Self::Item` is only `PartialOrd`, but not `Ord`, the above definition
	/// implies that this function returns `false` if any two consecutive items are not
	/// comparable.
	///
	/// # Examples
	///
	/// ```
	/// use ndarray_blocksort::{BlockSort1Ext, ndarray::arr1};
	///
	/// let empty: [i32; 0] = [];
	///
	/// assert!(arr1(&[1, 2, 2, 9]).is_sorted());
	/// assert!(!arr1(&[1, 3, 2, 4]).is_sorted());
	/// assert!(arr1(&[0]).is_sorted());
	/// assert!(arr1(&empty).is_sorted());
	/// assert!(!arr1(&[0.0, 1.0, f32::NAN]).is_sorted());
	/// ```
	#[must_use]
	fn is_sorted(&self) -> bool
	where
		A: PartialOrd;
	/// Checks if the elements of this array are sorted using the given comparator function.
	///
	/// Instead of using `PartialOrd::partial_cmp`, this function uses the given `compare`
	/// function to determine the ordering of two elements. Apart from that, it's equivalent to
	/// [`is_sorted`]; see its documentation for more information.
	///
	/// [`is_sorted`]: BlockSort1Ext::is_sorted
	#[must_use]
	fn is_sorted_by<F>(&self, compare: F) -> bool
	where
		F: FnMut(&A, &A) -> Option<Ordering>;
	/// Checks if the elements of this array are sorted using the given key extraction function.
	///
	/// Instead of comparing the array's elements directly, this function compares the keys of the
	/// elements, as determined by `f`. Apart from that, it's equivalent to [`is_sorted`]; see its
	/// documentation for more information.
	///
	/// [`is_sorted`]: BlockSort1Ext::is_sorted
	///
	/// # Examples
	///
	/// ```
	/// use ndarray_blocksort::{BlockSort1Ext, ndarray::arr1};
	///
	/// assert!(arr1(&["c", "bb", "aaa"]).is_sorted_by_key(|s| s.len()));
	/// assert!(!arr1(&[-2i32, -1, 0, 3]).is_sorted_by_key(|n| n.abs()));
	/// ```
	#[must_use]
	fn is_sorted_by_key<F, K>(&self, f: F) -> bool
	where
		F: FnMut(&A) -> K,
		K: PartialOrd;

	/// Reverses the order of elements in the array, in place.
	///
	/// # Examples
	///
	/// ```
	/// use ndarray_blocksort::{BlockSort1Ext, ndarray::arr1};
	///
	/// let mut v = arr1(&[1, 2, 3]);
	/// v.reverse();
	/// assert!(v == arr1(&[3, 2, 1]));
	/// ```
	fn reverse(&mut self)
	where
		S: DataMut;
}

impl<A, S> BlockSort1Ext<A, S> for ArrayBase<S, Ix1>
where
	S: Data<Elem = A>,
{
	#[cfg(feature = "alloc")]
	#[inline]
	fn block_sort(&mut self) -> Result<SortStats, Error>
	where
		A: Ord,
		S: DataMut,
	{
		block_sort(self.view_mut(), &mut A::lt, &DefaultParams)
	}
	#[cfg(feature = "alloc")]
	#[inline]
	fn block_sort_by<F>(&mut self, mut compare: F) -> Result<SortStats, Error>
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut,
	{
		block_sort(
			self.view_mut(),
			&mut |a: &A, b: &A| compare(a, b) == Less,
			&DefaultParams,
		)
	}
	#[cfg(feature = "alloc")]
	#[inline]
	fn block_sort_by_key<K, F>(&mut self, mut f: F) -> Result<SortStats, Error>
	where
		K: Ord,
		F: FnMut(&A) -> K,
		S: DataMut,
	{
		block_sort(
			self.view_mut(),
			&mut |a: &A, b: &A| f(a).lt(&f(b)),
			&DefaultParams,
		)
	}
	#[cfg(feature = "alloc")]
	#[inline]
	fn block_sort_with<P, F>(&mut self, params: &P, mut is_less: F) -> Result<SortStats, Error>
	where
		P: Params + ?Sized,
		F: FnMut(&A, &A) -> bool,
		S: DataMut,
	{
		block_sort(self.view_mut(), &mut is_less, params)
	}
	#[cfg(feature = "alloc")]
	fn block_sort_range_by<F>(
		&mut self,
		range: Range<usize>,
		mut compare: F,
	) -> Result<SortStats, Error>
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut,
	{
		let Range { start, end } = range;
		if start > end {
			return Err(Error::InvalidRange { start, end });
		}
		let len = self.len();
		if end > len {
			return Err(Error::OutOfBounds { end, len });
		}
		block_sort(
			self.slice_mut(s![start..end]),
			&mut |a: &A, b: &A| compare(a, b) == Less,
			&DefaultParams,
		)
	}

	#[inline]
	fn is_sorted(&self) -> bool
	where
		A: PartialOrd,
	{
		is_sorted(self.view(), |a, b| a.partial_cmp(b))
	}
	#[inline]
	fn is_sorted_by<F>(&self, compare: F) -> bool
	where
		F: FnMut(&A, &A) -> Option<Ordering>,
	{
		is_sorted(self.view(), compare)
	}
	#[inline]
	fn is_sorted_by_key<F, K>(&self, mut f: F) -> bool
	where
		F: FnMut(&A) -> K,
		K: PartialOrd,
	{
		is_sorted(self.view(), |a, b| f(a).partial_cmp(&f(b)))
	}

	#[inline]
	fn reverse(&mut self)
	where
		S: DataMut,
	{
		reverse(self.view_mut());
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::{BlockSort1Ext, CompactParams, Error, SortStats};
	use ndarray::{Array1, arr1, s};
	use quickcheck_macros::quickcheck;

	#[quickcheck]
	fn sorted_by_key_stably(xs: Vec<(u8, u32)>) {
		let mut expected = xs.clone();
		expected.sort_by_key(|&(k, _)| k);
		let mut array = Array1::from_vec(xs);
		array.block_sort_by_key(|&(k, _)| k).unwrap();
		assert!(array.iter().eq(expected.iter()));
		assert!(array.is_sorted_by_key(|&(k, _)| k));
	}

	#[quickcheck]
	fn sorted_range(xs: Vec<i16>, a: usize, b: usize) {
		let len = xs.len();
		let (start, end) = if len == 0 {
			(0, 0)
		} else {
			let (a, b) = (a % (len + 1), b % (len + 1));
			(a.min(b), a.max(b))
		};
		let mut expected = xs.clone();
		expected[start..end].sort();
		let mut array = Array1::from_vec(xs);
		array.block_sort_range_by(start..end, |a, b| a.cmp(b)).unwrap();
		assert!(array.iter().eq(expected.iter()));
	}

	#[test]
	fn rejects_invalid_ranges() {
		let mut v = arr1(&[3, 2, 1]);
		#[allow(clippy::reversed_empty_ranges)]
		let reversed = 2..1;
		assert_eq!(
			v.block_sort_range_by(reversed, |a, b| a.cmp(b)),
			Err(Error::InvalidRange { start: 2, end: 1 })
		);
		assert_eq!(
			v.block_sort_range_by(0..4, |a, b| a.cmp(b)),
			Err(Error::OutOfBounds { end: 4, len: 3 })
		);
		assert_eq!(v, arr1(&[3, 2, 1]));
		assert_eq!(
			v.block_sort_range_by(3..3, |a, b| a.cmp(b)),
			Ok(SortStats::default())
		);
		assert_eq!(
			Error::OutOfBounds { end: 4, len: 3 }.to_string(),
			"range end 4 is out of bounds for array of length 3"
		);
	}

	#[test]
	fn sorts_reversed_subview() {
		let mut v = Array1::from_iter(0..100);
		let mut odd = v.slice_mut(s![1..;2]);
		odd.reverse();
		assert!(!odd.is_sorted());
		odd.block_sort_with(&CompactParams, i32::lt).unwrap();
		assert!(odd.is_sorted());
		assert!(v.is_sorted());
	}
}
