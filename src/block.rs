//! Primitives on equal-length blocks of a view and the one-sided search used by galloping.

#[cfg(feature = "alloc")]
use core::{cmp::Ordering, ops::Range};
#[cfg(feature = "alloc")]
use ndarray::ArrayView1;
use ndarray::ArrayViewMut1;

/// Swaps `v[a]` with `v[b]` element by element, stopping at the end of the shorter range.
#[cfg(feature = "alloc")]
pub fn swap_blocks<T>(v: &mut ArrayViewMut1<'_, T>, a: Range<usize>, b: Range<usize>) {
	for (i, j) in a.zip(b) {
		v.swap(i, j);
	}
}

/// Orders the internally sorted blocks starting at `a` and `b` by their first elements.
///
/// Blocks whose first elements compare equal are ordered by their ranks, the positions they had
/// before blocks got rearranged, with blocks of the left run ranked before those of the right
/// run. Breaking ties this way keeps equal elements of the left run ahead of the right run.
#[cfg(feature = "alloc")]
pub fn compare_blocks<T, F>(
	v: ArrayView1<'_, T>,
	(a, rank_a): (usize, usize),
	(b, rank_b): (usize, usize),
	is_less: &mut F,
) -> Ordering
where
	F: FnMut(&T, &T) -> bool,
{
	if is_less(&v[a], &v[b]) {
		Ordering::Less
	} else if is_less(&v[b], &v[a]) {
		Ordering::Greater
	} else {
		rank_a.cmp(&rank_b)
	}
}

/// Reverses the view in place.
pub fn reverse<T>(mut v: ArrayViewMut1<'_, T>) {
	let len = v.len();
	for i in 0..len / 2 {
		v.swap(i, len - 1 - i);
	}
}

/// Returns the first index in `0..len` for which `pred` does not hold, assuming it holds for a
/// (possibly empty) prefix and for nothing after.
///
/// The last index is probed first, so a range that satisfies `pred` throughout costs a single
/// call. Otherwise the search gallops from the front with doubling steps and finishes with a
/// binary search, which is *O*(log *k*) where *k* is the returned index.
#[cfg(feature = "alloc")]
pub fn gallop<P>(len: usize, mut pred: P) -> usize
where
	P: FnMut(usize) -> bool,
{
	if len == 0 || pred(len - 1) {
		return len;
	}

	// `pred` holds below `lo` and fails at `hi`.
	let mut lo = 0;
	let mut hi = 0;
	let mut step = 1;
	while hi < len - 1 && pred(hi) {
		lo = hi + 1;
		hi = usize::min(hi + step, len - 1);
		step *= 2;
	}

	while lo < hi {
		let mid = lo + (hi - lo) / 2;
		if pred(mid) {
			lo = mid + 1;
		} else {
			hi = mid;
		}
	}
	lo
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::{compare_blocks, gallop, reverse, swap_blocks};
	use core::cmp::Ordering;
	use ndarray::{Array1, arr1};
	use quickcheck_macros::quickcheck;

	#[quickcheck]
	fn gallop_finds_partition_point(mut xs: Vec<u32>, value: u32) {
		xs.sort();
		let expected = xs.partition_point(|&x| x < value);
		assert_eq!(gallop(xs.len(), |i| xs[i] < value), expected);
		let expected = xs.partition_point(|&x| x <= value);
		assert_eq!(gallop(xs.len(), |i| xs[i] <= value), expected);
	}

	#[test]
	fn gallop_probes_last_first() {
		let mut calls = 0;
		let at = gallop(1000, |_| {
			calls += 1;
			true
		});
		assert_eq!((at, calls), (1000, 1));
		assert_eq!(gallop(0, |_| unreachable!()), 0);
		assert_eq!(gallop(5, |_| false), 0);
	}

	#[quickcheck]
	fn reversed(xs: Vec<u32>) {
		let mut array = Array1::from_vec(xs.clone());
		reverse(array.view_mut());
		assert!(array.iter().eq(xs.iter().rev()));
	}

	#[test]
	fn swaps_shorter_extent() {
		let mut v = arr1(&[0, 1, 2, 3, 4, 5, 6]);
		swap_blocks(&mut v.view_mut(), 0..2, 4..7);
		assert_eq!(v, arr1(&[4, 5, 2, 3, 0, 1, 6]));
	}

	#[test]
	fn blocks_compare_by_head_then_rank() {
		let v = arr1(&[1u32, 9, 1, 2, 0, 5]);
		let mut lt = u32::lt;
		assert_eq!(compare_blocks(v.view(), (0, 3), (2, 1), &mut lt), Ordering::Greater);
		assert_eq!(compare_blocks(v.view(), (2, 0), (0, 1), &mut lt), Ordering::Less);
		assert_eq!(compare_blocks(v.view(), (4, 7), (0, 0), &mut lt), Ordering::Less);
		assert_eq!(compare_blocks(v.view(), (0, 0), (4, 7), &mut lt), Ordering::Greater);
	}
}
