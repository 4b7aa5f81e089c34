//! Detection of natural runs.

#[cfg(feature = "alloc")]
use crate::{block::reverse, insertion_sort::insertion_sort_shift_left};
use core::cmp::Ordering::{self, Equal, Less};
#[cfg(feature = "alloc")]
use ndarray::{ArrayViewMut1, s};
use ndarray::ArrayView1;

/// Finds the run at the start of `v`. Returns its length and whether it is descending.
///
/// Equal neighbours never end a run, whichever its direction. The direction is decided by the
/// first pair of neighbours that are not equal.
#[cfg(feature = "alloc")]
pub fn find_run<T, F>(v: ArrayView1<'_, T>, is_less: &mut F) -> (usize, bool)
where
	F: FnMut(&T, &T) -> bool,
{
	let len = v.len();
	if len < 2 {
		return (len, false);
	}

	let mut end = 1;
	while end < len && !is_less(&v[end], &v[end - 1]) && !is_less(&v[end - 1], &v[end]) {
		end += 1;
	}
	if end == len {
		return (len, false);
	}

	if is_less(&v[end], &v[end - 1]) {
		while end < len && !is_less(&v[end - 1], &v[end]) {
			end += 1;
		}
		(end, true)
	} else {
		while end < len && !is_less(&v[end], &v[end - 1]) {
			end += 1;
		}
		(end, false)
	}
}

/// Reverses a non-ascending run into a non-descending one.
///
/// Reversal alone would also flip the order of equal elements, so every stretch of equal
/// elements is reversed once more afterwards.
#[cfg(feature = "alloc")]
pub fn make_ascending<T, F>(mut v: ArrayViewMut1<'_, T>, is_less: &mut F)
where
	F: FnMut(&T, &T) -> bool,
{
	reverse(v.view_mut());

	let len = v.len();
	let mut start = 0;
	while start < len {
		let mut end = start + 1;
		while end < len && !is_less(&v[start], &v[end]) {
			end += 1;
		}
		if end - start > 1 {
			reverse(v.slice_mut(s![start..end]));
		}
		start = end;
	}
}

/// Takes the run starting at `v[start]`, makes it ascending and, if it is shorter than
/// `min_run`, extends it to that length with insertion sort. Returns where the run ends.
#[cfg(feature = "alloc")]
pub fn next_run<T, F>(
	mut v: ArrayViewMut1<'_, T>,
	start: usize,
	min_run: usize,
	is_less: &mut F,
) -> usize
where
	F: FnMut(&T, &T) -> bool,
{
	let len = v.len();
	debug_assert!(start < len);

	let (streak, descending) = find_run(v.slice(s![start..]), is_less);
	let mut end = start + streak;
	if descending {
		make_ascending(v.slice_mut(s![start..end]), is_less);
	}

	// Extending is not guaranteed to keep the run sorted, hence the insertion sort. Only the
	// added elements get inserted, the natural run is already in order.
	if streak < min_run && end < len {
		end = usize::min(start + min_run, len);
		insertion_sort_shift_left(v.slice_mut(s![start..end]), streak, is_less);
	}

	end
}

/// Whether `compare` finds every element not greater than its successor.
pub fn is_sorted<T, F>(v: ArrayView1<'_, T>, mut compare: F) -> bool
where
	F: FnMut(&T, &T) -> Option<Ordering>,
{
	v.iter()
		.zip(v.iter().skip(1))
		.all(|(a, b)| matches!(compare(a, b), Some(Less | Equal)))
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::{find_run, is_sorted, make_ascending, next_run};
	use ndarray::{Array1, arr1};
	use quickcheck_macros::quickcheck;

	#[test]
	fn runs_absorb_equal_neighbours() {
		let mut lt = i32::lt;
		assert_eq!(find_run(arr1(&[1, 1, 2, 2, 3, 0]).view(), &mut lt), (5, false));
		assert_eq!(find_run(arr1(&[3, 3, 2, 2, 1, 4]).view(), &mut lt), (5, true));
		assert_eq!(find_run(arr1(&[5, 5, 5]).view(), &mut lt), (3, false));
		assert_eq!(find_run(arr1(&[5, 4, 3, 2, 1]).view(), &mut lt), (5, true));
		assert_eq!(find_run(arr1(&[7]).view(), &mut lt), (1, false));
		assert_eq!(find_run(Array1::<i32>::zeros(0).view(), &mut lt), (0, false));
	}

	#[test]
	fn descending_run_reversed_stably() {
		let mut v = arr1(&[(3, 'a'), (2, 'a'), (2, 'b'), (2, 'c'), (1, 'a'), (1, 'b')]);
		make_ascending(v.view_mut(), &mut |a, b| a.0 < b.0);
		assert_eq!(
			v,
			arr1(&[(1, 'a'), (1, 'b'), (2, 'a'), (2, 'b'), (2, 'c'), (3, 'a')])
		);
	}

	#[test]
	fn short_runs_extended() {
		let mut v = arr1(&[4, 5, 1, 3, 2, 9, 0]);
		assert_eq!(next_run(v.view_mut(), 0, 5, &mut i32::lt), 5);
		assert_eq!(v, arr1(&[1, 2, 3, 4, 5, 9, 0]));

		// A run of exactly the minimum length stays as it is.
		let mut v = arr1(&[1, 2, 3, 0, 5]);
		assert_eq!(next_run(v.view_mut(), 0, 3, &mut i32::lt), 3);
		assert_eq!(v, arr1(&[1, 2, 3, 0, 5]));

		// Extension stops at the end of the array.
		let mut v = arr1(&[9, 3, 8, 7]);
		assert_eq!(next_run(v.view_mut(), 1, 64, &mut i32::lt), 4);
		assert_eq!(v, arr1(&[9, 3, 7, 8]));
	}

	#[quickcheck]
	fn next_run_sorted_prefix(xs: Vec<u8>, min_run: u8) {
		if xs.is_empty() {
			return;
		}
		let mut v = Array1::from_vec(xs);
		let end = next_run(v.view_mut(), 0, usize::from(min_run), &mut u8::lt);
		assert!(end >= usize::from(min_run).min(v.len()));
		assert!(is_sorted(v.slice(ndarray::s![..end]), |a, b| a.partial_cmp(b)));
	}

	#[test]
	fn sortedness() {
		assert!(is_sorted(arr1(&[1, 2, 2, 9]).view(), |a, b| a.partial_cmp(b)));
		assert!(!is_sorted(arr1(&[1, 3, 2, 4]).view(), |a, b| a.partial_cmp(b)));
		assert!(!is_sorted(
			arr1(&[0.0, 1.0, f32::NAN]).view(),
			|a, b| a.partial_cmp(b)
		));
	}
}
