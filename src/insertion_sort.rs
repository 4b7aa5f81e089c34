//! Derivative work of [`core::slice::sort`] licensed under `MIT OR Apache-2.0`.
//!
//! [`core::slice::sort`]: https://doc.rust-lang.org/src/core/slice/sort.rs.html

#![cfg(feature = "alloc")]

use core::{mem::ManuallyDrop, ptr};
use ndarray::{ArrayViewMut1, IndexLonger, s};

/// When dropped, copies from `src` into `dest`.
struct CopyOnDrop<T> {
	src: *const T,
	dest: *mut T,
}

impl<T> Drop for CopyOnDrop<T> {
	fn drop(&mut self) {
		// SAFETY: This is a helper class. Please refer to its usage for correctness. Namely, one
		// must be sure that `src` and `dst` does not overlap as required by
		// `ptr::copy_nonoverlapping`.
		unsafe {
			ptr::copy_nonoverlapping(self.src, self.dest, 1);
		}
	}
}

/// Sorts `v` assuming `v[..offset]` is already sorted, by inserting every following element into
/// the sorted prefix.
///
/// This is *O*(*n*^2) worst-case and *O*(*n*) on sorted input. Elements only move past strictly
/// greater ones, so the sort is stable.
pub fn insertion_sort_shift_left<T, F>(mut v: ArrayViewMut1<'_, T>, offset: usize, is_less: &mut F)
where
	F: FnMut(&T, &T) -> bool,
{
	let len = v.len();
	debug_assert!(offset <= len);

	for i in usize::max(offset, 1)..len {
		insert_tail(v.slice_mut(s![..=i]), is_less);
	}
}

/// Shifts the last element to the left until it meets an element that is not greater.
fn insert_tail<T, F>(mut v: ArrayViewMut1<'_, T>, is_less: &mut F)
where
	F: FnMut(&T, &T) -> bool,
{
	let len = v.len();
	debug_assert!(len >= 2);
	// SAFETY: All indices below are in `0..len` and distinct where copied. The last element is
	// held in `tmp` while `hole` tracks the one slot not holding a live element, so if `is_less`
	// panics, `hole` gets dropped and writes `tmp` back, leaving every element in `v` exactly once.
	unsafe {
		let w = v.view();
		if !is_less(w.uget(len - 1), w.uget(len - 2)) {
			return;
		}

		let tmp = ManuallyDrop::new(ptr::read(w.uget(len - 1)));
		let mut hole = CopyOnDrop {
			src: &*tmp,
			dest: v.view_mut().index(len - 2),
		};
		let src = v.view().index(len - 2) as *const T;
		let dst = v.view_mut().index(len - 1) as *mut T;
		ptr::copy_nonoverlapping(src, dst, 1);

		for i in (0..len - 2).rev() {
			let cur = v.view_mut().index(i) as *mut T;
			if !is_less(&*tmp, &*cur) {
				break;
			}

			// Shift the greater element up by one, moving the hole down to `i`.
			let dst = v.view_mut().index(i + 1) as *mut T;
			ptr::copy_nonoverlapping(cur, dst, 1);
			hole.dest = cur;
		}
		// Dropping `hole` writes `tmp` into the last vacant slot.
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::insertion_sort_shift_left;
	use ndarray::{Array1, Array2, s};
	use quickcheck_macros::quickcheck;
	use std::panic::{self, AssertUnwindSafe};

	#[quickcheck]
	fn sorted(xs: Vec<u32>) {
		let mut array = Array1::from_vec(xs);
		insertion_sort_shift_left(array.view_mut(), 0, &mut u32::lt);
		for i in 1..array.len() {
			assert!(array[i - 1] <= array[i]);
		}
	}

	#[quickcheck]
	fn extends_sorted_prefix(mut prefix: Vec<u8>, tail: Vec<u8>) {
		prefix.sort();
		let offset = prefix.len();
		let xs = prefix
			.into_iter()
			.chain(tail)
			.enumerate()
			.map(|(i, x)| (x, i))
			.collect::<Vec<_>>();
		let mut expected = xs.clone();
		expected.sort_by_key(|&(x, _)| x);
		let mut array = Array1::from_vec(xs);
		insertion_sort_shift_left(array.view_mut(), offset, &mut |a, b| a.0 < b.0);
		assert!(array.iter().eq(expected.iter()));
	}

	#[test]
	fn sorts_column() {
		let mut m = Array2::from_shape_fn((6, 3), |(i, j)| (7 * i + 5 * j) % 6);
		let before = m.clone();
		insertion_sort_shift_left(m.column_mut(1), 0, &mut usize::lt);
		let column = m.column(1);
		assert!(column.iter().zip(column.iter().skip(1)).all(|(a, b)| a <= b));
		assert_eq!(m.slice(s![.., 0]), before.slice(s![.., 0]));
		assert_eq!(m.slice(s![.., 2]), before.slice(s![.., 2]));
	}

	#[test]
	fn panicking_insertion_keeps_every_element() {
		let strings = ["e", "d", "c", "b", "a"].map(String::from);
		for limit in 1..=10 {
			let mut array = Array1::from_vec(strings.to_vec());
			let mut calls = 0;
			let result = panic::catch_unwind(AssertUnwindSafe(|| {
				insertion_sort_shift_left(
					array.slice_mut(s![..;-1]),
					0,
					&mut |a: &String, b: &String| {
						calls += 1;
						assert!(calls < limit, "comparator gave up");
						b < a
					},
				);
			}));
			assert!(result.is_err());
			let mut left = array.to_vec();
			left.sort();
			assert_eq!(left, ["a", "b", "c", "d", "e"]);
		}
	}
}
