//! Derivative work of [`core::slice::sort`] licensed under `MIT OR Apache-2.0`.
//!
//! [`core::slice::sort`]: https://doc.rust-lang.org/src/core/slice/sort.rs.html

#![cfg(feature = "alloc")]

use crate::block::gallop;
use core::ptr;
use ndarray::{ArrayViewMut1, IndexLonger};

/// Where the unconsumed part of a forward merge ended up, given as the index where it starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Leftover {
	/// The right run ran out first and the rest of the left run now ends the view.
	Left(usize),
	/// The left run ran out first and the rest of the right run stayed in place.
	Right(usize),
}

/// When dropped, copies the range `buf[start..end]` into `v[dest..]`.
///
/// During a merge it tracks the slots of `v` not holding a live element. Whichever way the
/// merge ends, normally or by a panicking `is_less`, `v` holds every element exactly once.
struct MergeHole<'a, T> {
	buf: *mut T,
	start: usize,
	end: usize,

	v: ArrayViewMut1<'a, T>,
	dest: usize,
}

impl<T> MergeHole<'_, T> {
	/// Pointer to `v[i]`.
	///
	/// # Safety
	///
	/// `i` must be in bounds of `v`.
	#[inline]
	unsafe fn at(&mut self, i: usize) -> *mut T {
		// SAFETY: Forwarded contract.
		unsafe { self.v.view_mut().uget(i) as *mut T }
	}
}

impl<T> Drop for MergeHole<'_, T> {
	fn drop(&mut self) {
		// SAFETY: `T` is not a zero-sized type, and `dest..dest + end - start` are exactly the
		// vacant slots of `v`.
		unsafe {
			for i in 0..self.end - self.start {
				let src = self.buf.add(self.start + i);
				let dst = self.at(self.dest + i);
				ptr::copy_nonoverlapping(src, dst, 1);
			}
		}
	}
}

/// Merges non-decreasing runs `v[..mid]` and `v[mid..]`, buffering the shorter one in `buf`.
///
/// Equal elements of the left run stay ahead of those of the right run. Every entry into
/// galloping mode increments `gallops`.
///
/// # Safety
///
/// Both runs must be non-empty, `buf` must hold capacity for the shorter run and must not alias
/// `v`. Also, `T` must not be a zero-sized type.
pub unsafe fn gallop_merge<T, F>(
	v: ArrayViewMut1<'_, T>,
	mid: usize,
	buf: *mut T,
	min_gallop: usize,
	gallops: &mut usize,
	is_less: &mut F,
) where
	F: FnMut(&T, &T) -> bool,
{
	// SAFETY: Forwarded contract.
	unsafe {
		if mid <= v.len() - mid {
			merge_lo(v, mid, buf, true, min_gallop, gallops, is_less);
		} else {
			merge_hi(v, mid, buf, min_gallop, gallops, is_less);
		}
	}
}

/// Merges `v[..mid]` and `v[mid..]` front to back with the left run buffered in `buf`, stopping
/// as soon as either run is used up.
///
/// On equal elements the left run wins iff `left_wins_ties`, otherwise the right run does.
/// Returns what remained of the run that was not used up.
///
/// # Safety
///
/// Both runs must be non-empty, `buf` must hold capacity for `mid` elements and must not alias
/// `v`. Also, `T` must not be a zero-sized type.
pub unsafe fn merge_lo<T, F>(
	v: ArrayViewMut1<'_, T>,
	mid: usize,
	buf: *mut T,
	left_wins_ties: bool,
	min_gallop: usize,
	gallops: &mut usize,
	is_less: &mut F,
) -> Leftover
where
	F: FnMut(&T, &T) -> bool,
{
	let len = v.len();
	debug_assert!(0 < mid && mid < len);

	// Whether `r` of the right run goes before `l` of the left run.
	let mut right_first = |r: &T, l: &T| {
		if left_wins_ties {
			is_less(r, l)
		} else {
			!is_less(l, r)
		}
	};

	let mut right = mid;
	let mut left_streak = 0;
	let mut right_streak = 0;

	// SAFETY: `buf` holds `mid` elements. Throughout the loop `hole.dest + hole.end - hole.start
	// == right`, so the write position never overtakes the unread part of the right run, and
	// every index stays below `len`.
	unsafe {
		for i in 0..mid {
			ptr::copy_nonoverlapping(&v[i], buf.add(i), 1);
		}
		let mut hole = MergeHole {
			buf,
			start: 0,
			end: mid,
			v,
			dest: 0,
		};

		while hole.start < hole.end && right < len {
			let l = hole.buf.add(hole.start);
			let r = hole.at(right);
			let dst = hole.at(hole.dest);
			if right_first(&*r, &*l) {
				ptr::copy_nonoverlapping(r, dst, 1);
				right += 1;
				right_streak += 1;
				left_streak = 0;
			} else {
				ptr::copy_nonoverlapping(l, dst, 1);
				hole.start += 1;
				left_streak += 1;
				right_streak = 0;
			}
			hole.dest += 1;

			if hole.start == hole.end || right == len {
				break;
			}
			if right_streak >= min_gallop {
				*gallops += 1;
				right_streak = 0;
				let l = &*hole.buf.add(hole.start);
				let w = hole.v.view();
				let count = gallop(len - right, |i| right_first(w.uget(right + i), l));
				for i in 0..count {
					let src = hole.at(right + i);
					let dst = hole.at(hole.dest + i);
					ptr::copy_nonoverlapping(src, dst, 1);
				}
				right += count;
				hole.dest += count;
			} else if left_streak >= min_gallop {
				*gallops += 1;
				left_streak = 0;
				let r = &*hole.at(right);
				let from = hole.buf.add(hole.start);
				let count = gallop(hole.end - hole.start, |i| !right_first(r, &*from.add(i)));
				for i in 0..count {
					let dst = hole.at(hole.dest + i);
					ptr::copy_nonoverlapping(from.add(i), dst, 1);
				}
				hole.start += count;
				hole.dest += count;
			}
		}

		if hole.start < hole.end {
			Leftover::Left(hole.dest)
		} else {
			Leftover::Right(right)
		}
		// Finally, `hole` gets dropped. Any rest of the left run fills the vacant end of `v`.
	}
}

/// Merges `v[..mid]` and `v[mid..]` back to front with the right run buffered in `buf`.
///
/// Equal elements of the left run stay ahead of those of the right run.
///
/// # Safety
///
/// Both runs must be non-empty, `buf` must hold capacity for `v.len() - mid` elements and must
/// not alias `v`. Also, `T` must not be a zero-sized type.
pub unsafe fn merge_hi<T, F>(
	v: ArrayViewMut1<'_, T>,
	mid: usize,
	buf: *mut T,
	min_gallop: usize,
	gallops: &mut usize,
	is_less: &mut F,
) where
	F: FnMut(&T, &T) -> bool,
{
	let len = v.len();
	debug_assert!(0 < mid && mid < len);

	let mut out = len;
	let mut left_streak = 0;
	let mut right_streak = 0;

	// SAFETY: `buf` holds `len - mid` elements. Throughout the loop `out == hole.dest + hole.end`,
	// so the write position never undercuts the unread part of the left run, and every index
	// stays below `len`.
	unsafe {
		for i in 0..len - mid {
			ptr::copy_nonoverlapping(&v[mid + i], buf.add(i), 1);
		}
		let mut hole = MergeHole {
			buf,
			start: 0,
			end: len - mid,
			v,
			dest: mid,
		};

		while 0 < hole.dest && hole.start < hole.end {
			let l = hole.at(hole.dest - 1);
			let r = hole.buf.add(hole.end - 1);
			// Take the greater side, the right run on ties.
			out -= 1;
			let dst = hole.at(out);
			if is_less(&*r, &*l) {
				hole.dest -= 1;
				ptr::copy_nonoverlapping(l, dst, 1);
				left_streak += 1;
				right_streak = 0;
			} else {
				hole.end -= 1;
				ptr::copy_nonoverlapping(r, dst, 1);
				right_streak += 1;
				left_streak = 0;
			}

			if hole.dest == 0 || hole.start == hole.end {
				break;
			}
			if left_streak >= min_gallop {
				*gallops += 1;
				left_streak = 0;
				let r = &*hole.buf.add(hole.end - 1);
				let dest = hole.dest;
				let w = hole.v.view();
				let count = gallop(dest, |i| is_less(r, w.uget(dest - 1 - i)));
				for i in 0..count {
					let src = hole.at(dest - 1 - i);
					let dst = hole.at(out - 1 - i);
					ptr::copy_nonoverlapping(src, dst, 1);
				}
				hole.dest -= count;
				out -= count;
			} else if right_streak >= min_gallop {
				*gallops += 1;
				right_streak = 0;
				let l = &*hole.at(hole.dest - 1);
				let (buf, end) = (hole.buf, hole.end);
				let count = gallop(end - hole.start, |i| !is_less(&*buf.add(end - 1 - i), l));
				for i in 0..count {
					let dst = hole.at(out - 1 - i);
					ptr::copy_nonoverlapping(buf.add(end - 1 - i), dst, 1);
				}
				hole.end -= count;
				out -= count;
			}
		}
		// Finally, `hole` gets dropped. Any rest of the right run fills the vacant `v[dest..out]`.
	}
}
