//! Stable merge of two adjacent sorted runs using scratch memory of only about the square root of
//! their combined length.
//!
//! Both runs are cut into blocks of that length. The full blocks are selection sorted by their
//! first elements and then merged left to right, each block with the fragment left over from its
//! predecessors, which never holds more than one block. The partial blocks at both ends of the
//! merged range are merged in last.

#![cfg(feature = "alloc")]

use crate::{
	block::{compare_blocks, swap_blocks},
	error::Error,
	gallop_merge::{Leftover, gallop_merge, merge_lo},
	insertion_sort::insertion_sort_shift_left,
};
use alloc::vec::Vec;
use core::cmp::{self, Ordering};
use log::trace;
use ndarray::{ArrayViewMut1, s};

/// Smallest block length whose square covers `len`.
#[inline]
pub fn block_len(len: usize) -> usize {
	let root = len.isqrt();
	if root * root < len {
		root + 1
	} else {
		root.max(1)
	}
}

/// Scratch memory shared by all merges of one sort: room for one block of elements and one rank
/// per block.
pub struct Scratch<T> {
	buf: Vec<T>,
	ranks: Vec<usize>,
	min_gallop: usize,
	gallops: usize,
}

impl<T> Scratch<T> {
	/// Reserves scratch memory for merging runs of up to `len` elements in total.
	pub fn new(len: usize, min_gallop: usize) -> Result<Self, Error> {
		let block = block_len(len);
		// We keep the length 0 so the buffer only ever holds shallow copies of elements of the
		// array and never drops any of them.
		let mut buf = Vec::new();
		buf.try_reserve_exact(block)?;
		let mut ranks = Vec::new();
		ranks.try_reserve_exact(block)?;
		Ok(Self {
			buf,
			ranks,
			min_gallop: min_gallop.max(1),
			gallops: 0,
		})
	}

	/// Number of times a merge entered galloping mode so far.
	#[inline]
	pub fn gallops(&self) -> usize {
		self.gallops
	}
}

/// Merges non-decreasing runs `v[..mid]` and `v[mid..]` into `v[..]`. Equal elements keep their
/// order.
///
/// `scratch` must have been reserved for at least `v.len()` elements.
pub fn block_merge<T, F>(
	mut v: ArrayViewMut1<'_, T>,
	mid: usize,
	scratch: &mut Scratch<T>,
	is_less: &mut F,
) where
	F: FnMut(&T, &T) -> bool,
{
	let len = v.len();
	if mid == 0 || mid == len || !is_less(&v[mid], &v[mid - 1]) {
		return;
	}

	let block = block_len(len);
	debug_assert!(block <= scratch.buf.capacity());
	debug_assert!(len.div_ceil(block) <= scratch.ranks.capacity());
	trace!(
		"merging runs of {} and {} elements in blocks of {}",
		mid,
		len - mid,
		block
	);

	// Too short to pay off the blocks.
	if len <= 2 * (block + len % block) {
		insertion_sort_shift_left(v, mid, is_less);
		return;
	}

	if cmp::min(mid, len - mid) <= block {
		// SAFETY: Both runs are non-empty and the shorter one fits into the buffer.
		unsafe {
			gallop_merge(
				v,
				mid,
				scratch.buf.as_mut_ptr(),
				scratch.min_gallop,
				&mut scratch.gallops,
				is_less,
			);
		}
		return;
	}

	// Both runs hold at least one full block. The left run may start with a partial block and
	// the right run may end with one.
	let head = mid % block;
	let tail = (len - mid) % block;
	merge_blocks(
		v.slice_mut(s![head..len - tail]),
		mid - head,
		block,
		scratch,
		is_less,
	);

	// SAFETY: Each partial block is non-empty and shorter than a block, so it fits into the
	// buffer, and the rest it is merged with is non-empty.
	unsafe {
		if tail > 0 {
			gallop_merge(
				v.slice_mut(s![head..]),
				len - tail - head,
				scratch.buf.as_mut_ptr(),
				scratch.min_gallop,
				&mut scratch.gallops,
				is_less,
			);
		}
		if head > 0 {
			gallop_merge(
				v.view_mut(),
				head,
				scratch.buf.as_mut_ptr(),
				scratch.min_gallop,
				&mut scratch.gallops,
				is_less,
			);
		}
	}
}

/// Merges non-empty runs `v[..mid]` and `v[mid..]` whose lengths are multiples of `block`.
fn merge_blocks<T, F>(
	mut v: ArrayViewMut1<'_, T>,
	mid: usize,
	block: usize,
	scratch: &mut Scratch<T>,
	is_less: &mut F,
) where
	F: FnMut(&T, &T) -> bool,
{
	debug_assert!(mid % block == 0 && v.len() % block == 0);
	let count = v.len() / block;
	let left_count = mid / block;
	let Scratch {
		buf,
		ranks,
		min_gallop,
		gallops,
	} = scratch;

	// Ranks start out as block positions, so left blocks rank before right blocks.
	ranks.clear();
	ranks.extend(0..count);

	for i in 0..count {
		let mut min = i;
		for j in i + 1..count {
			let order = compare_blocks(
				v.view(),
				(j * block, ranks[j]),
				(min * block, ranks[min]),
				is_less,
			);
			if order == Ordering::Less {
				min = j;
			}
		}
		if min != i {
			swap_blocks(
				&mut v,
				i * block..(i + 1) * block,
				min * block..(min + 1) * block,
			);
			ranks.swap(i, min);
		}
	}

	// Everything before `frag` is final. The fragment `v[frag..pos]` stems from a single run,
	// the left one iff `frag_left`, and is at most one block long.
	let mut frag = 0;
	let mut frag_left = ranks[0] < left_count;
	for (i, &rank) in ranks.iter().enumerate().skip(1) {
		let pos = i * block;
		let block_left = rank < left_count;
		if block_left == frag_left {
			frag = pos;
			continue;
		}

		// SAFETY: The fragment and the block are non-empty, the fragment fits into the buffer.
		let leftover = unsafe {
			merge_lo(
				v.slice_mut(s![frag..pos + block]),
				pos - frag,
				buf.as_mut_ptr(),
				frag_left,
				*min_gallop,
				gallops,
				is_less,
			)
		};
		match leftover {
			Leftover::Left(at) => frag += at,
			Leftover::Right(at) => {
				frag += at;
				frag_left = block_left;
			}
		}
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::{Scratch, block_len, block_merge};
	use ndarray::Array1;
	use quickcheck_macros::quickcheck;
	use rand::{Rng, SeedableRng, rngs::StdRng};

	// Merges two sorted runs of `(key, position)` pairs and checks against a stable sort.
	fn check(mut left: Vec<u32>, mut right: Vec<u32>) {
		left.sort();
		right.sort();
		let mid = left.len();
		let xs = left
			.into_iter()
			.chain(right)
			.enumerate()
			.map(|(i, x)| (x, i))
			.collect::<Vec<_>>();
		let mut expected = xs.clone();
		expected.sort_by_key(|&(x, _)| x);
		let mut scratch = Scratch::new(xs.len(), 7).unwrap();
		let mut array = Array1::from_vec(xs);
		block_merge(array.view_mut(), mid, &mut scratch, &mut |a, b| a.0 < b.0);
		assert!(array.iter().eq(expected.iter()));
	}

	#[quickcheck]
	fn merged_stably(left: Vec<u8>, right: Vec<u8>) {
		let key = |x: u8| u32::from(x % 16);
		check(
			left.into_iter().map(key).collect(),
			right.into_iter().map(key).collect(),
		);
	}

	#[test]
	fn merged_stably_in_blocks() {
		let mut rng = StdRng::seed_from_u64(37);
		for _ in 0..200 {
			let keys = rng.random_range(1..2000);
			let left = (0..rng.random_range(0..1500))
				.map(|_| rng.random_range(0..keys))
				.collect();
			let right = (0..rng.random_range(0..1500))
				.map(|_| rng.random_range(0..keys))
				.collect();
			check(left, right);
		}
	}

	#[test]
	fn merged_stably_with_partial_blocks() {
		for (left, right) in [(37, 1000), (1000, 37), (101, 99), (300, 301), (12, 13)] {
			check(
				(0..left).map(|x| x % 5).collect(),
				(0..right).map(|x| x % 7).collect(),
			);
		}
	}

	#[test]
	fn merged_interleaved() {
		let len = 10_000;
		assert_eq!(block_len(len), 100);
		let mut array = Array1::from_iter((1..len).step_by(2).chain((2..=len).step_by(2)));
		let mut scratch = Scratch::new(len, 7).unwrap();
		block_merge(array.view_mut(), len / 2, &mut scratch, &mut usize::lt);
		assert!(array.iter().copied().eq(1..=len));
	}

	#[test]
	fn scratch_covers_blocks_and_ranks() {
		for len in [0, 1, 2, 3, 99, 100, 101, 10_000, 10_001] {
			let scratch = Scratch::<u8>::new(len, 0).unwrap();
			let block = block_len(len);
			assert!(scratch.buf.capacity() >= block);
			assert!(scratch.ranks.capacity() >= len.div_ceil(block));
			assert_eq!(scratch.min_gallop, 1);
		}
	}

	#[test]
	fn block_lengths() {
		assert_eq!(block_len(0), 1);
		assert_eq!(block_len(1), 1);
		assert_eq!(block_len(2), 2);
		assert_eq!(block_len(4), 2);
		assert_eq!(block_len(5), 3);
		assert_eq!(block_len(99), 10);
		assert_eq!(block_len(100), 10);
		assert_eq!(block_len(101), 11);
	}
}
