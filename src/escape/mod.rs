/*!
Escape compaction for JSON string content.

This module rewrites the single-byte escape sequences `\b` `\f` `\n` `\r` and
`\t` into the control bytes they stand for, packing the surrounding bytes
leftward so the output is contiguous. It's the materialization half of string
handling: the indexer finds string tokens, and a downstream parser calls this
to turn the raw bytes between the quotes into their unescaped form.

It is not a general-purpose unescaper: `\uXXXX` and the other multi-byte
escapes are out of scope, and escape pairs are not validated. A backslash
followed by anything outside the recognized set is simply dropped and its
follower passed through, which is also what happens to a backslash sitting in
the last lane of a chunk (its follower belongs to the next chunk).

This implementation follows the same basic design as `index` for supporting a
vectorized and fallback implementation using a shared compaction function.
*/

use std::ptr;

mod fallback;
#[cfg(all(target_arch = "x86_64", not(wasm)))]
mod simd;

/**
The number of bytes compacted per chunk.

Only the largest chunk-aligned prefix of the source is processed; see
[`escape`].
*/
pub const BLOCK_SIZE: usize = 32;

/**
Compact the recognized two-byte escape sequences in `src` into single control
bytes, writing the result to the front of `dst` and returning the number of
bytes written.

`dst` must be at least as large as `src`; no sequence grows under this
transform.

# Chunk alignment

Only the largest [`BLOCK_SIZE`]-aligned prefix of `src` is processed — bytes
beyond the last whole chunk are never read or written, and the return value
covers the processed prefix only. Callers must pad the source up to a chunk
boundary, or guarantee the tail needs no escaping and handle it themselves.

# Panics

Panics if `dst` is smaller than `src`.
*/
pub fn escape(src: &[u8], dst: &mut [u8]) -> usize {
    assert!(dst.len() >= src.len(), "dst must be at least as large as src");

    #[cfg(all(target_arch = "x86_64", not(wasm)))]
    {
        if is_x86_feature_detected!("avx2") {
            // SAFETY: dst covers src
            // SAFETY: avx2 is available
            return unsafe { simd::escape(src, dst) };
        }
    }

    fallback::escape(src, dst)
}

// used by tests and benches
#[doc(hidden)]
pub fn escape_fallback(src: &[u8], dst: &mut [u8]) -> usize {
    assert!(dst.len() >= src.len(), "dst must be at least as large as src");

    fallback::escape(src, dst)
}

/**
Compact one chunk given the positions of its backslashes.

Every backslash is an escape marker and is consumed: when its follower is one
of the five recognized letters the pair collapses into a control byte, and
otherwise the follower is left for the ordinary copy. Either way the
destination advances by `BLOCK_SIZE` minus the number of backslashes.
*/
// SAFETY: Callers must ensure `chunk_start + BLOCK_SIZE <= src.len()`
// SAFETY: Callers must ensure `dst` is at least as large as `src`
#[inline(always)]
unsafe fn compact_chunk(
    src: &[u8],
    chunk_start: usize,
    mut backslash: u32,
    dst: &mut [u8],
    mut dst_idx: usize,
) -> usize {
    let chunk_end = chunk_start + BLOCK_SIZE;
    let mut copy_from = chunk_start;

    while backslash != 0 {
        let at = chunk_start + backslash.trailing_zeros() as usize;
        backslash &= backslash - 1;

        copy_unescaped(src, copy_from, at, dst, &mut dst_idx);

        // a backslash in the final lane has its follower in the next chunk;
        // it's dropped and the follower is processed there unreplaced
        if at + 1 == chunk_end {
            copy_from = at + 1;
            continue;
        }

        let control = match *get_unchecked!(src, at + 1) {
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => 0x0a,
            b'r' => 0x0d,
            b't' => 0x09,
            // unknown escapes: drop the `\` and let the follower pass through
            _ => {
                copy_from = at + 1;
                continue;
            }
        };

        *get_unchecked_mut!(dst, dst_idx) = control;
        dst_idx += 1;

        // skip the pair; the letter can't be a backslash so the mask needs no
        // fixing up
        copy_from = at + 2;
    }

    copy_unescaped(src, copy_from, chunk_end, dst, &mut dst_idx);

    dst_idx
}

// SAFETY: Callers must ensure `from..to` is within `src` and that `dst` has
// room at `*dst_idx` for `to - from` bytes
#[inline(always)]
unsafe fn copy_unescaped(src: &[u8], from: usize, to: usize, dst: &mut [u8], dst_idx: &mut usize) {
    // if an escape starts a chunk or follows another escape directly then
    // there's nothing in between to copy
    if to == from {
        return;
    }

    let cnt = to - from;

    test_assert!(to <= src.len());
    test_assert!(*dst_idx + cnt <= dst.len());

    // manually copy into the destination, knowing the slices don't overlap
    // this is more efficient than `copy_from_slice` and friends, because
    // those methods have to check the ranges line up

    // SAFETY: The `src` range is within `src` and the `dst` range is within
    // `dst`, which are distinct buffers.
    // SAFETY: We're only copying bytes, that are `Copy`.
    unsafe {
        ptr::copy_nonoverlapping(src.as_ptr().add(from), dst.as_mut_ptr().add(*dst_idx), cnt);
    }

    *dst_idx += cnt;
}

/**
The largest chunk-aligned prefix of the source.
*/
#[inline(always)]
fn loop_bound(len: usize) -> usize {
    len - len % BLOCK_SIZE
}
