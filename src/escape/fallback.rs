use super::*;

// builds the same per-chunk backslash mask as the vectorized implementation,
// one byte at a time, so the two strategies produce identical output
pub(super) fn escape(src: &[u8], dst: &mut [u8]) -> usize {
    let loop_bound = loop_bound(src.len());

    let mut dst_idx = 0;

    let mut chunk_start = 0;
    while chunk_start < loop_bound {
        let mut backslash = 0u32;
        for i in 0..BLOCK_SIZE {
            if *get_unchecked!(src, chunk_start + i) == b'\\' {
                backslash |= 1 << i;
            }
        }

        // SAFETY: the chunk is within `src` and `dst` covers `src`
        dst_idx = unsafe { compact_chunk(src, chunk_start, backslash, dst, dst_idx) };
        chunk_start += BLOCK_SIZE;
    }

    dst_idx
}
