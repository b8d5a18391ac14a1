use super::*;

#[cfg(not(wasm))]
mod x86_64 {
    use std::arch::x86_64::*;

    use super::*;

    // SAFETY: Callers must ensure `dst` is at least as large as `src`
    // SAFETY: Callers must ensure AVX2 is available
    #[inline]
    #[target_feature(enable = "avx2")]
    pub(in crate::escape) unsafe fn escape(src: &[u8], dst: &mut [u8]) -> usize {
        let loop_bound = loop_bound(src.len());

        let mut dst_idx = 0;

        let mut chunk_start = 0;
        while chunk_start < loop_bound {
            test_assert!(chunk_start + BLOCK_SIZE <= src.len());

            // we explicitly perform an unaligned load
            let chunk = _mm256_loadu_si256(
                #[allow(clippy::cast_ptr_alignment)]
                {
                    src.as_ptr().add(chunk_start) as *const _
                },
            );

            let backslash = {
                let match_backslash = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b'\\' as i8));
                _mm256_movemask_epi8(match_backslash) as u32
            };

            dst_idx = compact_chunk(src, chunk_start, backslash, dst, dst_idx);
            chunk_start += BLOCK_SIZE;
        }

        dst_idx
    }

}

#[cfg(not(wasm))]
pub(super) use self::x86_64::escape;
