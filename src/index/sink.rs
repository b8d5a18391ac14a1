use super::*;

/**
An append-only buffer of absolute byte offsets.

The indexer flushes one finalized block bitmap at a time into the sink, which
fans the set bits out into individual offsets. Insertion order is ascending
offset order and duplicates are impossible by construction, so the buffer can
be drained front-to-back by a downstream parser with
[`get_and_advance`](Self::get_and_advance) while the write cursor is already
ahead of it.

A sink is allocated once with a capacity covering the largest document it will
ever see (worst case: one offset per input byte) and re-used across documents.
*/
#[derive(Debug)]
pub struct OffsetSink {
    indexes: Vec<u32>,
    capacity: usize,
    write_idx: usize,
    read_idx: usize,
}

impl OffsetSink {
    /**
    Allocate a sink that can hold `capacity` offsets.

    Indexing a document longer than `capacity` bytes panics rather than
    writing out of bounds. Offsets are stored as `u32`, which bounds documents
    at `u32::MAX` bytes.
    */
    pub fn new(capacity: usize) -> Self {
        OffsetSink {
            // slack for the unconditional unrolled writes and the sentinel
            indexes: vec![0; capacity + 8],
            capacity,
            write_idx: 0,
            read_idx: 0,
        }
    }

    /**
    Move both cursors back to the start so the sink can take another document.
    */
    #[inline]
    pub fn reset(&mut self) {
        self.write_idx = 0;
        self.read_idx = 0;
    }

    /**
    Fan the set bits of a finalized block bitmap out into offsets.

    `block_base` is the base offset of the block *being scanned* while `bits`
    belongs to the block before it, so every offset is written one block back.
    */
    pub(super) fn write(&mut self, block_base: usize, mut bits: u64) {
        if bits == 0 {
            return;
        }

        // a non-zero bitmap is always a previous block's, so the subtraction
        // can't wrap
        test_assert!(block_base >= BLOCK_SIZE);
        let base = block_base - BLOCK_SIZE;

        let cnt = bits.count_ones() as usize;
        assert!(
            self.write_idx + cnt <= self.capacity,
            "offset sink overflow: the sink must be sized for the whole document"
        );

        // blocks rarely hold more than 8 structural characters, so 8 slots
        // are written unconditionally; surplus writes land in slack and are
        // either overwritten or never advanced over
        for i in 0..8 {
            *get_unchecked_mut!(self.indexes, self.write_idx + i) =
                (base + bits.trailing_zeros() as usize) as u32;
            bits &= bits.wrapping_sub(1);
        }

        if cnt > 8 {
            for i in 8..16 {
                *get_unchecked_mut!(self.indexes, self.write_idx + i) =
                    (base + bits.trailing_zeros() as usize) as u32;
                bits &= bits.wrapping_sub(1);
            }

            if cnt > 16 {
                let mut i = 16;
                while i < cnt {
                    *get_unchecked_mut!(self.indexes, self.write_idx + i) =
                        (base + bits.trailing_zeros() as usize) as u32;
                    bits &= bits.wrapping_sub(1);
                    i += 1;
                }
            }
        }

        self.write_idx += cnt;
    }

    /**
    Write a zero sentinel one past the last offset without advancing the
    write cursor, so a reader draining the sink can peek one entry too far and
    see a harmless value instead of stale data.
    */
    pub(super) fn finish(&mut self) {
        *get_unchecked_mut!(self.indexes, self.write_idx) = 0;
    }

    /**
    Take the offset at the read cursor and move past it.

    Reading the sentinel once is legal; reading past it is a caller bug and
    panics.
    */
    #[inline]
    pub fn get_and_advance(&mut self) -> usize {
        assert!(
            self.read_idx <= self.write_idx,
            "offset sink read past the write cursor"
        );

        let offset = *get_unchecked!(self.indexes, self.read_idx);
        self.read_idx += 1;

        offset as usize
    }

    /**
    Skip the offset at the read cursor.
    */
    #[inline]
    pub fn advance(&mut self) {
        self.read_idx += 1;
    }

    /**
    Whether the read cursor has caught up with the write cursor.
    */
    #[inline]
    pub fn is_end(&self) -> bool {
        self.write_idx == self.read_idx
    }

    /**
    The last offset written, without consuming anything.
    */
    #[inline]
    pub fn get_last(&self) -> usize {
        assert!(self.write_idx > 0, "no offsets have been written");

        *get_unchecked!(self.indexes, self.write_idx - 1) as usize
    }
}
