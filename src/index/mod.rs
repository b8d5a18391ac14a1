/*!
Structural indexing for JSON documents.

This module contains the first stage of a vectorized JSON parser. It walks a
byte buffer in 64byte blocks and records the absolute offset of every
structural character into an [`OffsetSink`]: the `{ } [ ] : ,` operators, the
first byte of every scalar token, and both delimiting quotes of every string.
Characters between the quotes of a string are skipped.

There are two implementations:

- an AVX2 vectorized implementation,
- and a byte-by-byte fallback implementation.

Both produce the same five bitmasks for each block and feed them through the
same carry logic, so for any input the two implementations produce exactly the
same offsets and errors. The vectorized implementation just builds the masks
with a handful of instructions instead of a loop over each byte.

State that crosses a block boundary (an open string, a pending escape, the
trailing half of a scalar token) travels in a small [`Carry`] struct of plain
integers. Nothing about the input is validated except what falls out of the
carries at the end of the document: a string that never closes, or a raw
control byte inside a string, fails the whole call. Those checks only happen
once the buffer has been fully scanned so the block loop stays branch-light.
*/

use std::mem;

use thiserror::Error;

mod fallback;
#[cfg(all(target_arch = "x86_64", not(wasm)))]
mod simd;
mod sink;
mod tables;

pub use self::sink::OffsetSink;

use self::tables::*;

/**
The number of bytes processed per block.

Carry state moves across blocks of this size. The last block of a document is
padded with spaces up to it, so a sink sized for a document must cover the
document length, not the padded length.
*/
pub const BLOCK_SIZE: usize = 64;

/**
An error produced at the end of an [`index`](StructuralIndexer::index) call.

Both kinds reject the whole document; there is no partial result. The checks
run once the buffer has been fully scanned, so an erroneous document still
costs a full pass.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A string is opened, but never closed.
    #[error("unclosed string: a string is opened, but never closed")]
    UnclosedString,

    /// Within strings, there are characters that should be escaped.
    #[error("unescaped characters: within strings, there are characters that should be escaped")]
    UnescapedControlCharacter,
}

/**
The stage 1 scanner.

An indexer owns the carry state for one in-flight [`index`](Self::index) call,
so a single indexer can't scan two documents concurrently. Give each worker
its own indexer and sink; within one document every block depends on the
carries of all blocks before it and the scan is inherently sequential.
*/
#[derive(Debug, Default)]
pub struct StructuralIndexer {
    carry: Carry,
}

/**
Scanner state threaded from each block into the next.

The carries are reset at the top of every `index` call and passed by exclusive
borrow into each block step, so a single block transition can be exercised on
its own in tests.
*/
#[derive(Debug, Default, Clone, Copy)]
struct Carry {
    /**
    All ones when the previous block ended inside a string, otherwise zero.

    Kept as a full mask rather than a flag so it can be XOR-ed straight into
    the next block's prefix-XOR.
    */
    in_string: u64,
    /**
    Set when the previous block ended with an odd-length run of backslashes,
    making the first byte of the next block the target of an escape.
    */
    escaped: u64,
    /**
    The previous block's finalized structural bitmap.

    Bitmaps are flushed one block late so the final block can be handled the
    same way as every other block.
    */
    structurals: u64,
    /**
    Set when the last byte of the previous block was a non-quote scalar, used
    to keep a multi-byte token that straddles the boundary from being indexed
    twice.
    */
    scalar: u64,
    /**
    Accumulated mask of raw control bytes seen inside strings. Checked once at
    the end of the document.
    */
    unescaped_error: u64,
}

/**
The five bitmasks extracted from one 64byte block.

Bit `i` describes byte `i` of the block. Extraction is the only part of the
scan that differs between the vectorized and fallback implementations.
*/
#[derive(Debug, Default, Clone, Copy)]
struct BlockBits {
    backslash: u64,
    quote: u64,
    control: u64,
    whitespace: u64,
    op: u64,
}

impl StructuralIndexer {
    pub fn new() -> Self {
        Default::default()
    }

    /**
    Scan `buffer[..length]` and collect the offsets of its structural
    characters into `sink`.

    The sink is reset first and is left holding the offsets in ascending
    order, terminated by a zero sentinel. The caller must have sized the sink
    for at least `length` offsets; a document where every byte is structural
    fills it completely.

    # Errors

    Fails with [`IndexError::UnclosedString`] when the document ends inside a
    string and with [`IndexError::UnescapedControlCharacter`] when a raw
    control byte (`<= 0x1f`) appears inside a string. Either way the sink
    contents are meaningless and the document must be rejected.

    # Panics

    Panics if `length > buffer.len()`, or if the sink is too small for the
    document. Both are caller bugs, not properties of the input.
    */
    pub fn index(
        &mut self,
        buffer: &[u8],
        length: usize,
        sink: &mut OffsetSink,
    ) -> Result<(), IndexError> {
        assert!(length <= buffer.len(), "length is out of bounds");

        sink.reset();
        self.carry = Carry::default();

        #[cfg(all(target_arch = "x86_64", not(wasm)))]
        {
            if is_x86_feature_detected!("avx2") {
                // SAFETY: avx2 is available
                unsafe { simd::index(buffer, length, &mut self.carry, sink) };
                return finish(&self.carry, sink, loop_bound(length) + BLOCK_SIZE);
            }
        }

        fallback::index(buffer, length, &mut self.carry, sink);
        finish(&self.carry, sink, loop_bound(length) + BLOCK_SIZE)
    }

    // used by tests and benches
    #[doc(hidden)]
    pub fn index_fallback(
        &mut self,
        buffer: &[u8],
        length: usize,
        sink: &mut OffsetSink,
    ) -> Result<(), IndexError> {
        assert!(length <= buffer.len(), "length is out of bounds");

        sink.reset();
        self.carry = Carry::default();

        fallback::index(buffer, length, &mut self.carry, sink);
        finish(&self.carry, sink, loop_bound(length) + BLOCK_SIZE)
    }
}

/**
The largest block-aligned prefix of the input.

Bytes past it are scanned through a space-padded copy, and the remainder block
is processed even when it's empty so the bitmap pipeline always flushes the
same way.
*/
#[inline(always)]
fn loop_bound(length: usize) -> usize {
    length - length % BLOCK_SIZE
}

/**
Copy the unaligned tail of the input into a block of structurally inert
padding.
*/
#[inline(always)]
fn remainder(input: &[u8], length: usize, loop_bound: usize) -> [u8; BLOCK_SIZE] {
    let mut last_block = [SPACE; BLOCK_SIZE];

    let tail = get_unchecked!(input, loop_bound..length);
    last_block[..tail.len()].copy_from_slice(tail);

    last_block
}

/**
Advance the scanner by one block.

`block_base` is the absolute offset of the block the bits were extracted from.
The bitmap flushed into the sink is the one finalized for the *previous*
block; the sink compensates for the one-block delay.
*/
#[inline(always)]
fn step(bits: BlockBits, carry: &mut Carry, sink: &mut OffsetSink, block_base: usize) {
    // string scanning
    let escaped = if bits.backslash == 0 {
        mem::take(&mut carry.escaped)
    } else {
        // a backslash that is itself escaped doesn't start a run
        let backslash = bits.backslash & !carry.escaped;
        let follows_escape = backslash << 1 | carry.escaped;
        let odd_sequence_starts = backslash & ODD_BITS & !follows_escape;

        let sequences_starting_on_even_bits = odd_sequence_starts.wrapping_add(backslash);

        // the escape state entering the next block is the carry-out of the
        // addition above; the overflow formula is Hacker's Delight 2-13
        carry.escaped = ((odd_sequence_starts >> 1)
            + (backslash >> 1)
            + (odd_sequence_starts & backslash & 1))
            >> 63;

        let invert_mask = sequences_starting_on_even_bits << 1;
        (EVEN_BITS ^ invert_mask) & follows_escape
    };

    let quote = bits.quote & !escaped;

    // each unescaped quote toggles every bit after it; bit 63 carries the
    // open/closed state into the next block as an all-ones or all-zeros mask
    let in_string = prefix_xor(quote) ^ carry.in_string;
    carry.in_string = ((in_string as i64) >> 63) as u64;

    // characters classification
    let scalar = !(bits.op | bits.whitespace);
    let non_quote_scalar = scalar & !quote;
    let follows_non_quote_scalar = non_quote_scalar << 1 | carry.scalar;
    carry.scalar = non_quote_scalar >> 63;

    let potential_scalar_start = scalar & !follows_non_quote_scalar;
    let potential_structural_start = bits.op | potential_scalar_start;

    // finish
    sink.write(block_base, carry.structurals);

    // drop everything between the quotes of a string, then put the quotes
    // themselves back in so a consumer can skip a whole string token by
    // jumping to the next offset
    carry.structurals = (potential_structural_start & !(in_string ^ quote)) | quote;

    carry.unescaped_error |= bits.control & in_string;
}

/**
Cumulative XOR across bit positions: afterwards each bit is the XOR of every
bit at or below it.
*/
#[inline(always)]
fn prefix_xor(mut bitmask: u64) -> u64 {
    bitmask ^= bitmask << 1;
    bitmask ^= bitmask << 2;
    bitmask ^= bitmask << 4;
    bitmask ^= bitmask << 8;
    bitmask ^= bitmask << 16;
    bitmask ^= bitmask << 32;
    bitmask
}

/**
Flush the last block's bitmap, terminate the sink and check the carries that
must not survive the end of the document.
*/
fn finish(carry: &Carry, sink: &mut OffsetSink, padded_end: usize) -> Result<(), IndexError> {
    sink.write(padded_end, carry.structurals);
    sink.finish();

    if carry.in_string != 0 {
        return Err(IndexError::UnclosedString);
    }

    if carry.unescaped_error != 0 {
        return Err(IndexError::UnescapedControlCharacter);
    }

    Ok(())
}
