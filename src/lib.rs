/*!
# `chipmunk-json`

## ⚡

The first stage of a vectorized JSON parser: a structural indexer that turns a
raw byte buffer into the ordered offsets of every structural character, and a
compactor for single-byte escape sequences. This library is optimized for
chewing through very large numbers of documents at memory bandwidth; building
values out of the offsets it produces is the job of a downstream parser.

## ⚠️ CAREFUL

This library contains a _lot_ of unsafe code and is very performance sensitive.
Any changes need to be carefully considered and should be:

- tested against the benchmarks to make sure we don't regress (at least not accidentally).
- fuzz tested to ensure there aren't soundness holes introduced.

Hot paths carry bitmask state between fixed-size blocks instead of branching
on individual bytes. Any unchecked operations performed on buffers are done
using macros that use the checked variant in test/debug builds (or when the
`checked` feature is enabled) to make sure we don't ever cause UB when working
through documents.
*/

#![deny(warnings)]
#![allow(clippy::missing_safety_doc)]

#[macro_use]
mod macros;

mod escape;
mod index;

pub use escape::{escape, escape_fallback, BLOCK_SIZE as ESCAPE_BLOCK_SIZE};
pub use index::{IndexError, OffsetSink, StructuralIndexer, BLOCK_SIZE};
