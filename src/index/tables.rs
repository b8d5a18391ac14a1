/*!
Classification tables and bit constants for the block scanner.

The whitespace and operator tables are indexed by the lo nibble of a byte and
then verified against the full byte, so 16 entries stand in for a 256 entry
lookup. Entries that don't correspond to a real character are filler values
chosen so that no byte with that lo nibble can ever compare equal to them.
*/

/// Matches `' '`, `'\t'`, `'\n'` and `'\r'` when the table value at the byte's
/// lo nibble equals the byte itself.
#[rustfmt::skip]
pub(super) const WHITESPACE_TABLE: [u8; 16] = [
//  0     1    2    3    4   5    6    7  8    9      a      b    c    d      e    f
    b' ', 100, 100, 100, 17, 100, 113, 2, 100, b'\t', b'\n', 112, 100, b'\r', 100, 100,
];

/// Matches `:` `{` `,` `}` after the byte has had `0x20` OR-ed into it, which
/// also folds `[` and `]` onto the `{` and `}` entries.
#[rustfmt::skip]
pub(super) const OP_TABLE: [u8; 16] = [
//  0  1  2  3  4  5  6  7  8  9  a     b     c     d     e  f
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, b':', b'{', b',', b'}', 0, 0,
];

pub(super) const LOW_NIBBLE_MASK: u8 = 0x0f;

/// The highest raw byte value that must not appear unescaped inside a string.
pub(super) const LAST_CONTROL_CHARACTER: u8 = 0x1f;

/// Structurally inert padding for the last block of a document.
pub(super) const SPACE: u8 = 0x20;

pub(super) const EVEN_BITS: u64 = 0x5555_5555_5555_5555;
pub(super) const ODD_BITS: u64 = !EVEN_BITS;
