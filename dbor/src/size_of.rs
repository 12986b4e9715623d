//! Compile-time byte costs of encoded values.
//!
//! ```
//! const CAPACITY: usize = dbor::size_of::unsigned_integer(1000) + dbor::size_of::utf8_string(42);
//! let buffer = [0u8; CAPACITY];
//! # let _ = buffer;
//! ```

/// Size in bytes of IntegerValue(`value`).
pub const fn unsigned_integer(value: u64) -> usize {
    if value < 24 {
        1
    } else if value < 24 + 0x100 {
        2
    } else if value < 24 + 0x1_0100 {
        3
    } else if value < 24 + 0x101_0100 {
        4
    } else if value < 24 + 0x1_0101_0100 {
        5
    } else if value < 24 + 0x101_0101_0100 {
        6
    } else if value < 24 + 0x1_0101_0101_0100 {
        7
    } else if value < 24 + 0x101_0101_0101_0100 {
        8
    } else {
        9
    }
}

/// Size in bytes of IntegerValue(`value`).
pub const fn signed_integer(value: i64) -> usize {
    // a negative value is stored as the magnitude of -(value + 1)
    if value < 0 {
        unsigned_integer(!value as u64)
    } else {
        unsigned_integer(value as u64)
    }
}

/// Size in bytes of a ByteStringValue with a `length`-byte payload.
pub const fn byte_string(length: usize) -> usize {
    add_saturating(unsigned_integer(length as u64), length)
}

/// Size in bytes of a Utf8StringValue with a `length`-byte payload.
pub const fn utf8_string(length: usize) -> usize {
    add_saturating(unsigned_integer(length as u64), length)
}

/// `min(a + b, usize::MAX)`.
pub const fn add_saturating(a: usize, b: usize) -> usize {
    a.saturating_add(b)
}
