//! Non-owning view of a single DBOR value with typed getters.

use crate::encoding;
use crate::result::ResultCode;
use crate::string::{Utf8Str, offset_of_last_codepoint_in};
use core::cmp::Ordering;

const SIGN_64: u64 = 1 << 63;
const EXPONENT_64: u64 = 0x7FF << 52;

/// Kind of a value as determined by the first byte of its first token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    ByteString,
    Utf8String,
    Sequence,
    Dictionary,
    Allocated,
    BinaryRational,
    DecimalRational,
    Numberlike,
    None,
    Reserved,
}

impl ValueKind {
    pub fn of(first_byte: u8) -> Self {
        match first_byte {
            0x00..=0x3F => Self::Integer,
            0x40..=0x5F => Self::ByteString,
            0x60..=0x7F => Self::Utf8String,
            0x80..=0x9F => Self::Sequence,
            0xA0..=0xBF => Self::Dictionary,
            0xC0..=0xC7 => Self::Allocated,
            0xC8..=0xCF => Self::BinaryRational,
            0xD0..=0xEF => Self::DecimalRational,
            0xF0..=0xFB => Self::Reserved,
            0xFC..=0xFE => Self::Numberlike,
            0xFF => Self::None,
        }
    }
}

/// A well-formed, ill-formed or incomplete DBOR value in a borrowed buffer.
///
/// The view is *complete* when the buffer it was constructed over contained
/// the whole value; an incomplete view keeps all remaining bytes so that
/// forward iteration can resume after it. The default view is empty and
/// incomplete.
///
/// Every getter returns `(ResultCode, T)` with `T` defaulted (0, NaN, empty)
/// on a non-`Ok` outcome, so outcomes of several getters can be combined
/// with `|` and checked once.
#[derive(Debug, Clone, Copy, Default)]
pub struct Value<'a> {
    bytes: &'a [u8],
    complete: bool,
}

impl<'a> Value<'a> {
    /// View of the first value in `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        let size = encoding::value_size(buffer);
        if size > 0 && size <= buffer.len() {
            Self {
                bytes: &buffer[..size],
                complete: true,
            }
        } else {
            Self {
                bytes: buffer,
                complete: false,
            }
        }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    fn first(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// Kind of the (possibly incomplete) value, `None` for the empty view.
    pub fn kind(&self) -> Option<ValueKind> {
        self.first().map(ValueKind::of)
    }

    pub fn is_none(&self) -> bool {
        self.first() == Some(0xFF)
    }

    pub fn is_numberlike(&self) -> bool {
        matches!(self.first(), Some(0xFC..=0xFE))
    }

    pub fn is_number(&self) -> bool {
        matches!(self.first(), Some(b) if b < 0x40 || (b >= 0xC8 && b < 0xF0))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.first(), Some(0x40..=0x7F))
    }

    pub fn is_container(&self) -> bool {
        matches!(self.first(), Some(0x80..=0xC7))
    }

    /// Decodes the represented object into `T`.
    pub fn get<T: FromValue<'a>>(&self) -> (ResultCode, T) {
        T::from_value(self)
    }

    /// View of the value's UTF-8 string payload, at most `max_size` bytes.
    ///
    /// A payload longer than `max_size` is truncated at the last code-point
    /// boundary within its first `max_size + 1` bytes and reported as
    /// `ApproxExtreme`, so a well-formed prefix stays well-formed. The
    /// returned view is not validated; use [`Utf8Str::check`].
    pub fn get_string(&self, max_size: usize) -> (ResultCode, Utf8Str<'a>) {
        if !self.complete {
            return (ResultCode::Incomplete, Utf8Str::default());
        }
        match self.bytes[0] {
            b @ 0x60..=0x7F => {
                let payload = &self.bytes[encoding::token_size(b)..];
                if payload.len() <= max_size {
                    (ResultCode::Ok, Utf8Str::new(payload))
                } else {
                    let window = &payload[..(max_size + 1).min(payload.len())];
                    let cut = offset_of_last_codepoint_in(window);
                    (ResultCode::ApproxExtreme, Utf8Str::new(&payload[..cut]))
                }
            }
            0xFF => (ResultCode::NoObject, Utf8Str::default()),
            _ => (ResultCode::Incompatible, Utf8Str::default()),
        }
    }
}

/// Strict total order over all value views: the empty view first, then by
/// first byte, size, buffer bytes compared from the last byte forward, and
/// incomplete before complete.
impl Ord for Value<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.bytes.is_empty(), other.bytes.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.bytes[0]
                .cmp(&other.bytes[0])
                .then(self.bytes.len().cmp(&other.bytes.len()))
                .then_with(|| {
                    self.bytes
                        .iter()
                        .rev()
                        .zip(other.bytes.iter().rev())
                        .find_map(|(a, b)| match a.cmp(b) {
                            Ordering::Equal => None,
                            unequal => Some(unequal),
                        })
                        .unwrap_or(Ordering::Equal)
                })
                .then(self.complete.cmp(&other.complete)),
        }
    }
}

impl PartialOrd for Value<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value<'_> {}

/// Mantissa and exponent of a decimal number `mantissa * 10^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decimal {
    pub mantissa: i32,
    pub exponent: i32,
}

/// Host types a [`Value`] decodes into via [`Value::get`].
pub trait FromValue<'a>: Sized {
    fn from_value(value: &Value<'a>) -> (ResultCode, Self);
}

// Magnitude of a complete IntegerValue view: the represented value is the
// magnitude for 0x00..=0x1F and -(magnitude + 1) for 0x20..=0x3F.
fn integer_magnitude(bytes: &[u8]) -> Result<u64, encoding::Error> {
    let small = bytes[0] & 0x1F;
    if small < 0x18 {
        Ok(small as u64)
    } else {
        encoding::decode_natural(&bytes[1..], 23)
    }
}

impl<'a> FromValue<'a> for u64 {
    fn from_value(value: &Value<'a>) -> (ResultCode, Self) {
        if !value.complete {
            return (ResultCode::Incomplete, 0);
        }
        match value.bytes[0] {
            0x00..=0x1F => match integer_magnitude(value.bytes) {
                Ok(v) => (ResultCode::Ok, v),
                Err(_) => (ResultCode::ApproxExtreme, u64::MAX),
            },
            0x20..=0x3F => (ResultCode::ApproxExtreme, 0),
            0xFC => (ResultCode::ApproxImprecise, 0),
            0xFD => (ResultCode::ApproxExtreme, 0),
            0xFE => (ResultCode::ApproxExtreme, u64::MAX),
            0xFF => (ResultCode::NoObject, 0),
            _ => (ResultCode::Incompatible, 0),
        }
    }
}

impl<'a> FromValue<'a> for i64 {
    fn from_value(value: &Value<'a>) -> (ResultCode, Self) {
        if !value.complete {
            return (ResultCode::Incomplete, 0);
        }
        match value.bytes[0] {
            0x00..=0x1F => match integer_magnitude(value.bytes) {
                Ok(m) if m <= i64::MAX as u64 => (ResultCode::Ok, m as i64),
                _ => (ResultCode::ApproxExtreme, i64::MAX),
            },
            0x20..=0x3F => match integer_magnitude(value.bytes) {
                Ok(m) if m <= i64::MAX as u64 => (ResultCode::Ok, -1 - (m as i64)),
                _ => (ResultCode::ApproxExtreme, i64::MIN),
            },
            0xFC => (ResultCode::ApproxImprecise, 0),
            0xFD => (ResultCode::ApproxExtreme, i64::MIN),
            0xFE => (ResultCode::ApproxExtreme, i64::MAX),
            0xFF => (ResultCode::NoObject, 0),
            _ => (ResultCode::Incompatible, 0),
        }
    }
}

impl<'a> FromValue<'a> for u8 {
    fn from_value(value: &Value<'a>) -> (ResultCode, Self) {
        let (code, v) = u64::from_value(value);
        match Self::try_from(v) {
            Ok(v) => (code, v),
            Err(_) => (ResultCode::ApproxExtreme, Self::MAX),
        }
    }
}

impl<'a> FromValue<'a> for u16 {
    fn from_value(value: &Value<'a>) -> (ResultCode, Self) {
        let (code, v) = u64::from_value(value);
        match Self::try_from(v) {
            Ok(v) => (code, v),
            Err(_) => (ResultCode::ApproxExtreme, Self::MAX),
        }
    }
}

impl<'a> FromValue<'a> for u32 {
    fn from_value(value: &Value<'a>) -> (ResultCode, Self) {
        let (code, v) = u64::from_value(value);
        match Self::try_from(v) {
            Ok(v) => (code, v),
            Err(_) => (ResultCode::ApproxExtreme, Self::MAX),
        }
    }
}

impl<'a> FromValue<'a> for i8 {
    fn from_value(value: &Value<'a>) -> (ResultCode, Self) {
        let (code, v) = i64::from_value(value);
        match Self::try_from(v) {
            Ok(v) => (code, v),
            Err(_) => (
                ResultCode::ApproxExtreme,
                if v < 0 { Self::MIN } else { Self::MAX },
            ),
        }
    }
}

impl<'a> FromValue<'a> for i16 {
    fn from_value(value: &Value<'a>) -> (ResultCode, Self) {
        let (code, v) = i64::from_value(value);
        match Self::try_from(v) {
            Ok(v) => (code, v),
            Err(_) => (
                ResultCode::ApproxExtreme,
                if v < 0 { Self::MIN } else { Self::MAX },
            ),
        }
    }
}

impl<'a> FromValue<'a> for i32 {
    fn from_value(value: &Value<'a>) -> (ResultCode, Self) {
        let (code, v) = i64::from_value(value);
        match Self::try_from(v) {
            Ok(v) => (code, v),
            Err(_) => (
                ResultCode::ApproxExtreme,
                if v < 0 { Self::MIN } else { Self::MAX },
            ),
        }
    }
}

impl<'a> FromValue<'a> for f64 {
    fn from_value(value: &Value<'a>) -> (ResultCode, Self) {
        if !value.complete {
            return (ResultCode::Incomplete, f64::NAN);
        }
        match value.bytes[0] {
            0x00 => (ResultCode::Ok, 0.0),
            b @ 0xC8..=0xCF => {
                let k = (b & 7) as usize;
                let payload = &value.bytes[1..];
                if k == 7 {
                    let bits = encoding::decode_binary_rational_64(payload, 7);
                    if bits & !SIGN_64 == 0 {
                        return (ResultCode::Illformed, f64::NAN);
                    }
                    if bits & EXPONENT_64 == EXPONENT_64 {
                        let infinite = if bits & SIGN_64 != 0 {
                            f64::NEG_INFINITY
                        } else {
                            f64::INFINITY
                        };
                        return (ResultCode::ApproxExtreme, infinite);
                    }
                    (ResultCode::Ok, f64::from_bits(bits))
                } else if k >= 4 {
                    (
                        ResultCode::Ok,
                        f64::from_bits(encoding::decode_binary_rational_64(payload, k)),
                    )
                } else {
                    let bits = encoding::decode_binary_rational_32(payload, k);
                    (ResultCode::Ok, f64::from_bits(encoding::widen_binary32(bits)))
                }
            }
            0xFC => (ResultCode::Ok, -1.0 / f64::INFINITY),
            0xFD => (ResultCode::Ok, f64::NEG_INFINITY),
            0xFE => (ResultCode::Ok, f64::INFINITY),
            0xFF => (ResultCode::NoObject, f64::NAN),
            _ => (ResultCode::Incompatible, f64::NAN),
        }
    }
}

impl<'a> FromValue<'a> for f32 {
    fn from_value(value: &Value<'a>) -> (ResultCode, Self) {
        if !value.complete {
            return (ResultCode::Incomplete, f32::NAN);
        }
        match value.bytes[0] {
            0x00 => (ResultCode::Ok, 0.0),
            b @ 0xC8..=0xCF => {
                let k = (b & 7) as usize;
                let payload = &value.bytes[1..];
                if k <= 3 {
                    return (
                        ResultCode::Ok,
                        f32::from_bits(encoding::decode_binary_rational_32(payload, k)),
                    );
                }
                let bits = encoding::decode_binary_rational_64(payload, k);
                if k == 7 {
                    if bits & !SIGN_64 == 0 {
                        return (ResultCode::Illformed, f32::NAN);
                    }
                    if bits & EXPONENT_64 == EXPONENT_64 {
                        let infinite = if bits & SIGN_64 != 0 {
                            f32::NEG_INFINITY
                        } else {
                            f32::INFINITY
                        };
                        return (ResultCode::ApproxExtreme, infinite);
                    }
                }
                let (bits, direction) = encoding::narrow_binary64(bits);
                let code = match direction {
                    Ordering::Equal => ResultCode::Ok,
                    Ordering::Less => ResultCode::ApproxImprecise,
                    Ordering::Greater => ResultCode::ApproxExtreme,
                };
                (code, f32::from_bits(bits))
            }
            0xFC => (ResultCode::Ok, -1.0 / f32::INFINITY),
            0xFD => (ResultCode::Ok, f32::NEG_INFINITY),
            0xFE => (ResultCode::Ok, f32::INFINITY),
            0xFF => (ResultCode::NoObject, f32::NAN),
            _ => (ResultCode::Incompatible, f32::NAN),
        }
    }
}

impl<'a> FromValue<'a> for Decimal {
    fn from_value(value: &Value<'a>) -> (ResultCode, Self) {
        if !value.complete {
            return (ResultCode::Incomplete, Self::default());
        }
        let b = value.bytes[0];
        match b {
            0x00..=0x3F => {
                let (_, m) = i64::from_value(value);
                clamped_mantissa(m, 0)
            }
            0xD0..=0xEF => {
                let head = encoding::token_size(b);
                if value.bytes.len() <= head {
                    // the exponent token was not followed by a mantissa
                    return (ResultCode::Illformed, Self::default());
                }
                let negative = b & 8 != 0;
                let exponent = if b >= 0xE0 {
                    let magnitude = i32::from(b & 7) + 1;
                    if negative { -magnitude } else { magnitude }
                } else {
                    let magnitude = match encoding::decode_natural(&value.bytes[1..head], 8) {
                        Ok(m) => m,
                        Err(_) => return (ResultCode::Unsupported, Self::default()),
                    };
                    let signed = match i64::try_from(magnitude) {
                        Ok(m) if negative => -m,
                        Ok(m) => m,
                        Err(_) => return (ResultCode::Unsupported, Self::default()),
                    };
                    match i32::try_from(signed) {
                        Ok(e) => e,
                        Err(_) => return (ResultCode::Unsupported, Self::default()),
                    }
                };
                let (_, m) = i64::from_value(&Value::new(&value.bytes[head..]));
                if m == 0 {
                    return (ResultCode::Illformed, Self::default());
                }
                clamped_mantissa(m, exponent)
            }
            0xFC => (ResultCode::ApproxImprecise, Self::default()),
            0xFD => (
                ResultCode::ApproxExtreme,
                Self {
                    mantissa: -i32::MAX,
                    exponent: i32::MAX,
                },
            ),
            0xFE => (
                ResultCode::ApproxExtreme,
                Self {
                    mantissa: i32::MAX,
                    exponent: i32::MAX,
                },
            ),
            0xFF => (ResultCode::NoObject, Self::default()),
            _ => (ResultCode::Incompatible, Self::default()),
        }
    }
}

// Best decimal representable at the given exponent.
fn clamped_mantissa(m: i64, exponent: i32) -> (ResultCode, Decimal) {
    match i32::try_from(m) {
        Ok(mantissa) => (ResultCode::Ok, Decimal { mantissa, exponent }),
        Err(_) => (
            ResultCode::ApproxImprecise,
            Decimal {
                mantissa: if m < 0 { i32::MIN } else { i32::MAX },
                exponent,
            },
        ),
    }
}

impl<'a> FromValue<'a> for &'a [u8] {
    fn from_value(value: &Value<'a>) -> (ResultCode, Self) {
        if !value.complete {
            return (ResultCode::Incomplete, &[]);
        }
        match value.bytes[0] {
            b @ 0x40..=0x5F => (ResultCode::Ok, &value.bytes[encoding::token_size(b)..]),
            0xFF => (ResultCode::NoObject, &[]),
            _ => (ResultCode::Incompatible, &[]),
        }
    }
}
