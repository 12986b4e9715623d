//! Value encoder writing into a caller-supplied buffer.

use crate::encoding::{self, Error, RATIONAL_LAYOUT};
use crate::size_of;

/// Encodes values into a borrowed byte buffer, front to back.
///
/// Every `emit_*` operation returns the number of bytes it appended and
/// checks the remaining capacity before writing anything, so a failed emit
/// leaves the buffer contents and [`len`](Encoder::len) untouched.
///
/// ```
/// use dbor::Encoder;
///
/// let mut buffer = [0u8; 16];
/// let mut encoder = Encoder::new(&mut buffer);
/// encoder.emit(-2i32)?;
/// encoder.emit("hi")?;
/// encoder.emit_none()?;
/// assert_eq!(&[0x21, 0x62, b'h', b'i', 0xFF], encoder.as_bytes());
/// # Ok::<(), dbor::Error>(())
/// ```
pub struct Encoder<'a> {
    buffer: &'a mut [u8],
    len: usize,
}

impl<'a> Encoder<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, len: 0 }
    }

    /// Bytes emitted so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    fn require(&self, size: usize) -> Result<(), Error> {
        if self.buffer.len() - self.len < size {
            return Err(Error::BufferTooSmall);
        }
        Ok(())
    }

    fn emit_byte(&mut self, byte: u8) -> Result<usize, Error> {
        self.require(1)?;
        self.buffer[self.len] = byte;
        self.len += 1;
        Ok(1)
    }

    // First token of an integer, string or container value: the inline form
    // for magnitudes below 24, otherwise a biased NaturalToken.
    fn emit_integer_token(&mut self, high: u8, magnitude: u64) -> Result<usize, Error> {
        if magnitude < 24 {
            return self.emit_byte(high | magnitude as u8);
        }
        let mut token = [0u8; 8];
        let n = encoding::encode_natural(magnitude - 23, &mut token)?;
        self.require(1 + n)?;
        self.buffer[self.len] = high | 0x18 | (n - 1) as u8;
        self.buffer[self.len + 1..self.len + 1 + n].copy_from_slice(&token[..n]);
        self.len += 1 + n;
        Ok(1 + n)
    }

    pub fn emit_u64(&mut self, value: u64) -> Result<usize, Error> {
        self.emit_integer_token(0x00, value)
    }

    pub fn emit_i64(&mut self, value: i64) -> Result<usize, Error> {
        if value >= 0 {
            self.emit_integer_token(0x00, value as u64)
        } else {
            self.emit_integer_token(0x20, !value as u64)
        }
    }

    pub fn emit_bytes(&mut self, value: &[u8]) -> Result<usize, Error> {
        self.require(size_of::byte_string(value.len()))?;
        let head = self.emit_integer_token(0x40, value.len() as u64)?;
        self.buffer[self.len..self.len + value.len()].copy_from_slice(value);
        self.len += value.len();
        Ok(head + value.len())
    }

    pub fn emit_str(&mut self, value: &str) -> Result<usize, Error> {
        self.require(size_of::utf8_string(value.len()))?;
        let head = self.emit_integer_token(0x60, value.len() as u64)?;
        self.buffer[self.len..self.len + value.len()].copy_from_slice(value.as_bytes());
        self.len += value.len();
        Ok(head + value.len())
    }

    /// Header of a SequenceValue whose encoded items occupy `payload_size`
    /// bytes; the caller emits the items afterwards.
    pub fn emit_sequence_header(&mut self, payload_size: usize) -> Result<usize, Error> {
        self.emit_integer_token(0x80, payload_size as u64)
    }

    /// Header of a DictionaryValue whose encoded key/value pairs occupy
    /// `payload_size` bytes; the caller emits the pairs afterwards.
    pub fn emit_dictionary_header(&mut self, payload_size: usize) -> Result<usize, Error> {
        self.emit_integer_token(0xA0, payload_size as u64)
    }

    /// Header of an AllocatedValue of `payload_size` bytes, `1..`.
    pub fn emit_allocated_header(&mut self, payload_size: usize) -> Result<usize, Error> {
        if payload_size == 0 {
            return Err(Error::OutOfRange);
        }
        let mut token = [0u8; 8];
        let n = encoding::encode_natural(payload_size as u64, &mut token)?;
        self.require(1 + n)?;
        self.buffer[self.len] = 0xC0 | (n - 1) as u8;
        self.buffer[self.len + 1..self.len + 1 + n].copy_from_slice(&token[..n]);
        self.len += 1 + n;
        Ok(1 + n)
    }

    pub fn emit_none(&mut self) -> Result<usize, Error> {
        self.emit_byte(0xFF)
    }

    pub fn emit_minus_zero(&mut self) -> Result<usize, Error> {
        self.emit_byte(0xFC)
    }

    pub fn emit_minus_infinity(&mut self) -> Result<usize, Error> {
        self.emit_byte(0xFD)
    }

    pub fn emit_infinity(&mut self) -> Result<usize, Error> {
        self.emit_byte(0xFE)
    }

    /// Encodes a floating-point number in its smallest exact form: the
    /// one-byte tokens for ±0 and ±∞, None for NaN, otherwise the
    /// BinaryRationalValue with the least `k` that holds exponent and
    /// mantissa.
    pub fn emit_f64(&mut self, value: f64) -> Result<usize, Error> {
        if value.is_nan() {
            return self.emit_none();
        }
        if value.is_infinite() {
            return self.emit_byte(if value < 0.0 { 0xFD } else { 0xFE });
        }
        if value == 0.0 {
            return self.emit_byte(if value.is_sign_negative() { 0xFC } else { 0x00 });
        }
        let (k, token) = binary_rational_token(value.to_bits());
        self.require(2 + k)?;
        self.buffer[self.len] = 0xC8 | k as u8;
        for (i, slot) in self.buffer[self.len + 1..self.len + 2 + k].iter_mut().enumerate() {
            *slot = (token >> (8 * i)) as u8;
        }
        self.len += 2 + k;
        Ok(2 + k)
    }

    pub fn emit_f32(&mut self, value: f32) -> Result<usize, Error> {
        self.emit_f64(value as f64)
    }

    pub fn emit<T: ToValue>(&mut self, value: T) -> Result<usize, Error> {
        value.to_value(self)
    }
}

// Least k whose exponent range and mantissa width hold the (finite,
// non-zero) binary64 number, and the token bits for it.
fn binary_rational_token(bits: u64) -> (usize, u64) {
    let sign = bits >> 63;
    let exponent = ((bits >> 52) & 0x7FF) as i64;
    let mantissa = bits & 0xF_FFFF_FFFF_FFFF;

    if exponent == 0 {
        // subnormal; only the full binary64 image holds it
        return (7, bits);
    }
    let e = exponent - 1023;
    for (k, &(r, p)) in RATIONAL_LAYOUT.iter().enumerate().take(7) {
        let bias = (1i64 << (r - 1)) - 1;
        if e < -bias || e > bias + 1 {
            continue;
        }
        if mantissa & ((1u64 << (52 - p)) - 1) != 0 {
            continue;
        }
        let token = (sign << (8 * (k + 1) - 1))
            | (((e + bias) as u64) << p)
            | (mantissa >> (52 - p));
        return (k, token);
    }
    (7, bits)
}

/// Host types an [`Encoder`] emits via [`Encoder::emit`].
pub trait ToValue {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error>;
}

impl ToValue for u64 {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        encoder.emit_u64(self)
    }
}

impl ToValue for u32 {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        encoder.emit_u64(self as u64)
    }
}

impl ToValue for u16 {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        encoder.emit_u64(self as u64)
    }
}

impl ToValue for u8 {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        encoder.emit_u64(self as u64)
    }
}

impl ToValue for i64 {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        encoder.emit_i64(self)
    }
}

impl ToValue for i32 {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        encoder.emit_i64(self as i64)
    }
}

impl ToValue for i16 {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        encoder.emit_i64(self as i64)
    }
}

impl ToValue for i8 {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        encoder.emit_i64(self as i64)
    }
}

impl ToValue for f64 {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        encoder.emit_f64(self)
    }
}

impl ToValue for f32 {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        encoder.emit_f32(self)
    }
}

impl ToValue for &[u8] {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        encoder.emit_bytes(self)
    }
}

impl<const N: usize> ToValue for &[u8; N] {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        encoder.emit_bytes(self)
    }
}

impl ToValue for &str {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        encoder.emit_str(self)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(self, encoder: &mut Encoder) -> Result<usize, Error> {
        match self {
            Some(value) => encoder.emit(value),
            None => encoder.emit_none(),
        }
    }
}
