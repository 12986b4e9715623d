//! Result codes of decode operations and the packed set they combine into.
//!
//! Every getter reports one [`ResultCode`]; codes from several getters are
//! combined with `|` into a [`ResultCodes`] set and checked in one place:
//!
//! ```
//! use dbor::Value;
//!
//! let buffer = [0x05, 0x18, 0x00];
//! let (r1, a) = Value::new(&buffer).get::<u32>();
//! let (r2, b) = Value::new(&buffer[1..]).get::<u32>();
//! assert!((r1 | r2).is_ok());
//! assert_eq!((a, b), (5, 24));
//! ```

use bitflags::bitflags;

/// Outcome of a single operation, ordered by severity (`Ok` least severe,
/// `Incomplete` most severe). The discriminants are the bit positions used
/// by [`ResultCodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ResultCode {
    #[default]
    Ok = 0,
    ApproxImprecise = 1 << 0,
    ApproxExtreme = 1 << 1,
    Range = 1 << 2,
    NoObject = 1 << 3,
    Incompatible = 1 << 4,
    Unsupported = 1 << 5,
    Illformed = 1 << 6,
    Incomplete = 1 << 7,
}

impl ResultCode {
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    pub fn is_approx(self) -> bool {
        matches!(self, Self::ApproxImprecise | Self::ApproxExtreme)
    }

    pub fn is_ok_except(self, exceptions: ResultCodes) -> bool {
        ResultCodes::from(self).is_ok_except(exceptions)
    }
}

bitflags! {
    /// Set of "not ok" result codes; [`ResultCode::Ok`] is the empty set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResultCodes: u8 {
        const APPROX_IMPRECISE = 1 << 0;
        const APPROX_EXTREME = 1 << 1;
        const RANGE = 1 << 2;
        const NO_OBJECT = 1 << 3;
        const INCOMPATIBLE = 1 << 4;
        const UNSUPPORTED = 1 << 5;
        const ILLFORMED = 1 << 6;
        const INCOMPLETE = 1 << 7;
    }
}

impl From<ResultCode> for ResultCodes {
    fn from(code: ResultCode) -> Self {
        Self::from_bits_retain(code as u8)
    }
}

impl ResultCodes {
    pub fn is_ok(self) -> bool {
        self.is_empty()
    }

    /// Is the set empty once every code in `exceptions` is removed?
    pub fn is_ok_except(self, exceptions: Self) -> bool {
        (self - exceptions).is_empty()
    }

    /// Non-empty and contains approximation codes only?
    pub fn is_approx(self) -> bool {
        !self.is_empty() && (self - (Self::APPROX_IMPRECISE | Self::APPROX_EXTREME)).is_empty()
    }

    /// The least severe member, or [`ResultCode::Ok`] for the empty set.
    pub fn least_severe(self) -> ResultCode {
        match self.bits() & self.bits().wrapping_neg() {
            0 => ResultCode::Ok,
            0x01 => ResultCode::ApproxImprecise,
            0x02 => ResultCode::ApproxExtreme,
            0x04 => ResultCode::Range,
            0x08 => ResultCode::NoObject,
            0x10 => ResultCode::Incompatible,
            0x20 => ResultCode::Unsupported,
            0x40 => ResultCode::Illformed,
            _ => ResultCode::Incomplete,
        }
    }

    /// Iterates over the members, least severe first.
    pub fn codes(self) -> Codes {
        Codes(self)
    }
}

pub struct Codes(ResultCodes);

impl Iterator for Codes {
    type Item = ResultCode;

    fn next(&mut self) -> Option<ResultCode> {
        if self.0.is_empty() {
            return None;
        }
        let code = self.0.least_severe();
        self.0.remove(ResultCodes::from(code));
        Some(code)
    }
}

impl core::ops::BitOr for ResultCode {
    type Output = ResultCodes;

    fn bitor(self, rhs: Self) -> ResultCodes {
        ResultCodes::from(self) | ResultCodes::from(rhs)
    }
}

impl core::ops::BitOr<ResultCodes> for ResultCode {
    type Output = ResultCodes;

    fn bitor(self, rhs: ResultCodes) -> ResultCodes {
        ResultCodes::from(self) | rhs
    }
}

impl core::ops::BitOr<ResultCode> for ResultCodes {
    type Output = ResultCodes;

    fn bitor(self, rhs: ResultCode) -> ResultCodes {
        self | ResultCodes::from(rhs)
    }
}

impl core::ops::BitOrAssign<ResultCode> for ResultCodes {
    fn bitor_assign(&mut self, rhs: ResultCode) {
        *self |= ResultCodes::from(rhs);
    }
}
