#![no_std]

#[cfg(test)]
extern crate std;

pub mod encode;
pub mod encoding;
pub mod result;
pub mod sequence;
pub mod size_of;
pub mod string;
pub mod value;

pub use encode::{Encoder, ToValue};
pub use encoding::Error;
pub use result::{ResultCode, ResultCodes};
pub use sequence::ValueSequence;
pub use string::Utf8Str;
pub use value::{Decimal, FromValue, Value, ValueKind};




#[cfg(test)]
mod sequence_tests;
