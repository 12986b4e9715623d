#![cfg(test)]
use super::result::ResultCode;
use super::sequence::*;
use hex_literal::hex;

#[test]
fn empty_buffer_is_at_end() {
    let values = ValueSequence::new(&[]);
    assert!(values.is_empty());
    let mut iter = values.iter();
    assert!(iter.is_at_end());
    assert_eq!(0, iter.remaining_size());
    assert!(iter.front().is_empty());
    assert!(iter.next().is_none());
}

#[test]
fn end_iterators_are_equal() {
    assert_eq!(Iter::default(), Iter::default());
    assert_eq!(Iter::new(&[]), Iter::default());
    assert_eq!(Iter::new(&b"x"[..0]), Iter::new(&b"y"[..0]));

    let buffer = hex!("FF");
    assert_ne!(Iter::new(&buffer), Iter::default());
}

#[test]
fn iterates_over_wellformed_values() {
    let buffer = hex!("FF 18 00 A0");
    let values = ValueSequence::new(&buffer);
    assert!(!values.is_empty());

    let mut iter = values.iter();
    assert_eq!(values.iter(), iter);
    assert_eq!(3, iter.remaining_size());
    assert!(!iter.is_at_end());

    let v = iter.next().unwrap();
    assert_eq!(&buffer[..1], v.bytes());
    assert!(v.is_none());

    let v = iter.next().unwrap();
    assert_eq!(&buffer[1..3], v.bytes());
    assert!(v.is_number());
    assert_eq!(0, iter.remaining_size());

    let v = iter.next().unwrap();
    assert_eq!(&buffer[3..], v.bytes());
    assert!(v.is_container());

    assert!(iter.is_at_end());
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
    assert_eq!(Iter::default(), iter);
}

#[test]
fn iterates_over_incomplete_tail() {
    let buffer = hex!("18 00 A0 1F 00");
    let mut iter = ValueSequence::new(&buffer).iter();

    let v = iter.next().unwrap();
    assert_eq!(2, v.size());
    assert!(v.is_complete());

    let v = iter.next().unwrap();
    assert_eq!(1, v.size());

    let v = iter.next().unwrap();
    assert_eq!(&buffer[3..], v.bytes());
    assert!(!v.is_complete());

    assert!(iter.next().is_none());
}

#[test]
fn single_incomplete_value() {
    let buffer = hex!("1F 00");
    let mut iter = ValueSequence::new(&buffer).iter();
    assert_eq!(0, iter.remaining_size());
    assert!(!iter.is_at_end());

    let v = iter.next().unwrap();
    assert_eq!(2, v.size());
    assert!(!v.is_complete());
    assert!(iter.next().is_none());
}

#[test]
fn iterates_over_illformed_decimal_rationals() {
    // decimal rationals without a mantissa are one-byte values
    let buffer = hex!("E0 E1 E2");
    let mut iter = ValueSequence::new(&buffer).iter();
    for i in 0..3 {
        let v = iter.next().unwrap();
        assert_eq!(&buffer[i..=i], v.bytes());
    }
    assert!(iter.next().is_none());
}

#[test]
fn iterates_over_reserved_bytes() {
    let buffer = hex!("F0 FB");
    let mut iter = ValueSequence::new(&buffer).iter();
    assert_eq!(1, iter.next().unwrap().size());
    assert_eq!(1, iter.next().unwrap().size());
    assert!(iter.next().is_none());
}

#[test]
fn terminates_within_buffer_length() {
    let buffer = [0u8; 64];
    assert_eq!(64, ValueSequence::new(&buffer).iter().count());
}

#[test]
fn usable_in_for_loops() {
    let buffer = hex!("FF 0C");
    let mut n = 0;
    for v in &ValueSequence::new(&buffer) {
        assert_eq!(1, v.size());
        n += 1;
    }
    assert_eq!(2, n);
}

#[test]
fn chained_decoding_combines_result_codes() {
    let buffer = hex!("FF 0C FE");
    let mut iter = ValueSequence::new(&buffer).iter();

    let (r1, a) = iter.next().unwrap().get::<u8>();
    let (r2, b) = iter.next().unwrap().get::<u8>();
    let (r3, c) = iter.next().unwrap().get::<u8>();

    assert_eq!((0, 12, 255), (a, b, c));

    let results = r1 | r2 | r3;
    assert_eq!(ResultCode::NoObject | ResultCode::ApproxExtreme, results);
    assert!(!results.is_ok());
    assert!(results.is_ok_except(ResultCode::NoObject | ResultCode::ApproxExtreme));
    assert!(!results.is_ok_except(ResultCode::NoObject.into()));
}
