#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut steps = 0usize;
    for value in &dbor::ValueSequence::new(data) {
        assert!(value.size() >= 1);
        steps += 1;

        _ = value.get::<u8>();
        _ = value.get::<i32>();
        _ = value.get::<u64>();
        _ = value.get::<i64>();
        _ = value.get::<f32>();
        _ = value.get::<f64>();
        _ = value.get::<dbor::Decimal>();
        _ = value.get::<&[u8]>();

        let (_, string) = value.get_string(64);
        _ = string.check();
        _ = string.get_ascii(true);
    }
    assert!(steps <= data.len());
});
