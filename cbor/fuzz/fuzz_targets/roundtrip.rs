#![no_main]

use lean_cbor::{decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (i64, u64, f32, bool, &str, &[u8])| {
    let (i, u, f, b, s, bytes) = input;

    let mut e = encode::Encoder::new();
    e.emit_array_header(6);
    e.emit(&i);
    e.emit(&u);
    e.emit(&f);
    e.emit(&b);
    e.emit(s);
    e.emit(bytes);
    let data = e.build();

    let mut d = decode::Decoder::new(&data);
    assert_eq!(d.decode_array_len().unwrap(), 6);
    assert_eq!(d.decode_i64().unwrap(), i);
    assert_eq!(d.decode_u64().unwrap(), u);
    assert_eq!(d.decode_f32().unwrap().to_bits(), f.to_bits());
    assert_eq!(d.decode_bool().unwrap(), b);
    assert_eq!(d.decode_text().unwrap(), s);
    assert_eq!(d.decode_bytes().unwrap(), bytes);
    assert!(d.is_at_end());
});
