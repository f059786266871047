#![no_main]

use lean_cbor::decode::Decoder;
use libfuzzer_sys::fuzz_target;

/// A failed call must leave the offset where it was
macro_rules! try_decode {
    ($d:ident . $method:ident ()) => {{
        let before = $d.offset();
        if $d.$method().is_err() {
            assert_eq!(before, $d.offset(), stringify!($method));
        }
    }};
}

fuzz_target!(|data: &[u8]| {
    // Try every decode call at every position; none may panic
    for start in 0..data.len() {
        let mut d = Decoder::with_offset(data, start);
        let _ = d.peek();
        let _ = d.peek_special();
        try_decode!(d.decode_i64());
        try_decode!(d.decode_i32());
        try_decode!(d.decode_u64());
        try_decode!(d.decode_u32());
        try_decode!(d.decode_f32());
        try_decode!(d.decode_bool());
        try_decode!(d.decode_bytes());
        try_decode!(d.decode_text());
        try_decode!(d.decode_map_len());
        try_decode!(d.decode_f32_array());
        try_decode!(d.decode_array_len());
    }
});
