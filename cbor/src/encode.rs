use super::layout::{self, MajorType};
use alloc::{string::String, vec::Vec};

pub trait ToCbor {
    fn to_cbor(&self, encoder: &mut Encoder);
}

#[derive(Debug, Default, Clone)]
pub struct Encoder {
    data: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.data.len()
    }

    fn emit_uint_minor(&mut self, major: MajorType, val: u64) {
        let major = major.overlay();
        if val < 24 {
            self.data.push(major | (val as u8))
        } else if val <= u8::MAX as u64 {
            self.data.push(major | 24u8);
            self.data.push(val as u8)
        } else if val <= u16::MAX as u64 {
            self.data.push(major | 25u8);
            self.data.extend((val as u16).to_be_bytes())
        } else if val <= u32::MAX as u64 {
            self.data.push(major | 26u8);
            self.data.extend((val as u32).to_be_bytes())
        } else {
            self.data.push(major | 27u8);
            self.data.extend(val.to_be_bytes())
        }
    }

    fn emit_i64(&mut self, val: i64) {
        if val >= 0 {
            self.emit_uint_minor(MajorType::UnsignedInteger, val as u64);
        } else {
            // -1 - val cannot overflow for any negative i64
            self.emit_uint_minor(MajorType::NegativeInteger, (-1i64 - val) as u64);
        }
    }

    fn emit_data(&mut self, major: MajorType, data: &[u8]) {
        self.emit_uint_minor(major, data.len() as u64);
        self.data.extend_from_slice(data)
    }

    /// Append pre-encoded bytes verbatim
    pub fn emit_raw_slice(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data)
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        value.to_cbor(self)
    }

    /// Emit the header of a definite-length array of `count` items.
    ///
    /// The caller must follow it with exactly `count` item encodings; nothing
    /// checks that it does.
    pub fn emit_array_header(&mut self, count: usize) {
        self.emit_uint_minor(MajorType::Array, count as u64)
    }

    /// Emit the header of a definite-length map of `count` key/value pairs.
    pub fn emit_map_header(&mut self, count: usize) {
        self.emit_uint_minor(MajorType::Map, count as u64)
    }

    pub fn emit_slice<T>(&mut self, values: &[T])
    where
        T: ToCbor,
    {
        self.emit_array_header(values.len());
        for value in values {
            self.emit(value);
        }
    }
}

macro_rules! impl_uint_to_cbor {
    ($($ty:ty),*) => {
        $(
            impl ToCbor for $ty {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    encoder.emit_uint_minor(MajorType::UnsignedInteger, *self as u64);
                }
            }
        )*
    };
}

impl_uint_to_cbor!(u8, u16, u32, u64, usize);

macro_rules! impl_int_to_cbor {
    ($($ty:ty),*) => {
        $(
            impl ToCbor for $ty {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    encoder.emit_i64(*self as i64)
                }
            }
        )*
    };
}

impl_int_to_cbor!(i8, i16, i32, i64, isize);

impl ToCbor for f32 {
    fn to_cbor(&self, encoder: &mut Encoder) {
        /* Always single precision, never shortened to FP16 */
        encoder.data.push(layout::SINGLE_FLOAT);
        encoder.data.extend(self.to_be_bytes())
    }
}

impl ToCbor for bool {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder
            .data
            .push(if *self { layout::TRUE } else { layout::FALSE })
    }
}

impl ToCbor for str {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_data(MajorType::TextString, self.as_bytes())
    }
}

impl ToCbor for String {
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_str().to_cbor(encoder)
    }
}

impl ToCbor for [u8] {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_data(MajorType::ByteString, self)
    }
}

impl ToCbor for Vec<u8> {
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_slice().to_cbor(encoder)
    }
}

impl<const N: usize> ToCbor for [u8; N] {
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_slice().to_cbor(encoder)
    }
}

impl<T> ToCbor for &T
where
    T: ToCbor + ?Sized,
{
    fn to_cbor(&self, encoder: &mut Encoder) {
        (**self).to_cbor(encoder)
    }
}

macro_rules! impl_array_to_cbor {
    ($( $value_type:ty),*) => {
        $(
            impl ToCbor for [$value_type] {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    encoder.emit_slice(self)
                }
            }

            impl ToCbor for Vec<$value_type> {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    encoder.emit_slice(self)
                }
            }
        )*
    };
}

impl_array_to_cbor!(
    u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, bool, String, &str
);

pub fn emit<T>(value: &T) -> Vec<u8>
where
    T: ToCbor + ?Sized,
{
    let mut e = Encoder::new();
    e.emit(value);
    e.build()
}

pub fn emit_array_header(count: usize) -> Vec<u8> {
    let mut e = Encoder::new();
    e.emit_array_header(count);
    e.build()
}

pub fn emit_map_header(count: usize) -> Vec<u8> {
    let mut e = Encoder::new();
    e.emit_map_header(count);
    e.build()
}

pub fn emit_slice<T>(values: &[T]) -> Vec<u8>
where
    T: ToCbor,
{
    let mut e = Encoder::new();
    e.emit_slice(values);
    e.build()
}
