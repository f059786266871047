use super::layout::{self, AdditionalInfo, MajorType, SpecialType};
use alloc::{string::String, vec::Vec};
use num_traits::FromPrimitive;
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Not enough data for encoded value: {needed} bytes required at offset {offset}, buffer length {len}")]
    NotEnoughData {
        len: usize,
        offset: usize,
        needed: usize,
    },

    #[error("Incorrect type {byte:#04x} at offset {offset}")]
    IncorrectType { offset: usize, byte: u8 },

    #[error("Integer at offset {offset} does not fit the requested type")]
    IntegerOverflow { offset: usize },

    #[error("Invalid UTF-8 in text string at offset {offset}: {source}")]
    InvalidUtf8 {
        offset: usize,
        #[source]
        source: core::str::Utf8Error,
    },
}

pub trait FromCbor<'a>: Sized {
    fn from_cbor(decoder: &mut Decoder<'a>) -> Result<Self, Error>;
}

/// A read cursor over an immutable CBOR buffer.
///
/// Every `decode_*` call either consumes exactly one item (or header) and
/// advances the offset past it, or fails and leaves the offset untouched.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_offset(data, 0)
    }

    pub fn with_offset(data: &'a [u8], offset: usize) -> Self {
        Self { data, offset }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    fn not_enough_data(&self, needed: usize) -> Error {
        Error::NotEnoughData {
            len: self.data.len(),
            offset: self.offset,
            needed,
        }
    }

    fn incorrect_type(&self, byte: u8) -> Error {
        Error::IncorrectType {
            offset: self.offset,
            byte,
        }
    }

    fn integer_overflow(&self) -> Error {
        Error::IntegerOverflow {
            offset: self.offset,
        }
    }

    /// Borrow `len` bytes starting `skip` bytes past the current offset
    fn read(&self, skip: usize, len: usize) -> Result<&'a [u8], Error> {
        let needed = skip.saturating_add(len);
        match self.offset.checked_add(needed) {
            Some(end) if end <= self.data.len() => Ok(&self.data[self.offset + skip..end]),
            _ => Err(self.not_enough_data(needed)),
        }
    }

    fn read_array<const N: usize>(&self, skip: usize) -> Result<[u8; N], Error> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read(skip, N)?);
        Ok(buf)
    }

    fn leading(&self) -> Result<u8, Error> {
        self.read(0, 1).map(|b| b[0])
    }

    /// Decode the argument of the item at the current offset, returning it
    /// along with the total header length
    fn parse_uint_minor(&self, leading: u8) -> Result<(u64, usize), Error> {
        match AdditionalInfo::from_byte(leading) {
            AdditionalInfo::Direct(val) => Ok((val as u64, 1)),
            AdditionalInfo::OneByte => Ok((self.read_array::<1>(1)?[0] as u64, 2)),
            AdditionalInfo::TwoBytes => Ok((u16::from_be_bytes(self.read_array(1)?) as u64, 3)),
            AdditionalInfo::FourBytes => Ok((u32::from_be_bytes(self.read_array(1)?) as u64, 5)),
            AdditionalInfo::EightBytes => Ok((u64::from_be_bytes(self.read_array(1)?), 9)),
            AdditionalInfo::Reserved(_) | AdditionalInfo::Indefinite => {
                Err(self.incorrect_type(leading))
            }
        }
    }

    fn parse_header(&self, major: MajorType) -> Result<(u64, usize), Error> {
        let leading = self.leading()?;
        if MajorType::from_byte(leading) != major {
            return Err(self.incorrect_type(leading));
        }
        self.parse_uint_minor(leading)
    }

    fn parse_u64(&self) -> Result<(u64, usize), Error> {
        self.parse_header(MajorType::UnsignedInteger)
    }

    fn parse_i64(&self) -> Result<(i64, usize), Error> {
        let leading = self.leading()?;
        match MajorType::from_byte(leading) {
            MajorType::UnsignedInteger => {
                let (val, len) = self.parse_uint_minor(leading)?;
                let val = i64::from_u64(val).ok_or_else(|| self.integer_overflow())?;
                Ok((val, len))
            }
            MajorType::NegativeInteger => {
                let (val, len) = self.parse_uint_minor(leading)?;
                let val = i64::from_u64(val).ok_or_else(|| self.integer_overflow())?;
                Ok((-1i64 - val, len))
            }
            _ => Err(self.incorrect_type(leading)),
        }
    }

    fn parse_f32(&self) -> Result<(f32, usize), Error> {
        let leading = self.leading()?;
        if leading != layout::SINGLE_FLOAT {
            return Err(self.incorrect_type(leading));
        }
        Ok((f32::from_be_bytes(self.read_array(1)?), 5))
    }

    fn parse_bool(&self) -> Result<(bool, usize), Error> {
        match self.leading()? {
            layout::FALSE => Ok((false, 1)),
            layout::TRUE => Ok((true, 1)),
            leading => Err(self.incorrect_type(leading)),
        }
    }

    fn parse_data(&self, major: MajorType) -> Result<(&'a [u8], usize), Error> {
        let (data_len, len) = self.parse_header(major)?;
        if data_len == 0 {
            let empty: &'a [u8] = &[];
            return Ok((empty, len));
        }
        let data_len = usize::from_u64(data_len).ok_or_else(|| self.integer_overflow())?;
        let data = self.read(len, data_len)?;
        Ok((data, len + data_len))
    }

    fn parse_text(&self) -> Result<(&'a str, usize), Error> {
        let (data, len) = self.parse_data(MajorType::TextString)?;
        let s = core::str::from_utf8(data).map_err(|source| Error::InvalidUtf8 {
            offset: self.offset,
            source,
        })?;
        Ok((s, len))
    }

    fn parse_count(&self, major: MajorType) -> Result<(usize, usize), Error> {
        let (count, len) = self.parse_header(major)?;
        let count = usize::from_u64(count).ok_or_else(|| self.integer_overflow())?;
        Ok((count, len))
    }

    fn commit<T>(&mut self, parsed: Result<(T, usize), Error>) -> Result<T, Error> {
        match parsed {
            Ok((value, len)) => {
                self.offset += len;
                Ok(value)
            }
            Err(e) => {
                trace!(offset = self.offset, "Rejected CBOR item: {e}");
                Err(e)
            }
        }
    }

    /// Classify the next item without consuming it
    pub fn peek(&self) -> Result<(MajorType, AdditionalInfo), Error> {
        let leading = self.leading()?;
        Ok((
            MajorType::from_byte(leading),
            AdditionalInfo::from_byte(leading),
        ))
    }

    /// Classify the next item as a special value; `None` if it has another major type
    pub fn peek_special(&self) -> Result<Option<SpecialType>, Error> {
        let leading = self.leading()?;
        Ok((MajorType::from_byte(leading) == MajorType::Special)
            .then(|| SpecialType::from_byte(leading)))
    }

    pub fn decode<T>(&mut self) -> Result<T, Error>
    where
        T: FromCbor<'a>,
    {
        T::from_cbor(self)
    }

    pub fn decode_u64(&mut self) -> Result<u64, Error> {
        let parsed = self.parse_u64();
        self.commit(parsed)
    }

    pub fn decode_u32(&mut self) -> Result<u32, Error> {
        let parsed = self.parse_u64().and_then(|(val, len)| {
            u32::from_u64(val)
                .map(|val| (val, len))
                .ok_or_else(|| self.integer_overflow())
        });
        self.commit(parsed)
    }

    pub fn decode_i64(&mut self) -> Result<i64, Error> {
        let parsed = self.parse_i64();
        self.commit(parsed)
    }

    pub fn decode_i32(&mut self) -> Result<i32, Error> {
        let parsed = self.parse_i64().and_then(|(val, len)| {
            i32::from_i64(val)
                .map(|val| (val, len))
                .ok_or_else(|| self.integer_overflow())
        });
        self.commit(parsed)
    }

    pub fn decode_f32(&mut self) -> Result<f32, Error> {
        let parsed = self.parse_f32();
        self.commit(parsed)
    }

    pub fn decode_bool(&mut self) -> Result<bool, Error> {
        let parsed = self.parse_bool();
        self.commit(parsed)
    }

    /// Decode a byte string, borrowing its content from the input buffer
    pub fn decode_bytes(&mut self) -> Result<&'a [u8], Error> {
        let parsed = self.parse_data(MajorType::ByteString);
        self.commit(parsed)
    }

    /// Decode a text string, borrowing its content from the input buffer
    pub fn decode_text(&mut self) -> Result<&'a str, Error> {
        let parsed = self.parse_text();
        self.commit(parsed)
    }

    /// Decode an array header, returning the number of items that follow.
    /// The items themselves are left for the caller to decode.
    pub fn decode_array_len(&mut self) -> Result<usize, Error> {
        let parsed = self.parse_count(MajorType::Array);
        self.commit(parsed)
    }

    /// Decode a map header, returning the number of key/value pairs that follow.
    pub fn decode_map_len(&mut self) -> Result<usize, Error> {
        let parsed = self.parse_count(MajorType::Map);
        self.commit(parsed)
    }

    /// Decode an array header followed by exactly that many items, each read by `f`.
    ///
    /// On failure the offset is restored to where the array header started.
    pub fn decode_array<T, F>(&mut self, mut f: F) -> Result<Vec<T>, Error>
    where
        F: FnMut(&mut Self) -> Result<T, Error>,
    {
        let start = self.offset;
        let count = self.decode_array_len()?;

        // Every item is at least one byte long
        let mut items = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            match f(self) {
                Ok(item) => items.push(item),
                Err(e) => {
                    self.offset = start;
                    return Err(e);
                }
            }
        }
        Ok(items)
    }

    pub fn decode_f32_array(&mut self) -> Result<Vec<f32>, Error> {
        self.decode_array(Self::decode_f32)
    }
}

macro_rules! impl_from_cbor {
    ($(( $ty:ty, $method:ident )),*) => {
        $(
            impl<'a> FromCbor<'a> for $ty {
                fn from_cbor(decoder: &mut Decoder<'a>) -> Result<Self, Error> {
                    decoder.$method()
                }
            }
        )*
    };
}

impl_from_cbor!(
    (u64, decode_u64),
    (u32, decode_u32),
    (i64, decode_i64),
    (i32, decode_i32),
    (f32, decode_f32),
    (bool, decode_bool)
);

impl<'a> FromCbor<'a> for &'a [u8] {
    fn from_cbor(decoder: &mut Decoder<'a>) -> Result<Self, Error> {
        decoder.decode_bytes()
    }
}

impl<'a> FromCbor<'a> for &'a str {
    fn from_cbor(decoder: &mut Decoder<'a>) -> Result<Self, Error> {
        decoder.decode_text()
    }
}

impl<'a> FromCbor<'a> for Vec<u8> {
    fn from_cbor(decoder: &mut Decoder<'a>) -> Result<Self, Error> {
        decoder.decode_bytes().map(<[u8]>::to_vec)
    }
}

impl<'a> FromCbor<'a> for String {
    fn from_cbor(decoder: &mut Decoder<'a>) -> Result<Self, Error> {
        decoder.decode_text().map(String::from)
    }
}

impl<'a> FromCbor<'a> for Vec<f32> {
    fn from_cbor(decoder: &mut Decoder<'a>) -> Result<Self, Error> {
        decoder.decode_f32_array()
    }
}

/// Decode a single `T` from the start of `data`, returning it with the number of bytes consumed
pub fn parse_detail<'a, T>(data: &'a [u8]) -> Result<(T, usize), Error>
where
    T: FromCbor<'a>,
{
    let mut decoder = Decoder::new(data);
    let value = decoder.decode()?;
    Ok((value, decoder.offset()))
}

pub fn parse<'a, T>(data: &'a [u8]) -> Result<T, Error>
where
    T: FromCbor<'a>,
{
    parse_detail(data).map(|(v, _)| v)
}
