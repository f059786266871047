/*!
Classification of a CBOR leading byte.

The top 3 bits of every item's leading byte carry the [`MajorType`], the bottom
5 bits carry the [`AdditionalInfo`]. For major type 7 the same 5 bits are read
as a [`SpecialType`].
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MajorType {
    UnsignedInteger = 0,
    NegativeInteger = 1,
    ByteString = 2,
    TextString = 3,
    Array = 4,
    Map = 5,
    Tag = 6,
    Special = 7,
}

impl MajorType {
    pub fn from_byte(byte: u8) -> Self {
        match (byte >> 5) & 0x7 {
            0 => Self::UnsignedInteger,
            1 => Self::NegativeInteger,
            2 => Self::ByteString,
            3 => Self::TextString,
            4 => Self::Array,
            5 => Self::Map,
            6 => Self::Tag,
            _ => Self::Special,
        }
    }

    /// The major type shifted into bits 7-5, ready to be OR'd with the additional information.
    pub const fn overlay(self) -> u8 {
        (self as u8) << 5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdditionalInfo {
    /// Argument 0..=23 held in the leading byte itself
    Direct(u8),
    OneByte,
    TwoBytes,
    FourBytes,
    EightBytes,
    /// 28..=30, not well-formed
    Reserved(u8),
    Indefinite,
}

impl AdditionalInfo {
    pub fn from_byte(byte: u8) -> Self {
        match byte & 0x1F {
            v @ 0..=23 => Self::Direct(v),
            24 => Self::OneByte,
            25 => Self::TwoBytes,
            26 => Self::FourBytes,
            27 => Self::EightBytes,
            31 => Self::Indefinite,
            v => Self::Reserved(v),
        }
    }

    /// Number of argument bytes following the leading byte.
    ///
    /// Returns `None` for reserved and indefinite values, which carry no
    /// usable argument in this subset.
    pub fn argument_len(self) -> Option<usize> {
        match self {
            Self::Direct(_) => Some(0),
            Self::OneByte => Some(1),
            Self::TwoBytes => Some(2),
            Self::FourBytes => Some(4),
            Self::EightBytes => Some(8),
            Self::Reserved(_) | Self::Indefinite => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialType {
    /// Simple values 0..=19 and 22..=23 (null, undefined)
    Simple(u8),
    False,
    True,
    SimpleNextByte,
    HalfFloat,
    SingleFloat,
    DoubleFloat,
    Unallocated(u8),
    Break,
}

impl SpecialType {
    /// Only meaningful when `MajorType::from_byte(byte)` is [`MajorType::Special`].
    pub fn from_byte(byte: u8) -> Self {
        match byte & 0x1F {
            20 => Self::False,
            21 => Self::True,
            v @ 0..=23 => Self::Simple(v),
            24 => Self::SimpleNextByte,
            25 => Self::HalfFloat,
            26 => Self::SingleFloat,
            27 => Self::DoubleFloat,
            31 => Self::Break,
            v => Self::Unallocated(v),
        }
    }
}

pub(crate) const FALSE: u8 = MajorType::Special.overlay() | 20;
pub(crate) const TRUE: u8 = MajorType::Special.overlay() | 21;
pub(crate) const SINGLE_FLOAT: u8 = MajorType::Special.overlay() | 26;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn major_types() {
        assert_eq!(MajorType::from_byte(0x00), MajorType::UnsignedInteger);
        assert_eq!(MajorType::from_byte(0x3b), MajorType::NegativeInteger);
        assert_eq!(MajorType::from_byte(0x40), MajorType::ByteString);
        assert_eq!(MajorType::from_byte(0x7f), MajorType::TextString);
        assert_eq!(MajorType::from_byte(0x98), MajorType::Array);
        assert_eq!(MajorType::from_byte(0xa1), MajorType::Map);
        assert_eq!(MajorType::from_byte(0xc0), MajorType::Tag);
        assert_eq!(MajorType::from_byte(0xff), MajorType::Special);

        for byte in 0..=u8::MAX {
            assert_eq!(MajorType::from_byte(byte).overlay(), byte & 0xE0);
        }
    }

    #[test]
    fn additional_info() {
        assert_eq!(AdditionalInfo::from_byte(0x17), AdditionalInfo::Direct(23));
        assert_eq!(AdditionalInfo::from_byte(0x18), AdditionalInfo::OneByte);
        assert_eq!(AdditionalInfo::from_byte(0x39), AdditionalInfo::TwoBytes);
        assert_eq!(AdditionalInfo::from_byte(0x5a), AdditionalInfo::FourBytes);
        assert_eq!(AdditionalInfo::from_byte(0x7b), AdditionalInfo::EightBytes);
        assert_eq!(AdditionalInfo::from_byte(0x1c), AdditionalInfo::Reserved(28));
        assert_eq!(AdditionalInfo::from_byte(0x1e), AdditionalInfo::Reserved(30));
        assert_eq!(AdditionalInfo::from_byte(0x9f), AdditionalInfo::Indefinite);

        assert_eq!(AdditionalInfo::Direct(5).argument_len(), Some(0));
        assert_eq!(AdditionalInfo::EightBytes.argument_len(), Some(8));
        assert_eq!(AdditionalInfo::Reserved(29).argument_len(), None);
        assert_eq!(AdditionalInfo::Indefinite.argument_len(), None);
    }

    #[test]
    fn special_types() {
        assert_eq!(SpecialType::from_byte(FALSE), SpecialType::False);
        assert_eq!(SpecialType::from_byte(TRUE), SpecialType::True);
        assert_eq!(SpecialType::from_byte(0xf6), SpecialType::Simple(22));
        assert_eq!(SpecialType::from_byte(0xf0), SpecialType::Simple(16));
        assert_eq!(SpecialType::from_byte(0xf8), SpecialType::SimpleNextByte);
        assert_eq!(SpecialType::from_byte(0xf9), SpecialType::HalfFloat);
        assert_eq!(SpecialType::from_byte(SINGLE_FLOAT), SpecialType::SingleFloat);
        assert_eq!(SpecialType::from_byte(0xfb), SpecialType::DoubleFloat);
        assert_eq!(SpecialType::from_byte(0xfd), SpecialType::Unallocated(29));
        assert_eq!(SpecialType::from_byte(0xff), SpecialType::Break);
    }
}
