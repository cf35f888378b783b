/*!
 * Process Variable Types
 * Mapping from user variable type tags to transport request types and sizes
 */

use crate::core::limits::MAX_STRING_SIZE;
use serde::{Deserialize, Serialize};

/// Type tag of a channel's user variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PvTypeTag {
    Char,
    #[serde(rename = "uchar")]
    UChar,
    Short,
    #[serde(rename = "ushort")]
    UShort,
    Int,
    #[serde(rename = "uint")]
    UInt,
    Long,
    #[serde(rename = "ulong")]
    ULong,
    Int8,
    #[serde(rename = "uint8")]
    UInt8,
    Int16,
    #[serde(rename = "uint16")]
    UInt16,
    Int32,
    #[serde(rename = "uint32")]
    UInt32,
    Float,
    Double,
    String,
}

/// Transport request type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PvType {
    Char,
    Short,
    Long,
    Float,
    Double,
    String,
    TimeChar,
    TimeShort,
    TimeLong,
    TimeFloat,
    TimeDouble,
    TimeString,
}

/// Request types and element size for one type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PvTypeInfo {
    pub tag: PvTypeTag,
    /// Name of the tag in generated C tables
    pub c_tag: &'static str,
    pub put_type: PvType,
    pub get_type: PvType,
    pub size: usize,
}

const fn info(
    tag: PvTypeTag,
    c_tag: &'static str,
    put_type: PvType,
    get_type: PvType,
    size: usize,
) -> PvTypeInfo {
    PvTypeInfo {
        tag,
        c_tag,
        put_type,
        get_type,
        size,
    }
}

static PV_TYPE_MAP: [PvTypeInfo; 17] = [
    info(PvTypeTag::Char, "P_CHAR", PvType::Char, PvType::TimeChar, 1),
    info(PvTypeTag::UChar, "P_UCHAR", PvType::Char, PvType::TimeChar, 1),
    info(PvTypeTag::Short, "P_SHORT", PvType::Short, PvType::TimeShort, 2),
    info(PvTypeTag::UShort, "P_USHORT", PvType::Short, PvType::TimeShort, 2),
    info(PvTypeTag::Int, "P_INT", PvType::Long, PvType::TimeLong, 4),
    info(PvTypeTag::UInt, "P_UINT", PvType::Long, PvType::TimeLong, 4),
    info(PvTypeTag::Long, "P_LONG", PvType::Long, PvType::TimeLong, std::mem::size_of::<std::ffi::c_long>()),
    info(PvTypeTag::ULong, "P_ULONG", PvType::Long, PvType::TimeLong, std::mem::size_of::<std::ffi::c_ulong>()),
    info(PvTypeTag::Int8, "P_INT8T", PvType::Char, PvType::TimeChar, 1),
    info(PvTypeTag::UInt8, "P_UINT8T", PvType::Char, PvType::TimeChar, 1),
    info(PvTypeTag::Int16, "P_INT16T", PvType::Short, PvType::TimeShort, 2),
    info(PvTypeTag::UInt16, "P_UINT16T", PvType::Short, PvType::TimeShort, 2),
    info(PvTypeTag::Int32, "P_INT32T", PvType::Long, PvType::TimeLong, 4),
    info(PvTypeTag::UInt32, "P_UINT32T", PvType::Long, PvType::TimeLong, 4),
    info(PvTypeTag::Float, "P_FLOAT", PvType::Float, PvType::TimeFloat, 4),
    info(PvTypeTag::Double, "P_DOUBLE", PvType::Double, PvType::TimeDouble, 8),
    info(PvTypeTag::String, "P_STRING", PvType::String, PvType::TimeString, MAX_STRING_SIZE),
];

impl PvTypeTag {
    /// Type metadata for this tag
    pub fn info(self) -> &'static PvTypeInfo {
        let entry = &PV_TYPE_MAP[self as usize];
        debug_assert_eq!(entry.tag, self);
        entry
    }

    /// Name of this tag in generated C tables
    pub fn c_tag(self) -> &'static str {
        self.info().c_tag
    }
}

impl PvType {
    /// Size of one value element
    pub const fn value_size(self) -> usize {
        match self {
            PvType::Char | PvType::TimeChar => 1,
            PvType::Short | PvType::TimeShort => 2,
            PvType::Long | PvType::TimeLong | PvType::Float | PvType::TimeFloat => 4,
            PvType::Double | PvType::TimeDouble => 8,
            PvType::String | PvType::TimeString => MAX_STRING_SIZE,
        }
    }

    /// Offset of the first value element in a transport message
    ///
    /// Time types carry status, severity and a timestamp before the value,
    /// padded so the value is naturally aligned.
    pub const fn value_offset(self) -> usize {
        match self {
            PvType::Char
            | PvType::Short
            | PvType::Long
            | PvType::Float
            | PvType::Double
            | PvType::String => 0,
            PvType::TimeChar => 15,
            PvType::TimeShort | PvType::TimeLong | PvType::TimeFloat | PvType::TimeString => 12,
            PvType::TimeDouble => 16,
        }
    }

    /// Size of a transport message carrying `count` elements
    pub const fn size_n(self, count: usize) -> usize {
        self.value_offset() + count * self.value_size()
    }
}
