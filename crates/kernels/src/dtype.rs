use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Element type tag carried by every tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// One byte per element, zero is `false`.
    Bool,
}

impl DType {
    pub const ALL: [DType; 11] = [
        DType::I8,
        DType::I16,
        DType::I32,
        DType::I64,
        DType::U8,
        DType::U16,
        DType::U32,
        DType::U64,
        DType::F32,
        DType::F64,
        DType::Bool,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
        }
    }

    #[must_use]
    pub const fn size_in_bytes(&self) -> usize {
        match self {
            Self::I8 | Self::U8 | Self::Bool => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown dtype `{0}`")]
pub struct ParseDTypeError(String);

impl FromStr for DType {
    type Err = ParseDTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        DType::ALL
            .into_iter()
            .find(|dtype| dtype.as_str() == lowered)
            .ok_or(ParseDTypeError(lowered))
    }
}

/// Rust scalar types that can be stored in a tensor buffer.
pub trait Element: bytemuck::Pod + PartialEq + fmt::Debug {
    const DTYPE: DType;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;
            }
        )*
    };
}

impl_element!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_rust_types() {
        assert_eq!(DType::I8.size_in_bytes(), std::mem::size_of::<i8>());
        assert_eq!(DType::I16.size_in_bytes(), std::mem::size_of::<i16>());
        assert_eq!(DType::I32.size_in_bytes(), std::mem::size_of::<i32>());
        assert_eq!(DType::I64.size_in_bytes(), std::mem::size_of::<i64>());
        assert_eq!(DType::U64.size_in_bytes(), std::mem::size_of::<u64>());
        assert_eq!(DType::F32.size_in_bytes(), std::mem::size_of::<f32>());
        assert_eq!(DType::F64.size_in_bytes(), std::mem::size_of::<f64>());
        assert_eq!(DType::Bool.size_in_bytes(), 1);
    }

    #[test]
    fn parses_short_names() {
        for dtype in DType::ALL {
            assert_eq!(dtype.as_str().parse::<DType>(), Ok(dtype));
        }
        assert_eq!(" F32 ".parse::<DType>(), Ok(DType::F32));
        assert!("float128".parse::<DType>().is_err());
    }

    #[test]
    fn parse_error_names_the_input() {
        let err = "Complex64".parse::<DType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown dtype `complex64`");
    }
}
