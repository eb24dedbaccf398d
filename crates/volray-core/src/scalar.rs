//! Scalar sample types.
//!
//! Volume files store samples in one of ten numeric types. [`ScalarType`] is
//! the closed set of tags; [`Sample`] is implemented for the matching Rust
//! primitive so that decoding and normalization are written once, generically,
//! and dispatched once per volume through [`with_sample_type!`].

use std::fmt;
use std::str::FromStr;

use num_traits::AsPrimitive;

/// Numeric type of the samples stored in a volume file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
}

impl ScalarType {
    /// Every supported type, in header-keyword order.
    pub const ALL: [ScalarType; 10] = [
        ScalarType::Uint8,
        ScalarType::Int8,
        ScalarType::Uint16,
        ScalarType::Int16,
        ScalarType::Uint32,
        ScalarType::Int32,
        ScalarType::Uint64,
        ScalarType::Int64,
        ScalarType::Float32,
        ScalarType::Float64,
    ];

    /// Maps a `SCALARS` type keyword to its tag.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let ty = match keyword {
            "unsigned_char" => ScalarType::Uint8,
            "char" => ScalarType::Int8,
            "unsigned_short" => ScalarType::Uint16,
            "short" => ScalarType::Int16,
            "unsigned_int" => ScalarType::Uint32,
            "int" => ScalarType::Int32,
            "unsigned_long" => ScalarType::Uint64,
            "long" => ScalarType::Int64,
            "float" => ScalarType::Float32,
            "double" => ScalarType::Float64,
            _ => return None,
        };
        Some(ty)
    }

    /// The header keyword for this type.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            ScalarType::Uint8 => "unsigned_char",
            ScalarType::Int8 => "char",
            ScalarType::Uint16 => "unsigned_short",
            ScalarType::Int16 => "short",
            ScalarType::Uint32 => "unsigned_int",
            ScalarType::Int32 => "int",
            ScalarType::Uint64 => "unsigned_long",
            ScalarType::Int64 => "long",
            ScalarType::Float32 => "float",
            ScalarType::Float64 => "double",
        }
    }

    /// Size of one sample in bytes.
    #[must_use]
    pub fn size(self) -> usize {
        match self {
            ScalarType::Int8 | ScalarType::Uint8 => 1,
            ScalarType::Int16 | ScalarType::Uint16 => 2,
            ScalarType::Int32 | ScalarType::Uint32 | ScalarType::Float32 => 4,
            ScalarType::Int64 | ScalarType::Uint64 | ScalarType::Float64 => 8,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A primitive that can be stored as a volume sample.
pub trait Sample: Copy + PartialOrd + FromStr + AsPrimitive<f64> + 'static {
    /// Size in bytes.
    const SIZE: usize;

    /// Decodes a big-endian sample. `bytes` must be exactly `SIZE` long.
    fn from_be_slice(bytes: &[u8]) -> Self;

    /// Decodes a host-order sample. `bytes` must be exactly `SIZE` long.
    fn from_ne_slice(bytes: &[u8]) -> Self;

    /// Writes the sample in host order. `out` must be exactly `SIZE` long.
    fn store_ne(self, out: &mut [u8]);
}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                fn from_be_slice(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(bytes);
                    <$t>::from_be_bytes(raw)
                }

                fn from_ne_slice(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(bytes);
                    <$t>::from_ne_bytes(raw)
                }

                fn store_ne(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_sample!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

/// Runs `$body` with `$T` bound to the primitive matching a [`ScalarType`].
macro_rules! with_sample_type {
    ($ty:expr, $T:ident => $body:expr) => {
        match $ty {
            $crate::scalar::ScalarType::Int8 => {
                type $T = i8;
                $body
            }
            $crate::scalar::ScalarType::Uint8 => {
                type $T = u8;
                $body
            }
            $crate::scalar::ScalarType::Int16 => {
                type $T = i16;
                $body
            }
            $crate::scalar::ScalarType::Uint16 => {
                type $T = u16;
                $body
            }
            $crate::scalar::ScalarType::Int32 => {
                type $T = i32;
                $body
            }
            $crate::scalar::ScalarType::Uint32 => {
                type $T = u32;
                $body
            }
            $crate::scalar::ScalarType::Int64 => {
                type $T = i64;
                $body
            }
            $crate::scalar::ScalarType::Uint64 => {
                type $T = u64;
                $body
            }
            $crate::scalar::ScalarType::Float32 => {
                type $T = f32;
                $body
            }
            $crate::scalar::ScalarType::Float64 => {
                type $T = f64;
                $body
            }
        }
    };
}

pub(crate) use with_sample_type;

/// Running (min, max) over decoded sample values.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RangeAccumulator {
    min: f64,
    max: f64,
}

impl RangeAccumulator {
    pub(crate) fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// NaN samples do not take part in the range.
    pub(crate) fn push(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Returns `(0, 0)` if nothing was pushed.
    pub(crate) fn finish(self) -> (f64, f64) {
        if self.min > self.max {
            (0.0, 0.0)
        } else {
            (self.min, self.max)
        }
    }
}
