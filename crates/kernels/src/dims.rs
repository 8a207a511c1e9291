//! Decoding of a dims tensor into the shape it requests.

use crate::dtype::DType;
use crate::error::KernelError;
use crate::tensor::TensorView;

/// Integer widths accepted for a dims tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimsEncoding {
    I8,
    I16,
    I32,
    I64,
}

impl DimsEncoding {
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            DimsEncoding::I8 => 1,
            DimsEncoding::I16 => 2,
            DimsEncoding::I32 => 4,
            DimsEncoding::I64 => 8,
        }
    }

    fn read(self, bytes: &[u8]) -> i64 {
        match self {
            DimsEncoding::I8 => i64::from(bytemuck::pod_read_unaligned::<i8>(bytes)),
            DimsEncoding::I16 => i64::from(bytemuck::pod_read_unaligned::<i16>(bytes)),
            DimsEncoding::I32 => i64::from(bytemuck::pod_read_unaligned::<i32>(bytes)),
            DimsEncoding::I64 => bytemuck::pod_read_unaligned::<i64>(bytes),
        }
    }
}

impl TryFrom<DType> for DimsEncoding {
    type Error = KernelError;

    fn try_from(dtype: DType) -> Result<Self, Self::Error> {
        match dtype {
            DType::I8 => Ok(DimsEncoding::I8),
            DType::I16 => Ok(DimsEncoding::I16),
            DType::I32 => Ok(DimsEncoding::I32),
            DType::I64 => Ok(DimsEncoding::I64),
            other => Err(KernelError::UnsupportedDimsType(other)),
        }
    }
}

/// The output shape requested by a dims tensor.
///
/// Borrows the dims bytes and decodes each dimension on access, so building
/// one never allocates. Values are kept signed: a negative dimension is
/// representable and simply never matches a real output dimension.
#[derive(Debug, Clone, Copy)]
pub struct RequestedShape<'a> {
    encoding: DimsEncoding,
    bytes: &'a [u8],
}

impl<'a> RequestedShape<'a> {
    /// Decodes `dims`. A rank-1 dims tensor of length `n` requests a rank-`n`
    /// output; a rank-0 dims tensor requests a scalar.
    ///
    /// # Errors
    /// [`KernelError::UnsupportedDimsType`] if `dims` is not a signed 8, 16,
    /// 32 or 64-bit integer tensor, [`KernelError::InvalidDimsRank`] if it
    /// has rank greater than one.
    pub fn decode(dims: &TensorView<'a>) -> Result<Self, KernelError> {
        let encoding = DimsEncoding::try_from(dims.dtype())?;
        let rank = match dims.shape() {
            [] => 0,
            [n] => *n,
            shape => return Err(KernelError::InvalidDimsRank(shape.len())),
        };
        let bytes = &dims.as_bytes()[..rank * encoding.width()];
        Ok(Self { encoding, bytes })
    }

    #[must_use]
    pub fn encoding(&self) -> DimsEncoding {
        self.encoding
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.bytes.len() / self.encoding.width()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<i64> {
        let width = self.encoding.width();
        let start = index.checked_mul(width)?;
        self.bytes
            .get(start..start.checked_add(width)?)
            .map(|chunk| self.encoding.read(chunk))
    }

    #[must_use]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = i64> + 'a {
        let encoding = self.encoding;
        let bytes: &'a [u8] = self.bytes;
        bytes
            .chunks_exact(encoding.width())
            .map(move |chunk| encoding.read(chunk))
    }

    /// True when `shape` has the same rank and the same size in every
    /// dimension.
    #[must_use]
    pub fn matches(&self, shape: &[usize]) -> bool {
        self.rank() == shape.len()
            && self
                .iter()
                .zip(shape)
                .all(|(requested, &actual)| i64::try_from(actual) == Ok(requested))
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<i64> {
        self.iter().collect()
    }
}
