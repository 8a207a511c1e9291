//! Replication of one scalar across an output buffer.

use crate::error::KernelError;
use crate::tensor::TensorView;

/// A fill value held as its raw bit pattern.
///
/// The width is resolved once from the value tensor's dtype; broadcasting
/// copies the bytes verbatim, so floats, signed and unsigned integers and
/// booleans of the same width all take the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillValue {
    W8(u8),
    W16(u16),
    W32(u32),
    W64(u64),
}

impl FillValue {
    /// Reads the single element of `value`.
    ///
    /// # Errors
    /// [`KernelError::ValueNotScalar`] if `value` does not hold exactly one
    /// element, [`KernelError::UnsupportedElementWidth`] for an element width
    /// other than 1, 2, 4 or 8 bytes.
    pub fn read(value: &TensorView<'_>) -> Result<Self, KernelError> {
        let count = value.element_count();
        if count != 1 {
            return Err(KernelError::ValueNotScalar(count));
        }
        Self::from_bytes(value.as_bytes())
    }

    /// # Errors
    /// [`KernelError::UnsupportedElementWidth`] unless `bytes` is 1, 2, 4 or
    /// 8 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KernelError> {
        match bytes.len() {
            1 => Ok(FillValue::W8(bytes[0])),
            2 => Ok(FillValue::W16(bytemuck::pod_read_unaligned(bytes))),
            4 => Ok(FillValue::W32(bytemuck::pod_read_unaligned(bytes))),
            8 => Ok(FillValue::W64(bytemuck::pod_read_unaligned(bytes))),
            width => Err(KernelError::UnsupportedElementWidth(width)),
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        match self {
            FillValue::W8(_) => 1,
            FillValue::W16(_) => 2,
            FillValue::W32(_) => 4,
            FillValue::W64(_) => 8,
        }
    }

    /// Writes the value into every slot of `out`, in index order.
    ///
    /// # Errors
    /// [`KernelError::InvalidBuffer`] if `out` is not a whole number of
    /// elements of this width. Nothing is written in that case.
    pub fn broadcast(&self, out: &mut [u8]) -> Result<(), KernelError> {
        if out.len() % self.width() != 0 {
            return Err(KernelError::InvalidBuffer(
                "output length is not a multiple of the fill value width",
            ));
        }
        match *self {
            FillValue::W8(v) => out.fill(v),
            FillValue::W16(v) => fill_slots(out, bytemuck::bytes_of(&v)),
            FillValue::W32(v) => fill_slots(out, bytemuck::bytes_of(&v)),
            FillValue::W64(v) => fill_slots(out, bytemuck::bytes_of(&v)),
        }
        Ok(())
    }
}

fn fill_slots(out: &mut [u8], pattern: &[u8]) {
    for slot in out.chunks_exact_mut(pattern.len()) {
        slot.copy_from_slice(pattern);
    }
}
