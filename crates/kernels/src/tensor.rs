//! Tensor descriptors.
//!
//! A [`Tensor`] owns a byte buffer whose length is fixed when the tensor is
//! created: `product(shape) * dtype.size_in_bytes()`. Nothing in this crate
//! grows or shrinks it. Kernels only ever see borrowed [`TensorView`]s and
//! [`TensorViewMut`]s.

use crate::dtype::{DType, Element};
use crate::error::KernelError;

/// Number of elements described by `shape`. An empty shape is a scalar.
///
/// Only shapes already accepted by [`byte_size`] reach this, so the product
/// cannot overflow.
fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Bytes needed for `shape` elements of `dtype`, or `None` on overflow.
#[must_use]
pub fn byte_size(dtype: DType, shape: &[usize]) -> Option<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))?
        .checked_mul(dtype.size_in_bytes())
}

fn check_buffer(dtype: DType, shape: &[usize], len: usize) -> Result<(), KernelError> {
    let expected_bytes =
        byte_size(dtype, shape).ok_or(KernelError::InvalidBuffer("buffer size overflows usize"))?;
    if len != expected_bytes {
        return Err(KernelError::InvalidBuffer(
            "buffer length does not match product of shape dimensions and element size",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    dtype: DType,
    shape: Vec<usize>,
    data: Vec<u8>,
}

impl Tensor {
    /// Wraps `data` as a tensor of `dtype` and `shape`.
    ///
    /// # Errors
    /// Returns [`KernelError::InvalidBuffer`] if the byte length does not
    /// match the shape and element size.
    pub fn new(dtype: DType, shape: Vec<usize>, data: Vec<u8>) -> Result<Self, KernelError> {
        check_buffer(dtype, &shape, data.len())?;
        Ok(Self { dtype, shape, data })
    }

    /// Allocates a zeroed tensor, the way a memory planner would hand one out.
    ///
    /// # Errors
    /// Returns [`KernelError::InvalidBuffer`] if the byte size overflows.
    pub fn zeros(dtype: DType, shape: Vec<usize>) -> Result<Self, KernelError> {
        let bytes = byte_size(dtype, &shape)
            .ok_or(KernelError::InvalidBuffer("buffer size overflows usize"))?;
        Self::new(dtype, shape, vec![0u8; bytes])
    }

    /// # Errors
    /// Returns [`KernelError::InvalidBuffer`] if `values` does not hold
    /// exactly `product(shape)` elements.
    pub fn from_slice<T: Element>(shape: Vec<usize>, values: &[T]) -> Result<Self, KernelError> {
        Self::new(T::DTYPE, shape, bytemuck::cast_slice(values).to_vec())
    }

    /// A rank-0 tensor holding `value`.
    #[must_use]
    pub fn scalar<T: Element>(value: T) -> Self {
        Self {
            dtype: T::DTYPE,
            shape: Vec::new(),
            data: bytemuck::bytes_of(&value).to_vec(),
        }
    }

    #[must_use]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        element_count(&self.shape)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Copies the elements out as `T`.
    ///
    /// # Errors
    /// Returns [`KernelError::TypeMismatch`] if `T` is not the tensor's dtype.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>, KernelError> {
        self.view().to_vec()
    }

    #[must_use]
    pub fn view(&self) -> TensorView<'_> {
        TensorView {
            dtype: self.dtype,
            shape: &self.shape,
            data: &self.data,
        }
    }

    pub fn view_mut(&mut self) -> TensorViewMut<'_> {
        TensorViewMut {
            shape: &self.shape,
            data: &mut self.data,
        }
    }
}

/// Read-only borrow of a tensor for the duration of a kernel call.
#[derive(Debug, Clone, Copy)]
pub struct TensorView<'a> {
    dtype: DType,
    shape: &'a [usize],
    data: &'a [u8],
}

impl<'a> TensorView<'a> {
    #[must_use]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[must_use]
    pub fn shape(&self) -> &'a [usize] {
        self.shape
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        element_count(self.shape)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// # Errors
    /// Returns [`KernelError::TypeMismatch`] if `T` is not the view's dtype.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>, KernelError> {
        if T::DTYPE != self.dtype {
            return Err(KernelError::TypeMismatch {
                expected: self.dtype,
                got: T::DTYPE,
            });
        }
        Ok(self
            .data
            .chunks_exact(std::mem::size_of::<T>())
            .map(bytemuck::pod_read_unaligned)
            .collect())
    }
}

/// Writable borrow of a tensor. The buffer length cannot change through it.
#[derive(Debug)]
pub struct TensorViewMut<'a> {
    shape: &'a [usize],
    data: &'a mut [u8],
}

impl TensorViewMut<'_> {
    #[must_use]
    pub fn element_count(&self) -> usize {
        element_count(self.shape)
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }
}
