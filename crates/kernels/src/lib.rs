#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Tensor kernels for a runtime whose tensor buffers are planned ahead of
//! time and never reallocated.
//!
//! Kernels follow a two-phase protocol: [`Operator::prepare`] validates the
//! tensors the interpreter bound to the node, [`Operator::invoke`] writes the
//! outputs in place. [`KernelRunner`] drives that protocol over a set of
//! caller-owned [`Tensor`]s.

pub mod broadcast;
pub mod dims;
pub mod dtype;
pub mod error;
pub mod kernels;
pub mod layout;
pub mod operator;
pub mod runner;
pub mod tensor;

pub use broadcast::FillValue;
pub use dims::{DimsEncoding, RequestedShape};
pub use dtype::{DType, Element};
pub use error::{KernelError, RunnerError};
pub use kernels::fill_op::{FillKernel, KernelState};
pub use operator::{KernelContext, Operator};
pub use runner::KernelRunner;
pub use tensor::{Tensor, TensorView, TensorViewMut};

/// Operators known to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    Fill,
}

impl Kernel {
    /// Number of `(inputs, outputs)` the operator is registered with.
    #[must_use]
    pub const fn binding_counts(&self) -> (usize, usize) {
        layout::binding_counts(self)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Kernel::Fill => FillKernel::NAME,
        }
    }
}
