// This module re-exports handlers for each kernel operation.

pub mod fill_op;
pub use fill_op::FillKernel;
