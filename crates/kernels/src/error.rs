use crate::dtype::DType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("shape mismatch: requested {requested:?}, output is {actual:?}")]
    ShapeMismatch { requested: Vec<i64>, actual: Vec<usize> },
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: DType, got: DType },
    #[error("unsupported dims type {0}, expected i8, i16, i32 or i64")]
    UnsupportedDimsType(DType),
    #[error("dims tensor must have rank 0 or 1, got rank {0}")]
    InvalidDimsRank(usize),
    #[error("value tensor must hold exactly one element, got {0}")]
    ValueNotScalar(usize),
    #[error("{kernel} expects {expected_inputs} inputs and {expected_outputs} outputs, got {inputs} and {outputs}")]
    ArityMismatch {
        kernel: &'static str,
        expected_inputs: usize,
        expected_outputs: usize,
        inputs: usize,
        outputs: usize,
    },
    #[error("no tensor bound at {role} position {index}")]
    MissingTensor { role: &'static str, index: usize },
    #[error("output tensor {0} aliases an input tensor")]
    AliasedOutput(usize),
    #[error("invalid buffer: {0}")]
    InvalidBuffer(&'static str),
    #[error("unsupported element width of {0} bytes")]
    UnsupportedElementWidth(usize),
    #[error("invoke called before a successful prepare")]
    NotPrepared,
}

/// Failure of one phase of the two-phase kernel protocol.
///
/// A `Prepare` failure means the graph is statically invalid; an `Invoke`
/// failure happened while writing outputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    #[error("prepare failed: {0}")]
    Prepare(#[source] KernelError),
    #[error("invoke failed: {0}")]
    Invoke(#[source] KernelError),
}

impl RunnerError {
    #[must_use]
    pub fn kernel_error(&self) -> &KernelError {
        match self {
            RunnerError::Prepare(err) | RunnerError::Invoke(err) => err,
        }
    }
}
