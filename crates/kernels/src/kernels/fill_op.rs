use crate::broadcast::FillValue;
use crate::dims::RequestedShape;
use crate::error::KernelError;
use crate::layout::{FILL_DIMS, FILL_OUTPUT, FILL_VALUE};
use crate::operator::{KernelContext, Operator};

/// Lifecycle of a kernel instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelState {
    #[default]
    Uninitialized,
    Prepared,
    Invoked,
    /// Prepare rejected the bound tensors. Terminal until prepared again.
    Failed,
}

/// Writes one scalar into every element of an output whose shape was fixed
/// before the kernel ran.
///
/// Inputs: `dims` (rank-1 signed integer tensor holding the output shape,
/// or an empty/rank-0 tensor for a scalar output) and `value` (one element).
/// Output: a tensor of the value's dtype with exactly the requested shape.
/// The output is never resized, so a mismatch fails in prepare.
#[derive(Debug, Default)]
pub struct FillKernel {
    state: KernelState,
}

impl FillKernel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> KernelState {
        self.state
    }

    fn validate(ctx: &KernelContext<'_>) -> Result<(), KernelError> {
        if ctx.num_inputs() != Self::INPUTS || ctx.num_outputs() != Self::OUTPUTS {
            return Err(KernelError::ArityMismatch {
                kernel: Self::NAME,
                expected_inputs: Self::INPUTS,
                expected_outputs: Self::OUTPUTS,
                inputs: ctx.num_inputs(),
                outputs: ctx.num_outputs(),
            });
        }
        let dims = ctx.input(FILL_DIMS)?;
        let value = ctx.input(FILL_VALUE)?;
        let output = ctx.output(FILL_OUTPUT)?;

        let requested = RequestedShape::decode(&dims)?;
        if value.element_count() != 1 {
            return Err(KernelError::ValueNotScalar(value.element_count()));
        }
        tracing::trace!(requested = ?requested.to_vec(), output = ?output.shape(), "fill shapes");
        if !requested.matches(output.shape()) {
            return Err(KernelError::ShapeMismatch {
                requested: requested.to_vec(),
                actual: output.shape().to_vec(),
            });
        }
        if output.dtype() != value.dtype() {
            return Err(KernelError::TypeMismatch {
                expected: value.dtype(),
                got: output.dtype(),
            });
        }
        Ok(())
    }
}

impl Operator for FillKernel {
    const NAME: &'static str = "FILL";
    const INPUTS: usize = 2;
    const OUTPUTS: usize = 1;

    fn prepare(&mut self, ctx: &KernelContext<'_>) -> Result<(), KernelError> {
        match Self::validate(ctx) {
            Ok(()) => {
                self.state = KernelState::Prepared;
                tracing::debug!("fill prepared");
                Ok(())
            }
            Err(err) => {
                self.state = KernelState::Failed;
                Err(err)
            }
        }
    }

    // Shape and dtype are trusted from prepare; only the lifecycle is checked.
    fn invoke(&mut self, ctx: &mut KernelContext<'_>) -> Result<(), KernelError> {
        if !matches!(self.state, KernelState::Prepared | KernelState::Invoked) {
            return Err(KernelError::NotPrepared);
        }
        let value = FillValue::read(&ctx.input(FILL_VALUE)?)?;
        let mut output = ctx.output_mut(FILL_OUTPUT)?;
        let elements = output.element_count();
        value.broadcast(output.as_bytes_mut())?;
        self.state = KernelState::Invoked;
        tracing::debug!(elements, width = value.width(), "fill invoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use crate::tensor::Tensor;

    fn bind(tensors: &mut [Tensor]) -> KernelContext<'_> {
        KernelContext::new(tensors, &[0, 1], &[2])
    }

    #[test]
    fn prepare_then_invoke_fills_int8() {
        let mut tensors = vec![
            Tensor::from_slice(vec![2], &[3i32, 8]).unwrap(),
            Tensor::scalar(-42i8),
            Tensor::zeros(DType::I8, vec![3, 8]).unwrap(),
        ];
        let mut kernel = FillKernel::new();
        let mut ctx = bind(&mut tensors);

        kernel.prepare(&ctx).unwrap();
        assert_eq!(kernel.state(), KernelState::Prepared);
        kernel.invoke(&mut ctx).unwrap();
        assert_eq!(kernel.state(), KernelState::Invoked);

        assert_eq!(tensors[2].to_vec::<i8>().unwrap(), vec![-42i8; 24]);
    }

    #[test]
    fn invoke_before_prepare_is_rejected() {
        let mut tensors = vec![
            Tensor::from_slice(vec![1], &[2i64]).unwrap(),
            Tensor::scalar(1.5f32),
            Tensor::zeros(DType::F32, vec![2]).unwrap(),
        ];
        let mut kernel = FillKernel::new();
        let mut ctx = bind(&mut tensors);

        assert_eq!(kernel.invoke(&mut ctx), Err(KernelError::NotPrepared));
        assert_eq!(tensors[2].to_vec::<f32>().unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn failed_prepare_blocks_invoke() {
        let mut tensors = vec![
            Tensor::from_slice(vec![1], &[3i64]).unwrap(),
            Tensor::scalar(1.5f32),
            Tensor::zeros(DType::F32, vec![2]).unwrap(),
        ];
        let mut kernel = FillKernel::new();
        let mut ctx = bind(&mut tensors);

        assert!(matches!(
            kernel.prepare(&ctx),
            Err(KernelError::ShapeMismatch { .. })
        ));
        assert_eq!(kernel.state(), KernelState::Failed);
        assert_eq!(kernel.invoke(&mut ctx), Err(KernelError::NotPrepared));
    }

    #[test]
    fn invoke_is_repeatable() {
        let mut tensors = vec![
            Tensor::from_slice(vec![1], &[3i16]).unwrap(),
            Tensor::scalar(9u16),
            Tensor::zeros(DType::U16, vec![3]).unwrap(),
        ];
        let mut kernel = FillKernel::new();
        let mut ctx = bind(&mut tensors);
        kernel.prepare(&ctx).unwrap();
        kernel.invoke(&mut ctx).unwrap();
        kernel.invoke(&mut ctx).unwrap();
        assert_eq!(tensors[2].to_vec::<u16>().unwrap(), vec![9, 9, 9]);
    }

    #[test]
    fn arity_is_checked() {
        let mut tensors = vec![
            Tensor::from_slice(vec![1], &[1i32]).unwrap(),
            Tensor::scalar(1i32),
            Tensor::zeros(DType::I32, vec![1]).unwrap(),
        ];
        let ctx = KernelContext::new(&mut tensors, &[0], &[2]);
        let mut kernel = FillKernel::new();
        assert_eq!(
            kernel.prepare(&ctx),
            Err(KernelError::ArityMismatch {
                kernel: "FILL",
                expected_inputs: 2,
                expected_outputs: 1,
                inputs: 1,
                outputs: 1,
            })
        );
    }

    #[test]
    fn value_must_be_scalar() {
        let mut tensors = vec![
            Tensor::from_slice(vec![1], &[2i32]).unwrap(),
            Tensor::from_slice(vec![2], &[1i32, 2]).unwrap(),
            Tensor::zeros(DType::I32, vec![2]).unwrap(),
        ];
        let mut kernel = FillKernel::new();
        let ctx = bind(&mut tensors);
        assert_eq!(kernel.prepare(&ctx), Err(KernelError::ValueNotScalar(2)));
    }

    #[test]
    fn bool_values_broadcast_as_bytes() {
        let mut tensors = vec![
            Tensor::from_slice(vec![1], &[4i8]).unwrap(),
            Tensor::new(DType::Bool, Vec::new(), vec![1]).unwrap(),
            Tensor::zeros(DType::Bool, vec![4]).unwrap(),
        ];
        let mut kernel = FillKernel::new();
        let mut ctx = bind(&mut tensors);
        kernel.prepare(&ctx).unwrap();
        kernel.invoke(&mut ctx).unwrap();
        assert_eq!(tensors[2].as_bytes(), &[1, 1, 1, 1]);
    }
}
