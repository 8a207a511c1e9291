use crate::error::KernelError;
use crate::tensor::{Tensor, TensorView, TensorViewMut};

/// A kernel driven through the two-phase prepare/invoke protocol.
pub trait Operator {
    const NAME: &'static str;
    const INPUTS: usize;
    const OUTPUTS: usize;

    /// Validates the bound tensors without mutating any of them.
    ///
    /// # Errors
    /// Returns a [`KernelError`] when the node can never execute; the
    /// interpreter must not call [`Operator::invoke`] afterwards.
    fn prepare(&mut self, ctx: &KernelContext<'_>) -> Result<(), KernelError>;

    /// Writes the outputs in place.
    ///
    /// # Errors
    /// Returns a [`KernelError`] if execution fails.
    fn invoke(&mut self, ctx: &mut KernelContext<'_>) -> Result<(), KernelError>;
}

/// The tensors bound to one node, lent to a kernel for a single call.
///
/// `inputs` and `outputs` index into `tensors`, in declaration order.
pub struct KernelContext<'t> {
    tensors: &'t mut [Tensor],
    inputs: &'t [usize],
    outputs: &'t [usize],
}

impl<'t> KernelContext<'t> {
    #[must_use]
    pub fn new(tensors: &'t mut [Tensor], inputs: &'t [usize], outputs: &'t [usize]) -> Self {
        Self {
            tensors,
            inputs,
            outputs,
        }
    }

    #[must_use]
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    #[must_use]
    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// # Errors
    /// [`KernelError::MissingTensor`] if no input is bound at `index`.
    pub fn input(&self, index: usize) -> Result<TensorView<'_>, KernelError> {
        self.lookup("input", self.inputs, index)
            .map(|slot| self.tensors[slot].view())
    }

    /// Read-only access to an output, for validation.
    ///
    /// # Errors
    /// [`KernelError::MissingTensor`] if no output is bound at `index`.
    pub fn output(&self, index: usize) -> Result<TensorView<'_>, KernelError> {
        self.lookup("output", self.outputs, index)
            .map(|slot| self.tensors[slot].view())
    }

    /// # Errors
    /// [`KernelError::MissingTensor`] if no output is bound at `index`.
    pub fn output_mut(&mut self, index: usize) -> Result<TensorViewMut<'_>, KernelError> {
        let slot = self.lookup("output", self.outputs, index)?;
        Ok(self.tensors[slot].view_mut())
    }

    fn lookup(&self, role: &'static str, bound: &[usize], index: usize) -> Result<usize, KernelError> {
        bound
            .get(index)
            .copied()
            .filter(|&slot| slot < self.tensors.len())
            .ok_or(KernelError::MissingTensor { role, index })
    }
}
