//! Test and driver harness: binds tensors to one operator and drives
//! prepare, then invoke.

use crate::error::{KernelError, RunnerError};
use crate::operator::{KernelContext, Operator};
use crate::tensor::Tensor;

pub struct KernelRunner<'t, K: Operator> {
    kernel: K,
    tensors: &'t mut [Tensor],
    inputs: Vec<usize>,
    outputs: Vec<usize>,
}

impl<'t, K: Operator> KernelRunner<'t, K> {
    /// Binds `inputs` and `outputs` (indices into `tensors`) to `kernel`.
    ///
    /// # Errors
    /// [`KernelError::MissingTensor`] if an index is out of range,
    /// [`KernelError::AliasedOutput`] if an output shares a tensor with an
    /// input.
    pub fn new(
        kernel: K,
        tensors: &'t mut [Tensor],
        inputs: &[usize],
        outputs: &[usize],
    ) -> Result<Self, KernelError> {
        let in_range = |role: &'static str, bound: &[usize]| {
            bound.iter().enumerate().try_for_each(|(index, &slot)| {
                if slot < tensors.len() {
                    Ok(())
                } else {
                    Err(KernelError::MissingTensor { role, index })
                }
            })
        };
        in_range("input", inputs)?;
        in_range("output", outputs)?;
        if let Some(&slot) = outputs.iter().find(|slot| inputs.contains(*slot)) {
            return Err(KernelError::AliasedOutput(slot));
        }
        Ok(Self {
            kernel,
            tensors,
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        })
    }

    /// # Errors
    /// [`RunnerError::Prepare`] carrying the kernel's validation failure.
    pub fn init_and_prepare(&mut self) -> Result<(), RunnerError> {
        let ctx = KernelContext::new(&mut *self.tensors, &self.inputs, &self.outputs);
        self.kernel.prepare(&ctx).map_err(|err| {
            tracing::warn!(kernel = K::NAME, error = %err, "prepare failed");
            RunnerError::Prepare(err)
        })
    }

    /// # Errors
    /// [`RunnerError::Invoke`] if prepare has not succeeded or the kernel
    /// fails while writing its outputs.
    pub fn invoke(&mut self) -> Result<(), RunnerError> {
        let mut ctx = KernelContext::new(&mut *self.tensors, &self.inputs, &self.outputs);
        self.kernel.invoke(&mut ctx).map_err(|err| {
            tracing::warn!(kernel = K::NAME, error = %err, "invoke failed");
            RunnerError::Invoke(err)
        })
    }

    #[must_use]
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    #[must_use]
    pub fn tensor(&self, index: usize) -> Option<&Tensor> {
        self.tensors.get(index)
    }
}
