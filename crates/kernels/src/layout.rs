/// Input position of the tensor holding the requested output shape.
pub const FILL_DIMS: usize = 0;
/// Input position of the scalar fill value.
pub const FILL_VALUE: usize = 1;
/// Output position of the filled tensor.
pub const FILL_OUTPUT: usize = 0;

const _: () = assert!(FILL_DIMS != FILL_VALUE);

/// Return expected `(inputs, outputs)` for each kernel.
pub const fn binding_counts(kernel: &crate::Kernel) -> (usize, usize) {
    match kernel {
        crate::Kernel::Fill => (2, 1),
    }
}
