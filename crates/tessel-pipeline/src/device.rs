//! Compute targets for finished batches.

use tessel_core::Tensor;

/// Where a batch's tensors are moved before they are handed out.
///
/// Transfer happens once per batch, after slicing and before any
/// symmetry is applied.
pub trait Device {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Move one tensor onto this device.
    fn transfer(&self, tensor: Tensor) -> Tensor;
}

/// Host memory. Transfer is the identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cpu;

impl Device for Cpu {
    fn name(&self) -> &str {
        "cpu"
    }

    fn transfer(&self, tensor: Tensor) -> Tensor {
        tensor
    }
}

impl<D: Device + ?Sized> Device for &D {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn transfer(&self, tensor: Tensor) -> Tensor {
        (**self).transfer(tensor)
    }
}
