//! Pass trait and types for boxing passes.

use qbox_ir::Circuit;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// The kind of pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Analysis pass that reads but does not modify the circuit.
    Analysis,
    /// Transformation pass that modifies the circuit.
    Transformation,
}

/// A pass that operates on a circuit.
///
/// Passes communicate through the [`PropertySet`]: packing writes a
/// [`BoxPlan`](crate::BoxPlan), emission reads it, and so on. A configured
/// pass holds no state between runs, so one pass manager can box many
/// circuits, from many threads.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass on the given circuit.
    ///
    /// Analysis passes must leave the circuit untouched and only write to
    /// the `PropertySet`.
    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _circuit: &Circuit, _properties: &PropertySet) -> bool {
        true
    }
}
