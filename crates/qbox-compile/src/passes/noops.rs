//! Widening boxes onto idle qubits.

use tracing::debug;

use qbox_ir::{Circuit, IrError, QubitId};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Transformation pass that extends every box to span a fixed set of qubits.
///
/// The added qubits are idle inside the box: the body is unchanged and only
/// the footprint grows, so noise injected into the box also covers them.
/// Operations outside boxes are left as they are.
#[derive(Debug, Clone)]
pub struct AddNoops {
    qubits: Vec<QubitId>,
}

impl AddNoops {
    /// Create a pass extending boxes to `qubits`.
    pub fn new(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        let mut qubits: Vec<QubitId> = qubits.into_iter().collect();
        qubits.sort_unstable();
        qubits.dedup();
        Self { qubits }
    }

    /// The qubits every box is extended to.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }
}

impl Pass for AddNoops {
    fn name(&self) -> &'static str {
        "add_noops"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn should_run(&self, _circuit: &Circuit, _properties: &PropertySet) -> bool {
        !self.qubits.is_empty()
    }

    fn run(&self, circuit: &mut Circuit, _properties: &mut PropertySet) -> CompileResult<()> {
        if let Some(&qubit) = self
            .qubits
            .iter()
            .find(|q| q.0 as usize >= circuit.num_qubits())
        {
            return Err(CompileError::Ir(IrError::QubitNotFound {
                qubit,
                op_name: Some(self.name().to_string()),
            }));
        }

        let mut widened = 0;
        for b in circuit.boxes_mut() {
            let before = b.qubits.len();
            b.extend_qubits(self.qubits.iter().copied());
            if b.qubits.len() > before {
                widened += 1;
            }
        }

        debug!("Extended {} boxes to {} qubits", widened, self.qubits.len());
        Ok(())
    }
}
