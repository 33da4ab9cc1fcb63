//! Barrier removal.

use tracing::debug;

use qbox_ir::{Circuit, Operation};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::passes::emit::EmittedBoxes;
use crate::property::PropertySet;

/// Drops every top-level barrier.
///
/// Run before packing, barriers stop constraining boxes beyond the order
/// shared qubits already imply. Run after annotation, they constrain packing
/// but are absent from the output. Barriers inside existing boxes are left
/// alone.
///
/// [`EmittedBoxes`], if present, is shifted to the boxes' new positions.
pub struct RemoveBarriers;

impl Pass for RemoveBarriers {
    fn name(&self) -> &'static str {
        "remove_barriers"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn should_run(&self, circuit: &Circuit, _properties: &PropertySet) -> bool {
        circuit.instructions().any(|inst| inst.is_barrier())
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let is_barrier = |op: &Operation| matches!(op, Operation::Instruction(inst) if inst.is_barrier());

        let before = circuit.len();
        let mut removed = 0;
        let shifted: Vec<usize> = circuit
            .ops()
            .iter()
            .enumerate()
            .map(|(index, op)| {
                let to = index - removed;
                if is_barrier(op) {
                    removed += 1;
                }
                to
            })
            .collect();

        circuit.ops_mut().retain(|op| !is_barrier(op));
        if let Some(emitted) = properties.get_mut::<EmittedBoxes>() {
            for index in &mut emitted.indices {
                if let Some(&to) = shifted.get(*index) {
                    *index = to;
                }
            }
        }

        debug!("Removed {} barriers", before - circuit.len());
        Ok(())
    }
}
