//! Materialization of a box plan.

use tracing::debug;

use qbox_ir::{BoxOp, Circuit, Operation};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::plan::BoxPlan;
use crate::property::PropertySet;

/// Positions, in the boxed circuit, of the boxes a run created.
///
/// Boxes that were already in the input are not listed; later passes leave
/// them alone. Passes that move operations keep the indices current.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmittedBoxes {
    /// Indices into the circuit's operations.
    pub indices: Vec<usize>,
}

/// Transformation pass that rebuilds the circuit from the [`BoxPlan`].
///
/// Slots are emitted in order. Gate and measurement slots become
/// left-dressed boxes, collector slots become right-dressed boxes, and
/// delimiter slots put their barriers and boxes back at the top level. The
/// plan is consumed.
pub struct EmitBoxes;

impl Pass for EmitBoxes {
    fn name(&self) -> &'static str {
        "emit_boxes"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let plan = properties
            .remove::<BoxPlan>()
            .ok_or(CompileError::MissingProperty {
                pass: "emit_boxes",
                property: "BoxPlan",
            })?;
        if plan.num_ops() != circuit.len() {
            return Err(CompileError::BoxingViolation(format!(
                "plan covers {} operations but the circuit has {}",
                plan.num_ops(),
                circuit.len()
            )));
        }

        let mut source: Vec<Option<Operation>> = circuit
            .replace_ops(vec![])
            .into_iter()
            .map(Some)
            .collect();
        let mut take = |position: usize| {
            source[position].take().ok_or_else(|| {
                CompileError::BoxingViolation(format!(
                    "operation at position {position} is emitted twice"
                ))
            })
        };

        let mut ops = Vec::with_capacity(plan.slots().len());
        let mut emitted = EmittedBoxes::default();

        for slot in plan.slots() {
            let Some(dressing) = slot.kind().dressing() else {
                for &position in slot.members() {
                    ops.push(take(position)?);
                }
                continue;
            };

            let mut body = Vec::with_capacity(slot.members().len());
            for &position in slot.members() {
                match take(position)? {
                    Operation::Instruction(inst) => body.push(inst),
                    Operation::Box(_) => {
                        return Err(CompileError::BoxingViolation(format!(
                            "box at position {position} cannot be nested in a {} slot",
                            slot.kind()
                        )));
                    }
                }
            }
            emitted.indices.push(ops.len());
            ops.push(Operation::Box(BoxOp::new(dressing, body)));
        }

        debug!(
            "Emitted {} boxes among {} top-level operations",
            emitted.indices.len(),
            ops.len()
        );

        circuit.replace_ops(ops);
        properties.insert(emitted);
        Ok(())
    }
}
