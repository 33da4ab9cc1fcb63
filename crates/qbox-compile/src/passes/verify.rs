//! Structural checks on a box plan before it is emitted.
//!
//! Packing is correct by construction for well-formed input; a failure here
//! means a bug in the packing passes, and the run aborts before the circuit
//! is touched.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::debug;

use qbox_ir::{Circuit, OpClass, Operation, WireId};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::plan::{BoxPlan, SlotKind};
use crate::property::PropertySet;

/// Counts describing a verified plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoxingSummary {
    /// Left-dressed boxes of two-qubit gates.
    pub gate_boxes: usize,
    /// Left-dressed boxes of measurements.
    pub measure_boxes: usize,
    /// Right-dressed collector boxes.
    pub collector_boxes: usize,
    /// Barriers and pre-existing boxes left outside new boxes.
    pub delimiters: usize,
    /// Instructions placed in new boxes.
    pub instructions_boxed: usize,
}

impl BoxingSummary {
    /// Total number of new boxes.
    pub fn boxes(&self) -> usize {
        self.gate_boxes + self.measure_boxes + self.collector_boxes
    }
}

/// Analysis pass that checks the [`BoxPlan`] and records a [`BoxingSummary`].
///
/// The plan must assign every operation to exactly one slot, keep each
/// wire's operations in non-decreasing slot order, hold exactly one layer of
/// a single anchor kind in each left-dressed slot, and hold nothing but
/// barriers and boxes in delimiter slots.
pub struct VerifyBoxing;

impl VerifyBoxing {
    fn check_coverage(plan: &BoxPlan) -> CompileResult<()> {
        let mut seen = vec![0usize; plan.num_ops()];
        for slot in plan.slots() {
            for &position in slot.members() {
                match seen.get_mut(position) {
                    Some(count) => *count += 1,
                    None => {
                        return Err(violation(format!(
                            "slot member {position} is outside the circuit"
                        )));
                    }
                }
            }
        }
        if let Some((position, count)) = seen.iter().enumerate().find(|(_, c)| **c != 1) {
            return Err(violation(format!(
                "operation at position {position} is assigned to {count} slots"
            )));
        }
        Ok(())
    }

    fn check_wire_order(plan: &BoxPlan, circuit: &Circuit) -> CompileResult<()> {
        let mut last: FxHashMap<WireId, usize> = FxHashMap::default();
        for (position, op) in circuit.ops().iter().enumerate() {
            let slot = plan
                .slot_of(position)
                .ok_or_else(|| violation(format!("position {position} has no slot")))?;
            for wire in op.wires() {
                let prev = last.insert(wire, slot).unwrap_or(0);
                if slot < prev {
                    return Err(violation(format!(
                        "'{}' at position {position} is in slot {slot}, \
                         before an earlier operation on {wire} in slot {prev}",
                        op.name()
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_slot(index: usize, kind: SlotKind, ops: &[&Operation]) -> CompileResult<()> {
        let expected = match kind {
            SlotKind::Gates => OpClass::TwoQubitGate,
            SlotKind::Measures => OpClass::Measurement,
            SlotKind::Collector => {
                return match ops.iter().find(|op| is_delimiter(op)) {
                    Some(op) => Err(violation(format!(
                        "collector slot {index} holds '{}'",
                        op.name()
                    ))),
                    None => Ok(()),
                };
            }
            SlotKind::Delimiter => {
                return match ops.iter().find(|op| !is_delimiter(op)) {
                    Some(op) => Err(violation(format!(
                        "delimiter slot {index} holds '{}'",
                        op.name()
                    ))),
                    None => Ok(()),
                };
            }
        };

        let mut anchored: FxHashSet<WireId> = FxHashSet::default();
        for op in ops {
            let Operation::Instruction(inst) = op else {
                return Err(violation(format!("{kind} slot {index} holds a box")));
            };
            match inst.class() {
                Some(OpClass::SingleQubitGate) => {}
                Some(class) if class == expected => {
                    for wire in inst.wires() {
                        if !anchored.insert(wire) {
                            return Err(violation(format!(
                                "{kind} slot {index} has two anchors on {wire}"
                            )));
                        }
                    }
                }
                _ => {
                    return Err(violation(format!(
                        "{kind} slot {index} holds '{}'",
                        inst.name()
                    )));
                }
            }
        }
        if anchored.is_empty() {
            return Err(violation(format!("{kind} slot {index} has no anchor")));
        }
        Ok(())
    }
}

impl Pass for VerifyBoxing {
    fn name(&self) -> &'static str {
        "verify_boxing"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let plan = properties.require::<BoxPlan>("verify_boxing", "BoxPlan")?;

        if plan.num_ops() != circuit.len() {
            return Err(violation(format!(
                "plan covers {} operations but the circuit has {}",
                plan.num_ops(),
                circuit.len()
            )));
        }
        if let Some((qubit, run)) = plan.pending().next() {
            return Err(violation(format!(
                "{} single-qubit gates on {qubit} were never collected",
                run.len()
            )));
        }

        Self::check_coverage(plan)?;
        Self::check_wire_order(plan, circuit)?;

        let mut summary = BoxingSummary::default();
        for (index, slot) in plan.slots().iter().enumerate() {
            let ops: Vec<&Operation> = slot.members().iter().map(|&p| &circuit.ops()[p]).collect();
            Self::check_slot(index, slot.kind(), &ops)?;

            match slot.kind() {
                SlotKind::Gates => summary.gate_boxes += 1,
                SlotKind::Measures => summary.measure_boxes += 1,
                SlotKind::Collector => summary.collector_boxes += 1,
                SlotKind::Delimiter => {
                    summary.delimiters += ops.len();
                    continue;
                }
            }
            summary.instructions_boxed += ops.len();
        }

        debug!(
            "Box plan verified: {} boxes ({} gate, {} measure, {} collector), {} delimiters",
            summary.boxes(),
            summary.gate_boxes,
            summary.measure_boxes,
            summary.collector_boxes,
            summary.delimiters
        );

        properties.insert(summary);
        Ok(())
    }
}

fn is_delimiter(op: &Operation) -> bool {
    match op {
        Operation::Box(_) => true,
        Operation::Instruction(inst) => inst.is_barrier(),
    }
}

fn violation(reason: String) -> CompileError {
    CompileError::BoxingViolation(reason)
}
