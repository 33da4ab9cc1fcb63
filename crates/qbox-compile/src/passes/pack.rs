//! Anchor packing.
//!
//! A single left-to-right scan assigns every anchor to the leftmost slot of
//! its kind that all of its wires can still reach, and pulls the run of
//! single-qubit gates directly preceding the anchor on each of its qubits
//! into the same slot:
//!
//! ```text
//!  q0 ─ h ─■──────────     slot 0: [h q0, h q1, cx q0 q1, cx q3 q4]
//!  q1 ─ h ─X── s ─■───     slot 1: [s q1, cx q1 q2]
//!  q2 ────────────X───
//!  q3 ─────■──────────
//!  q4 ─────X──────────
//! ```
//!
//! The cx on q3 and q4 comes last in program order but still fits slot 0.
//!
//! Anchors whose kind is disabled, and single-qubit gates that no anchor
//! claims, end up in right-dressed collector slots; see
//! [`CollectBoxes`](super::CollectBoxes).

use tracing::debug;

use qbox_ir::{Circuit, Instruction, OpClass, Operation};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::plan::{BoxPlan, SlotKind};
use crate::property::PropertySet;

/// Analysis pass that packs anchors into slots of a [`BoxPlan`].
///
/// Barriers and boxes already in the circuit are delimiters: the queued
/// single-qubit gates on their qubits are collected in front of them, and
/// they close every slot before them on all of their wires. Delimiters keep
/// their relative order, so a circuit that is already fully boxed comes out
/// unchanged.
///
/// Single-qubit gates still queued when the scan ends are left in the plan
/// for [`CollectBoxes`](super::CollectBoxes).
#[derive(Debug, Clone)]
pub struct PackBoxes {
    enable_gates: bool,
    enable_measures: bool,
}

impl PackBoxes {
    /// Create a packing pass.
    pub fn new(enable_gates: bool, enable_measures: bool) -> Self {
        Self {
            enable_gates,
            enable_measures,
        }
    }

    fn place_anchor(plan: &mut BoxPlan, position: usize, inst: &Instruction, kind: SlotKind) {
        let floor = plan.floor(inst.wires());
        let slot = plan.first_fit(floor, kind);
        plan.absorb(slot, &inst.qubits);
        plan.assign(slot, position);

        // A collector stays open behind a disabled anchor so the gates
        // trailing it can join.
        let frontier = if kind == SlotKind::Collector {
            slot
        } else {
            slot + 1
        };
        plan.advance(inst.wires(), frontier);
    }

    fn place_delimiter(plan: &mut BoxPlan, position: usize, op: &Operation) {
        plan.collect(op.qubits().iter().copied());
        let floor = plan
            .floor(op.wires())
            .max(plan.last(SlotKind::Delimiter).unwrap_or(0));
        let slot = plan.first_fit(floor, SlotKind::Delimiter);
        plan.assign(slot, position);
        plan.advance(op.wires(), slot + 1);
    }
}

impl Default for PackBoxes {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl Pass for PackBoxes {
    fn name(&self) -> &'static str {
        "pack_boxes"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let mut plan = BoxPlan::new(circuit.len());

        for (position, op) in circuit.ops().iter().enumerate() {
            let inst = match op {
                Operation::Instruction(inst) => inst,
                Operation::Box(_) => {
                    Self::place_delimiter(&mut plan, position, op);
                    continue;
                }
            };

            let class = inst
                .validate()
                .map_err(|source| CompileError::MalformedInstruction { position, source })
                .and_then(|()| {
                    inst.class().ok_or_else(|| {
                        CompileError::BoxingViolation(format!(
                            "'{}' at position {position} has no boxing class",
                            inst.name()
                        ))
                    })
                })?;

            match class {
                OpClass::SingleQubitGate => plan.defer(inst.qubits[0], position),
                OpClass::TwoQubitGate if self.enable_gates => {
                    Self::place_anchor(&mut plan, position, inst, SlotKind::Gates);
                }
                OpClass::Measurement if self.enable_measures => {
                    Self::place_anchor(&mut plan, position, inst, SlotKind::Measures);
                }
                OpClass::TwoQubitGate | OpClass::Measurement => {
                    Self::place_anchor(&mut plan, position, inst, SlotKind::Collector);
                }
                OpClass::Barrier => Self::place_delimiter(&mut plan, position, op),
            }
        }

        plan.sort_members();

        debug!(
            "Packed {} operations into {} slots ({}), {} qubits with trailing gates",
            plan.num_ops(),
            plan.slots().len(),
            plan.counts()
                .map(|(kind, n)| format!("{kind}: {n}"))
                .collect::<Vec<_>>()
                .join(", "),
            plan.pending().count()
        );

        properties.insert(plan);
        Ok(())
    }
}
