//! Folding single-qubit boxes into the box that follows them.
//!
//! Collectors are flushed in front of every barrier, so once barriers are
//! removed a collector often sits directly before a box on the same qubits:
//!
//! ```text
//!  before:  [h q0, h q1]  [cx q0 q1]        after:  [h q0, h q1, cx q0 q1]
//! ```

use rustc_hash::FxHashSet;
use tracing::debug;

use qbox_ir::{BoxOp, Circuit, Operation};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::passes::emit::EmittedBoxes;
use crate::property::PropertySet;

/// Transformation pass that merges boxes holding only single-qubit gates
/// into the box after them.
///
/// A single-qubit box is held back while the operations after it stay off
/// its qubits. The next box takes it in when both carry the same
/// annotations and that box spans every qubit of the held one; the held
/// gates are prepended to its body. Two single-qubit boxes with the same
/// annotations combine into one spanning both. An operation touching a held
/// qubit, or a box that cannot take it in, releases the held box where it
/// is.
///
/// When [`EmittedBoxes`] is present only the boxes it lists take part, and
/// it is rewritten to the merged positions.
pub struct MergeBoxes;

impl Pass for MergeBoxes {
    fn name(&self) -> &'static str {
        "merge_boxes"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let created: Option<FxHashSet<usize>> = properties
            .get::<EmittedBoxes>()
            .map(|e| e.indices.iter().copied().collect());
        let before = circuit.len();

        let mut merger = Merger::default();
        for (index, op) in circuit.replace_ops(vec![]).into_iter().enumerate() {
            match op {
                Operation::Box(next) if created.as_ref().is_none_or(|c| c.contains(&index)) => {
                    merger.push_box(next);
                }
                op => merger.push_other(op),
            }
        }
        let merger = merger.finish();

        debug!(
            "Merged {} single-qubit boxes, {} -> {} operations",
            merger.merged,
            before,
            merger.ops.len()
        );

        circuit.replace_ops(merger.ops);
        if created.is_some() {
            properties.insert(merger.emitted);
        }
        Ok(())
    }
}

#[derive(Default)]
struct Merger {
    ops: Vec<Operation>,
    emitted: EmittedBoxes,
    held: Option<BoxOp>,
    merged: usize,
}

impl Merger {
    fn push_box(&mut self, next: BoxOp) {
        let next = match self.held.take() {
            Some(held) if can_merge(&held, &next) => {
                self.merged += 1;
                merge(held, next)
            }
            Some(held) => {
                self.emit(held);
                next
            }
            None => next,
        };

        if next.is_single_qubit() {
            self.held = Some(next);
        } else {
            self.emit(next);
        }
    }

    fn push_other(&mut self, op: Operation) {
        let touches = |held: &mut BoxOp| {
            op.qubits()
                .iter()
                .any(|q| held.qubits.binary_search(q).is_ok())
        };
        if let Some(held) = self.held.take_if(touches) {
            self.emit(held);
        }
        self.ops.push(op);
    }

    fn emit(&mut self, b: BoxOp) {
        self.emitted.indices.push(self.ops.len());
        self.ops.push(Operation::Box(b));
    }

    fn finish(mut self) -> Self {
        if let Some(held) = self.held.take() {
            self.emit(held);
        }
        self
    }
}

fn same_annotations(a: &BoxOp, b: &BoxOp) -> bool {
    // At most one annotation per kind, so equal length plus inclusion is
    // set equality.
    a.annotations.len() == b.annotations.len()
        && a.annotations.iter().all(|x| b.annotations.contains(x))
}

fn can_merge(held: &BoxOp, next: &BoxOp) -> bool {
    same_annotations(held, next)
        && (next.is_single_qubit()
            || held
                .qubits
                .iter()
                .all(|q| next.qubits.binary_search(q).is_ok()))
}

fn merge(held: BoxOp, next: BoxOp) -> BoxOp {
    let dressing = if next.is_single_qubit() {
        held.dressing
    } else {
        next.dressing
    };

    let mut body = held.body;
    body.extend(next.body);
    let mut merged = BoxOp::new(dressing, body);
    merged.extend_qubits(held.qubits.into_iter().chain(next.qubits));
    merged.clbits.extend(held.clbits.into_iter().chain(next.clbits));
    merged.clbits.sort_unstable();
    merged.clbits.dedup();
    merged.annotations = next.annotations;
    merged.class_ref = next.class_ref.or(held.class_ref);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbox_ir::{ClbitId, Dressing, Instruction, QubitId, StandardGate, Twirl};

    fn q(n: u32) -> QubitId {
        QubitId(n)
    }

    fn h(n: u32) -> Instruction {
        Instruction::single_qubit_gate(StandardGate::H, q(n))
    }

    fn cx(a: u32, b: u32) -> Instruction {
        Instruction::two_qubit_gate(StandardGate::CX, q(a), q(b))
    }

    fn circuit_of(num_qubits: u32, ops: Vec<Operation>) -> Circuit {
        let mut circuit = Circuit::with_size("test", num_qubits, num_qubits);
        circuit.replace_ops(ops);
        circuit
    }

    fn merge_all(circuit: &mut Circuit) {
        MergeBoxes.run(circuit, &mut PropertySet::new()).unwrap();
    }

    #[test]
    fn test_collector_joins_next_box() {
        let mut circuit = circuit_of(
            2,
            vec![
                BoxOp::right(vec![h(0), h(1)]).into(),
                BoxOp::left(vec![h(0), cx(0, 1)]).into(),
            ],
        );
        merge_all(&mut circuit);

        assert_eq!(circuit.len(), 1);
        let b = circuit.ops()[0].as_box().unwrap();
        assert_eq!(b.dressing, Dressing::Left);
        assert_eq!(b.body, vec![h(0), h(1), h(0), cx(0, 1)]);
        assert_eq!(b.qubits, vec![q(0), q(1)]);
    }

    #[test]
    fn test_different_annotations_do_not_merge() {
        let mut annotated = BoxOp::left(vec![cx(0, 1)]);
        annotated.annotate(Twirl::default());
        let mut circuit = circuit_of(
            2,
            vec![BoxOp::right(vec![h(0)]).into(), annotated.into()],
        );
        let before = circuit.clone();

        merge_all(&mut circuit);
        assert_eq!(circuit, before);
    }

    #[test]
    fn test_next_box_must_span_held_qubits() {
        let mut circuit = circuit_of(
            3,
            vec![
                BoxOp::right(vec![h(2)]).into(),
                BoxOp::left(vec![cx(0, 1)]).into(),
            ],
        );
        let before = circuit.clone();

        merge_all(&mut circuit);
        assert_eq!(circuit, before);
    }

    #[test]
    fn test_single_qubit_boxes_combine() {
        let mut circuit = circuit_of(
            3,
            vec![
                BoxOp::right(vec![h(0)]).into(),
                BoxOp::right(vec![h(2)]).into(),
                BoxOp::left(vec![h(1), cx(0, 2)]).into(),
            ],
        );
        merge_all(&mut circuit);

        // The two collectors combine first, then join the gate box that
        // spans both of their qubits.
        assert_eq!(circuit.len(), 1);
        let b = circuit.ops()[0].as_box().unwrap();
        assert_eq!(b.body, vec![h(0), h(2), h(1), cx(0, 2)]);
    }

    #[test]
    fn test_operation_on_held_qubit_releases_it() {
        let mut circuit = circuit_of(
            2,
            vec![
                BoxOp::right(vec![h(0)]).into(),
                Instruction::barrier([q(1)]).into(),
                BoxOp::left(vec![cx(0, 1)]).into(),
                BoxOp::right(vec![h(1)]).into(),
                Instruction::barrier([q(1)]).into(),
            ],
        );
        merge_all(&mut circuit);

        // The barrier on q1 does not touch the held h(0); the trailing h(1)
        // is released by the second barrier.
        let names: Vec<_> = circuit.ops().iter().map(Operation::name).collect();
        assert_eq!(names, vec!["barrier", "box", "box", "barrier"]);
        assert_eq!(circuit.ops()[1].as_box().unwrap().body, vec![h(0), cx(0, 1)]);
        assert_eq!(circuit.ops()[2].as_box().unwrap().body, vec![h(1)]);
    }

    #[test]
    fn test_measure_box_takes_dressing() {
        let measure = Instruction::measure(q(1), ClbitId(1));
        let mut circuit = circuit_of(
            2,
            vec![
                BoxOp::right(vec![h(1)]).into(),
                BoxOp::left(vec![measure.clone()]).into(),
            ],
        );
        merge_all(&mut circuit);

        let b = circuit.ops()[0].as_box().unwrap();
        assert_eq!(b.body, vec![h(1), measure]);
        assert_eq!(b.clbits, vec![ClbitId(1)]);
    }

    #[test]
    fn test_only_listed_boxes_take_part() {
        let mut circuit = circuit_of(
            2,
            vec![
                BoxOp::right(vec![h(0)]).into(),
                BoxOp::left(vec![cx(0, 1)]).into(),
                BoxOp::right(vec![h(1)]).into(),
                BoxOp::left(vec![cx(1, 0)]).into(),
            ],
        );
        let mut props = PropertySet::new();
        props.insert(EmittedBoxes {
            indices: vec![2, 3],
        });

        MergeBoxes.run(&mut circuit, &mut props).unwrap();

        assert_eq!(circuit.len(), 3);
        assert_eq!(circuit.ops()[1].as_box().unwrap().body, vec![cx(0, 1)]);
        assert_eq!(circuit.ops()[2].as_box().unwrap().body, vec![h(1), cx(1, 0)]);
        assert_eq!(props.get::<EmittedBoxes>().unwrap().indices, vec![2]);
    }
}
