//! Boxes: annotated groups of instructions.

use serde::{Deserialize, Serialize};

use crate::annotation::{
    Annotation, AnnotationKind, BasisTransform, Dressing, InjectNoise, Twirl,
};
use crate::instruction::{Instruction, OpClass};
use crate::qubit::{ClbitId, QubitId, WireId};

/// A group of instructions acting as the unit of annotation.
///
/// A left-dressed box holds one layer of anchors together with the
/// single-qubit gates that immediately precede them. A right-dressed box
/// collects single-qubit gates that no anchor claimed, optionally behind
/// anchors whose kind is not boxed.
///
/// The body keeps the original relative order of its instructions, and the
/// footprints are sorted and cover every operand in the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxOp {
    /// Which side the single-qubit gates sit on.
    pub dressing: Dressing,
    /// The instructions inside the box.
    pub body: Vec<Instruction>,
    /// Qubits the box spans.
    pub qubits: Vec<QubitId>,
    /// Classical bits the box spans.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clbits: Vec<ClbitId>,
    /// At most one annotation per [`AnnotationKind`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    /// Equivalence class identifier, set by classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_ref: Option<String>,
}

impl BoxOp {
    /// Create an unannotated box around `body`.
    pub fn new(dressing: Dressing, body: Vec<Instruction>) -> Self {
        let mut qubits: Vec<QubitId> = body.iter().flat_map(|i| i.qubits.iter().copied()).collect();
        let mut clbits: Vec<ClbitId> = body.iter().flat_map(|i| i.clbits.iter().copied()).collect();
        qubits.sort_unstable();
        qubits.dedup();
        clbits.sort_unstable();
        clbits.dedup();

        Self {
            dressing,
            body,
            qubits,
            clbits,
            annotations: vec![],
            class_ref: None,
        }
    }

    /// Create a left-dressed box.
    pub fn left(body: Vec<Instruction>) -> Self {
        Self::new(Dressing::Left, body)
    }

    /// Create a right-dressed box.
    pub fn right(body: Vec<Instruction>) -> Self {
        Self::new(Dressing::Right, body)
    }

    /// Append an instruction, widening the footprints as needed.
    pub fn push(&mut self, inst: Instruction) {
        for q in &inst.qubits {
            if let Err(at) = self.qubits.binary_search(q) {
                self.qubits.insert(at, *q);
            }
        }
        for c in &inst.clbits {
            if let Err(at) = self.clbits.binary_search(c) {
                self.clbits.insert(at, *c);
            }
        }
        self.body.push(inst);
    }

    /// Number of instructions in the body.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Whether the body is empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Widen the qubit footprint to include `qubits`. The body is unchanged,
    /// so the added qubits are idle inside the box.
    pub fn extend_qubits(&mut self, qubits: impl IntoIterator<Item = QubitId>) {
        self.qubits.extend(qubits);
        self.qubits.sort_unstable();
        self.qubits.dedup();
    }

    /// Whether every instruction in a non-empty body is a single-qubit gate.
    pub fn is_single_qubit(&self) -> bool {
        !self.body.is_empty()
            && self
                .body
                .iter()
                .all(|i| i.class() == Some(OpClass::SingleQubitGate))
    }

    /// Iterate over every wire the box spans, qubits first.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + '_ {
        self.qubits
            .iter()
            .copied()
            .map(WireId::from)
            .chain(self.clbits.iter().copied().map(WireId::from))
    }

    /// Iterate over the anchors in the body, in order.
    pub fn anchors(&self) -> impl Iterator<Item = &Instruction> {
        self.body
            .iter()
            .filter(|i| i.class().is_some_and(OpClass::is_anchor))
    }

    /// The anchor kind of a left-dressed box.
    ///
    /// Right-dressed boxes and boxes without anchors have no anchor kind,
    /// even when a collector holds anchors of a kind that is not boxed.
    pub fn anchor_kind(&self) -> Option<OpClass> {
        if self.dressing != Dressing::Left {
            return None;
        }
        self.anchors().next().and_then(Instruction::class)
    }

    /// Attach an annotation, replacing any existing one of the same kind.
    pub fn annotate(&mut self, annotation: impl Into<Annotation>) -> &mut Self {
        let annotation = annotation.into();
        match self
            .annotations
            .iter_mut()
            .find(|a| a.kind() == annotation.kind())
        {
            Some(slot) => *slot = annotation,
            None => self.annotations.push(annotation),
        }
        self
    }

    /// Get the annotation of the given kind, if attached.
    pub fn annotation(&self, kind: AnnotationKind) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.kind() == kind)
    }

    /// Get the twirl annotation, if attached.
    pub fn twirl(&self) -> Option<&Twirl> {
        match self.annotation(AnnotationKind::Twirl) {
            Some(Annotation::Twirl(t)) => Some(t),
            _ => None,
        }
    }

    /// Get the basis transform annotation, if attached.
    pub fn basis_transform(&self) -> Option<&BasisTransform> {
        match self.annotation(AnnotationKind::BasisTransform) {
            Some(Annotation::BasisTransform(b)) => Some(b),
            _ => None,
        }
    }

    /// Get the noise injection annotation, if attached.
    pub fn inject_noise(&self) -> Option<&InjectNoise> {
        match self.annotation(AnnotationKind::InjectNoise) {
            Some(Annotation::InjectNoise(n)) => Some(n),
            _ => None,
        }
    }

    /// Strip the dressing from the box.
    ///
    /// For a left-dressed box this removes, per qubit, the single-qubit gates
    /// before the first anchor on that qubit; for a right-dressed box, those
    /// after the last anchor. Only annotations whose kind is in `keep`
    /// survive. Footprints are unchanged.
    #[must_use]
    pub fn undress(&self, keep: &[AnnotationKind]) -> Self {
        let is_single = |i: &Instruction| i.class() == Some(OpClass::SingleQubitGate);
        let anchored_before = |idx: usize, q: QubitId| {
            self.body[..idx]
                .iter()
                .any(|i| !is_single(i) && i.qubits.contains(&q))
        };
        let anchored_after = |idx: usize, q: QubitId| {
            self.body[idx + 1..]
                .iter()
                .any(|i| !is_single(i) && i.qubits.contains(&q))
        };

        let body = self
            .body
            .iter()
            .enumerate()
            .filter(|(idx, inst)| {
                if !is_single(inst) {
                    return true;
                }
                let Some(&q) = inst.qubits.first() else {
                    return true;
                };
                match self.dressing {
                    Dressing::Left => anchored_before(*idx, q),
                    Dressing::Right => anchored_after(*idx, q),
                }
            })
            .map(|(_, inst)| inst.clone())
            .collect();

        Self {
            dressing: self.dressing,
            body,
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
            annotations: self
                .annotations
                .iter()
                .filter(|a| keep.contains(&a.kind()))
                .cloned()
                .collect(),
            class_ref: self.class_ref.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{BasisMode, TwirlGroup};
    use crate::gate::StandardGate;

    fn q(n: u32) -> QubitId {
        QubitId(n)
    }

    fn h(n: u32) -> Instruction {
        Instruction::single_qubit_gate(StandardGate::H, q(n))
    }

    fn cx(a: u32, b: u32) -> Instruction {
        Instruction::two_qubit_gate(StandardGate::CX, q(a), q(b))
    }

    #[test]
    fn test_footprints_are_sorted() {
        let b = BoxOp::left(vec![h(3), cx(3, 1), Instruction::measure(q(0), ClbitId(2))]);
        assert_eq!(b.qubits, vec![q(0), q(1), q(3)]);
        assert_eq!(b.clbits, vec![ClbitId(2)]);

        let mut b = BoxOp::right(vec![h(2)]);
        b.push(h(0));
        assert_eq!(b.qubits, vec![q(0), q(2)]);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_anchor_kind() {
        assert_eq!(
            BoxOp::left(vec![h(0), cx(0, 1)]).anchor_kind(),
            Some(OpClass::TwoQubitGate)
        );
        assert_eq!(
            BoxOp::left(vec![Instruction::measure(q(0), ClbitId(0))]).anchor_kind(),
            Some(OpClass::Measurement)
        );
        assert_eq!(BoxOp::right(vec![cx(0, 1), h(0)]).anchor_kind(), None);
        assert_eq!(BoxOp::right(vec![h(0)]).anchor_kind(), None);
    }

    #[test]
    fn test_annotate_replaces_same_kind() {
        let mut b = BoxOp::left(vec![cx(0, 1)]);
        b.annotate(Twirl::default())
            .annotate(InjectNoise::new("r0"))
            .annotate(Twirl {
                group: TwirlGroup::BalancedPauli,
                ..Twirl::default()
            });

        assert_eq!(b.annotations.len(), 2);
        assert_eq!(b.twirl().map(|t| t.group), Some(TwirlGroup::BalancedPauli));
        assert_eq!(b.inject_noise().map(|n| n.reference.as_str()), Some("r0"));
        assert!(b.basis_transform().is_none());
    }

    #[test]
    fn test_undress_left_box() {
        let mut b = BoxOp::left(vec![h(0), h(1), h(2), cx(0, 1), h(0)]);
        b.annotate(Twirl::default()).annotate(InjectNoise::new("r0"));

        let undressed = b.undress(&[AnnotationKind::InjectNoise]);
        // h(2) has no anchor on its qubit and is stripped too
        assert_eq!(undressed.body, vec![cx(0, 1), h(0)]);
        assert_eq!(undressed.qubits, b.qubits);
        assert!(undressed.twirl().is_none());
        assert!(undressed.inject_noise().is_some());
    }

    #[test]
    fn test_extend_qubits_keeps_body() {
        let mut b = BoxOp::left(vec![h(2), cx(2, 3)]);
        b.extend_qubits([q(0), q(3), q(5)]);
        assert_eq!(b.qubits, vec![q(0), q(2), q(3), q(5)]);
        assert_eq!(b.body, vec![h(2), cx(2, 3)]);
    }

    #[test]
    fn test_is_single_qubit() {
        assert!(BoxOp::right(vec![h(0), h(1)]).is_single_qubit());
        assert!(!BoxOp::right(vec![h(0), cx(0, 1)]).is_single_qubit());
        assert!(!BoxOp::right(vec![]).is_single_qubit());
    }

    #[test]
    fn test_undress_tolerates_unvalidated_body() {
        // A one-qubit gate with no operands, as it might arrive from JSON.
        let bare = Instruction::gate(StandardGate::H, Vec::<QubitId>::new());
        let b = BoxOp::left(vec![bare.clone(), cx(0, 1)]);

        let undressed = b.undress(&[]);
        assert_eq!(undressed.body, vec![bare, cx(0, 1)]);
    }

    #[test]
    fn test_undress_right_box() {
        let mut b = BoxOp::right(vec![h(0), cx(0, 1), h(1), h(0)]);
        b.annotate(BasisTransform {
            mode: BasisMode::Measure,
            ..BasisTransform::default()
        });

        let undressed = b.undress(&[]);
        assert_eq!(undressed.body, vec![h(0), cx(0, 1)]);
        assert!(undressed.annotations.is_empty());
    }
}
