//! Equivalence classification of boxes.

use rustc_hash::FxHashMap;
use tracing::debug;

use qbox_ir::{Circuit, Operation};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::passes::emit::EmittedBoxes;
use crate::passes::skeleton::Skeleton;
use crate::property::PropertySet;

/// One class of boxes sharing a skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceClass {
    /// Identifier shared by every box in the class.
    pub reference: String,
    /// The skeleton all members share.
    pub skeleton: Skeleton,
    /// Indices of the member boxes in the circuit, ascending.
    pub members: Vec<usize>,
}

/// The equivalence classes of a run, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquivalenceClasses {
    classes: Vec<EquivalenceClass>,
}

impl EquivalenceClasses {
    /// All classes.
    pub fn classes(&self) -> &[EquivalenceClass] {
        &self.classes
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether there are no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Find a class by its reference.
    pub fn get(&self, reference: &str) -> Option<&EquivalenceClass> {
        self.classes.iter().find(|c| c.reference == reference)
    }
}

/// Pass that gives every anchored box created in this run the identifier of
/// its skeleton's class.
///
/// Identifiers are `r0`, `r1`, ... in order of first appearance, generated
/// fresh on every run. Collector boxes have no anchor kind, are never
/// classified, and keep `class_ref` unset. The classes are also recorded as
/// [`EquivalenceClasses`].
pub struct ClassifyBoxes;

impl Pass for ClassifyBoxes {
    fn name(&self) -> &'static str {
        "classify_boxes"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let emitted = properties.require::<EmittedBoxes>("classify_boxes", "EmittedBoxes")?;

        let mut lookup: FxHashMap<Skeleton, usize> = FxHashMap::default();
        let mut classes: Vec<EquivalenceClass> = vec![];

        for &index in &emitted.indices {
            let Some(Operation::Box(b)) = circuit.ops_mut().get_mut(index) else {
                continue;
            };
            if b.anchor_kind().is_none() {
                continue;
            }

            let skeleton = Skeleton::of(b);
            let class = *lookup.entry(skeleton.clone()).or_insert_with(|| {
                classes.push(EquivalenceClass {
                    reference: format!("r{}", classes.len()),
                    skeleton,
                    members: vec![],
                });
                classes.len() - 1
            });

            classes[class].members.push(index);
            b.class_ref = Some(classes[class].reference.clone());
        }

        debug!(
            "Classified {} boxes into {} equivalence classes",
            classes.iter().map(|c| c.members.len()).sum::<usize>(),
            classes.len()
        );

        properties.insert(EquivalenceClasses { classes });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use crate::passes::{CollectBoxes, EmitBoxes, PackBoxes};
    use qbox_ir::{BoxOp, ClbitId, QubitId};

    fn q(n: u32) -> QubitId {
        QubitId(n)
    }

    fn classify(circuit: &mut Circuit) -> EquivalenceClasses {
        let mut props = PropertySet::new();
        PackBoxes::default().run(circuit, &mut props).unwrap();
        CollectBoxes.run(circuit, &mut props).unwrap();
        EmitBoxes.run(circuit, &mut props).unwrap();
        ClassifyBoxes.run(circuit, &mut props).unwrap();
        props.remove::<EquivalenceClasses>().unwrap()
    }

    #[test]
    fn test_repeated_layers_share_a_class() {
        let mut circuit = Circuit::with_size("test", 2, 2);
        circuit
            .h(q(0))
            .unwrap()
            .cx(q(0), q(1))
            .unwrap()
            .rz(0.7, q(1))
            .unwrap()
            .cx(q(0), q(1))
            .unwrap()
            .measure_all()
            .unwrap();

        let classes = classify(&mut circuit);
        assert_eq!(classes.len(), 2);
        assert_eq!(classes.classes()[0].reference, "r0");
        assert_eq!(classes.classes()[0].members, vec![0, 1]);
        assert_eq!(classes.get("r1").unwrap().skeleton.len(), 2);

        let refs: Vec<_> = circuit.boxes().map(|b| b.class_ref.as_deref()).collect();
        assert_eq!(refs, vec![Some("r0"), Some("r0"), Some("r1")]);
    }

    #[test]
    fn test_collectors_are_not_classified() {
        let mut circuit = Circuit::with_size("test", 2, 1);
        circuit
            .measure(q(0), ClbitId(0))
            .unwrap()
            .x(q(1))
            .unwrap();

        let classes = classify(&mut circuit);
        assert_eq!(classes.len(), 1);
        let collector = circuit.boxes().find(|b| b.anchor_kind().is_none()).unwrap();
        assert!(collector.class_ref.is_none());
    }

    #[test]
    fn test_existing_boxes_are_left_alone() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit
            .push_box(BoxOp::left(vec![qbox_ir::Instruction::two_qubit_gate(
                qbox_ir::StandardGate::CZ,
                q(0),
                q(1),
            )]))
            .unwrap();

        let classes = classify(&mut circuit);
        assert!(classes.is_empty());
        assert!(circuit.boxes().all(|b| b.class_ref.is_none()));
    }

    #[test]
    fn test_requires_emitted_boxes() {
        assert!(matches!(
            ClassifyBoxes.run(&mut Circuit::new("empty"), &mut PropertySet::new()),
            Err(CompileError::MissingProperty { .. })
        ));
    }
}
