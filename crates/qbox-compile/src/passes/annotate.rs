//! Annotation of emitted boxes.

use tracing::debug;

use qbox_ir::{Circuit, InjectNoise, OpClass, Operation};

use crate::config::{BoxingConfig, InjectNoiseStrategy};
use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::passes::emit::EmittedBoxes;
use crate::property::PropertySet;

/// Transformation pass that attaches annotations to the boxes created in
/// this run.
///
/// | Box | Annotations |
/// |-----|-------------|
/// | two-qubit gates | `Twirl` |
/// | measurements | per `measure_annotations` |
/// | targeted by `inject_noise_targets` | `InjectNoise` with the box's `class_ref` |
/// | collector | none |
///
/// Re-running the pass replaces annotations rather than adding to them, and
/// modifier identifiers restart from `m0`, so the result only depends on the
/// circuit and the configuration.
pub struct AnnotateBoxes {
    config: BoxingConfig,
}

impl AnnotateBoxes {
    /// Create an annotation pass for a configuration.
    pub fn new(config: BoxingConfig) -> Self {
        Self { config }
    }
}

impl Pass for AnnotateBoxes {
    fn name(&self) -> &'static str {
        "annotate_boxes"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let emitted = properties.require::<EmittedBoxes>("annotate_boxes", "EmittedBoxes")?;
        let config = &self.config;
        let twirl = config.twirl();
        let basis_transform = config.basis_transform();

        let mut next_modifier = 0usize;
        let mut annotated = 0usize;

        for &index in &emitted.indices {
            let Some(Operation::Box(b)) = circuit.ops_mut().get_mut(index) else {
                continue;
            };

            let inject = match b.anchor_kind() {
                Some(OpClass::TwoQubitGate) => {
                    b.annotate(twirl);
                    config.inject_noise_targets.gates()
                }
                Some(OpClass::Measurement) => {
                    if config.measure_annotations.twirl() {
                        b.annotate(twirl);
                    }
                    if config.measure_annotations.basis_transform() {
                        b.annotate(basis_transform);
                    }
                    config.inject_noise_targets.measures()
                }
                _ => continue,
            };

            if inject {
                let reference = b.class_ref.clone().ok_or(CompileError::MissingProperty {
                    pass: "annotate_boxes",
                    property: "class_ref",
                })?;
                let modifier_ref = match config.inject_noise_strategy {
                    InjectNoiseStrategy::NoModification => String::new(),
                    InjectNoiseStrategy::SharedModification => reference.clone(),
                    InjectNoiseStrategy::IndividualModification => {
                        next_modifier += 1;
                        format!("m{}", next_modifier - 1)
                    }
                };
                b.annotate(InjectNoise::new(reference).with_modifier(modifier_ref));
            }
            annotated += 1;
        }

        debug!(
            "Annotated {} boxes, {} individual modifiers",
            annotated, next_modifier
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InjectNoiseTargets, MeasureAnnotations};
    use crate::passes::{ClassifyBoxes, CollectBoxes, EmitBoxes, PackBoxes};
    use qbox_ir::{AnnotationKind, BasisMode, ClbitId, QubitId};

    fn q(n: u32) -> QubitId {
        QubitId(n)
    }

    fn sample() -> Circuit {
        let mut circuit = Circuit::with_size("test", 2, 2);
        circuit
            .sx(q(0))
            .unwrap()
            .cz(q(0), q(1))
            .unwrap()
            .sx(q(1))
            .unwrap()
            .cz(q(0), q(1))
            .unwrap()
            .measure(q(0), ClbitId(0))
            .unwrap()
            .rz(1.0, q(1))
            .unwrap();
        circuit
    }

    fn annotate(config: BoxingConfig) -> Circuit {
        let mut circuit = sample();
        let mut props = PropertySet::new();
        PackBoxes::default().run(&mut circuit, &mut props).unwrap();
        CollectBoxes.run(&mut circuit, &mut props).unwrap();
        EmitBoxes.run(&mut circuit, &mut props).unwrap();
        ClassifyBoxes.run(&mut circuit, &mut props).unwrap();
        AnnotateBoxes::new(config).run(&mut circuit, &mut props).unwrap();
        circuit
    }

    #[test]
    fn test_default_annotations() {
        let circuit = annotate(BoxingConfig::default());
        let boxes: Vec<_> = circuit.boxes().collect();
        assert_eq!(boxes.len(), 4);

        // gate, gate, measure, collector
        assert!(boxes[0].twirl().is_some());
        assert!(boxes[1].twirl().is_some());
        assert!(boxes[2].twirl().is_some());
        assert!(boxes[2].basis_transform().is_none());
        assert!(boxes[3].annotations.is_empty());
        assert!(boxes.iter().all(|b| b.inject_noise().is_none()));
    }

    #[test]
    fn test_measure_basis_transform_only() {
        let circuit = annotate(BoxingConfig {
            measure_annotations: MeasureAnnotations::BasisTransform,
            ..BoxingConfig::default()
        });
        let measure = circuit
            .boxes()
            .find(|b| b.anchor_kind() == Some(OpClass::Measurement))
            .unwrap();
        assert!(measure.twirl().is_none());
        assert_eq!(
            measure.basis_transform().map(|t| t.mode),
            Some(BasisMode::Measure)
        );
    }

    #[test]
    fn test_measure_annotations_none() {
        let circuit = annotate(BoxingConfig {
            measure_annotations: MeasureAnnotations::None,
            inject_noise_targets: InjectNoiseTargets::Measures,
            ..BoxingConfig::default()
        });
        let measure = circuit
            .boxes()
            .find(|b| b.anchor_kind() == Some(OpClass::Measurement))
            .unwrap();
        let kinds: Vec<_> = measure.annotations.iter().map(|a| a.kind()).collect();
        assert_eq!(kinds, vec![AnnotationKind::InjectNoise]);
    }

    #[test]
    fn test_modifier_strategies() {
        let refs = |strategy| {
            let circuit = annotate(BoxingConfig {
                inject_noise_targets: InjectNoiseTargets::All,
                inject_noise_strategy: strategy,
                ..BoxingConfig::default()
            });
            circuit
                .boxes()
                .filter_map(|b| b.inject_noise())
                .map(|n| (n.reference.clone(), n.modifier_ref.clone()))
                .collect::<Vec<_>>()
        };

        let pairs = |v: &[(&str, &str)]| {
            v.iter()
                .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
                .collect::<Vec<_>>()
        };

        assert_eq!(
            refs(InjectNoiseStrategy::NoModification),
            pairs(&[("r0", ""), ("r0", ""), ("r1", "")])
        );
        assert_eq!(
            refs(InjectNoiseStrategy::SharedModification),
            pairs(&[("r0", "r0"), ("r0", "r0"), ("r1", "r1")])
        );
        assert_eq!(
            refs(InjectNoiseStrategy::IndividualModification),
            pairs(&[("r0", "m0"), ("r0", "m1"), ("r1", "m2")])
        );
    }

    #[test]
    fn test_running_twice_is_stable() {
        let config = BoxingConfig {
            inject_noise_targets: InjectNoiseTargets::Gates,
            inject_noise_strategy: InjectNoiseStrategy::IndividualModification,
            ..BoxingConfig::default()
        };
        let mut circuit = sample();
        let mut props = PropertySet::new();
        PackBoxes::default().run(&mut circuit, &mut props).unwrap();
        CollectBoxes.run(&mut circuit, &mut props).unwrap();
        EmitBoxes.run(&mut circuit, &mut props).unwrap();
        ClassifyBoxes.run(&mut circuit, &mut props).unwrap();

        let pass = AnnotateBoxes::new(config);
        pass.run(&mut circuit, &mut props).unwrap();
        let once = circuit.clone();
        pass.run(&mut circuit, &mut props).unwrap();
        assert_eq!(circuit, once);
    }

    #[test]
    fn test_unclassified_target_is_an_error() {
        let mut circuit = sample();
        let mut props = PropertySet::new();
        PackBoxes::default().run(&mut circuit, &mut props).unwrap();
        CollectBoxes.run(&mut circuit, &mut props).unwrap();
        EmitBoxes.run(&mut circuit, &mut props).unwrap();

        let pass = AnnotateBoxes::new(BoxingConfig {
            inject_noise_targets: InjectNoiseTargets::Gates,
            ..BoxingConfig::default()
        });
        assert!(matches!(
            pass.run(&mut circuit, &mut props),
            Err(CompileError::MissingProperty {
                property: "class_ref",
                ..
            })
        ));
    }
}
