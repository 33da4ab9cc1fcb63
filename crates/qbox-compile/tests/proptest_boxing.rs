//! Property-based tests for the boxing pipeline.
//!
//! Random flat circuits are boxed under random valid configurations, and the
//! output is checked against the laws every boxing must satisfy.

use std::collections::{BTreeMap, HashMap, HashSet};

use proptest::prelude::*;
use qbox_compile::{
    BarrierPolicy, BoxingConfig, InjectNoiseStrategy, InjectNoiseTargets, MeasureAnnotations,
    Skeleton, generate_boxing_pass_manager,
};
use qbox_ir::{Circuit, ClbitId, Dressing, Instruction, OpClass, QubitId, WireId};

/// Operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum Op {
    H(u32),
    Rz(f64, u32),
    CX(u32, u32),
    CZ(u32, u32),
    Measure(u32),
    Barrier(Vec<u32>),
}

impl Op {
    fn apply(self, circuit: &mut Circuit) {
        let result = match self {
            Op::H(q) => circuit.h(QubitId(q)),
            Op::Rz(theta, q) => circuit.rz(theta, QubitId(q)),
            Op::CX(c, t) => circuit.cx(QubitId(c), QubitId(t)),
            Op::CZ(a, b) => circuit.cz(QubitId(a), QubitId(b)),
            Op::Measure(q) => circuit.measure(QubitId(q), ClbitId(q)),
            Op::Barrier(qs) => circuit.barrier(qs.into_iter().map(QubitId)),
        };
        result.unwrap();
    }
}

fn arb_pair(num_qubits: u32) -> impl Strategy<Value = (u32, u32)> {
    (0..num_qubits, 0..num_qubits).prop_filter("operands must differ", |(a, b)| a != b)
}

fn arb_op(num_qubits: u32) -> BoxedStrategy<Op> {
    let single = prop_oneof![
        (0..num_qubits).prop_map(Op::H),
        (-3.0_f64..3.0, 0..num_qubits).prop_map(|(t, q)| Op::Rz(t, q)),
        (0..num_qubits).prop_map(Op::Measure),
        prop::collection::btree_set(0..num_qubits, 1..=num_qubits as usize)
            .prop_map(|qs| Op::Barrier(qs.into_iter().collect())),
    ];
    if num_qubits < 2 {
        return single.boxed();
    }
    prop_oneof![
        3 => single,
        2 => arb_pair(num_qubits).prop_map(|(c, t)| Op::CX(c, t)),
        1 => arb_pair(num_qubits).prop_map(|(a, b)| Op::CZ(a, b)),
    ]
    .boxed()
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=5).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_op(num_qubits), 0..=30).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("prop", num_qubits, num_qubits);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

fn arb_config() -> impl Strategy<Value = BoxingConfig> {
    (
        any::<bool>(),
        any::<bool>(),
        prop_oneof![
            Just(BarrierPolicy::Immediately),
            Just(BarrierPolicy::Finally),
            Just(BarrierPolicy::Never),
        ],
        prop_oneof![
            Just(MeasureAnnotations::None),
            Just(MeasureAnnotations::Twirl),
            Just(MeasureAnnotations::BasisTransform),
            Just(MeasureAnnotations::All),
        ],
        prop_oneof![
            Just(InjectNoiseTargets::None),
            Just(InjectNoiseTargets::Gates),
            Just(InjectNoiseTargets::Measures),
            Just(InjectNoiseTargets::All),
        ],
        arb_strategy(),
        any::<bool>(),
    )
        .prop_map(
            |(gates, measures, barriers, annotations, targets, strategy, merge)| BoxingConfig {
                enable_gates: gates,
                enable_measures: measures,
                remove_barriers: barriers,
                measure_annotations: annotations,
                inject_noise_targets: targets,
                inject_noise_strategy: strategy,
                merge_boxes: merge,
                ..BoxingConfig::default()
            },
        )
        .prop_filter("noise targets must be boxed", |c| c.validate().is_ok())
}

fn arb_strategy() -> impl Strategy<Value = InjectNoiseStrategy> {
    prop_oneof![
        Just(InjectNoiseStrategy::NoModification),
        Just(InjectNoiseStrategy::SharedModification),
        Just(InjectNoiseStrategy::IndividualModification),
    ]
}

fn boxed(circuit: &Circuit, config: &BoxingConfig) -> Circuit {
    generate_boxing_pass_manager(config)
        .expect("valid configuration")
        .run_on(circuit.clone())
        .expect("boxing failed")
}

/// The non-barrier instructions seen by each wire, in order.
fn per_wire(circuit: &Circuit) -> BTreeMap<WireId, Vec<Instruction>> {
    let mut wires: BTreeMap<WireId, Vec<Instruction>> = BTreeMap::new();
    for op in circuit.flatten().ops() {
        let Some(inst) = op.as_instruction() else { continue };
        if inst.is_barrier() {
            continue;
        }
        for wire in inst.wires() {
            wires.entry(wire).or_default().push(inst.clone());
        }
    }
    wires
}

proptest! {
    /// Every instruction ends up exactly once in the output, and every wire
    /// sees its instructions in the original order.
    #[test]
    fn test_boxing_preserves_each_wire(circuit in arb_circuit(), config in arb_config()) {
        let out = boxed(&circuit, &config);

        let barriers = |c: &Circuit| c.flatten().instructions().filter(|i| i.is_barrier()).count();
        let kept = if config.remove_barriers == BarrierPolicy::Never { barriers(&circuit) } else { 0 };
        prop_assert_eq!(out.flatten().len(), circuit.len() - barriers(&circuit) + kept);
        prop_assert_eq!(per_wire(&out), per_wire(&circuit));
    }

    /// Only barriers may stay outside new boxes.
    #[test]
    fn test_every_instruction_is_boxed(circuit in arb_circuit(), config in arb_config()) {
        let out = boxed(&circuit, &config);
        prop_assert!(out.instructions().all(Instruction::is_barrier));
    }

    /// Left-dressed boxes hold one layer of enabled anchors of a single kind,
    /// right-dressed boxes hold no enabled anchor.
    #[test]
    fn test_box_contents(circuit in arb_circuit(), config in arb_config()) {
        let out = boxed(&circuit, &config);

        for b in out.boxes() {
            let classes: Vec<_> = b.body.iter().filter_map(Instruction::class).collect();
            prop_assert!(!classes.contains(&OpClass::Barrier));

            let enabled = |c: &OpClass| match c {
                OpClass::TwoQubitGate => config.enable_gates,
                OpClass::Measurement => config.enable_measures,
                _ => false,
            };

            match b.dressing {
                Dressing::Left => {
                    let kind = b.anchor_kind();
                    prop_assert!(kind.is_some_and(|k| enabled(&k)));
                    let mut seen = HashSet::new();
                    for anchor in b.anchors() {
                        prop_assert_eq!(anchor.class(), kind);
                        for q in &anchor.qubits {
                            prop_assert!(seen.insert(*q), "two anchors on {}", q);
                        }
                    }
                }
                Dressing::Right => {
                    prop_assert!(!classes.iter().any(enabled));
                    prop_assert!(b.class_ref.is_none());
                    prop_assert!(b.annotations.is_empty());
                }
            }
        }
    }

    /// Boxing is a pure function of the circuit and the configuration.
    #[test]
    fn test_boxing_is_deterministic(circuit in arb_circuit(), config in arb_config()) {
        prop_assert_eq!(boxed(&circuit, &config), boxed(&circuit, &config));
    }

    /// Equal skeletons get equal references, and unequal skeletons never do.
    #[test]
    fn test_refs_follow_skeletons(circuit in arb_circuit()) {
        let out = boxed(&circuit, &BoxingConfig::default());

        let mut by_ref: HashMap<String, Skeleton> = HashMap::new();
        let mut by_skeleton: HashMap<Skeleton, String> = HashMap::new();
        for b in out.boxes().filter(|b| b.dressing == Dressing::Left) {
            let reference = b.class_ref.clone();
            prop_assert!(reference.is_some());
            let reference = reference.unwrap_or_default();
            let skeleton = Skeleton::of(b);

            let known = by_ref.entry(reference.clone()).or_insert_with(|| skeleton.clone());
            prop_assert_eq!(&*known, &skeleton);
            let known = by_skeleton.entry(skeleton).or_insert_with(|| reference.clone());
            prop_assert_eq!(&*known, &reference);
        }
    }

    /// Modifier references follow the configured strategy.
    #[test]
    fn test_modifier_strategy(circuit in arb_circuit(), strategy in arb_strategy()) {
        let config = BoxingConfig {
            inject_noise_targets: InjectNoiseTargets::All,
            inject_noise_strategy: strategy,
            ..BoxingConfig::default()
        };
        let out = boxed(&circuit, &config);

        let noise: Vec<_> = out.boxes().filter_map(|b| b.inject_noise()).collect();
        prop_assert_eq!(noise.len(), out.boxes().filter(|b| b.dressing == Dressing::Left).count());

        match strategy {
            InjectNoiseStrategy::NoModification => {
                prop_assert!(noise.iter().all(|n| n.modifier_ref.is_empty()));
            }
            InjectNoiseStrategy::SharedModification => {
                prop_assert!(noise.iter().all(|n| n.modifier_ref == n.reference));
            }
            InjectNoiseStrategy::IndividualModification => {
                let distinct: HashSet<_> = noise.iter().map(|n| &n.modifier_ref).collect();
                prop_assert_eq!(distinct.len(), noise.len());
            }
        }
    }

    /// Boxing an already boxed circuit changes nothing.
    #[test]
    fn test_boxing_is_idempotent(circuit in arb_circuit(), config in arb_config()) {
        let once = boxed(&circuit, &config);
        prop_assert_eq!(boxed(&once, &config), once.clone());
    }
}
