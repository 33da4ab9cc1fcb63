//! Pass manager for orchestrating boxing.

use tracing::{debug, info, instrument};

use qbox_ir::{Circuit, Decomposition, QubitId, TwirlGroup};

use crate::config::{
    BarrierPolicy, BoxingConfig, InjectNoiseStrategy, InjectNoiseTargets, MeasureAnnotations,
};
use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{
    AddNoops, AnnotateBoxes, ClassifyBoxes, CollectBoxes, EmitBoxes, MergeBoxes, PackBoxes,
    RemoveBarriers, ValidateInstructions, VerifyBoxing,
};
use crate::property::PropertySet;

/// Manages and executes a sequence of passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given circuit.
    ///
    /// On error the circuit may be partially transformed; the property set
    /// holds whatever the passes before the failing one produced.
    #[instrument(skip(self, circuit, properties), fields(circuit = circuit.name()))]
    pub fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits, {} operations",
            self.passes.len(),
            circuit.num_qubits(),
            circuit.len()
        );

        for pass in &self.passes {
            if pass.should_run(circuit, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), circuit.len());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, boxes: {}, ops: {}",
            circuit.num_boxes(),
            circuit.len()
        );

        Ok(())
    }

    /// Run all passes with a fresh property set and return the boxed circuit.
    pub fn run_on(&self, mut circuit: Circuit) -> CompileResult<Circuit> {
        self.run(&mut circuit, &mut PropertySet::new())?;
        Ok(circuit)
    }

    /// Names of the passes, in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the boxing pipeline.
///
/// ```
/// use qbox_compile::{BoxingPassManagerBuilder, InjectNoiseTargets};
/// use qbox_ir::Circuit;
///
/// let pm = BoxingPassManagerBuilder::new()
///     .with_inject_noise_targets(InjectNoiseTargets::Gates)
///     .build()
///     .unwrap();
///
/// let boxed = pm.run_on(Circuit::bell().unwrap()).unwrap();
/// assert_eq!(boxed.num_boxes(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BoxingPassManagerBuilder {
    config: BoxingConfig,
}

impl BoxingPassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: BoxingConfig) -> Self {
        self.config = config;
        self
    }

    /// Box two-qubit gates.
    #[must_use]
    pub fn with_gates(mut self, enable: bool) -> Self {
        self.config.enable_gates = enable;
        self
    }

    /// Box measurements.
    #[must_use]
    pub fn with_measures(mut self, enable: bool) -> Self {
        self.config.enable_measures = enable;
        self
    }

    /// Set when barriers are removed.
    #[must_use]
    pub fn with_barrier_policy(mut self, policy: BarrierPolicy) -> Self {
        self.config.remove_barriers = policy;
        self
    }

    /// Set the annotations for measurement boxes.
    #[must_use]
    pub fn with_measure_annotations(mut self, annotations: MeasureAnnotations) -> Self {
        self.config.measure_annotations = annotations;
        self
    }

    /// Set which boxes receive an inject-noise annotation.
    #[must_use]
    pub fn with_inject_noise_targets(mut self, targets: InjectNoiseTargets) -> Self {
        self.config.inject_noise_targets = targets;
        self
    }

    /// Set how inject-noise modifiers are chosen.
    #[must_use]
    pub fn with_inject_noise_strategy(mut self, strategy: InjectNoiseStrategy) -> Self {
        self.config.inject_noise_strategy = strategy;
        self
    }

    /// Set the twirling group.
    #[must_use]
    pub fn with_twirling_group(mut self, group: TwirlGroup) -> Self {
        self.config.twirling_group = group;
        self
    }

    /// Set the dressing decomposition.
    #[must_use]
    pub fn with_decomposition(mut self, decomposition: Decomposition) -> Self {
        self.config.decomposition = decomposition;
        self
    }

    /// Merge boxes of single-qubit gates into the box after them.
    #[must_use]
    pub fn with_merge_boxes(mut self, enable: bool) -> Self {
        self.config.merge_boxes = enable;
        self
    }

    /// Extend every box to span `qubits`.
    #[must_use]
    pub fn with_noop_qubits(mut self, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        self.config.noop_qubits = qubits.into_iter().collect();
        self
    }

    /// The configuration built so far.
    pub fn config(&self) -> &BoxingConfig {
        &self.config
    }

    /// Validate the configuration and build the pass manager.
    pub fn build(self) -> CompileResult<PassManager> {
        let config = self.config;
        config.validate()?;

        let mut pm = PassManager::new();
        pm.add_pass(ValidateInstructions);
        if config.remove_barriers == BarrierPolicy::Immediately {
            pm.add_pass(RemoveBarriers);
        }
        pm.add_pass(PackBoxes::new(config.enable_gates, config.enable_measures));
        pm.add_pass(CollectBoxes);
        pm.add_pass(VerifyBoxing);
        pm.add_pass(EmitBoxes);

        // Collectors flushed before a barrier only meet the next box once
        // the barrier is gone.
        let finally = config.remove_barriers == BarrierPolicy::Finally;
        let merge = config.merge_boxes;
        if merge {
            if finally {
                pm.add_pass(RemoveBarriers);
            }
            pm.add_pass(MergeBoxes);
        }

        pm.add_pass(ClassifyBoxes);
        let noop_qubits = config.noop_qubits.clone();
        pm.add_pass(AnnotateBoxes::new(config));
        if finally && !merge {
            pm.add_pass(RemoveBarriers);
        }
        if !noop_qubits.is_empty() {
            pm.add_pass(AddNoops::new(noop_qubits));
        }

        debug!("Built boxing pipeline: {:?}", pm.pass_names());
        Ok(pm)
    }
}

/// Build the boxing pass manager for a configuration.
pub fn generate_boxing_pass_manager(config: &BoxingConfig) -> CompileResult<PassManager> {
    BoxingPassManagerBuilder::new()
        .with_config(config.clone())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use crate::passes::{BoxingSummary, EquivalenceClasses};
    use qbox_ir::QubitId;

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_empty_pass_manager_leaves_circuit() {
        let pm = PassManager::new();
        let mut props = PropertySet::new();

        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let before = circuit.clone();

        pm.run(&mut circuit, &mut props).unwrap();
        assert_eq!(circuit, before);
        assert!(props.is_empty());
    }

    #[test]
    fn test_pipeline_order() {
        let names = |policy| {
            BoxingPassManagerBuilder::new()
                .with_barrier_policy(policy)
                .build()
                .unwrap()
                .pass_names()
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };

        assert_eq!(
            names(BarrierPolicy::Immediately),
            [
                "validate_instructions",
                "remove_barriers",
                "pack_boxes",
                "collect_boxes",
                "verify_boxing",
                "emit_boxes",
                "classify_boxes",
                "annotate_boxes",
            ]
        );
        assert_eq!(names(BarrierPolicy::Finally).last().unwrap(), "remove_barriers");
        assert_eq!(names(BarrierPolicy::Finally).len(), 8);
        assert_eq!(names(BarrierPolicy::Never).len(), 7);
    }

    #[test]
    fn test_pipeline_with_optional_passes() {
        let pm = BoxingPassManagerBuilder::new()
            .with_barrier_policy(BarrierPolicy::Finally)
            .with_merge_boxes(true)
            .with_noop_qubits([QubitId(0)])
            .build()
            .unwrap();

        assert_eq!(
            pm.pass_names(),
            [
                "validate_instructions",
                "pack_boxes",
                "collect_boxes",
                "verify_boxing",
                "emit_boxes",
                "remove_barriers",
                "merge_boxes",
                "classify_boxes",
                "annotate_boxes",
                "add_noops",
            ]
        );
    }

    #[test]
    fn test_build_rejects_incompatible_config() {
        let result = BoxingPassManagerBuilder::new()
            .with_measures(false)
            .with_inject_noise_targets(InjectNoiseTargets::Measures)
            .build();
        assert!(matches!(
            result,
            Err(CompileError::IncompatibleConfiguration { .. })
        ));
    }

    #[test]
    fn test_properties_after_run() {
        let pm = generate_boxing_pass_manager(&BoxingConfig::default()).unwrap();
        let mut circuit = Circuit::ghz(3).unwrap();
        let mut props = PropertySet::new();
        pm.run(&mut circuit, &mut props).unwrap();

        let summary = props.get::<BoxingSummary>().unwrap();
        assert_eq!(summary.gate_boxes, 2);
        assert_eq!(summary.measure_boxes, 1);
        assert_eq!(props.get::<EquivalenceClasses>().unwrap().len(), 3);
        assert_eq!(circuit.num_boxes(), 3);
    }
}
