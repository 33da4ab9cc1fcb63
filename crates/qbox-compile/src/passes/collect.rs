//! Collector synthesis for single-qubit gates no anchor claimed.

use tracing::debug;

use qbox_ir::Circuit;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::plan::{BoxPlan, SlotKind};
use crate::property::PropertySet;

/// Analysis pass that places every still-queued single-qubit gate of the
/// [`BoxPlan`] into a right-dressed collector slot.
///
/// Each qubit's trailing run goes to the first collector its wire can still
/// reach, so runs on different qubits share a collector whenever no other
/// slot on their wires lies in between. A run that trails a disabled anchor
/// joins the collector holding that anchor.
///
/// After this pass, every operation of the circuit belongs to exactly one
/// slot.
pub struct CollectBoxes;

impl Pass for CollectBoxes {
    fn name(&self) -> &'static str {
        "collect_boxes"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, _circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let plan = properties
            .get_mut::<BoxPlan>()
            .ok_or(CompileError::MissingProperty {
                pass: "collect_boxes",
                property: "BoxPlan",
            })?;

        let before = plan.count(SlotKind::Collector);
        let collected = plan.collect(plan.pending_qubits());
        plan.sort_members();

        debug!(
            "Collected {} trailing gates, {} new collector slots",
            collected,
            plan.count(SlotKind::Collector) - before
        );
        Ok(())
    }
}
