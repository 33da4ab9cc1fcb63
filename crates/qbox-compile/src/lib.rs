//! Qbox boxing passes.
//!
//! This crate groups the instructions of a flat circuit into annotated boxes
//! for noise learning and Pauli twirling. It uses a pass-based architecture:
//! each stage reads and writes a shared [`PropertySet`], and a
//! [`PassManager`] runs the stages in order.
//!
//! # Architecture
//!
//! ```text
//! Input Circuit (flat, maybe with barriers and boxes)
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (BoxPlan, BoxingSummary, EquivalenceClasses)
//! └─────────────┘
//!       │
//!       ├── ValidateInstructions
//!       ├── RemoveBarriers          (barrier policy "immediately")
//!       ├── PackBoxes / CollectBoxes / VerifyBoxing
//!       ├── EmitBoxes
//!       ├── MergeBoxes              (optional)
//!       ├── ClassifyBoxes / AnnotateBoxes
//!       ├── RemoveBarriers          (barrier policy "finally")
//!       └── AddNoops                (optional)
//!       │
//!       ▼
//! Output Circuit (boxed and annotated)
//! ```
//!
//! # Example
//!
//! ```rust
//! use qbox_compile::{generate_boxing_pass_manager, BoxingConfig, InjectNoiseTargets};
//! use qbox_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("layers", 4, 0);
//! circuit
//!     .cx(QubitId(1), QubitId(2))
//!     .unwrap()
//!     .cx(QubitId(1), QubitId(0))
//!     .unwrap()
//!     .cx(QubitId(2), QubitId(3))
//!     .unwrap();
//!
//! let config = BoxingConfig {
//!     inject_noise_targets: InjectNoiseTargets::Gates,
//!     ..BoxingConfig::default()
//! };
//! let pm = generate_boxing_pass_manager(&config).unwrap();
//! let boxed = pm.run_on(circuit).unwrap();
//!
//! // Two layers of two-qubit gates.
//! assert_eq!(boxed.num_boxes(), 2);
//! assert!(boxed.boxes().all(|b| b.twirl().is_some()));
//! assert_eq!(boxed.boxes().nth(1).unwrap().len(), 2);
//! ```
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to add a stage:
//!
//! ```rust
//! use qbox_compile::{CompileResult, Pass, PassKind, PropertySet};
//! use qbox_ir::Circuit;
//!
//! struct CountBoxes;
//!
//! impl Pass for CountBoxes {
//!     fn name(&self) -> &str { "count_boxes" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, circuit: &mut Circuit, props: &mut PropertySet) -> CompileResult<()> {
//!         props.insert(circuit.num_boxes());
//!         Ok(())
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod pass;
pub mod plan;
pub mod property;

// Built-in passes
pub mod passes;

pub use config::{
    BarrierPolicy, BoxingConfig, InjectNoiseStrategy, InjectNoiseTargets, MeasureAnnotations,
};
pub use error::{CompileError, CompileResult};
pub use manager::{BoxingPassManagerBuilder, PassManager, generate_boxing_pass_manager};
pub use pass::{Pass, PassKind};
pub use passes::{BoxingSummary, EmittedBoxes, EquivalenceClass, EquivalenceClasses, Skeleton};
pub use plan::{BoxPlan, Slot, SlotKind};
pub use property::PropertySet;
