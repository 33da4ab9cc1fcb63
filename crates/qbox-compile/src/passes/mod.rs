//! Built-in boxing passes.
//!
//! The default pipeline, in order:
//!
//! | Pass | Kind | Reads | Writes |
//! |------|------|-------|--------|
//! | [`ValidateInstructions`] | analysis | | |
//! | [`RemoveBarriers`] | transformation | | |
//! | [`PackBoxes`] | analysis | | [`BoxPlan`](crate::BoxPlan) |
//! | [`CollectBoxes`] | analysis | `BoxPlan` | `BoxPlan` |
//! | [`VerifyBoxing`] | analysis | `BoxPlan` | [`BoxingSummary`] |
//! | [`EmitBoxes`] | transformation | `BoxPlan` | [`EmittedBoxes`] |
//! | [`ClassifyBoxes`] | transformation | `EmittedBoxes` | [`EquivalenceClasses`] |
//! | [`AnnotateBoxes`] | transformation | `EmittedBoxes` | |
//!
//! `RemoveBarriers` runs either before packing or after annotation, depending
//! on [`BarrierPolicy`](crate::BarrierPolicy).
//!
//! Two optional passes follow the same shape. [`MergeBoxes`] runs between
//! emission and classification, after `RemoveBarriers` when barriers are
//! removed at the end. [`AddNoops`] runs last.

pub mod annotate;
pub mod barriers;
pub mod classify;
pub mod collect;
pub mod emit;
pub mod merge;
pub mod noops;
pub mod pack;
pub mod skeleton;
pub mod validate;
pub mod verify;

pub use annotate::AnnotateBoxes;
pub use barriers::RemoveBarriers;
pub use classify::{ClassifyBoxes, EquivalenceClass, EquivalenceClasses};
pub use collect::CollectBoxes;
pub use emit::{EmitBoxes, EmittedBoxes};
pub use merge::MergeBoxes;
pub use noops::AddNoops;
pub use pack::PackBoxes;
pub use skeleton::Skeleton;
pub use validate::ValidateInstructions;
pub use verify::{BoxingSummary, VerifyBoxing};
