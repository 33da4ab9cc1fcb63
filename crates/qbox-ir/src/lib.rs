//! qbox Circuit Intermediate Representation
//!
//! This crate provides the circuit model the boxing passes read and write:
//! a flat stream of instructions before boxing, and a stream of annotated
//! boxes after it.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`] and [`WireId`]
//! - **Gates**: [`Gate`], either a [`StandardGate`] or a [`CustomGate`]
//!   known only by name and arity
//! - **Instructions**: [`Instruction`] combining an operation with its
//!   operands, classified for boxing by [`OpClass`]
//! - **Boxes**: [`BoxOp`], a dressed group of instructions carrying
//!   [`Annotation`]s
//! - **Circuit**: [`Circuit`], an ordered list of [`Operation`]s
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qbox_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.len(), 4);
//! ```
//!
//! # Example: A Box by Hand
//!
//! ```rust
//! use qbox_ir::{BoxOp, Instruction, OpClass, QubitId, StandardGate, Twirl};
//!
//! let mut b = BoxOp::left(vec![
//!     Instruction::single_qubit_gate(StandardGate::SX, QubitId(1)),
//!     Instruction::two_qubit_gate(StandardGate::ECR, QubitId(0), QubitId(1)),
//! ]);
//! b.annotate(Twirl::default());
//!
//! assert_eq!(b.anchor_kind(), Some(OpClass::TwoQubitGate));
//! assert!(b.twirl().is_some());
//! ```

pub mod annotation;
pub mod box_op;
pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use annotation::{
    Annotation, AnnotationKind, BasisMode, BasisTransform, Decomposition, Dressing, InjectNoise,
    Twirl, TwirlGroup,
};
pub use box_op::BoxOp;
pub use circuit::{Circuit, Operation};
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind, OpClass};
pub use qubit::{ClbitId, QubitId, WireId};
