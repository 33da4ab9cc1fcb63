//! Circuit instructions combining operations with operands.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId, WireId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(Gate),
    /// Measurement of one qubit into one classical bit.
    Measure,
    /// Barrier (synchronization point).
    Barrier,
}

/// How the boxing passes see an instruction.
///
/// Two-qubit gates and measurements are the *anchors* that seed boxes;
/// single-qubit gates dress them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpClass {
    /// A gate acting on one qubit.
    SingleQubitGate,
    /// A gate acting on two qubits.
    TwoQubitGate,
    /// A single-qubit measurement.
    Measurement,
    /// A barrier over one or more qubits.
    Barrier,
}

impl OpClass {
    /// Whether this class can anchor a box.
    #[inline]
    pub fn is_anchor(self) -> bool {
        matches!(self, OpClass::TwoQubitGate | OpClass::Measurement)
    }
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
    /// Classical bits this instruction operates on (for measure).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Barrier => "barrier",
        }
    }

    /// Classify the instruction for boxing.
    ///
    /// Returns `None` for gates wider than two qubits, which no box can hold.
    /// The class reflects the declared kind, not the operand count; call
    /// [`validate`](Self::validate) to check that the two agree.
    pub fn class(&self) -> Option<OpClass> {
        match &self.kind {
            InstructionKind::Gate(g) => match g.num_qubits() {
                1 => Some(OpClass::SingleQubitGate),
                2 => Some(OpClass::TwoQubitGate),
                _ => None,
            },
            InstructionKind::Measure => Some(OpClass::Measurement),
            InstructionKind::Barrier => Some(OpClass::Barrier),
        }
    }

    /// Iterate over every wire this instruction touches, qubits first.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + '_ {
        self.qubits
            .iter()
            .copied()
            .map(WireId::from)
            .chain(self.clbits.iter().copied().map(WireId::from))
    }

    /// Check that the operands match the instruction kind.
    pub fn validate(&self) -> IrResult<()> {
        for (i, q) in self.qubits.iter().enumerate() {
            if self.qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    op_name: Some(self.name().to_string()),
                });
            }
        }

        match &self.kind {
            InstructionKind::Gate(g) => {
                let expected = g.num_qubits();
                let got = u32::try_from(self.qubits.len()).unwrap_or(u32::MAX);
                if expected != got {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: g.name().to_string(),
                        expected,
                        got,
                    });
                }
                if !(1..=2).contains(&expected) {
                    return Err(self.malformed(format!(
                        "{expected}-qubit gates are not supported"
                    )));
                }
                if !self.clbits.is_empty() {
                    return Err(self.malformed("gates cannot write classical bits".into()));
                }
            }
            InstructionKind::Measure => {
                if self.qubits.len() != 1 || self.clbits.len() != 1 {
                    return Err(self.malformed(format!(
                        "expected 1 qubit and 1 clbit, got {} and {}",
                        self.qubits.len(),
                        self.clbits.len()
                    )));
                }
            }
            InstructionKind::Barrier => {
                if self.qubits.is_empty() {
                    return Err(self.malformed("barrier spans no qubits".into()));
                }
                if !self.clbits.is_empty() {
                    return Err(self.malformed("barriers cannot span classical bits".into()));
                }
            }
        }

        Ok(())
    }

    fn malformed(&self, reason: String) -> IrError {
        IrError::MalformedInstruction {
            op_name: self.name().to_string(),
            reason,
        }
    }
}
