//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::box_op::BoxOp;
use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId, WireId};

/// A top-level entry of a circuit: a bare instruction or a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// A bare instruction.
    Instruction(Instruction),
    /// A box of instructions.
    Box(BoxOp),
}

impl Operation {
    /// Qubits this operation touches.
    pub fn qubits(&self) -> &[QubitId] {
        match self {
            Operation::Instruction(inst) => &inst.qubits,
            Operation::Box(b) => &b.qubits,
        }
    }

    /// Classical bits this operation touches.
    pub fn clbits(&self) -> &[ClbitId] {
        match self {
            Operation::Instruction(inst) => &inst.clbits,
            Operation::Box(b) => &b.clbits,
        }
    }

    /// Iterate over every wire this operation touches, qubits first.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + '_ {
        self.qubits()
            .iter()
            .copied()
            .map(WireId::from)
            .chain(self.clbits().iter().copied().map(WireId::from))
    }

    /// Get the name of the operation.
    pub fn name(&self) -> &str {
        match self {
            Operation::Instruction(inst) => inst.name(),
            Operation::Box(_) => "box",
        }
    }

    /// Get the instruction if this is a bare instruction.
    pub fn as_instruction(&self) -> Option<&Instruction> {
        match self {
            Operation::Instruction(inst) => Some(inst),
            Operation::Box(_) => None,
        }
    }

    /// Get the box if this is a box.
    pub fn as_box(&self) -> Option<&BoxOp> {
        match self {
            Operation::Box(b) => Some(b),
            Operation::Instruction(_) => None,
        }
    }
}

impl From<Instruction> for Operation {
    fn from(inst: Instruction) -> Self {
        Operation::Instruction(inst)
    }
}

impl From<BoxOp> for Operation {
    fn from(b: BoxOp) -> Self {
        Operation::Box(b)
    }
}

/// A quantum circuit.
///
/// The circuit is an ordered list of [`Operation`]s over a fixed number of
/// qubits and classical bits. The position of an operation is its index in
/// that list. Before boxing every operation is a bare instruction; after
/// boxing most of them live inside [`BoxOp`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Number of classical bits.
    #[serde(default)]
    num_clbits: u32,
    /// Top-level operations in program order.
    #[serde(default)]
    ops: Vec<Operation>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_size(name, 0, 0)
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            ops: vec![],
        }
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.num_clbits);
        self.num_clbits += 1;
        id
    }

    /// Create an empty circuit over the same qubits and classical bits.
    pub fn copy_empty_like(&self) -> Self {
        Self::with_size(self.name.clone(), self.num_qubits, self.num_clbits)
    }

    fn check_operands(&self, qubits: &[QubitId], clbits: &[ClbitId], op_name: &str) -> IrResult<()> {
        if let Some(q) = qubits.iter().find(|q| q.0 >= self.num_qubits) {
            return Err(IrError::QubitNotFound {
                qubit: *q,
                op_name: Some(op_name.to_string()),
            });
        }
        if let Some(c) = clbits.iter().find(|c| c.0 >= self.num_clbits) {
            return Err(IrError::ClbitNotFound {
                clbit: *c,
                op_name: Some(op_name.to_string()),
            });
        }
        Ok(())
    }

    /// Append a raw instruction.
    ///
    /// Only operand existence is checked. Arity and duplicate operands are
    /// left to [`Instruction::validate`], so a malformed instruction can be
    /// stored and rejected later by the pass that consumes it.
    pub fn append(&mut self, inst: Instruction) -> IrResult<&mut Self> {
        self.check_operands(&inst.qubits, &inst.clbits, inst.name())?;
        self.ops.push(Operation::Instruction(inst));
        Ok(self)
    }

    /// Append a box.
    pub fn push_box(&mut self, b: BoxOp) -> IrResult<&mut Self> {
        self.check_operands(&b.qubits, &b.clbits, "box")?;
        self.ops.push(Operation::Box(b));
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::S, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::T, qubit))
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::SX, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Rx(theta), qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Ry(theta), qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::CZ, control, target))
    }

    /// Apply echoed cross-resonance gate.
    pub fn ecr(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::ECR, q1, q2))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::gate(gate, qubits))
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.append(Instruction::measure(qubit, clbit))
    }

    /// Measure every qubit into the classical bit with the same index.
    ///
    /// Classical bits are added when the circuit has fewer than qubits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.num_clbits < self.num_qubits {
            self.add_clbit();
        }
        for i in 0..self.num_qubits {
            self.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(self)
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.append(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits().collect();
        self.barrier(qubits)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Iterate over the qubits in the circuit.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + use<> {
        (0..self.num_qubits).map(QubitId)
    }

    /// Iterate over the classical bits in the circuit.
    pub fn clbits(&self) -> impl Iterator<Item = ClbitId> + use<> {
        (0..self.num_clbits).map(ClbitId)
    }

    /// Get the top-level operations.
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    /// Get a mutable reference to the top-level operations.
    pub fn ops_mut(&mut self) -> &mut Vec<Operation> {
        &mut self.ops
    }

    /// Replace the top-level operations, returning the old ones.
    pub fn replace_ops(&mut self, ops: Vec<Operation>) -> Vec<Operation> {
        std::mem::replace(&mut self.ops, ops)
    }

    /// Number of top-level operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the circuit has no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over the top-level bare instructions.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.ops.iter().filter_map(Operation::as_instruction)
    }

    /// Iterate over the boxes.
    pub fn boxes(&self) -> impl Iterator<Item = &BoxOp> {
        self.ops.iter().filter_map(Operation::as_box)
    }

    /// Iterate mutably over the boxes, including ones that already existed
    /// before boxing.
    pub fn boxes_mut(&mut self) -> impl Iterator<Item = &mut BoxOp> {
        self.ops.iter_mut().filter_map(|op| match op {
            Operation::Box(b) => Some(b),
            Operation::Instruction(_) => None,
        })
    }

    /// Number of boxes.
    pub fn num_boxes(&self) -> usize {
        self.boxes().count()
    }

    /// Number of instructions, counting the contents of boxes.
    pub fn num_instructions(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                Operation::Instruction(_) => 1,
                Operation::Box(b) => b.len(),
            })
            .sum()
    }

    /// Inline every box, producing a flat instruction stream.
    ///
    /// Annotations and equivalence classes are dropped.
    #[must_use]
    pub fn flatten(&self) -> Self {
        let mut flat = self.copy_empty_like();
        for op in &self.ops {
            match op {
                Operation::Instruction(inst) => flat.ops.push(Operation::Instruction(inst.clone())),
                Operation::Box(b) => flat
                    .ops
                    .extend(b.body.iter().cloned().map(Operation::Instruction)),
            }
        }
        flat
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        let q0 = QubitId(0);
        let q1 = QubitId(1);

        circuit
            .h(q0)?
            .cx(q0, q1)?
            .measure(q0, ClbitId(0))?
            .measure(q1, ClbitId(1))?;

        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size("ghz", n, n);
        if n == 0 {
            return Ok(circuit);
        }

        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        circuit.measure_all()?;

        Ok(circuit)
    }
}
