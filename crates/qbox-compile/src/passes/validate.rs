//! Operand checks that run before any packing.

use qbox_ir::{Circuit, IrError, Operation};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Analysis pass that rejects circuits the packer cannot box.
///
/// Every instruction, including the contents of boxes already in the
/// circuit, must have operands that fit its kind and that exist in the
/// circuit. The first offending instruction aborts the run.
pub struct ValidateInstructions;

impl Pass for ValidateInstructions {
    fn name(&self) -> &'static str {
        "validate_instructions"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, _properties: &mut PropertySet) -> CompileResult<()> {
        let num_qubits = circuit.num_qubits();
        let num_clbits = circuit.num_clbits();

        for (position, op) in circuit.ops().iter().enumerate() {
            let body = match op {
                Operation::Instruction(inst) => std::slice::from_ref(inst),
                Operation::Box(b) => b.body.as_slice(),
            };
            for inst in body {
                let malformed = |source| CompileError::MalformedInstruction { position, source };

                if let Some(q) = inst.qubits.iter().find(|q| q.0 as usize >= num_qubits) {
                    return Err(malformed(IrError::QubitNotFound {
                        qubit: *q,
                        op_name: Some(inst.name().to_string()),
                    }));
                }
                if let Some(c) = inst.clbits.iter().find(|c| c.0 as usize >= num_clbits) {
                    return Err(malformed(IrError::ClbitNotFound {
                        clbit: *c,
                        op_name: Some(inst.name().to_string()),
                    }));
                }
                inst.validate().map_err(malformed)?;
            }
        }

        Ok(())
    }
}
