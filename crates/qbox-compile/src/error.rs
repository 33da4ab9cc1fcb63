//! Error types for the compilation crate.

use qbox_ir::IrError;
use thiserror::Error;

use crate::config::InjectNoiseTargets;

/// Errors that can occur while boxing a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// An instruction's operands do not fit its kind.
    #[error("Malformed instruction at position {position}: {source}")]
    MalformedInstruction {
        /// Index of the instruction in the circuit.
        position: usize,
        /// What is wrong with it.
        #[source]
        source: IrError,
    },

    /// Noise injection targets a box kind that is not being built.
    #[error("Cannot inject noise into '{targets}' boxes while {disabled} is false")]
    IncompatibleConfiguration {
        /// The requested injection targets.
        targets: InjectNoiseTargets,
        /// The option that disables the targeted kind.
        disabled: &'static str,
    },

    /// An option could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A pass ran before the pass that provides its input.
    #[error("Pass '{pass}' requires property '{property}'")]
    MissingProperty {
        /// The pass that needed the property.
        pass: &'static str,
        /// The missing property.
        property: &'static str,
    },

    /// The box plan breaks a structural invariant.
    #[error("Boxing violation: {0}")]
    BoxingViolation(String),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
