//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use qbox_compile::{
    BarrierPolicy, BoxingConfig, InjectNoiseStrategy, InjectNoiseTargets, MeasureAnnotations,
};
use qbox_ir::{Decomposition, QubitId, TwirlGroup};

/// Qbox - group circuit instructions into annotated boxes for noise learning
#[derive(Debug, Parser)]
#[command(name = "qbox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Group a circuit into annotated boxes
    Box(BoxArgs),

    /// Inline every box of a circuit
    Flatten {
        /// Input circuit (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to <input>_flat.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// Arguments of `qbox box`.
///
/// Flags override the values read from `--config`.
#[derive(Debug, Args)]
pub struct BoxArgs {
    /// Input circuit (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file (defaults to <input>_boxed.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Boxing configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Do not box two-qubit gates
    #[arg(long)]
    pub no_gates: bool,

    /// Do not box measurements
    #[arg(long)]
    pub no_measures: bool,

    /// When to remove barriers
    #[arg(long, value_enum)]
    pub remove_barriers: Option<BarrierPolicy>,

    /// Annotations for measurement boxes
    #[arg(long, value_enum)]
    pub measure_annotations: Option<MeasureAnnotations>,

    /// Boxes that receive an inject-noise annotation
    #[arg(long, value_enum)]
    pub inject_noise_targets: Option<InjectNoiseTargets>,

    /// How inject-noise modifiers are chosen
    #[arg(long, value_enum)]
    pub inject_noise_strategy: Option<InjectNoiseStrategy>,

    /// Twirling group
    #[arg(long, value_enum)]
    pub twirling_group: Option<TwirlGroup>,

    /// Decomposition of dressing gates
    #[arg(long, value_enum)]
    pub decomposition: Option<Decomposition>,

    /// Merge boxes of single-qubit gates into the box after them
    #[arg(long)]
    pub merge_boxes: bool,

    /// Extend every box to these qubits (comma-separated indices)
    #[arg(long, value_delimiter = ',')]
    pub noop_qubits: Option<Vec<u32>>,
}

impl BoxArgs {
    /// Apply the flags on top of a base configuration.
    pub fn apply(&self, mut config: BoxingConfig) -> BoxingConfig {
        if self.no_gates {
            config.enable_gates = false;
        }
        if self.no_measures {
            config.enable_measures = false;
        }
        if let Some(policy) = self.remove_barriers {
            config.remove_barriers = policy;
        }
        if let Some(annotations) = self.measure_annotations {
            config.measure_annotations = annotations;
        }
        if let Some(targets) = self.inject_noise_targets {
            config.inject_noise_targets = targets;
        }
        if let Some(strategy) = self.inject_noise_strategy {
            config.inject_noise_strategy = strategy;
        }
        if let Some(group) = self.twirling_group {
            config.twirling_group = group;
        }
        if let Some(decomposition) = self.decomposition {
            config.decomposition = decomposition;
        }
        if self.merge_boxes {
            config.merge_boxes = true;
        }
        if let Some(qubits) = &self.noop_qubits {
            config.noop_qubits = qubits.iter().copied().map(QubitId).collect();
        }
        config
    }
}
