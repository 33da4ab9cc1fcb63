//! Boxing configuration.
//!
//! [`BoxingConfig`] is read once when a pass manager is built. Every field
//! has a default, so a config file only needs to name what it changes:
//!
//! ```
//! use qbox_compile::{BarrierPolicy, BoxingConfig, InjectNoiseTargets};
//!
//! let config: BoxingConfig = serde_json::from_str(
//!     r#"{"inject_noise_targets": "gates", "remove_barriers": false}"#,
//! )
//! .unwrap();
//!
//! assert!(config.enable_gates);
//! assert_eq!(config.inject_noise_targets, InjectNoiseTargets::Gates);
//! assert_eq!(config.remove_barriers, BarrierPolicy::Never);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use qbox_ir::{
    BasisMode, BasisTransform, Decomposition, Dressing, QubitId, Twirl, TwirlGroup,
};

use crate::error::{CompileError, CompileResult};

/// Implements `Display` and `FromStr` over the snake_case option names.
macro_rules! option_names {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// All accepted option names.
            pub const NAMES: &'static [&'static str] = &[$($name),+];
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($ty::$variant => write!(f, $name)),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = CompileError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(CompileError::InvalidConfiguration(format!(
                        "unknown {} '{other}', expected one of: {}",
                        stringify!($ty),
                        Self::NAMES.join(", "),
                    ))),
                }
            }
        }
    };
}

/// When barriers are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "BarrierPolicyRepr")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
pub enum BarrierPolicy {
    /// Drop barriers before packing; they do not constrain boxes.
    #[default]
    Immediately,
    /// Pack with barriers as hard separators, then drop them.
    Finally,
    /// Pack with barriers as hard separators and keep them.
    Never,
}

option_names!(BarrierPolicy {
    Immediately => "immediately",
    Finally => "finally",
    Never => "never",
});

impl BarrierPolicy {
    /// Whether barriers separate boxes during packing.
    pub fn separates(self) -> bool {
        !matches!(self, BarrierPolicy::Immediately)
    }
}

impl From<bool> for BarrierPolicy {
    fn from(remove: bool) -> Self {
        if remove {
            BarrierPolicy::Immediately
        } else {
            BarrierPolicy::Never
        }
    }
}

/// Accepts the boolean form of `remove_barriers` alongside the named one.
#[derive(Deserialize)]
#[serde(untagged)]
enum BarrierPolicyRepr {
    Flag(bool),
    Name(String),
}

impl TryFrom<BarrierPolicyRepr> for BarrierPolicy {
    type Error = CompileError;

    fn try_from(repr: BarrierPolicyRepr) -> Result<Self, Self::Error> {
        match repr {
            BarrierPolicyRepr::Flag(remove) => Ok(remove.into()),
            BarrierPolicyRepr::Name(name) => name.parse(),
        }
    }
}

/// Annotations attached to measurement boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
pub enum MeasureAnnotations {
    /// No annotations.
    None,
    /// Twirl only.
    #[default]
    Twirl,
    /// Basis transform only.
    BasisTransform,
    /// Twirl and basis transform.
    All,
}

option_names!(MeasureAnnotations {
    None => "none",
    Twirl => "twirl",
    BasisTransform => "basis_transform",
    All => "all",
});

impl MeasureAnnotations {
    /// Whether measurement boxes are twirled.
    pub fn twirl(self) -> bool {
        matches!(self, MeasureAnnotations::Twirl | MeasureAnnotations::All)
    }

    /// Whether measurement boxes get a basis transform.
    pub fn basis_transform(self) -> bool {
        matches!(
            self,
            MeasureAnnotations::BasisTransform | MeasureAnnotations::All
        )
    }
}

/// Box kinds that receive an inject-noise annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
pub enum InjectNoiseTargets {
    /// No boxes.
    #[default]
    None,
    /// Two-qubit gate boxes.
    Gates,
    /// Measurement boxes.
    Measures,
    /// Both.
    All,
}

option_names!(InjectNoiseTargets {
    None => "none",
    Gates => "gates",
    Measures => "measures",
    All => "all",
});

impl InjectNoiseTargets {
    /// Whether gate boxes are targeted.
    pub fn gates(self) -> bool {
        matches!(self, InjectNoiseTargets::Gates | InjectNoiseTargets::All)
    }

    /// Whether measurement boxes are targeted.
    pub fn measures(self) -> bool {
        matches!(self, InjectNoiseTargets::Measures | InjectNoiseTargets::All)
    }
}

/// How the `modifier_ref` of inject-noise annotations is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
pub enum InjectNoiseStrategy {
    /// Every box uses the empty modifier.
    #[default]
    NoModification,
    /// Every box in an equivalence class shares one modifier.
    SharedModification,
    /// Every box gets its own modifier.
    IndividualModification,
}

option_names!(InjectNoiseStrategy {
    NoModification => "no_modification",
    SharedModification => "shared_modification",
    IndividualModification => "individual_modification",
});

/// Options controlling how a circuit is grouped into boxes and annotated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoxingConfig {
    /// Box two-qubit gates.
    pub enable_gates: bool,
    /// Box measurements.
    pub enable_measures: bool,
    /// When barriers are removed.
    pub remove_barriers: BarrierPolicy,
    /// Annotations for measurement boxes.
    pub measure_annotations: MeasureAnnotations,
    /// Box kinds that receive an inject-noise annotation.
    pub inject_noise_targets: InjectNoiseTargets,
    /// How inject-noise modifiers are chosen.
    pub inject_noise_strategy: InjectNoiseStrategy,
    /// Twirling group for twirl annotations.
    pub twirling_group: TwirlGroup,
    /// Decomposition of dressing gates.
    pub decomposition: Decomposition,
    /// Fold boxes of single-qubit gates into the box after them.
    pub merge_boxes: bool,
    /// Qubits every box is extended to span.
    pub noop_qubits: Vec<QubitId>,
}

impl Default for BoxingConfig {
    fn default() -> Self {
        Self {
            enable_gates: true,
            enable_measures: true,
            remove_barriers: BarrierPolicy::default(),
            measure_annotations: MeasureAnnotations::default(),
            inject_noise_targets: InjectNoiseTargets::default(),
            inject_noise_strategy: InjectNoiseStrategy::default(),
            twirling_group: TwirlGroup::default(),
            decomposition: Decomposition::default(),
            merge_boxes: false,
            noop_qubits: vec![],
        }
    }
}

impl BoxingConfig {
    /// Check that noise is only injected into box kinds that are built.
    pub fn validate(&self) -> CompileResult<()> {
        let targets = self.inject_noise_targets;
        if targets.gates() && !self.enable_gates {
            return Err(CompileError::IncompatibleConfiguration {
                targets,
                disabled: "enable_gates",
            });
        }
        if targets.measures() && !self.enable_measures {
            return Err(CompileError::IncompatibleConfiguration {
                targets,
                disabled: "enable_measures",
            });
        }
        Ok(())
    }

    /// The twirl annotation this configuration attaches.
    pub fn twirl(&self) -> Twirl {
        Twirl {
            group: self.twirling_group,
            dressing: Dressing::Left,
            decomposition: self.decomposition,
        }
    }

    /// The basis transform this configuration attaches to measurement boxes.
    pub fn basis_transform(&self) -> BasisTransform {
        BasisTransform {
            mode: BasisMode::Measure,
            decomposition: self.decomposition,
        }
    }
}
