//! Annotations attached to boxes.
//!
//! Annotations are directives for downstream noise-learning and sampling
//! stages. The boxing passes only attach them; nothing in this workspace
//! interprets them.
//!
//! | Annotation | Meaning |
//! |------------|---------|
//! | [`Twirl`] | Randomize the box's dressing with a twirling group |
//! | [`BasisTransform`] | Apply a basis change around the box's measurements |
//! | [`InjectNoise`] | Inject a learned noise map identified by `reference` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of a box its single-qubit gates sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dressing {
    /// Single-qubit gates precede the anchor layer.
    #[default]
    Left,
    /// Single-qubit gates follow the anchor layer.
    Right,
}

impl fmt::Display for Dressing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dressing::Left => write!(f, "left"),
            Dressing::Right => write!(f, "right"),
        }
    }
}

/// Group sampled from when twirling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
pub enum TwirlGroup {
    /// Sample the Pauli group uniformly and independently.
    #[default]
    Pauli,
    /// Sample the Pauli group, balancing the proportions of I, X, Y and Z.
    BalancedPauli,
}

impl fmt::Display for TwirlGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TwirlGroup::Pauli => write!(f, "pauli"),
            TwirlGroup::BalancedPauli => write!(f, "balanced_pauli"),
        }
    }
}

impl FromStr for TwirlGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pauli" => Ok(TwirlGroup::Pauli),
            "balanced_pauli" | "balanced-pauli" => Ok(TwirlGroup::BalancedPauli),
            other => Err(format!(
                "unknown twirling group '{other}', expected one of: pauli, balanced_pauli"
            )),
        }
    }
}

/// How dressed single-qubit gates are decomposed when they are synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "lower"))]
pub enum Decomposition {
    /// RZ-SX-RZ-SX-RZ.
    #[default]
    RzSx,
    /// RZ-RX-RZ.
    RzRx,
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decomposition::RzSx => write!(f, "rzsx"),
            Decomposition::RzRx => write!(f, "rzrx"),
        }
    }
}

impl FromStr for Decomposition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rzsx" => Ok(Decomposition::RzSx),
            "rzrx" => Ok(Decomposition::RzRx),
            other => Err(format!(
                "unknown decomposition '{other}', expected one of: rzsx, rzrx"
            )),
        }
    }
}

/// Where a basis transform applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasisMode {
    /// Change basis before measuring.
    #[default]
    Measure,
    /// Change basis after state preparation.
    Prepare,
}

impl fmt::Display for BasisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasisMode::Measure => write!(f, "measure"),
            BasisMode::Prepare => write!(f, "prepare"),
        }
    }
}

/// Directive to twirl the contents of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Twirl {
    /// Which group to twirl with.
    pub group: TwirlGroup,
    /// Which side of the box receives the twirling gates.
    pub dressing: Dressing,
    /// How to decompose single-qubit gates.
    pub decomposition: Decomposition,
}

/// Directive to change the measurement (or preparation) basis of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BasisTransform {
    /// Whether this transforms a measurement or a preparation.
    pub mode: BasisMode,
    /// How to decompose single-qubit gates.
    pub decomposition: Decomposition,
}

/// Directive to inject a noise map into a box.
///
/// Boxes with the same `reference` receive the same noise map. The
/// `modifier_ref` names the scale factors applied to the map before
/// sampling; the empty string means the map is used unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InjectNoise {
    /// Identifier of the noise map.
    pub reference: String,
    /// Identifier of the modifiers, or empty.
    #[serde(default)]
    pub modifier_ref: String,
}

impl InjectNoise {
    /// Create an unmodified noise injection.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            modifier_ref: String::new(),
        }
    }

    /// Set the modifier reference.
    #[must_use]
    pub fn with_modifier(mut self, modifier_ref: impl Into<String>) -> Self {
        self.modifier_ref = modifier_ref.into();
        self
    }

    /// Whether the noise map is scaled before sampling.
    pub fn is_modified(&self) -> bool {
        !self.modifier_ref.is_empty()
    }
}

/// The variant of an [`Annotation`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// [`Twirl`].
    Twirl,
    /// [`BasisTransform`].
    BasisTransform,
    /// [`InjectNoise`].
    InjectNoise,
}

/// An annotation attached to a box.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    /// Twirl the box.
    Twirl(Twirl),
    /// Change the measurement basis of the box.
    BasisTransform(BasisTransform),
    /// Inject noise into the box.
    InjectNoise(InjectNoise),
}

impl Annotation {
    /// Get the variant of this annotation.
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Twirl(_) => AnnotationKind::Twirl,
            Annotation::BasisTransform(_) => AnnotationKind::BasisTransform,
            Annotation::InjectNoise(_) => AnnotationKind::InjectNoise,
        }
    }

    /// The dotted namespace consumers dispatch on.
    pub fn namespace(&self) -> &'static str {
        match self {
            Annotation::Twirl(_) => "qbox.twirl",
            Annotation::BasisTransform(_) => "qbox.basis_transform",
            Annotation::InjectNoise(_) => "qbox.inject_noise",
        }
    }
}

impl From<Twirl> for Annotation {
    fn from(a: Twirl) -> Self {
        Annotation::Twirl(a)
    }
}

impl From<BasisTransform> for Annotation {
    fn from(a: BasisTransform) -> Self {
        Annotation::BasisTransform(a)
    }
}

impl From<InjectNoise> for Annotation {
    fn from(a: InjectNoise) -> Self {
        Annotation::InjectNoise(a)
    }
}
