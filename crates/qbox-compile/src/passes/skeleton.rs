//! Anchor-only structural signatures of boxes.

use std::fmt;

use qbox_ir::{BoxOp, OpClass, QubitId};

/// The anchors of a box, in body order, reduced to their class and qubits.
///
/// Two boxes with equal skeletons act as the same physical layer of
/// two-qubit gates or measurements, whatever single-qubit gates dress them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Skeleton(Vec<(OpClass, Vec<QubitId>)>);

impl Skeleton {
    /// Extract the skeleton of a box.
    pub fn of(b: &BoxOp) -> Self {
        Self(
            b.anchors()
                .filter_map(|inst| Some((inst.class()?, inst.qubits.clone())))
                .collect(),
        )
    }

    /// Number of anchors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the box has no anchors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the anchors.
    pub fn iter(&self) -> impl Iterator<Item = &(OpClass, Vec<QubitId>)> {
        self.0.iter()
    }
}

impl fmt::Display for Skeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (class, qubits)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let name = match class {
                OpClass::TwoQubitGate => "2q",
                OpClass::Measurement => "meas",
                OpClass::SingleQubitGate => "1q",
                OpClass::Barrier => "barrier",
            };
            write!(f, "{name}(")?;
            for (j, q) in qubits.iter().enumerate() {
                if j > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{q}")?;
            }
            write!(f, ")")?;
        }
        write!(f, "]")
    }
}
