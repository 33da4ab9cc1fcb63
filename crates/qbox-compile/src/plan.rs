//! The box plan: an assignment of circuit positions to ordered slots.
//!
//! Packing never moves instructions. It fills a [`BoxPlan`], an arena of
//! slots where each slot becomes one box (or a run of untouched delimiters)
//! when the plan is emitted. Slots are emitted in index order.
//!
//! Every wire has a *frontier*: the lowest slot a new operation on that wire
//! may use. Placing an operation in slot `s` moves the frontier of its wires
//! to `s + 1`, closing `s` for them. Collectors are the exception; they leave
//! the frontier at `s` so later single-qubit gates on the same wire can
//! still join them.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fmt;

use qbox_ir::{Dressing, QubitId, WireId};

/// What a slot becomes when the plan is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotKind {
    /// A left-dressed layer of two-qubit gates.
    Gates,
    /// A left-dressed layer of measurements.
    Measures,
    /// A right-dressed box of operations no anchor claimed.
    Collector,
    /// Barriers and pre-existing boxes, emitted as they are.
    Delimiter,
}

impl SlotKind {
    const ALL: [SlotKind; 4] = [
        SlotKind::Gates,
        SlotKind::Measures,
        SlotKind::Collector,
        SlotKind::Delimiter,
    ];

    /// Dressing of the box this slot becomes, if it becomes one.
    pub fn dressing(self) -> Option<Dressing> {
        match self {
            SlotKind::Gates | SlotKind::Measures => Some(Dressing::Left),
            SlotKind::Collector => Some(Dressing::Right),
            SlotKind::Delimiter => None,
        }
    }

    fn index(self) -> usize {
        match self {
            SlotKind::Gates => 0,
            SlotKind::Measures => 1,
            SlotKind::Collector => 2,
            SlotKind::Delimiter => 3,
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Gates => write!(f, "gates"),
            SlotKind::Measures => write!(f, "measures"),
            SlotKind::Collector => write!(f, "collector"),
            SlotKind::Delimiter => write!(f, "delimiter"),
        }
    }
}

/// One slot of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    kind: SlotKind,
    members: Vec<usize>,
}

impl Slot {
    /// What this slot becomes.
    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// Circuit positions assigned to this slot.
    ///
    /// Ascending once the pass that filled the plan has finished; during a
    /// scan they are in assignment order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }
}

/// Assignment of every operation of a circuit to a slot.
#[derive(Debug, Clone, Default)]
pub struct BoxPlan {
    slots: Vec<Slot>,
    assignment: Vec<Option<usize>>,
    frontier: FxHashMap<WireId, usize>,
    pending: BTreeMap<QubitId, Vec<usize>>,
    by_kind: [Vec<usize>; 4],
}

impl BoxPlan {
    /// Create an empty plan for a circuit with `num_ops` top-level operations.
    pub fn new(num_ops: usize) -> Self {
        Self {
            assignment: vec![None; num_ops],
            ..Self::default()
        }
    }

    /// Number of operations the plan covers.
    pub fn num_ops(&self) -> usize {
        self.assignment.len()
    }

    /// All slots, in emission order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The slot holding the operation at `position`.
    pub fn slot_of(&self, position: usize) -> Option<usize> {
        self.assignment.get(position).copied().flatten()
    }

    /// Number of slots of the given kind.
    pub fn count(&self, kind: SlotKind) -> usize {
        self.by_kind[kind.index()].len()
    }

    /// The highest slot of the given kind.
    pub fn last(&self, kind: SlotKind) -> Option<usize> {
        self.by_kind[kind.index()].last().copied()
    }

    /// Whether single-qubit gates are still waiting for a slot.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Positions still waiting for a slot, per qubit.
    pub fn pending(&self) -> impl Iterator<Item = (QubitId, &[usize])> {
        self.pending.iter().map(|(q, p)| (*q, p.as_slice()))
    }

    /// Number of slots of each kind, in [`SlotKind`] order.
    pub(crate) fn counts(&self) -> impl Iterator<Item = (SlotKind, usize)> + '_ {
        SlotKind::ALL.into_iter().map(|kind| (kind, self.count(kind)))
    }

    /// Lowest slot every one of `wires` may still use.
    pub(crate) fn floor(&self, wires: impl IntoIterator<Item = WireId>) -> usize {
        wires
            .into_iter()
            .map(|w| self.frontier.get(&w).copied().unwrap_or(0))
            .max()
            .unwrap_or(0)
    }

    /// First slot of `kind` at or after `floor`, opening a new one if none.
    pub(crate) fn first_fit(&mut self, floor: usize, kind: SlotKind) -> usize {
        let candidates = &self.by_kind[kind.index()];
        let at = candidates.partition_point(|&s| s < floor);
        if let Some(&slot) = candidates.get(at) {
            return slot;
        }

        let slot = self.slots.len();
        self.slots.push(Slot {
            kind,
            members: vec![],
        });
        // New slots take the highest index, so each list stays sorted.
        self.by_kind[kind.index()].push(slot);
        slot
    }

    /// Put the operation at `position` in `slot`.
    pub(crate) fn assign(&mut self, slot: usize, position: usize) {
        if let Some(entry) = self.assignment.get_mut(position) {
            *entry = Some(slot);
            self.slots[slot].members.push(position);
        }
    }

    /// Rebuild every slot's members in ascending position order.
    ///
    /// One pass over the assignment, so the cost does not depend on how the
    /// members of a slot arrived.
    pub(crate) fn sort_members(&mut self) {
        for slot in &mut self.slots {
            slot.members.clear();
        }
        for (position, slot) in self.assignment.iter().enumerate() {
            if let Some(slot) = *slot {
                self.slots[slot].members.push(position);
            }
        }
    }

    /// Move the frontier of `wires` to `to`.
    pub(crate) fn advance(&mut self, wires: impl IntoIterator<Item = WireId>, to: usize) {
        for w in wires {
            self.frontier.insert(w, to);
        }
    }

    /// Queue a single-qubit gate until an anchor or collector claims it.
    pub(crate) fn defer(&mut self, qubit: QubitId, position: usize) {
        self.pending.entry(qubit).or_default().push(position);
    }

    /// Move the queued gates on `qubits` into `slot`.
    pub(crate) fn absorb(&mut self, slot: usize, qubits: &[QubitId]) {
        for q in qubits {
            for position in self.pending.remove(q).unwrap_or_default() {
                self.assign(slot, position);
            }
        }
    }

    /// Place the queued gates on each of `qubits` in the first collector
    /// their wire can reach, leaving that collector open on the wire.
    pub(crate) fn collect(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> usize {
        let mut collected = 0;
        for q in qubits {
            let Some(run) = self.pending.remove(&q) else {
                continue;
            };
            let floor = self.floor([WireId::Qubit(q)]);
            let slot = self.first_fit(floor, SlotKind::Collector);
            collected += run.len();
            for position in run {
                self.assign(slot, position);
            }
            self.advance([WireId::Qubit(q)], slot);
        }
        collected
    }

    /// Qubits with queued gates, ascending.
    pub(crate) fn pending_qubits(&self) -> Vec<QubitId> {
        self.pending.keys().copied().collect()
    }
}
