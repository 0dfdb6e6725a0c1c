use serde::Serialize;

use super::filter::RejectReason;
use super::pipeline::EventOutcome;

// ---------------------------------------------------------------------------
// Cutflow – how many events survive each step
// ---------------------------------------------------------------------------

/// Event counts after each selection step.
///
/// Always `selected <= btag <= jets <= lepton <= total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Cutflow {
    /// Events examined.
    pub total: u64,
    /// Passed the single-lepton requirement.
    pub lepton: u64,
    /// Also passed the jet multiplicity requirement.
    pub jets: u64,
    /// Also passed the b-tag multiplicity requirement.
    pub btag: u64,
    /// Contributed a mass value.
    pub selected: u64,
}

impl Cutflow {
    fn merge(&mut self, other: &Cutflow) {
        self.total += other.total;
        self.lepton += other.lepton;
        self.jets += other.jets;
        self.btag += other.btag;
        self.selected += other.selected;
    }
}

// ---------------------------------------------------------------------------
// MassAccumulator
// ---------------------------------------------------------------------------

/// Collects one outcome per event, in the order events are recorded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MassAccumulator {
    cutflow: Cutflow,
    masses: Vec<f64>,
}

/// Final state of a [`MassAccumulator`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MassSnapshot {
    pub total_events: u64,
    pub selected_events: u64,
    pub masses: Vec<f64>,
    pub cutflow: Cutflow,
}

impl MassAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &EventOutcome) {
        let flow = &mut self.cutflow;
        flow.total += 1;
        match outcome {
            EventOutcome::Rejected(RejectReason::LeptonCount) => {}
            EventOutcome::Rejected(RejectReason::JetCount) => {
                flow.lepton += 1;
            }
            EventOutcome::Rejected(RejectReason::BTagCount) => {
                flow.lepton += 1;
                flow.jets += 1;
            }
            EventOutcome::NoTrijet => {
                flow.lepton += 1;
                flow.jets += 1;
                flow.btag += 1;
            }
            EventOutcome::Mass(mass) => {
                flow.lepton += 1;
                flow.jets += 1;
                flow.btag += 1;
                flow.selected += 1;
                self.masses.push(*mass);
            }
        }
    }

    /// Append another accumulator's results after this one's.
    pub fn merge(&mut self, other: MassAccumulator) {
        self.cutflow.merge(&other.cutflow);
        self.masses.extend(other.masses);
    }

    pub fn total_events(&self) -> u64 {
        self.cutflow.total
    }

    pub fn selected_events(&self) -> u64 {
        self.cutflow.selected
    }

    pub fn cutflow(&self) -> &Cutflow {
        &self.cutflow
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn snapshot(&self) -> MassSnapshot {
        MassSnapshot {
            total_events: self.cutflow.total,
            selected_events: self.cutflow.selected,
            masses: self.masses.clone(),
            cutflow: self.cutflow,
        }
    }
}

impl Extend<EventOutcome> for MassAccumulator {
    fn extend<I: IntoIterator<Item = EventOutcome>>(&mut self, iter: I) {
        for outcome in iter {
            self.record(&outcome);
        }
    }
}

impl FromIterator<EventOutcome> for MassAccumulator {
    fn from_iter<I: IntoIterator<Item = EventOutcome>>(iter: I) -> Self {
        let mut acc = MassAccumulator::new();
        acc.extend(iter);
        acc
    }
}
