use serde::Serialize;

use super::cuts::SelectionCuts;
use crate::data::model::{Event, Jet};

/// The first selection step an event failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RejectReason {
    /// Not exactly the required number of leptons above threshold.
    LeptonCount,
    /// Too few jets above threshold.
    JetCount,
    /// Too few b-tagged jets among the jets above threshold.
    BTagCount,
}

/// Result of the event-level selection.
#[derive(Debug, Clone, PartialEq)]
pub enum EventSelection {
    /// Jets passing the momentum cut, in their original order.
    Admitted(Vec<Jet>),
    Rejected(RejectReason),
}

impl EventSelection {
    pub fn is_admitted(&self) -> bool {
        matches!(self, EventSelection::Admitted(_))
    }
}

/// Apply the lepton, jet-count and b-tag-count cuts, stopping at the first
/// failure.
pub fn select_event(event: &Event, cuts: &SelectionCuts) -> EventSelection {
    let leptons = event
        .electron_pt
        .iter()
        .chain(&event.muon_pt)
        .filter(|&&pt| cuts.passes_lepton_pt(pt))
        .count();
    if leptons != cuts.required_leptons {
        return EventSelection::Rejected(RejectReason::LeptonCount);
    }

    let jets: Vec<Jet> = event
        .jets
        .iter()
        .filter(|jet| cuts.passes_jet_pt(jet))
        .copied()
        .collect();
    if jets.len() < cuts.min_jets {
        return EventSelection::Rejected(RejectReason::JetCount);
    }

    let btagged = jets.iter().filter(|jet| cuts.is_btagged(jet)).count();
    if btagged < cuts.min_btag_jets {
        return EventSelection::Rejected(RejectReason::BTagCount);
    }

    EventSelection::Admitted(jets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jet(pt: f64, btag: f64) -> Jet {
        Jet {
            pt,
            btag,
            ..Jet::default()
        }
    }

    fn event(electrons: &[f64], muons: &[f64], jets: &[(f64, f64)]) -> Event {
        Event {
            electron_pt: electrons.to_vec(),
            muon_pt: muons.to_vec(),
            jets: jets.iter().map(|&(pt, btag)| jet(pt, btag)).collect(),
        }
    }

    const GOOD_JETS: [(f64, f64); 4] = [(30.0, 0.6), (30.0, 0.6), (30.0, 0.1), (30.0, 0.1)];

    #[test]
    fn exactly_one_lepton_is_required() {
        let cuts = SelectionCuts::default();
        let cases: [(&[f64], &[f64], bool); 6] = [
            (&[30.0], &[], true),
            (&[], &[30.0], true),
            (&[30.0, 10.0], &[20.0], true),
            (&[], &[], false),
            (&[30.0], &[30.0], false),
            (&[30.0, 26.0], &[], false),
        ];
        for (electrons, muons, admitted) in cases {
            let selection = select_event(&event(electrons, muons, &GOOD_JETS), &cuts);
            assert_eq!(selection.is_admitted(), admitted, "{electrons:?} {muons:?}");
            if !admitted {
                assert_eq!(selection, EventSelection::Rejected(RejectReason::LeptonCount));
            }
        }
    }

    #[test]
    fn lepton_at_threshold_does_not_count() {
        let selection = select_event(&event(&[25.0], &[], &GOOD_JETS), &SelectionCuts::default());
        assert_eq!(selection, EventSelection::Rejected(RejectReason::LeptonCount));
    }

    #[test]
    fn at_least_four_jets_above_threshold() {
        let jets = [(30.0, 0.6), (30.0, 0.6), (30.0, 0.1), (25.0, 0.1), (10.0, 0.9)];
        let selection = select_event(&event(&[30.0], &[], &jets), &SelectionCuts::default());
        assert_eq!(selection, EventSelection::Rejected(RejectReason::JetCount));
    }

    #[test]
    fn btag_count_only_looks_at_admitted_jets() {
        // the second b-tagged jet is below the pt cut
        let jets = [(30.0, 0.6), (30.0, 0.1), (30.0, 0.1), (30.0, 0.1), (20.0, 0.9)];
        let selection = select_event(&event(&[], &[40.0], &jets), &SelectionCuts::default());
        assert_eq!(selection, EventSelection::Rejected(RejectReason::BTagCount));
    }

    #[test]
    fn btag_at_threshold_counts() {
        let jets = [(30.0, 0.5), (30.0, 0.5), (30.0, 0.1), (30.0, 0.1)];
        let selection = select_event(&event(&[30.0], &[], &jets), &SelectionCuts::default());
        assert!(selection.is_admitted());
    }

    #[test]
    fn admitted_jets_keep_order_and_attributes() {
        let input = event(
            &[30.0],
            &[],
            &[(30.0, 0.6), (30.0, 0.6), (30.0, 0.1), (30.0, 0.1), (10.0, 0.9)],
        );
        let EventSelection::Admitted(jets) = select_event(&input, &SelectionCuts::default())
        else {
            panic!("event should be admitted");
        };
        assert_eq!(jets, input.jets[..4].to_vec());
    }
}
