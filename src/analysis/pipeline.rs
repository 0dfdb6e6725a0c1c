use rayon::prelude::*;

use super::accumulator::MassAccumulator;
use super::cuts::SelectionCuts;
use super::filter::{EventSelection, RejectReason, select_event};
use super::kinematics::FourMomentum;
use super::trijet::{Trijet, trijets};
use crate::data::model::{Event, EventColumns, Jet};

/// What one event contributes to the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventOutcome {
    /// Failed the event selection.
    Rejected(RejectReason),
    /// Passed the event selection but no trijet survived the b-tag gate.
    NoTrijet,
    /// Mass of the highest-pt trijet.
    Mass(f64),
}

impl EventOutcome {
    pub fn mass(&self) -> Option<f64> {
        match self {
            EventOutcome::Mass(m) => Some(*m),
            _ => None,
        }
    }
}

/// A trijet that passed the b-tag gate, with its summed momentum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrijetCandidate {
    pub trijet: Trijet,
    pub momentum: FourMomentum,
    pub pt: f64,
}

impl TrijetCandidate {
    pub fn mass(&self) -> f64 {
        self.momentum.mass()
    }
}

/// Enumerate trijets of admitted jets, drop those without a b-tagged jet, and
/// attach four-momentum and pt.
pub fn candidates<'a>(
    jets: &'a [Jet],
    cuts: &'a SelectionCuts,
) -> impl Iterator<Item = TrijetCandidate> + 'a {
    trijets(jets)
        .filter(move |trijet| trijet.has_btag(cuts))
        .map(|trijet| {
            let momentum = trijet.four_momentum();
            TrijetCandidate {
                trijet,
                momentum,
                pt: momentum.pt(),
            }
        })
}

/// Highest-pt candidate. On equal pt the earliest one wins.
pub fn best_trijet<I>(candidates: I) -> Option<TrijetCandidate>
where
    I: IntoIterator<Item = TrijetCandidate>,
{
    candidates.into_iter().fold(None, |best, cand| match best {
        None => Some(cand),
        Some(b) if cand.pt > b.pt => Some(cand),
        keep => keep,
    })
}

/// Run the whole selection and reconstruction on one event.
pub fn process_event(event: &Event, cuts: &SelectionCuts) -> EventOutcome {
    match select_event(event, cuts) {
        EventSelection::Rejected(reason) => EventOutcome::Rejected(reason),
        EventSelection::Admitted(jets) => match best_trijet(candidates(&jets, cuts)) {
            Some(best) => EventOutcome::Mass(best.mass()),
            None => {
                log::warn!("admitted event with {} jets has no b-tagged trijet", jets.len());
                EventOutcome::NoTrijet
            }
        },
    }
}

/// Process every event in order on the current thread.
pub fn process_events(columns: &EventColumns, cuts: &SelectionCuts) -> MassAccumulator {
    columns
        .events()
        .map(|event| process_event(&event, cuts))
        .collect()
}

/// Process events on the rayon pool. Outcomes are collected by event index
/// before accumulation, so the result equals [`process_events`].
pub fn process_events_parallel(columns: &EventColumns, cuts: &SelectionCuts) -> MassAccumulator {
    let outcomes: Vec<EventOutcome> = (0..columns.len())
        .into_par_iter()
        .map(|i| process_event(&columns.event(i), cuts))
        .collect();
    outcomes.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jet(pt: f64, btag: f64, px: f64, py: f64, pz: f64, e: f64) -> Jet {
        Jet {
            pt,
            btag,
            px,
            py,
            pz,
            e,
        }
    }

    /// One electron at 30 GeV, jets pt=[30,30,30,30,10], btag=[0.6,0.6,0.1,0.1,0.9].
    fn reference_event() -> Event {
        Event {
            electron_pt: vec![30.0],
            muon_pt: vec![],
            jets: vec![
                jet(30.0, 0.6, 30.0, 0.0, 10.0, 40.0),
                jet(30.0, 0.6, 0.0, 30.0, -5.0, 35.0),
                jet(30.0, 0.1, -30.0, 0.0, 0.0, 32.0),
                jet(30.0, 0.1, 20.0, 22.0, 8.0, 31.0),
                jet(10.0, 0.9, 10.0, 0.0, 0.0, 12.0),
            ],
        }
    }

    #[test]
    fn reference_event_builds_four_trijets() {
        let cuts = SelectionCuts::default();
        let EventSelection::Admitted(jets) = select_event(&reference_event(), &cuts) else {
            panic!("reference event should pass");
        };
        assert_eq!(jets.len(), 4);

        let cands: Vec<TrijetCandidate> = candidates(&jets, &cuts).collect();
        assert_eq!(cands.len(), 4);
        assert!(cands.iter().all(|c| c.trijet.has_btag(&cuts)));
    }

    #[test]
    fn reference_event_picks_highest_pt() {
        let cuts = SelectionCuts::default();
        let event = reference_event();
        // trijet (0,1,3): px=50, py=52 is the hardest
        let expected = [0, 1, 3]
            .iter()
            .map(|&i| FourMomentum::from(&event.jets[i]))
            .sum::<FourMomentum>()
            .mass();

        assert_eq!(process_event(&event, &cuts), EventOutcome::Mass(expected));
    }

    #[test]
    fn tie_goes_to_first_enumerated() {
        let cuts = SelectionCuts::default();
        // all jets identical in pt; masses differ through pz
        let jets = vec![
            jet(30.0, 0.9, 10.0, 0.0, 0.0, 50.0),
            jet(30.0, 0.9, 10.0, 0.0, 1.0, 50.0),
            jet(30.0, 0.9, 10.0, 0.0, 2.0, 50.0),
            jet(30.0, 0.9, 10.0, 0.0, 3.0, 50.0),
        ];
        let best = best_trijet(candidates(&jets, &cuts)).unwrap();
        assert_eq!(best.trijet.indices, [0, 1, 2]);
    }

    #[test]
    fn empty_candidates_give_no_result() {
        assert_eq!(best_trijet(Vec::new()), None);

        // permissive event cuts let an event through with no b-tagged trijet
        let cuts = SelectionCuts {
            min_btag_jets: 0,
            ..SelectionCuts::default()
        };
        let event = Event {
            electron_pt: vec![],
            muon_pt: vec![50.0],
            jets: (0..4).map(|_| jet(40.0, 0.0, 40.0, 0.0, 0.0, 45.0)).collect(),
        };
        assert_eq!(process_event(&event, &cuts), EventOutcome::NoTrijet);
    }

    #[test]
    fn space_like_best_trijet_gives_negative_mass() {
        let cuts = SelectionCuts::default();
        let event = Event {
            electron_pt: vec![30.0],
            muon_pt: vec![],
            jets: (0..4).map(|_| jet(30.0, 0.9, 10.0, 0.0, 0.0, 9.0)).collect(),
        };
        let mass = process_event(&event, &cuts).mass().unwrap();
        assert!((mass + 171.0_f64.sqrt()).abs() < 1e-9);
    }

    fn mixed_events() -> Vec<Event> {
        let mut events = Vec::new();
        for i in 0..40 {
            let shift = i as f64;
            let mut event = reference_event();
            if i % 3 == 0 {
                event.muon_pt.push(26.0 + shift);
            }
            if i % 5 == 0 {
                event.jets[1].btag = 0.2;
            }
            for jet in &mut event.jets {
                jet.px += shift;
                jet.e += 2.0 * shift;
            }
            events.push(event);
        }
        events
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let cuts = SelectionCuts::default();
        let columns = EventColumns::from_events(&mixed_events());

        let seq = process_events(&columns, &cuts).snapshot();
        let par = process_events_parallel(&columns, &cuts).snapshot();
        assert_eq!(seq, par);
        assert_eq!(seq, process_events(&columns, &cuts).snapshot());
        assert!(seq.selected_events <= seq.total_events);
        assert_eq!(seq.total_events, 40);
        // i % 3 == 0 → two leptons; i % 5 == 0 → one b-tag
        let expected = (0..40).filter(|i| i % 3 != 0 && i % 5 != 0).count() as u64;
        assert_eq!(seq.selected_events, expected);
    }
}
