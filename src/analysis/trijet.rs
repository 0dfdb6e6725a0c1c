use super::cuts::SelectionCuts;
use super::kinematics::FourMomentum;
use crate::data::model::Jet;

// ---------------------------------------------------------------------------
// Trijet – three distinct jets of one event
// ---------------------------------------------------------------------------

/// An unordered choice of three jets, stored with ascending indices into the
/// admitted jet list of its event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trijet {
    pub indices: [usize; 3],
    pub jets: [Jet; 3],
}

impl Trijet {
    /// At least one of the three jets is b-tagged.
    pub fn has_btag(&self, cuts: &SelectionCuts) -> bool {
        self.jets.iter().any(|jet| cuts.is_btagged(jet))
    }

    /// Component-wise sum of the three jet four-momenta.
    pub fn four_momentum(&self) -> FourMomentum {
        self.jets.iter().map(FourMomentum::from).sum()
    }
}

// ---------------------------------------------------------------------------
// Enumeration
// ---------------------------------------------------------------------------

/// Number of 3-subsets of `n` items.
pub fn combination_count(n: usize) -> usize {
    if n < 3 {
        return 0;
    }
    n * (n - 1) * (n - 2) / 6
}

/// Iterator over every 3-subset of a jet slice in lexicographic index order:
/// `(0,1,2), (0,1,3), …, (0,2,3), …, (n-3,n-2,n-1)`.
#[derive(Debug, Clone)]
pub struct Trijets<'a> {
    jets: &'a [Jet],
    next: Option<[usize; 3]>,
    remaining: usize,
}

/// All trijets of `jets`. Empty for fewer than three jets.
pub fn trijets(jets: &[Jet]) -> Trijets<'_> {
    Trijets {
        jets,
        next: (jets.len() >= 3).then_some([0, 1, 2]),
        remaining: combination_count(jets.len()),
    }
}

impl Iterator for Trijets<'_> {
    type Item = Trijet;

    fn next(&mut self) -> Option<Trijet> {
        let indices = self.next?;
        let [i, j, k] = indices;
        let n = self.jets.len();

        self.next = if k + 1 < n {
            Some([i, j, k + 1])
        } else if j + 2 < n {
            Some([i, j + 1, j + 2])
        } else if i + 3 < n {
            Some([i + 1, i + 2, i + 3])
        } else {
            None
        };
        self.remaining -= 1;

        Some(Trijet {
            indices,
            jets: [self.jets[i], self.jets[j], self.jets[k]],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Trijets<'_> {}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn jets(btags: &[f64]) -> Vec<Jet> {
        btags
            .iter()
            .enumerate()
            .map(|(i, &btag)| Jet {
                pt: 30.0 + i as f64,
                btag,
                px: i as f64,
                py: 1.0,
                pz: 2.0,
                e: 100.0,
            })
            .collect()
    }

    #[test]
    fn counts_follow_binomial() {
        assert_eq!(combination_count(0), 0);
        assert_eq!(combination_count(2), 0);
        assert_eq!(combination_count(3), 1);
        assert_eq!(combination_count(4), 4);
        assert_eq!(combination_count(10), 120);
    }

    #[test]
    fn every_subset_exactly_once() {
        for n in 0..=9 {
            let input = jets(&vec![0.0; n]);
            let iter = trijets(&input);
            assert_eq!(iter.len(), combination_count(n));

            let all: Vec<[usize; 3]> = iter.map(|t| t.indices).collect();
            let distinct: BTreeSet<[usize; 3]> = all.iter().copied().collect();
            assert_eq!(all.len(), combination_count(n), "n = {n}");
            assert_eq!(distinct.len(), all.len(), "duplicates for n = {n}");
            assert!(all.iter().all(|&[i, j, k]| i < j && j < k && k < n));
        }
    }

    #[test]
    fn order_is_lexicographic() {
        let input = jets(&[0.0; 5]);
        let order: Vec<[usize; 3]> = trijets(&input).map(|t| t.indices).collect();
        assert_eq!(
            order,
            vec![
                [0, 1, 2],
                [0, 1, 3],
                [0, 1, 4],
                [0, 2, 3],
                [0, 2, 4],
                [0, 3, 4],
                [1, 2, 3],
                [1, 2, 4],
                [1, 3, 4],
                [2, 3, 4],
            ]
        );
    }

    #[test]
    fn trijet_carries_its_jets() {
        let input = jets(&[0.1, 0.2, 0.3, 0.4]);
        let last = trijets(&input).last().unwrap();
        assert_eq!(last.indices, [1, 2, 3]);
        assert_eq!(last.jets, [input[1], input[2], input[3]]);
        assert_eq!(
            last.four_momentum(),
            FourMomentum::new(6.0, 3.0, 6.0, 300.0)
        );
    }

    #[test]
    fn btag_gate_needs_one_tagged_jet() {
        let cuts = SelectionCuts::default();
        let input = jets(&[0.6, 0.6, 0.1, 0.1]);
        let passing: Vec<[usize; 3]> = trijets(&input)
            .filter(|t| t.has_btag(&cuts))
            .map(|t| t.indices)
            .collect();
        // only (0,1,2),(0,1,3),(0,2,3),(1,2,3) exist and all include jet 0 or 1
        assert_eq!(passing.len(), 4);

        let untagged = jets(&[0.1, 0.49, 0.2]);
        assert_eq!(trijets(&untagged).filter(|t| t.has_btag(&cuts)).count(), 0);
    }
}
