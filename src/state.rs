use std::collections::BTreeSet;

use trijet_mass::analysis::accumulator::{Cutflow, MassAccumulator};
use trijet_mass::histogram::Histogram;

use crate::color::DatasetColors;

// ---------------------------------------------------------------------------
// Per-dataset results
// ---------------------------------------------------------------------------

/// What the viewer keeps of one processed dataset.
#[derive(Debug, Clone)]
pub struct DatasetResult {
    pub name: String,
    pub cutflow: Cutflow,
    pub histogram: Histogram,
}

impl DatasetResult {
    pub fn new(name: impl Into<String>, acc: &MassAccumulator) -> Self {
        Self {
            name: name.into(),
            cutflow: *acc.cutflow(),
            histogram: Histogram::from_values(acc.masses()),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    pub datasets: Vec<DatasetResult>,

    /// Indices of datasets drawn in the plot.
    pub visible: BTreeSet<usize>,

    pub colors: DatasetColors,

    /// Draw the underflow (negative mass) and overflow bars.
    pub show_flow_bins: bool,
}

impl AppState {
    pub fn new(datasets: Vec<DatasetResult>) -> Self {
        Self {
            visible: (0..datasets.len()).collect(),
            colors: DatasetColors::new(datasets.len()),
            datasets,
            show_flow_bins: true,
        }
    }

    pub fn toggle(&mut self, dataset: usize) {
        if !self.visible.remove(&dataset) && dataset < self.datasets.len() {
            self.visible.insert(dataset);
        }
    }

    pub fn select_all(&mut self) {
        self.visible = (0..self.datasets.len()).collect();
    }

    pub fn select_none(&mut self) {
        self.visible.clear();
    }

    /// Summed cutflow of the visible datasets.
    pub fn visible_cutflow(&self) -> Cutflow {
        self.visible
            .iter()
            .map(|&i| self.datasets[i].cutflow)
            .fold(Cutflow::default(), |mut sum, c| {
                sum.total += c.total;
                sum.lepton += c.lepton;
                sum.jets += c.jets;
                sum.btag += c.btag;
                sum.selected += c.selected;
                sum
            })
    }
}
