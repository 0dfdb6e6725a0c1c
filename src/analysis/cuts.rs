use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::model::Jet;

/// Thresholds of the event selection.
///
/// Lepton and jet momentum cuts are strict (`pt > min`); b-tag cuts are
/// inclusive (`btag >= min`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionCuts {
    /// Minimum electron / muon transverse momentum (GeV).
    pub lepton_pt_min: f64,
    /// Minimum jet transverse momentum (GeV).
    pub jet_pt_min: f64,
    /// Minimum b-tag discriminant for a jet to count as b-tagged.
    pub btag_min: f64,
    /// Exact number of leptons above `lepton_pt_min`.
    pub required_leptons: usize,
    /// Minimum number of jets above `jet_pt_min`.
    pub min_jets: usize,
    /// Minimum number of b-tagged jets among those.
    pub min_btag_jets: usize,
}

impl Default for SelectionCuts {
    fn default() -> Self {
        Self {
            lepton_pt_min: 25.0,
            jet_pt_min: 25.0,
            btag_min: 0.5,
            required_leptons: 1,
            min_jets: 4,
            min_btag_jets: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CutsError {
    #[error("min_jets must be at least 3 to form a trijet, got {0}")]
    TooFewJets(usize),

    #[error("{0} must be finite")]
    NonFinite(&'static str),
}

impl SelectionCuts {
    /// Read cuts from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading cuts file {}", path.display()))?;
        let cuts: SelectionCuts = serde_json::from_str(&text).context("parsing cuts JSON")?;
        cuts.validate()?;
        Ok(cuts)
    }

    pub fn validate(&self) -> Result<(), CutsError> {
        for (name, value) in [
            ("lepton_pt_min", self.lepton_pt_min),
            ("jet_pt_min", self.jet_pt_min),
            ("btag_min", self.btag_min),
        ] {
            if !value.is_finite() {
                return Err(CutsError::NonFinite(name));
            }
        }
        if self.min_jets < 3 {
            return Err(CutsError::TooFewJets(self.min_jets));
        }
        Ok(())
    }

    #[inline]
    pub fn passes_lepton_pt(&self, pt: f64) -> bool {
        pt > self.lepton_pt_min
    }

    #[inline]
    pub fn passes_jet_pt(&self, jet: &Jet) -> bool {
        jet.pt > self.jet_pt_min
    }

    #[inline]
    pub fn is_btagged(&self, jet: &Jet) -> bool {
        jet.btag >= self.btag_min
    }
}
