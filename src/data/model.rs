use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::DataError;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const ELECTRON_PT: &str = "electron_pt";
pub const MUON_PT: &str = "muon_pt";
pub const JET_PT: &str = "jet_pt";
pub const JET_BTAG: &str = "jet_btag";
pub const JET_PX: &str = "jet_px";
pub const JET_PY: &str = "jet_py";
pub const JET_PZ: &str = "jet_pz";
pub const JET_E: &str = "jet_e";

/// Every column the analysis reads, in storage order.
pub const COLUMN_NAMES: [&str; 8] = [
    ELECTRON_PT,
    MUON_PT,
    JET_PT,
    JET_BTAG,
    JET_PX,
    JET_PY,
    JET_PZ,
    JET_E,
];

/// Jagged column: outer index = event, inner index = particle.
pub type Column = Vec<Vec<f64>>;

// ---------------------------------------------------------------------------
// Jet – one reconstructed jet
// ---------------------------------------------------------------------------

/// A jet with its six co-indexed attributes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Jet {
    /// Transverse momentum (GeV).
    pub pt: f64,
    /// b-tag discriminant.
    pub btag: f64,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    /// Energy (GeV).
    pub e: f64,
}

// ---------------------------------------------------------------------------
// Event – one collision record
// ---------------------------------------------------------------------------

/// One collision event, materialised from [`EventColumns`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Event {
    pub electron_pt: Vec<f64>,
    pub muon_pt: Vec<f64>,
    pub jets: Vec<Jet>,
}

// ---------------------------------------------------------------------------
// EventColumns – the complete loaded dataset
// ---------------------------------------------------------------------------

/// A batch of events stored column-wise.
///
/// Construction checks that every column has the same number of events and
/// that, within each event, the six jet fields have the same length. Once
/// built, [`EventColumns::event`] can zip the jet fields without further
/// checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventColumns {
    electron_pt: Column,
    muon_pt: Column,
    jet_pt: Column,
    jet_btag: Column,
    jet_px: Column,
    jet_py: Column,
    jet_pz: Column,
    jet_e: Column,
}

impl EventColumns {
    /// Build from named columns. Extra columns are ignored.
    pub fn from_columns(mut columns: BTreeMap<String, Column>) -> Result<Self, DataError> {
        let mut take = |name: &'static str| {
            columns
                .remove(name)
                .ok_or(DataError::MissingColumn(name))
        };

        let batch = EventColumns {
            electron_pt: take(ELECTRON_PT)?,
            muon_pt: take(MUON_PT)?,
            jet_pt: take(JET_PT)?,
            jet_btag: take(JET_BTAG)?,
            jet_px: take(JET_PX)?,
            jet_py: take(JET_PY)?,
            jet_pz: take(JET_PZ)?,
            jet_e: take(JET_E)?,
        };
        batch.check_alignment()?;
        Ok(batch)
    }

    /// Build from already materialised events. Always aligned.
    pub fn from_events(events: &[Event]) -> Self {
        let mut batch = EventColumns::default();
        for event in events {
            batch.electron_pt.push(event.electron_pt.clone());
            batch.muon_pt.push(event.muon_pt.clone());
            batch.jet_pt.push(event.jets.iter().map(|j| j.pt).collect());
            batch.jet_btag.push(event.jets.iter().map(|j| j.btag).collect());
            batch.jet_px.push(event.jets.iter().map(|j| j.px).collect());
            batch.jet_py.push(event.jets.iter().map(|j| j.py).collect());
            batch.jet_pz.push(event.jets.iter().map(|j| j.pz).collect());
            batch.jet_e.push(event.jets.iter().map(|j| j.e).collect());
        }
        batch
    }

    fn named(&self) -> [(&'static str, &Column); 8] {
        [
            (ELECTRON_PT, &self.electron_pt),
            (MUON_PT, &self.muon_pt),
            (JET_PT, &self.jet_pt),
            (JET_BTAG, &self.jet_btag),
            (JET_PX, &self.jet_px),
            (JET_PY, &self.jet_py),
            (JET_PZ, &self.jet_pz),
            (JET_E, &self.jet_e),
        ]
    }

    fn check_alignment(&self) -> Result<(), DataError> {
        let expected = self.electron_pt.len();
        for (column, values) in self.named() {
            if values.len() != expected {
                return Err(DataError::ColumnLength {
                    column,
                    expected,
                    found: values.len(),
                });
            }
        }

        // jet_pt defines the jet count of each event
        for (event, pts) in self.jet_pt.iter().enumerate() {
            for &(column, values) in &self.named()[3..] {
                let found = values[event].len();
                if found != pts.len() {
                    return Err(DataError::Alignment {
                        event,
                        column,
                        expected: pts.len(),
                        found,
                    });
                }
            }
        }
        Ok(())
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.electron_pt.len()
    }

    /// Whether the batch holds no events.
    pub fn is_empty(&self) -> bool {
        self.electron_pt.is_empty()
    }

    /// Total number of jets over all events.
    pub fn jet_count(&self) -> usize {
        self.jet_pt.iter().map(Vec::len).sum()
    }

    /// Materialise event `index`. Panics if out of range, like slice indexing.
    pub fn event(&self, index: usize) -> Event {
        let jets = (0..self.jet_pt[index].len())
            .map(|i| Jet {
                pt: self.jet_pt[index][i],
                btag: self.jet_btag[index][i],
                px: self.jet_px[index][i],
                py: self.jet_py[index][i],
                pz: self.jet_pz[index][i],
                e: self.jet_e[index][i],
            })
            .collect();

        Event {
            electron_pt: self.electron_pt[index].clone(),
            muon_pt: self.muon_pt[index].clone(),
            jets,
        }
    }

    /// Iterate events in storage order.
    pub fn events(&self) -> impl Iterator<Item = Event> + '_ {
        (0..self.len()).map(move |i| self.event(i))
    }

    /// Append another batch (used when a file arrives in several record batches).
    pub fn extend(&mut self, other: EventColumns) {
        self.electron_pt.extend(other.electron_pt);
        self.muon_pt.extend(other.muon_pt);
        self.jet_pt.extend(other.jet_pt);
        self.jet_btag.extend(other.jet_btag);
        self.jet_px.extend(other.jet_px);
        self.jet_py.extend(other.jet_py);
        self.jet_pz.extend(other.jet_pz);
        self.jet_e.extend(other.jet_e);
    }
}
