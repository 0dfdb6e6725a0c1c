use std::fmt::Write;

use serde::Serialize;

/// Trijet mass bin edges in GeV, as used by the Analysis Grand Challenge
/// reference plots.
pub const MASS_BIN_EDGES: [f64; 11] = [
    0.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0, 450.0, 500.0,
];

// ---------------------------------------------------------------------------
// Histogram – fixed-edge 1D counts
// ---------------------------------------------------------------------------

/// One-dimensional histogram with half-open bins `[lo, hi)`.
///
/// Values below the first edge (negative signed masses included) go to
/// `underflow`, values at or above the last edge go to `overflow`. NaN is
/// counted separately and never binned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
    underflow: u64,
    overflow: u64,
    nan: u64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::mass()
    }
}

impl Histogram {
    /// Build with the given edges. Returns `None` unless there are at least two
    /// finite, strictly increasing edges.
    pub fn new(edges: &[f64]) -> Option<Self> {
        if edges.len() < 2
            || edges.iter().any(|e| !e.is_finite())
            || edges.windows(2).any(|w| w[0] >= w[1])
        {
            return None;
        }
        Some(Self {
            edges: edges.to_vec(),
            counts: vec![0; edges.len() - 1],
            underflow: 0,
            overflow: 0,
            nan: 0,
        })
    }

    /// Histogram over [`MASS_BIN_EDGES`].
    pub fn mass() -> Self {
        Self {
            edges: MASS_BIN_EDGES.to_vec(),
            counts: vec![0; MASS_BIN_EDGES.len() - 1],
            underflow: 0,
            overflow: 0,
            nan: 0,
        }
    }

    pub fn fill(&mut self, value: f64) {
        if value.is_nan() {
            self.nan += 1;
            return;
        }
        let first = self.edges[0];
        let last = self.edges[self.edges.len() - 1];
        if value < first {
            self.underflow += 1;
        } else if value >= last {
            self.overflow += 1;
        } else {
            // number of edges <= value, minus one, is the bin index
            let idx = self.edges.partition_point(|&e| e <= value) - 1;
            self.counts[idx] += 1;
        }
    }

    pub fn fill_all<'a>(&mut self, values: impl IntoIterator<Item = &'a f64>) {
        for &v in values {
            self.fill(v);
        }
    }

    pub fn from_values(values: &[f64]) -> Self {
        let mut hist = Self::mass();
        hist.fill_all(values);
        hist
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    pub fn nan(&self) -> u64 {
        self.nan
    }

    /// All filled values, including under/overflow and NaN.
    pub fn entries(&self) -> u64 {
        self.counts.iter().sum::<u64>() + self.underflow + self.overflow + self.nan
    }

    /// `(lo, hi, count)` for each regular bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }

    /// Add another histogram with identical edges.
    pub fn merge(&mut self, other: &Histogram) -> bool {
        if self.edges != other.edges {
            return false;
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.nan += other.nan;
        true
    }

    /// Horizontal bar chart for the terminal, longest bar `width` characters.
    pub fn render_text(&self, width: usize) -> String {
        let mut rows: Vec<(String, u64)> = Vec::with_capacity(self.counts.len() + 2);
        rows.push((format!("< {}", self.edges[0]), self.underflow));
        rows.extend(self.bins().map(|(lo, hi, c)| (format!("{lo}-{hi}"), c)));
        rows.push((format!(">= {}", self.edges[self.edges.len() - 1]), self.overflow));

        let label_width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        let max = rows.iter().map(|&(_, c)| c).max().unwrap_or(0).max(1);

        let mut out = String::new();
        for (label, count) in rows {
            let len = (count as u128 * width as u128 / max as u128) as usize;
            let _ = writeln!(
                out,
                "{label:>label_width$} | {:<width$} {count}",
                "#".repeat(len)
            );
        }
        out
    }
}
