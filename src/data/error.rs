use thiserror::Error;

/// Integrity faults in the event columns.
///
/// All of these are fatal for the dataset they come from: the pipeline never
/// tries to guess which jet attribute belongs to which jet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// A required column is absent from the source.
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    /// Two columns disagree on the number of events.
    #[error("column '{column}' has {found} events, expected {expected}")]
    ColumnLength {
        column: &'static str,
        expected: usize,
        found: usize,
    },

    /// The jet fields of one event have different lengths.
    #[error("event {event}: jet field '{column}' has {found} entries but jet_pt has {expected}")]
    Alignment {
        event: usize,
        column: &'static str,
        expected: usize,
        found: usize,
    },
}
