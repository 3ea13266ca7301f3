use genjets_core::{Event, FourMomentum};

/// Four-momenta of every final-state particle in `event`.
///
/// No charge or acceptance cut is applied. Order follows the event record
/// but carries no meaning for clustering.
pub fn select_final_state(event: &Event) -> Vec<FourMomentum> {
    event.final_state().map(|record| record.momentum).collect()
}
