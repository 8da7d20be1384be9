//! Generation outcome counters.

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Outcomes of generation attempts, labeled `document`, `payment_required`,
    /// `validation_failed`, `asset_unavailable`, `render_failed`,
    /// `transform_failed`, or `strategy_misconfigured`.
    pub static ref GENERATION_OUTCOMES: IntCounterVec = register_int_counter_vec!(
        "legaldoc_generation_outcomes_total",
        "Document generation outcomes by result.",
        &["outcome"]
    )
    .expect("generation outcome counter registration");
}

pub fn record_outcome(outcome: &str) {
    GENERATION_OUTCOMES.with_label_values(&[outcome]).inc();
}
