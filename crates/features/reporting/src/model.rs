use slotbook_derive::api_model;
use std::collections::BTreeMap;
use utoipa::IntoParams;

#[api_model]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CsvQuery {
    /// Only rows for this date
    pub date: Option<String>,
    /// Only rows for this cohort
    pub cohort: Option<String>,
}

#[api_model]
/// Occupancy of one allowed date
pub struct DateSummary {
    pub date: String,
    pub counts: BTreeMap<String, usize>,
    pub total: usize,
    pub total_remaining: usize,
}

#[api_model]
/// Occupancy of every allowed date plus the ledger size
pub struct SummaryResponse {
    pub registrations: usize,
    pub dates: Vec<DateSummary>,
}
