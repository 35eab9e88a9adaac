//! Wire shapes of the public booking endpoints.

use crate::admission::{Admission, SlotsReport};
use slotbook_derive::api_model;
use std::collections::BTreeMap;
use utoipa::IntoParams;

pub const REGISTERED_MESSAGE: &str = "Registration successful!";
pub const RESET_DISABLED_MESSAGE: &str = "Reset is disabled.";
pub const RESET_DONE_MESSAGE: &str = "All registrations cleared.";

#[api_model]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlotsQuery {
    /// Date to report, as listed in the allowed dates
    pub date: Option<String>,
}

#[api_model]
/// Occupancy of one date
pub struct SlotsResponse {
    /// `false` when the date is not open for registration
    pub success: bool,
    pub date: String,
    /// Admitted registrations per cohort
    pub counts: BTreeMap<String, usize>,
    /// Admitted registrations across cohorts
    pub total: usize,
    pub total_remaining: usize,
    pub remaining_by_cohort: BTreeMap<String, usize>,
    pub per_day_limit: u32,
    pub per_cohort_limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[api_model]
/// Outcome of a registration attempt
pub struct RegisterResponse {
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Per-cohort counts for the date after admission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<BTreeMap<String, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_remaining: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_by_cohort: Option<BTreeMap<String, usize>>,
}

#[api_model]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl From<SlotsReport> for SlotsResponse {
    fn from(report: SlotsReport) -> Self {
        Self {
            success: report.closed.is_none(),
            date: report.date,
            counts: report.counts.per_cohort,
            total: report.counts.total,
            total_remaining: report.capacity.total_remaining,
            remaining_by_cohort: report.capacity.remaining_by_cohort,
            per_day_limit: report.per_day_limit,
            per_cohort_limit: report.per_cohort_limit,
            message: report.closed.map(|rejection| rejection.to_string()),
        }
    }
}

impl From<Admission> for RegisterResponse {
    fn from(admission: Admission) -> Self {
        match admission {
            Admission::Admitted(admitted) => {
                let admitted = *admitted;
                Self {
                    success: true,
                    message: REGISTERED_MESSAGE.to_owned(),
                    counts: Some(admitted.counts.per_cohort),
                    total_remaining: Some(admitted.capacity.total_remaining),
                    remaining_by_cohort: Some(admitted.capacity.remaining_by_cohort),
                }
            },
            Admission::Rejected(rejection) => Self {
                success: false,
                message: rejection.to_string(),
                counts: None,
                total_remaining: None,
                remaining_by_cohort: None,
            },
        }
    }
}
