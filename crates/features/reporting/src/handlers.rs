use crate::export::{self, CsvFilter};
use crate::guard::AdminAccess;
use crate::model::{CsvQuery, DateSummary, SummaryResponse};
use axum::Json;
use axum::extract::Query;
use axum::http::header;
use axum::response::IntoResponse;
use slotbook_booking::{Registration, counts_for_date};
use slotbook_derive::api_handler;
use slotbook_kernel::domain::constants::ADMIN_TAG;
use tracing::info;

#[api_handler(
    get,
    path = "/api/admin/data",
    params(("x-admin-password" = String, Header, description = "Shared admin password")),
    responses(
        (status = OK, description = "Every registration in ledger order", body = Vec<Registration>),
        (status = UNAUTHORIZED, description = "Missing or wrong password"),
    ),
    tag = ADMIN_TAG,
)]
pub(crate) async fn data_handler(access: AdminAccess) -> Json<Vec<Registration>> {
    let records = access.booking.ledger.load().await;
    info!(records = records.len(), "Ledger dumped");
    Json(records)
}

#[api_handler(
    get,
    path = "/api/admin/csv",
    params(
        CsvQuery,
        ("x-admin-password" = String, Header, description = "Shared admin password"),
    ),
    responses(
        (status = OK, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = UNAUTHORIZED, description = "Missing or wrong password"),
    ),
    tag = ADMIN_TAG,
)]
pub(crate) async fn csv_handler(
    access: AdminAccess,
    Query(query): Query<CsvQuery>,
) -> impl IntoResponse {
    let filter = CsvFilter::new(query.date.as_deref(), query.cohort.as_deref());
    let records = access.booking.ledger.load().await;
    let body = export::render(&records, &filter);
    let disposition = format!("attachment; filename=\"{}\"", filter.file_name());

    info!(date = ?filter.date, cohort = ?filter.cohort, "CSV exported");
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
}

#[api_handler(
    get,
    path = "/api/admin/summary",
    params(("x-admin-password" = String, Header, description = "Shared admin password")),
    responses(
        (status = OK, description = "Counts per allowed date", body = SummaryResponse),
        (status = UNAUTHORIZED, description = "Missing or wrong password"),
    ),
    tag = ADMIN_TAG,
)]
pub(crate) async fn summary_handler(access: AdminAccess) -> Json<SummaryResponse> {
    let records = access.booking.ledger.load().await;
    let settings = &access.settings;

    let dates = settings
        .allowed_dates
        .iter()
        .map(|date| {
            let counts = counts_for_date(&records, date, &settings.cohorts);
            let total_remaining = counts.remaining(settings).total_remaining;
            DateSummary { date: date.clone(), total: counts.total, counts: counts.per_cohort, total_remaining }
        })
        .collect();

    Json(SummaryResponse { registrations: records.len(), dates })
}
