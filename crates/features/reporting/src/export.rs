//! CSV rendering of the ledger.
//!
//! Quoting follows RFC 4180: a field containing a comma, a double quote, CR or LF is
//! wrapped in double quotes with embedded quotes doubled. Rows end with `\n`.

use slotbook_booking::Registration;
use std::borrow::Cow;

pub const CSV_HEADER: [&str; 9] =
    ["Timestamp", "Name", "College", "Year", "Contact", "Email", "Food", "Date", "Cohort"];

/// Optional equality filters. Blank values mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvFilter {
    pub date: Option<String>,
    pub cohort: Option<String>,
}

impl CsvFilter {
    #[must_use]
    pub fn new(date: Option<&str>, cohort: Option<&str>) -> Self {
        let clean = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned);
        Self { date: clean(date), cohort: clean(cohort) }
    }

    #[must_use]
    pub fn matches(&self, record: &Registration) -> bool {
        self.date.as_ref().is_none_or(|d| *d == record.date)
            && self.cohort.as_ref().is_none_or(|c| *c == record.cohort)
    }

    /// `registrations[-date][-cohort].csv`, safe to put in a header.
    #[must_use]
    pub fn file_name(&self) -> String {
        let mut name = String::from("registrations");
        for part in [&self.date, &self.cohort].into_iter().flatten() {
            name.push('-');
            name.extend(part.chars().map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' }
            }));
        }
        name.push_str(".csv");
        name
    }
}

/// Quotes `field` only when it needs it.
#[must_use]
pub fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Header plus one row per record passing `filter`, in ledger order.
#[must_use]
pub fn render(records: &[Registration], filter: &CsvFilter) -> String {
    let mut out = CSV_HEADER.join(",");
    for record in records.iter().filter(|r| filter.matches(r)) {
        let row = [
            &record.timestamp,
            &record.name,
            &record.college,
            &record.year,
            &record.contact,
            &record.email,
            &record.food,
            &record.date,
            &record.cohort,
        ];
        out.push('\n');
        out.push_str(&row.iter().map(|f| escape(f)).collect::<Vec<_>>().join(","));
    }
    out
}
