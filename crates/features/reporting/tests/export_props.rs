use proptest::prelude::*;
use slotbook_booking::Registration;
use slotbook_reporting::export::{CsvFilter, escape, render};

fn record(college: String, name: String) -> Registration {
    Registration {
        timestamp: "2024-01-01T08:00:00.000Z".into(),
        name,
        college,
        year: "1".into(),
        contact: "1111111111".into(),
        email: "a@example.org".into(),
        food: "Veg".into(),
        date: "2024-01-01".into(),
        cohort: "Alpha".into(),
    }
}

proptest! {
    #[test]
    fn escaped_field_parses_back(field in any::<String>()) {
        let line = format!("start,{},end\n", escape(&field));
        let mut reader = csv::ReaderBuilder::new().has_headers(false).from_reader(line.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        prop_assert_eq!(&row[1], field.as_str());
        prop_assert_eq!(&row[2], "end");
    }

    #[test]
    fn rendered_rows_keep_their_fields(
        college in "[a-zA-Z ,\"\n]{0,24}",
        name in "[a-zA-Z ,\"]{1,16}",
    ) {
        let csv_text = render(&[record(college.clone(), name.clone())], &CsvFilter::default());
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        prop_assert_eq!(rows.len(), 1);
        prop_assert_eq!(&rows[0][1], name.as_str());
        prop_assert_eq!(&rows[0][2], college.as_str());
    }
}
