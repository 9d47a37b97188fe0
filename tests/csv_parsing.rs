use csv_combine::CombineError;
use csv_combine::ingestion::csv::unify_headers;
use csv_combine::ingestion::{
    LiteralSplitter, ScanOutcome, parse_all, parse_csv_from_path, scan_input_dir,
};

#[test]
fn parse_csv_from_path_happy_path() {
    let src = parse_csv_from_path("tests/fixtures/companies/f1.csv", &LiteralSplitter)
        .unwrap()
        .unwrap();

    assert_eq!(src.headers, vec!["Name", "City"]);
    assert_eq!(src.row_count(), 2);
    let (line, row) = &src.rows[1];
    assert_eq!(*line, 3);
    assert_eq!(row.get("Name"), Some("Beta"));
    assert_eq!(row.get("City"), Some(""));
}

#[test]
fn parse_all_unifies_headers_in_scan_order() {
    let ScanOutcome::Files(files) = scan_input_dir("tests/fixtures/companies").unwrap() else {
        panic!("fixture folder should contain csv files");
    };
    let (headers, sources) = parse_all(&files, &LiteralSplitter).unwrap();

    assert_eq!(headers.names().collect::<Vec<_>>(), vec!["Name", "City", "Revenue"]);
    assert_eq!(sources.len(), 2);
    assert_eq!(unify_headers(&sources), headers);
}

#[test]
fn rows_only_hold_their_own_file_columns() {
    let src = parse_csv_from_path("tests/fixtures/companies/f2.csv", &LiteralSplitter)
        .unwrap()
        .unwrap();

    for (_, row) in &src.rows {
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("City"), None);
    }
}

#[test]
fn missing_file_is_a_read_error() {
    let err =
        parse_csv_from_path("tests/fixtures/does_not_exist.csv", &LiteralSplitter).unwrap_err();
    assert!(matches!(err, CombineError::ReadFile { .. }));
    assert!(err.to_string().contains("does_not_exist.csv"));
}
