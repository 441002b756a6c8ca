//! End-to-end coverage of the parse, profile and suggest pipeline.

use viz_services::services::file_processor::parse_file;
use viz_services::services::tabular::{
    profile_columns, suggest_chart, Cell, ChartSuggestion, ColumnType, ParseError,
};

const SALES_XLSX: &[u8] = include_bytes!("../fixtures/sales.xlsx");
const HEADER_ONLY_XLSX: &[u8] = include_bytes!("../fixtures/header_only.xlsx");

#[test]
fn csv_bytes_flow_into_a_line_chart_suggestion() {
    let table = parse_file(
        b"day,visits\n2024-01-01,120\n2024-01-02,95\n2024-01-03,143",
        "visits.csv",
    )
    .unwrap();

    let profiles = profile_columns(&table);
    assert_eq!(profiles[0].column_type, ColumnType::Date);
    assert_eq!(profiles[1].column_type, ColumnType::Number);

    assert_eq!(
        suggest_chart(&profiles),
        Some(ChartSuggestion::Line {
            x: "day".to_string(),
            y: "visits".to_string(),
        })
    );
}

#[test]
fn parsed_tables_are_always_rectangular() {
    let inputs: [&[u8]; 3] = [
        b"a,b,c\n1,2,3\n4,5\n6",
        b"a,b\n1,2,3,4\n5",
        b"x\n\n1\n\n2\n",
    ];
    for bytes in inputs {
        let table = parse_file(bytes, "data.csv").unwrap();
        for row in &table.rows {
            assert_eq!(row.len(), table.column_count());
        }
    }
}

#[test]
fn trailing_comma_rows_keep_their_null_slot() {
    let table = parse_file(b"a,b\n1,x\n2,y\n3,", "t.csv").unwrap();
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.rows[2], vec![Cell::Number(3.0), Cell::Null]);
}

#[test]
fn integer_looking_csv_fields_profile_as_numbers() {
    let table = parse_file(b"id\n1\n2\n3", "ids.csv").unwrap();
    let profiles = profile_columns(&table);
    assert_eq!(profiles[0].column_type, ColumnType::Number);
    assert_eq!(profiles[0].unique_count, 3);
}

#[test]
fn profiling_is_pure_over_the_table() {
    let table = parse_file(b"region,v\nnorth,1\nsouth,2", "r.csv").unwrap();
    let first = profile_columns(&table);
    let second = profile_columns(&table);
    assert_eq!(first, second);
    assert_eq!(suggest_chart(&first), suggest_chart(&second));
}

#[test]
fn xlsx_fixture_parses_into_typed_cells() {
    let table = parse_file(SALES_XLSX, "sales.xlsx").unwrap();
    assert_eq!(table.columns, vec!["region", "amount"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.rows[0][0], Cell::Text("north".to_string()));
    assert_eq!(table.rows[0][1], Cell::Number(10.0));
    assert_eq!(table.rows[1][1], Cell::Number(20.5));

    let profiles = profile_columns(&table);
    assert_eq!(profiles[0].column_type, ColumnType::Text);
    assert_eq!(profiles[0].unique_count, 2);
    assert_eq!(profiles[1].column_type, ColumnType::Number);

    assert_eq!(
        suggest_chart(&profiles),
        Some(ChartSuggestion::Bar {
            x: "region".to_string(),
            y: "amount".to_string(),
        })
    );
}

#[test]
fn header_only_xlsx_is_empty_data() {
    let err = parse_file(HEADER_ONLY_XLSX, "header_only.xlsx").unwrap_err();
    assert!(matches!(err, ParseError::EmptyData(_)));
    assert_eq!(err.to_string(), "Excel sheet is empty");
}

#[test]
fn header_only_csv_is_empty_data() {
    let err = parse_file(b"a,b,c\n", "t.csv").unwrap_err();
    assert!(matches!(err, ParseError::EmptyData(_)));
}

#[test]
fn unsupported_extensions_never_reach_a_parser() {
    for name in ["report.pdf", "notes.txt", "archive"] {
        let err = parse_file(b"a,b\n1,2", name).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat(_)), "{}", name);
    }
}

#[test]
fn xlsx_bytes_under_a_csv_name_fail_as_csv() {
    // Dispatch trusts the extension, so zip bytes read as text.
    let err = parse_file(SALES_XLSX, "sales.csv").unwrap_err();
    assert!(matches!(err, ParseError::Format(_)));
}
