//! Session flows: uploads becoming live sessions, re-encoding and filtering.

use viz_services::error::AppError;
use viz_services::services::file_processor::parse_file;
use viz_services::services::session::{Session, SessionStore};
use viz_services::services::tabular::{Cell, ChartKind, ChartSuggestion};

const SALES_XLSX: &[u8] = include_bytes!("../fixtures/sales.xlsx");

fn upload(store: &SessionStore, name: &str, bytes: &[u8]) -> Result<(), AppError> {
    let ticket = store.begin_upload();
    let table = parse_file(bytes, name)?;
    store.install(ticket, Session::new(name.to_string(), table))
}

#[test]
fn upload_re_encode_filter_and_clear() {
    let store = SessionStore::new();
    upload(
        &store,
        "sales.csv",
        b"region,amount\nnorth,10\nsouth,20\nnorth,30\neast,40",
    )
    .unwrap();

    store
        .with_session(|session| {
            assert_eq!(session.chart_kind(), Some(ChartKind::Bar));
            assert_eq!(session.visible_rows().len(), 4);

            assert!(session.set_chart_kind(ChartKind::Pie));
            assert_eq!(
                session.distinct_filter_values(),
                vec![
                    Cell::Text("north".to_string()),
                    Cell::Text("south".to_string()),
                    Cell::Text("east".to_string()),
                ]
            );

            session.set_filter(Some(Cell::Text("north".to_string())));
            assert_eq!(session.visible_rows().len(), 2);
            // Choices for the next filter still span the whole table.
            assert_eq!(session.distinct_filter_values().len(), 3);

            session.set_filter(None);
            assert_eq!(session.visible_rows().len(), 4);
        })
        .unwrap();
}

#[test]
fn xlsx_upload_supports_the_same_flow() {
    let store = SessionStore::new();
    upload(&store, "sales.xlsx", SALES_XLSX).unwrap();

    store
        .with_session(|session| {
            assert!(session.set_chart_kind(ChartKind::Pie));
            assert_eq!(
                session.suggestion(),
                Some(&ChartSuggestion::Pie {
                    name: "region".to_string(),
                    value: "amount".to_string(),
                })
            );

            session.set_filter(Some(Cell::Text("north".to_string())));
            let rows = session.visible_rows();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0][1], Cell::Number(10.0));
            assert_eq!(rows[1][1], Cell::Number(30.0));
        })
        .unwrap();
}

#[test]
fn line_and_bar_ignore_the_stored_filter() {
    let store = SessionStore::new();
    upload(&store, "sales.csv", b"region,amount\nnorth,10\nsouth,20").unwrap();

    store
        .with_session(|session| {
            session.set_filter(Some(Cell::Text("north".to_string())));
            assert_eq!(session.visible_rows().len(), 2);

            // Pie applies it, switching away releases it, without losing it.
            session.set_chart_kind(ChartKind::Pie);
            assert_eq!(session.visible_rows().len(), 1);
            session.set_chart_kind(ChartKind::Bar);
            assert_eq!(session.visible_rows().len(), 2);
            assert_eq!(session.filter(), Some(&Cell::Text("north".to_string())));
        })
        .unwrap();
}

#[test]
fn failed_re_encode_preserves_the_whole_view() {
    let store = SessionStore::new();
    // Text-only table: no kind can bind a numeric role.
    upload(&store, "labels.csv", b"a,b\nx,y\nz,w").unwrap();

    store
        .with_session(|session| {
            session.set_filter(Some(Cell::Text("x".to_string())));
            assert_eq!(session.suggestion(), None);

            assert!(!session.set_chart_kind(ChartKind::Pie));
            assert!(!session.set_chart_kind(ChartKind::Bar));
            assert_eq!(session.suggestion(), None);
            assert_eq!(session.filter(), Some(&Cell::Text("x".to_string())));
            assert_eq!(session.visible_rows().len(), 2);
        })
        .unwrap();
}

#[test]
fn new_upload_replaces_the_session_and_resets_state() {
    let store = SessionStore::new();
    upload(&store, "first.csv", b"region,amount\nnorth,10\nsouth,20").unwrap();
    store
        .with_session(|session| {
            session.set_chart_kind(ChartKind::Pie);
            session.set_filter(Some(Cell::Text("north".to_string())));
        })
        .unwrap();

    upload(&store, "second.csv", b"day,v\n2024-01-01,5\n2024-01-02,6").unwrap();
    store
        .with_session(|session| {
            assert_eq!(session.file_name(), "second.csv");
            assert_eq!(session.chart_kind(), Some(ChartKind::Line));
            assert_eq!(session.filter(), None);
            assert_eq!(session.visible_rows().len(), 2);
        })
        .unwrap();
}

#[test]
fn slow_stale_upload_cannot_clobber_a_newer_one() {
    let store = SessionStore::new();

    // Two uploads in flight: the older one parses last.
    let old_ticket = store.begin_upload();
    let new_ticket = store.begin_upload();

    let new_table = parse_file(b"a\n1", "new.csv").unwrap();
    store
        .install(new_ticket, Session::new("new.csv".to_string(), new_table))
        .unwrap();

    let old_table = parse_file(b"a\n2", "old.csv").unwrap();
    let err = store
        .install(old_ticket, Session::new("old.csv".to_string(), old_table))
        .unwrap_err();
    assert!(matches!(err, AppError::Superseded(_)));

    store
        .with_session(|session| assert_eq!(session.file_name(), "new.csv"))
        .unwrap();
}

#[test]
fn failed_upload_leaves_the_previous_session_alive() {
    let store = SessionStore::new();
    upload(&store, "good.csv", b"a,b\nx,1").unwrap();

    let err = upload(&store, "bad.csv", b"").unwrap_err();
    assert!(matches!(err, AppError::Parse(_)));

    store
        .with_session(|session| assert_eq!(session.file_name(), "good.csv"))
        .unwrap();
}
