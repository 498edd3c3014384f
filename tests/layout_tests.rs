mod common;
use calamine::{Data, ExcelDateTime, ExcelDateTimeType};
use common::xlsx_bytes;
use email2printer::core::boundary::SpreadsheetDecoder;
use email2printer::core::message::AttachmentPayload;
use email2printer::errors::AppError;
use email2printer::report::grid::{XlsxDecoder, cell_text, make_rectangular};
use email2printer::report::layout::{CELL_PADDING, natural_widths, plan_column_widths};
use email2printer::report::{PageGeometry, build_table, text_width, wrap_cell};

fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_text_width_uses_helvetica_metrics() {
    assert!(close(text_width("a", 10.0), 5.56));
    assert!(close(text_width("ii", 10.0), 4.44));
    assert!(close(text_width("W", 20.0), 18.88));
    assert_eq!(text_width("", 10.0), 0.0);
}

#[test]
fn test_natural_width_is_widest_cell_plus_padding() {
    let g = grid(&[&["a", "bb"], &["aaa", ""]]);
    let widths = natural_widths(&g);

    assert_eq!(widths.len(), 2);
    assert!(close(widths[0], text_width("aaa", 10.0) + CELL_PADDING));
    assert!(close(widths[1], text_width("bb", 10.0) + CELL_PADDING));
}

#[test]
fn test_widths_kept_when_they_fit() {
    let g = grid(&[&["Name", "Count"], &["Ann", "3"]]);
    let plan = plan_column_widths(&g, 732.0);

    assert_eq!(plan.widths(), natural_widths(&g).as_slice());
    assert!(plan.total() <= 732.0);
}

#[test]
fn test_one_huge_cell_is_capped_at_equal_share() {
    let huge = "x".repeat(2000);
    let g = grid(&[&[huge.as_str(), "b", "c"]]);
    let plan = plan_column_widths(&g, 732.0);

    assert!(close(plan.widths()[0], 244.0));
    // narrow columns keep their natural width
    assert!(close(plan.widths()[1], text_width("b", 10.0) + CELL_PADDING));
    assert!(plan.total() <= 732.0);
}

#[test]
fn test_many_wide_columns_never_exceed_usable_width() {
    let wide = "wide column header".to_string();
    let row: Vec<String> = (0..100).map(|_| wide.clone()).collect();
    let plan = plan_column_widths(&vec![row], 732.0);

    assert_eq!(plan.len(), 100);
    assert!(plan.total() <= 732.0 + 0.01);
    for w in plan.widths() {
        assert!(close(*w, 7.32));
    }
}

#[test]
fn test_empty_grid_has_no_columns() {
    let plan = plan_column_widths(&Vec::new(), 732.0);
    assert!(plan.is_empty());
    assert_eq!(plan.total(), 0.0);
}

#[test]
fn test_build_table_pads_ragged_rows() {
    let g = grid(&[&["a", "b", "c"], &["d"], &[]]);
    let table = build_table("ragged.xlsx", g, &PageGeometry::default());

    assert_eq!(table.source, "ragged.xlsx");
    assert_eq!(table.column_count(), 3);
    assert!(table.grid.iter().all(|r| r.len() == 3));
    assert_eq!(table.grid[1], ["d", "", ""]);
}

#[test]
fn test_make_rectangular_keeps_full_rows() {
    let g = make_rectangular(grid(&[&["1", "2"], &["3", "4"]]));
    assert_eq!(g, grid(&[&["1", "2"], &["3", "4"]]));
}

#[test]
fn test_letter_landscape_geometry() {
    let g = PageGeometry::default();
    assert_eq!((g.width, g.height), (792.0, 612.0));
    assert_eq!(g.usable_width(), 732.0);
    assert_eq!(g.usable_height(), 564.0);
}

#[test]
fn test_cell_text_forms() {
    assert_eq!(cell_text(&Data::Empty), "");
    assert_eq!(cell_text(&Data::String("Ann".into())), "Ann");
    assert_eq!(cell_text(&Data::Int(7)), "7");
    assert_eq!(cell_text(&Data::Float(3.0)), "3");
    assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
    assert_eq!(cell_text(&Data::Bool(true)), "True");
    assert_eq!(cell_text(&Data::Bool(false)), "False");
}

#[test]
fn test_cell_text_dates() {
    let noon = Data::DateTime(ExcelDateTime::new(0.5, ExcelDateTimeType::DateTime, false));
    let day = Data::DateTime(ExcelDateTime::new(45000.0, ExcelDateTimeType::DateTime, false));

    assert_eq!(cell_text(&noon), "12:00:00");
    assert_eq!(cell_text(&day), "2023-03-15 00:00:00");
}

#[test]
fn test_decoder_reads_first_sheet_as_rectangular_grid() {
    let payload = AttachmentPayload {
        filename: "leads.xlsx".into(),
        bytes: xlsx_bytes(&[&["Name", "Phone"], &["Ann", ""], &["", "555-0101"]]),
    };

    let g = XlsxDecoder.decode(&payload).unwrap();
    assert_eq!(
        g,
        grid(&[&["Name", "Phone"], &["Ann", ""], &["", "555-0101"]])
    );
}

#[test]
fn test_decoder_keeps_leading_blank_rows_and_columns() {
    let payload = AttachmentPayload {
        filename: "offset.xlsx".into(),
        bytes: xlsx_bytes(&[&["", ""], &["", "v"]]),
    };

    let g = XlsxDecoder.decode(&payload).unwrap();
    assert_eq!(g, grid(&[&["", ""], &["", "v"]]));
}

#[test]
fn test_decoder_rejects_garbage() {
    let payload = AttachmentPayload {
        filename: "broken.xlsx".into(),
        bytes: b"definitely not a zip archive".to_vec(),
    };

    match XlsxDecoder.decode(&payload) {
        Err(AppError::Spreadsheet { filename, .. }) => assert_eq!(filename, "broken.xlsx"),
        other => panic!("expected a spreadsheet error, got {other:?}"),
    }
}

#[test]
fn test_wrap_short_text_is_one_line() {
    assert_eq!(wrap_cell("hello world", 200.0, 10.0), ["hello world"]);
    assert!(wrap_cell("", 200.0, 10.0).is_empty());
}

#[test]
fn test_wrap_breaks_on_spaces() {
    // "hello" is 21.12pt and "hello world" 47.79pt at 10pt
    assert_eq!(wrap_cell("hello world", 30.0, 10.0), ["hello", "world"]);
}

#[test]
fn test_wrap_keeps_explicit_newlines() {
    assert_eq!(wrap_cell("first\nsecond", 200.0, 10.0), ["first", "second"]);
}

#[test]
fn test_wrap_splits_words_wider_than_a_line() {
    // each 'x' is 5pt at 10pt
    assert_eq!(
        wrap_cell("xxxxxxxxxx", 20.0, 10.0),
        ["xxxx", "xxxx", "xx"]
    );
}

#[test]
fn test_ragged_grid_widths_cover_the_longest_row() {
    let g = grid(&[&["a"], &["b", "cc", "ddd"]]);

    let widths = natural_widths(&g);
    assert_eq!(widths.len(), 3);
    assert!(close(widths[2], text_width("ddd", 10.0) + CELL_PADDING));

    let plan = plan_column_widths(&g, 732.0);
    assert_eq!(plan.len(), 3);
}
