//! Bulk workflow over CSV and Excel files.

mod common;

use pretty_assertions::assert_eq;

use common::TestModel;
use review_emotion::services::bulk::classify_table;
use review_emotion::table::sample::{sample_bytes, sample_table};
use review_emotion::table::{read_table, write_table, Cell, Table, TableFormat};
use review_emotion::EmotionError;

fn classify_file(ctx: &review_emotion::init::AppContext, path: &std::path::Path) -> Result<Table, EmotionError> {
    let table = read_table(path)?;
    classify_table(
        &ctx.pipeline,
        &table,
        &ctx.config.table.text_column,
        &ctx.config.table.prediction_column,
    )
}

#[test]
fn test_csv_scenario_appends_prediction_column() {
    let (harness, ctx) = common::load_context(TestModel::Keyword);
    let input = harness.path().join("reviews.csv");
    std::fs::write(
        &input,
        "Review\nSaya sangat senang dengan layanannya\nProduk ini sangat mengecewakan\n\"Pengiriman cepat, terima kasih!\"\n",
    )
    .expect("write");

    let result = classify_file(&ctx, &input).expect("classify");
    assert_eq!(result.headers(), &["Review", "Emotion Prediction"]);
    assert_eq!(result.len(), 3);
    let labels: Vec<String> = result.column(1).map(Cell::as_text).collect();
    assert_eq!(labels, vec!["happy", "sad", "happy"]);

    let output = harness.path().join("out.csv");
    write_table(&output, &result, TableFormat::Csv).expect("write");
    let written = std::fs::read_to_string(&output).expect("read");
    assert_eq!(
        written,
        "Review,Emotion Prediction\nSaya sangat senang dengan layanannya,happy\nProduk ini sangat mengecewakan,sad\n\"Pengiriman cepat, terima kasih!\",happy\n"
    );
}

#[test]
fn test_xlsx_keeps_other_columns() {
    let (harness, ctx) = common::load_context(TestModel::Keyword);
    let table = Table::new(
        vec!["Id".into(), "Review".into()],
        vec![
            vec![Cell::Number(7.0), "cepat sekali".into()],
            vec![Cell::Number(8.0), Cell::Empty],
        ],
    )
    .expect("table");
    let input = harness.path().join("reviews.xlsx");
    write_table(&input, &table, TableFormat::Xlsx).expect("write");

    let result = classify_file(&ctx, &input).expect("classify");
    assert_eq!(result.headers(), &["Id", "Review", "Emotion Prediction"]);
    assert_eq!(
        result.rows()[0],
        vec![Cell::Number(7.0), "cepat sekali".into(), "happy".into()]
    );
    assert_eq!(result.rows()[1][2], Cell::Text("neutral".into()));

    let output = harness.path().join("out.xlsx");
    write_table(&output, &result, TableFormat::Xlsx).expect("write");
    assert_eq!(read_table(&output).expect("reread"), result);
}

#[test]
fn test_missing_review_column() {
    let (harness, ctx) = common::load_context(TestModel::Keyword);
    let input = harness.path().join("reviews.csv");
    std::fs::write(&input, "Text\nbagus\n").expect("write");

    match classify_file(&ctx, &input) {
        Err(EmotionError::MalformedInput(msg)) => assert!(msg.contains("Review"), "{}", msg),
        other => panic!("expected MalformedInput, got {:?}", other.map(|t| t.len())),
    }
}

#[test]
fn test_unsupported_extension_is_rejected_before_reading() {
    let (harness, ctx) = common::load_context(TestModel::Keyword);
    let input = harness.path().join("reviews.txt");
    assert!(matches!(
        classify_file(&ctx, &input),
        Err(EmotionError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_sample_files_feed_the_bulk_workflow() {
    let (harness, ctx) = common::load_context(TestModel::Keyword);
    for format in [TableFormat::Csv, TableFormat::Xlsx] {
        let path = harness.path().join(format!("sample_input.{}", format.extension()));
        std::fs::write(&path, sample_bytes(format, "Review").expect("sample")).expect("write");
        assert_eq!(read_table(&path).expect("read"), sample_table("Review"));

        let result = classify_file(&ctx, &path).expect("classify");
        let labels: Vec<String> = result.column(1).map(Cell::as_text).collect();
        assert_eq!(labels, vec!["happy", "sad", "happy"]);
    }
}
