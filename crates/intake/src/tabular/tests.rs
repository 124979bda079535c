use super::*;
use crate::source::MemorySource;

fn record(fields: &[(&str, &str)]) -> Record {
    fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn sample_grid() -> Vec<Vec<String>> {
    [
        vec!["Col 1", "Col 2", "col-1"],
        vec!["a", "b", "c"],
        vec!["1", "2", "3"],
        vec!["d", "e", ""],
        vec!["g", "", "i"],
    ]
    .into_iter()
    .map(|row| row.into_iter().map(str::to_string).collect())
    .collect()
}

const SAMPLE_INPUT_TSV: &str = "Col 1\tCol 2\tcol-1\na\tb\tc\n1\t2\t3\nd\te\t\ng\t\ti";
const SAMPLE_OUTPUT_TSV: &str = "col_1\tcol_2\tcol_1_2\na\tb\tc\n1\t2\t3\nd\te\t\ng\t\ti";

#[test]
fn test_from_tsv_parses_cells_including_empty_ones() {
    let tabular = Tabular::from_tsv(SAMPLE_INPUT_TSV);
    assert_eq!(tabular.rows(), sample_grid().as_slice());
}

#[test]
fn test_from_tsv_strips_carriage_returns_and_blank_lines() {
    let tabular = Tabular::from_tsv("a\tb\r\n\n  \nc\td\r\n");
    assert_eq!(
        tabular.rows(),
        &[vec!["a".to_string(), "b".to_string()], vec!["c".to_string(), "d".to_string()]]
    );
}

#[test]
fn test_from_records_union_of_keys_in_first_seen_order() {
    let records = vec![
        record(&[("Col 1", "a"), ("Col 2", "b"), ("col-1", "c")]),
        record(&[("Col 1", "1"), ("Col 2", "2"), ("col-1", "3")]),
        record(&[("Col 1", "d"), ("Col 2", "e")]),
        record(&[("Col 1", "g"), ("col-1", "i")]),
    ];
    let tabular = Tabular::from_records(&records);
    assert_eq!(tabular.rows(), sample_grid().as_slice());
}

#[test]
fn test_canonical_headers_dedup_with_numeric_suffix() {
    let tabular = Tabular::from_rows(vec![
        vec!["Col 1".to_string(), "Col 2".to_string(), "col-1".to_string()],
    ]);
    assert_eq!(tabular.canonical_headers(), vec!["col_1", "col_2", "col_1_2"]);
}

#[test]
fn test_dedup_triple_collision_bumps_to_3() {
    let mut headers = vec!["a".to_string(), "a".to_string(), "a".to_string()];
    dedup_header_row(&mut headers);
    assert_eq!(headers, vec!["a", "a_2", "a_3"]);
}

#[test]
fn test_dedup_skips_taken_suffixes() {
    let mut headers = vec!["x".to_string(), "x_2".to_string(), "x".to_string()];
    dedup_header_row(&mut headers);
    assert_eq!(headers, vec!["x", "x_2", "x_3"]);
}

#[test]
fn test_canonical_header_slug_rules() {
    assert_eq!(canonical_header("  Foo  Bar "), "foo_bar");
    assert_eq!(canonical_header("Price ($)"), "price");
    assert_eq!(canonical_header("a-b-c"), "a_b_c");
    assert_eq!(canonical_header("already_snake"), "already_snake");
}

#[test]
fn test_to_tsv_canonicalizes_headers() {
    let tabular = Tabular::from_tsv(SAMPLE_INPUT_TSV);
    assert_eq!(tabular.to_tsv(), SAMPLE_OUTPUT_TSV);
}

#[test]
fn test_to_csv_quotes_only_when_needed() {
    let tabular = Tabular::from_rows(
        [
            vec!["Name", "Note"],
            vec!["a,b", "say \"hi\""],
            vec!["plain", "ok"],
        ]
        .into_iter()
        .map(|row| row.into_iter().map(str::to_string).collect())
        .collect(),
    );
    assert_eq!(tabular.to_csv(), "name,note\n\"a,b\",\"say \"\"hi\"\"\"\nplain,ok");
}

#[test]
fn test_to_records_round_trip_with_empty_string_fill() {
    let records = vec![
        record(&[("Col 1", "a"), ("Col 2", "b"), ("col-1", "c")]),
        record(&[("Col 1", "1"), ("Col 2", "2"), ("col-1", "3")]),
        record(&[("Col 1", "d"), ("Col 2", "e")]),
        record(&[("Col 1", "g"), ("col-1", "i")]),
    ];
    let round_tripped = Tabular::from_records(&records).to_records();
    assert_eq!(
        round_tripped,
        vec![
            record(&[("col_1", "a"), ("col_2", "b"), ("col_1_2", "c")]),
            record(&[("col_1", "1"), ("col_2", "2"), ("col_1_2", "3")]),
            record(&[("col_1", "d"), ("col_2", "e"), ("col_1_2", "")]),
            record(&[("col_1", "g"), ("col_2", ""), ("col_1_2", "i")]),
        ]
    );
}

#[test]
fn test_to_records_pads_short_rows() {
    let tabular = Tabular::from_tsv("h1\th2\th3\nonly");
    assert_eq!(
        tabular.to_records(),
        vec![record(&[("h1", "only"), ("h2", ""), ("h3", "")])]
    );
}

#[test]
fn test_snake_and_dedup_headers_in_place() {
    let mut tabular = Tabular::from_tsv("Col 1\tcol-1\na\tb");
    tabular.snake_headers().dedup_headers();
    assert_eq!(tabular.rows()[0], vec!["col_1", "col_1_2"]);
    assert_eq!(tabular.rows()[1], vec!["a", "b"]);
}

#[test]
fn test_reorder_columns_moves_named_columns_first() {
    let mut tabular = Tabular::from_tsv("a\tb\tc\n1\t2\t3\n4\t5\t6");
    tabular.reorder_columns(&["c", "a"]).unwrap();
    assert_eq!(tabular.rows()[0], vec!["c", "a", "b"]);
    assert_eq!(tabular.rows()[1], vec!["3", "1", "2"]);
    assert_eq!(tabular.rows()[2], vec!["6", "4", "5"]);
}

#[test]
fn test_reorder_columns_unknown_name_fails() {
    let mut tabular = Tabular::from_tsv("a\tb\n1\t2");
    let err = tabular.reorder_columns(&["nope"]).unwrap_err();
    assert!(err.to_string().contains("nope"));
}

#[test]
fn test_to_html_headers_and_escaping() {
    let tabular = Tabular::from_rows(vec![
        vec!["h".to_string()],
        vec!["<b>&\"".to_string()],
    ]);
    let html = tabular.to_html();
    assert!(html.starts_with("<table>"));
    assert!(html.contains("<th>h</th>"));
    assert!(html.contains("<td>&lt;b&gt;&amp;&quot;</td>"));
    assert!(html.ends_with("</table>"));
}

#[test]
fn test_empty_grid_conversions() {
    let tabular = Tabular::from_rows(Vec::new());
    assert!(tabular.is_empty());
    assert_eq!(tabular.to_tsv(), "");
    assert_eq!(tabular.to_csv(), "");
    assert!(tabular.to_records().is_empty());
    assert!(tabular.canonical_headers().is_empty());
}

#[tokio::test]
async fn test_tabular_transform_parses_tsv() {
    let source = MemorySource::new("data.tsv", SAMPLE_INPUT_TSV.as_bytes().to_vec());
    let tabular = TabularTransform
        .apply(SAMPLE_INPUT_TSV.as_bytes().to_vec(), &source)
        .await
        .unwrap();
    assert_eq!(tabular.to_tsv(), SAMPLE_OUTPUT_TSV);
}

#[tokio::test]
async fn test_tabular_transform_rejects_non_utf8_as_failure() {
    let source = MemorySource::new("blob.bin", vec![0xff, 0xfe, 0x00]);
    let err = TabularTransform.apply(vec![0xff, 0xfe, 0x00], &source).await.unwrap_err();
    assert!(!err.is_skip());
    assert!(err.to_string().contains("blob.bin"));
}
