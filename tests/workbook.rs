use std::fs;

use serde_json::json;
use tempfile::tempdir;
use toughdata_xlsx::ToolError;
use toughdata_xlsx::export::{convert_file, data_to_workbook};
use toughdata_xlsx::io::excel_write::MAX_CELL_CHARS;
use toughdata_xlsx::io::{excel_read, json_read};
use toughdata_xlsx::model::{Cell, Record, records_from_value};

fn sample_records() -> Vec<Record> {
    records_from_value(json!([
        {
            "username": "a",
            "followers": 1500,
            "verified": true,
            "recent_videos": [
                {"desc": "hi", "categories": ["x", "y"], "video_hashtags": [], "video_mentions": []}
            ]
        },
        {
            "username": "b",
            "followers": 20,
            "verified": false,
            "recent_videos": [
                {"desc": "one", "categories": [], "video_hashtags": ["#a", "#b"], "video_mentions": []},
                {"desc": "two", "categories": ["z"], "video_hashtags": [], "video_mentions": ["@a"]}
            ]
        }
    ]))
    .expect("records parsed")
}

#[test]
fn in_memory_workbook_has_profiles_then_videos() {
    let workbook = data_to_workbook(&sample_records(), None).expect("workbook built");

    assert_eq!(workbook.sheet_names(), ["Profiles", "Videos"]);
    let profiles = workbook.sheet("Profiles").expect("profiles sheet");
    let videos = workbook.sheet("Videos").expect("videos sheet");
    assert_eq!(profiles.rows.len(), 2);
    assert_eq!(videos.rows.len(), 3);
}

#[test]
fn saved_workbook_reads_back_with_both_sheets() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("out.xlsx");

    let written = data_to_workbook(&sample_records(), Some(&xlsx_path)).expect("workbook saved");
    assert!(xlsx_path.exists());

    let restored = excel_read::read_workbook(&xlsx_path).expect("workbook read");
    assert_eq!(restored.sheet_names(), ["Profiles", "Videos"]);

    let profiles = restored.sheet("Profiles").expect("profiles sheet");
    assert_eq!(profiles.columns, ["username", "followers", "verified"]);
    assert_eq!(profiles.rows.len(), 2);
    assert_eq!(profiles.cell(0, "username"), Some(&Cell::Text("a".into())));
    assert_eq!(profiles.cell(0, "followers"), Some(&Cell::Number(1500.0)));
    assert_eq!(profiles.cell(1, "verified"), Some(&Cell::Bool(false)));

    let videos = restored.sheet("Videos").expect("videos sheet");
    let expected = written.sheet("Videos").expect("videos sheet");
    assert_eq!(videos.columns, expected.columns);
    assert_eq!(videos.rows.len(), expected.rows.len());
    for (restored_row, expected_row) in videos.rows.iter().zip(&expected.rows) {
        let restored_text: Vec<String> = restored_row.iter().map(Cell::as_text).collect();
        let expected_text: Vec<String> = expected_row.iter().map(Cell::as_text).collect();
        assert_eq!(restored_text, expected_text);
    }
    assert_eq!(
        videos.cell(1, "video_hashtags").map(Cell::as_text),
        Some("#a, #b".to_string())
    );
}

#[test]
fn workbook_without_videos_writes_empty_videos_sheet() {
    let records = records_from_value(json!([
        {"username": "a", "recent_videos": []}
    ]))
    .expect("records parsed");
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("empty.xlsx");

    data_to_workbook(&records, Some(&xlsx_path)).expect("workbook saved");

    let videos = excel_read::read_sheet(&xlsx_path, "Videos").expect("videos sheet");
    assert!(videos.columns.is_empty());
    assert!(videos.rows.is_empty());
    let profiles = excel_read::read_sheet(&xlsx_path, "Profiles").expect("profiles sheet");
    assert_eq!(profiles.rows.len(), 1);
}

#[test]
fn oversized_text_is_truncated_to_cell_limit() {
    let records = records_from_value(json!([{
        "username": "a",
        "recent_videos": [
            {"desc": "x".repeat(40_000), "categories": [], "video_hashtags": [], "video_mentions": []}
        ]
    }]))
    .expect("records parsed");
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("long.xlsx");

    let written = data_to_workbook(&records, Some(&xlsx_path)).expect("workbook saved");
    let in_memory = written.sheet("Videos").expect("videos sheet");
    assert_eq!(
        in_memory.cell(0, "desc").map(|cell| cell.as_text().len()),
        Some(40_000)
    );

    let videos = excel_read::read_sheet(&xlsx_path, "Videos").expect("videos sheet");
    let desc = videos.cell(0, "desc").map(Cell::as_text).expect("desc cell");
    assert_eq!(desc.chars().count(), MAX_CELL_CHARS);
    assert!(desc.chars().all(|ch| ch == 'x'));
}

#[test]
fn wrong_extension_is_rejected_before_writing() {
    let temp_dir = tempdir().expect("temporary directory");
    let csv_path = temp_dir.path().join("out.csv");

    let error = data_to_workbook(&sample_records(), Some(&csv_path)).expect_err("csv rejected");
    assert!(matches!(error, ToolError::InvalidArgument(_)));
    assert!(!csv_path.exists());

    fs::write(&csv_path, "keep").expect("existing file written");
    data_to_workbook(&sample_records(), Some(&csv_path)).expect_err("csv rejected");
    assert_eq!(fs::read_to_string(&csv_path).expect("file read"), "keep");
}

#[test]
fn missing_field_is_reported_before_extension() {
    let records = records_from_value(json!([{"username": "a"}])).expect("records parsed");
    let temp_dir = tempdir().expect("temporary directory");
    let csv_path = temp_dir.path().join("out.csv");

    let error = data_to_workbook(&records, Some(&csv_path)).expect_err("missing field");
    assert!(matches!(error, ToolError::MissingField { .. }));
}

#[test]
fn saving_twice_overwrites_previous_workbook() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("out.xlsx");

    data_to_workbook(&sample_records(), Some(&xlsx_path)).expect("first save");
    let single = records_from_value(json!([
        {"username": "only", "recent_videos": []}
    ]))
    .expect("records parsed");
    data_to_workbook(&single, Some(&xlsx_path)).expect("second save");

    let profiles = excel_read::read_sheet(&xlsx_path, "Profiles").expect("profiles sheet");
    assert_eq!(profiles.rows, vec![vec![Cell::Text("only".into())]]);
}

#[test]
fn read_sheet_reports_missing_sheet() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("out.xlsx");
    data_to_workbook(&sample_records(), Some(&xlsx_path)).expect("workbook saved");

    let error = excel_read::read_sheet(&xlsx_path, "Comments").expect_err("no such sheet");
    assert!(matches!(error, ToolError::InvalidWorkbook(_)));
}

#[test]
fn convert_file_turns_json_into_workbook() {
    let temp_dir = tempdir().expect("temporary directory");
    let json_path = temp_dir.path().join("followers.json");
    let xlsx_path = temp_dir.path().join("followers.xlsx");
    let source = json!([
        {
            "username": "a",
            "profile": {"bio": "hey", "links": {"site": "https://example.com"}},
            "recent_videos": [
                {"desc": "hi", "categories": ["x"], "video_hashtags": [], "video_mentions": []}
            ]
        }
    ]);
    fs::write(&json_path, serde_json::to_string_pretty(&source).unwrap())
        .expect("JSON input written");

    convert_file(&json_path, &xlsx_path).expect("conversion");

    let profiles = excel_read::read_sheet(&xlsx_path, "Profiles").expect("profiles sheet");
    assert_eq!(
        profiles.columns,
        ["username", "profile.bio", "profile.links.site"]
    );
    assert_eq!(
        profiles.cell(0, "profile.links.site"),
        Some(&Cell::Text("https://example.com".into()))
    );
}

#[test]
fn load_records_reports_missing_and_malformed_input() {
    let temp_dir = tempdir().expect("temporary directory");
    let missing = temp_dir.path().join("missing.json");
    assert!(matches!(
        json_read::load_records(&missing),
        Err(ToolError::MissingInput(_))
    ));

    let malformed = temp_dir.path().join("malformed.json");
    fs::write(&malformed, "{not json").expect("file written");
    assert!(matches!(
        json_read::load_records(&malformed),
        Err(ToolError::Json(_))
    ));

    let scalar = temp_dir.path().join("scalar.json");
    fs::write(&scalar, "42").expect("file written");
    assert!(matches!(
        json_read::load_records(&scalar),
        Err(ToolError::InvalidInput(_))
    ));
}
