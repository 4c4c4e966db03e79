//! Unit tests for flattening whole record batches

use movie_data_downloader::flatten::movies::{flatten_movies, MovieTable};
use movie_data_downloader::flatten::persons::flatten_person_movies;
use movie_data_downloader::output::collect_columns;
use movie_data_downloader::output::csv::CsvRowsWriter;
use movie_data_downloader::report::MissingReport;
use serde_json::{json, Value};
use tempfile::TempDir;

fn movies() -> Vec<Value> {
    vec![
        json!({
            "id": 301,
            "name": "Матрица",
            "year": 1999,
            "type": "movie",
            "rating": {"kp": 8.5, "imdb": 8.7},
            "votes": {"kp": 800000, "imdb": 2000000},
            "genres": [{"name": "фантастика"}, {"name": "боевик"}],
            "persons": [
                {"id": 7987, "name": "Киану Ривз", "profession": "актеры"},
                {"id": 1, "name": "Лана Вачовски", "profession": "режиссеры"}
            ],
            "fees": {"usa": {"value": 171479930, "currency": "$"}},
            "budget": {"value": 63000000, "currency": "$"}
        }),
        json!({
            "id": 302,
            "name": "Матрица: Перезагрузка",
            "year": 2003,
            "persons": [{"id": 2, "name": "Моника Беллуччи", "profession": "актеры"}],
            "seriesLength": null
        }),
    ]
}

#[test]
fn test_main_table_union_columns() {
    let rows = flatten_movies(&movies(), MovieTable::Main);
    assert_eq!(rows.len(), 2);

    let columns = collect_columns(&rows);
    let position = |name: &str| columns.iter().position(|c| c == name).unwrap();

    assert!(position("countries") < position("актеры"));
    assert!(position("режиссеры") < position("актеры_id"));
    assert!(position("актеры_id") < position("fees_usa"));
    assert!(position("fees_usa_currency") < position("budget"));
    assert!(!columns.iter().any(|c| c == "seriesLength"));

    assert_eq!(rows[1]["актеры"], json!(["Моника Беллуччи"]));
    assert!(!rows[1].contains_key("budget"));
}

#[test]
fn test_extended_table_adds_columns() {
    let main = flatten_movies(&movies(), MovieTable::Main);
    let extended = flatten_movies(&movies(), MovieTable::Extended);

    for (main_row, extended_row) in main.iter().zip(&extended) {
        for key in main_row.keys() {
            assert_eq!(main_row[key], extended_row[key], "{key}");
        }
        assert!(extended_row.len() > main_row.len());
    }

    let columns: Vec<&str> = extended[1].keys().map(String::as_str).collect();
    let type_at = columns.iter().position(|c| *c == "type").unwrap();
    assert_eq!(
        &columns[type_at + 1..type_at + 6],
        &[
            "shortDescription",
            "slogan",
            "seasonsInfo",
            "seriesLength",
            "totalSeriesLength"
        ]
    );
}

#[test]
fn test_person_rows_join_movie_rows() {
    let persons = vec![json!({
        "id": 7987,
        "name": "Киану Ривз",
        "movies": [
            {"id": 301, "name": "Матрица", "enProfession": "actor"},
            {"id": 999, "name": "Неизвестный", "enProfession": "actor"}
        ]
    })];

    let movie_rows = flatten_movies(&movies(), MovieTable::Main);
    let person_rows = flatten_person_movies(&persons);

    let joined: Vec<&Value> = person_rows
        .iter()
        .map(|row| &row["movie_id"])
        .filter(|id| movie_rows.iter().any(|movie| &movie["movie_id"] == *id))
        .collect();
    assert_eq!(joined, vec![&json!(301)]);
}

#[test]
fn test_report_matches_written_csv() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("movies.csv");

    let rows = flatten_movies(&movies(), MovieTable::Main);
    CsvRowsWriter::write_all(&path, &rows).unwrap();

    let from_rows = MissingReport::from_rows(&rows);
    let from_csv = MissingReport::from_csv(&path).unwrap();

    // empty lists are written as "[]" and count as present in both reports
    assert_eq!(from_rows, from_csv);
    assert!(from_csv.columns.iter().any(|c| c.column == "budget"));
    assert!(from_csv
        .columns
        .windows(2)
        .all(|pair| pair[0].missing <= pair[1].missing));
}
