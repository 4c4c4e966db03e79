//! Movie record flattening

use std::collections::HashSet;

use serde_json::{json, Value};

use super::{collect_field, field, items, nested, value_to_text};
use crate::{RawRecord, Row};

/// Box office regions turned into `fees_<region>` columns, in column order
pub const FEE_REGIONS: [&str; 3] = ["world", "usa", "russia"];

/// Row layout to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MovieTable {
    /// Ratings, votes, genres, crew, box office, audience, budget and videos
    #[default]
    Main,
    /// Main columns plus descriptions, series info, streaming platforms,
    /// related titles and premiere dates
    Extended,
}

/// Flatten a list of raw movie records
pub fn flatten_movies(movies: &[RawRecord], table: MovieTable) -> Vec<Row> {
    movies.iter().map(|movie| flatten_movie(movie, table)).collect()
}

/// Flatten one raw movie record into a row
pub fn flatten_movie(movie: &RawRecord, table: MovieTable) -> Row {
    let mut row = Row::new();
    let extended = table == MovieTable::Extended;

    row.insert("movie_id".into(), field(movie, "id"));
    row.insert("movie_name".into(), field(movie, "name"));
    row.insert("year".into(), field(movie, "year"));
    for source in ["kp", "imdb", "filmCritics", "await"] {
        row.insert(format!("votes_{source}"), nested(movie, "votes", source));
    }
    for source in ["kp", "imdb", "filmCritics"] {
        row.insert(format!("rating_{source}"), nested(movie, "rating", source));
    }
    row.insert("movieLength".into(), field(movie, "movieLength"));
    row.insert("ageRating".into(), field(movie, "ageRating"));
    row.insert("ratingMpaa".into(), field(movie, "ratingMpaa"));
    row.insert("type".into(), field(movie, "type"));

    if extended {
        row.insert("shortDescription".into(), field(movie, "shortDescription"));
        row.insert("slogan".into(), field(movie, "slogan"));
        row.insert(
            "seasonsInfo".into(),
            Value::Array(items(movie, "seasonsInfo").to_vec()),
        );
        row.insert("seriesLength".into(), field(movie, "seriesLength"));
        row.insert("totalSeriesLength".into(), field(movie, "totalSeriesLength"));
    }

    row.insert("genres".into(), collect_field(movie, "genres", "name"));
    row.insert("countries".into(), collect_field(movie, "countries", "name"));

    if extended {
        row.insert("watchability".into(), watchability(movie));
        row.insert("similarMovies_ids".into(), collect_field(movie, "similarMovies", "id"));
        row.insert(
            "similarMovies_names".into(),
            collect_field(movie, "similarMovies", "name"),
        );
        row.insert("seq_preqs_ids".into(), sequel_ids(movie));
        row.insert(
            "seq_preqs_names".into(),
            collect_field(movie, "sequelsAndPrequels", "name"),
        );
    }

    row.extend(persons_by_profession(items(movie, "persons")));

    if extended {
        if let Some(premiere) = movie.get("premiere").and_then(Value::as_object) {
            for (key, value) in premiere {
                row.insert(format!("premiere_{key}"), value.clone());
            }
        }
    }

    let fees = movie.get("fees");
    for region in FEE_REGIONS {
        row.extend(fees_columns(region, fees));
    }

    for entry in items(movie, "audience") {
        if let Some(country) = entry.get("country").and_then(Value::as_str) {
            row.insert(format!("audience_{country}"), field(entry, "count"));
        }
    }

    if let Some(budget) = movie.get("budget").and_then(Value::as_object) {
        if !budget.is_empty() {
            let text = |key: &str| budget.get(key).map(value_to_text).unwrap_or_default();
            row.insert("budget".into(), json!(text("value")));
            row.insert("budget_currency".into(), json!(text("currency")));
        }
    }

    row.extend(video_counts(movie));

    row
}

/// Group the `persons` array by profession
///
/// Produces a `<profession>` column holding the names and a
/// `<profession>_id` column holding the ids of everyone with that
/// profession. Professions appear in first-encounter order, all name columns
/// before all id columns; within a column the persons keep their array order.
/// Entries without a textual `profession` are skipped.
pub fn persons_by_profession(persons: &[Value]) -> Row {
    let mut names = Row::new();
    let mut ids = Row::new();

    for person in persons {
        let Some(profession) = person.get("profession").and_then(Value::as_str) else {
            continue;
        };

        push_to_list(&mut names, profession.to_string(), field(person, "name"));
        push_to_list(&mut ids, format!("{profession}_id"), field(person, "id"));
    }

    names.extend(ids);
    names
}

fn push_to_list(row: &mut Row, key: String, value: Value) {
    let entry = row.entry(key).or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(list) = entry {
        list.push(value);
    }
}

/// `fees_<region>` and `fees_<region>_currency` columns, only when the region is present
pub fn fees_columns(region: &str, fees: Option<&Value>) -> Row {
    let mut row = Row::new();
    let Some(entry) = fees.and_then(|f| f.get(region)).filter(|e| e.is_object()) else {
        return row;
    };

    row.insert(
        format!("fees_{region}"),
        json!(value_to_text(&field(entry, "value"))),
    );
    row.insert(
        format!("fees_{region}_currency"),
        json!(value_to_text(&field(entry, "currency"))),
    );
    row
}

/// Names of the streaming platforms listed under `watchability.items`
pub fn watchability(movie: &RawRecord) -> Value {
    let platforms = movie
        .get("watchability")
        .map(|w| items(w, "items"))
        .unwrap_or(&[]);
    Value::Array(
        platforms
            .iter()
            .filter_map(|item| item.get("name").cloned())
            .collect(),
    )
}

fn sequel_ids(movie: &RawRecord) -> Value {
    Value::Array(
        items(movie, "sequelsAndPrequels")
            .iter()
            .filter_map(|entry| entry.get("id"))
            .filter(|id| !id.is_null())
            .cloned()
            .collect(),
    )
}

/// `videos_<type>_number` columns: count of distinct URLs per video type
pub fn video_counts(movie: &RawRecord) -> Row {
    let mut row = Row::new();
    let Some(videos) = movie.get("videos").and_then(Value::as_object) else {
        return row;
    };

    for (video_type, list) in videos {
        let urls: HashSet<&str> = list
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter_map(|video| video.get("url").and_then(Value::as_str))
            .collect();
        row.insert(format!("videos_{video_type}_number"), json!(urls.len()));
    }
    row
}
