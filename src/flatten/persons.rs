//! Person record flattening
//!
//! Every person record carries a `movies` filmography; the person table has
//! one row per (person, movie) pair so it can be joined with the movie table
//! on `movie_id`.

use serde_json::Value;

use super::{field, items};
use crate::{RawRecord, Row};

/// Flatten person records into person x movie rows
///
/// A person with an absent or empty filmography still yields one row holding
/// only the person columns.
pub fn flatten_person_movies(persons: &[RawRecord]) -> Vec<Row> {
    let mut rows = Vec::new();

    for person in persons {
        let base = person_columns(person);
        let movies = items(person, "movies");

        if movies.is_empty() {
            rows.push(base);
            continue;
        }

        for movie in movies {
            let mut row = base.clone();
            row.insert("movie_id".into(), field(movie, "id"));
            row.insert("movie_name".into(), field(movie, "name"));
            row.insert("movie_rating".into(), field(movie, "rating"));
            row.insert("movie_profession".into(), field(movie, "enProfession"));
            rows.push(row);
        }
    }

    rows
}

fn person_columns(person: &Value) -> Row {
    let mut row = Row::new();
    row.insert("person_id".into(), field(person, "id"));
    row.insert("person_name".into(), field(person, "name"));
    row.insert("age".into(), field(person, "age"));
    row.insert("countAwards".into(), field(person, "countAwards"));
    row.insert("death".into(), field(person, "death"));
    row
}
