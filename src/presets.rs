//! Field-selection presets for Kinopoisk requests
//!
//! Each preset fixes the endpoint, the `selectFields` list and the filter
//! values used to build one of the datasets:
//!
//! - **movies-main**: feature films and cartoons from 2000-2023 with at least
//!   2000 votes and known US box office
//! - **movies-extended**: any title with at least 2000 votes, with descriptive
//!   and series fields selected as well
//! - **persons**: actors, directors and writers with their filmography

use std::path::Path;
use std::str::FromStr;

use crate::output::json::open_json;
use crate::query::{ParamValue, QueryParams};

/// Movie search endpoint
pub const MOVIE_ENDPOINT: &str = "/v1.4/movie";

/// Person search endpoint
pub const PERSON_ENDPOINT: &str = "/v1.4/person";

/// Results per page requested by every preset
pub const PAGE_LIMIT: &str = "250";

const MOVIES_MAIN_FIELDS: &[&str] = &[
    "id",
    "name",
    "enName",
    "year",
    "type",
    "rating",
    "votes.await",
    "votes.imdb",
    "votes.kp",
    "votes.filmCritics",
    "movieLength",
    "ratingMpaa",
    "ageRating",
    "genres",
    "countries",
    "persons",
    "budget",
    "fees",
    "videos",
    "premiere",
    "similarMovies",
    "sequelsAndPrequels",
    "watchability",
    "audience.russia",
];

const MOVIES_EXTENDED_FIELDS: &[&str] = &[
    "id",
    "name",
    "enName",
    "year",
    "type",
    "shortDescription",
    "slogan",
    "rating",
    "votes.await",
    "votes.imdb",
    "votes.kp",
    "votes.filmCritics",
    "movieLength",
    "ratingMpaa",
    "ageRating",
    "videos",
    "genres",
    "countries",
    "persons",
    "budget",
    "fees",
    "premiere",
    "similarMovies",
    "sequelsAndPrequels",
    "watchability",
    "audience.russia",
    "seasonsInfo.episodesCount",
    "seasonsInfo.number",
    "seriesLength",
    "totalSeriesLength",
];

const PERSONS_FIELDS: &[&str] = &[
    "id",
    "enName",
    "name",
    "age",
    "death",
    "countAwards",
    "movies.id",
    "movies.name",
    "movies.rating",
    "movies.enProfession",
];

/// Known request presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Preset {
    /// Primary movie table
    MoviesMain,
    /// Extended movie table (movies the collected persons took part in)
    MoviesExtended,
    /// Person records with filmography
    Persons,
}

impl Preset {
    /// Endpoint path queried by this preset
    pub fn endpoint(&self) -> &'static str {
        match self {
            Preset::MoviesMain | Preset::MoviesExtended => MOVIE_ENDPOINT,
            Preset::Persons => PERSON_ENDPOINT,
        }
    }

    /// API fields requested by this preset
    pub fn select_fields(&self) -> &'static [&'static str] {
        match self {
            Preset::MoviesMain => MOVIES_MAIN_FIELDS,
            Preset::MoviesExtended => MOVIES_EXTENDED_FIELDS,
            Preset::Persons => PERSONS_FIELDS,
        }
    }

    /// Build the base parameter template for this preset
    pub fn params(&self) -> QueryParams {
        let params = QueryParams::new().with(
            "selectFields",
            ParamValue::many(self.select_fields().iter().copied()),
        );

        match self {
            Preset::MoviesMain => params
                .with("year", ParamValue::many(["2000-2023"]))
                .with("type", ParamValue::many(["movie", "cartoon"]))
                .with("limit", PAGE_LIMIT)
                .with("votes.kp", "2000-20000000")
                .with("isSeries", "false")
                .with("name", "!null")
                .with("fees.usa", "!null"),
            Preset::MoviesExtended => params
                .with("limit", PAGE_LIMIT)
                .with("votes.kp", "2000-20000000"),
            Preset::Persons => params.with("limit", PAGE_LIMIT),
        }
    }

    /// Preset template with the parameters of a JSON object file laid on top
    pub fn params_with_overrides(&self, path: &Path) -> Result<QueryParams, String> {
        let raw = open_json(path).map_err(|e| e.to_string())?;
        let overrides = QueryParams::from_json(&raw)
            .map_err(|e| format!("invalid parameters file {}: {e}", path.display()))?;

        let mut params = self.params();
        params.merge(&overrides);
        Ok(params)
    }

    /// Stable preset name as used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Preset::MoviesMain => "movies-main",
            Preset::MoviesExtended => "movies-extended",
            Preset::Persons => "persons",
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movies-main" => Ok(Preset::MoviesMain),
            "movies-extended" => Ok(Preset::MoviesExtended),
            "persons" => Ok(Preset::Persons),
            _ => Err(format!(
                "Invalid preset: {s}. Valid options: movies-main, movies-extended, persons"
            )),
        }
    }
}
