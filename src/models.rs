use jiff::civil::Date;

use crate::{
    error::{LoadError, LoadResult},
    fields,
    source::{self, SourceRow},
};

/// Candidate column names per logical field, first present-and-non-empty
/// wins. Upstream exports are not consistent about what these are called.
pub const GENRE_COLUMNS: &[&str] = &["main_genre", "genres_list", "genres", "genres_parsed"];
pub const CAST_COLUMNS: &[&str] = &["main_cast", "cast_list", "cast", "cast_parsed"];
pub const DIRECTOR_COLUMNS: &[&str] = &["director", "director_text", "directors"];

/// One movie as extracted from a source row: coerced scalars plus the parsed
/// relationship name lists.
#[derive(Clone, Debug)]
pub struct MovieRecord {
    pub id: i32,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<Date>,
    pub release_year: Option<i32>,
    pub release_month: Option<i32>,
    pub budget: i64,
    pub revenue: i64,
    pub profit: i64,
    pub runtime: Option<i32>,
    pub vote_average: Option<f64>,
    pub popularity: Option<f64>,
    pub director_text: Option<String>,
    pub genres: Vec<String>,
    pub cast: Vec<String>,
    pub directors: Vec<String>,
}

impl MovieRecord {
    /// Extract a record from `row`. `line` is the 1-based input line, used
    /// only for error context. The id is the one field with no safe default:
    /// a missing or non-integer id fails the run.
    pub fn from_row(row: &SourceRow, line: usize) -> LoadResult<Self> {
        let raw_id = source::field(row, "id").unwrap_or("");
        let id = fields::parse_int(raw_id)
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| LoadError::InvalidId { line, value: raw_id.to_string() })?;

        let title = source::field(row, "title")
            .or_else(|| source::field(row, "original_title"))
            .unwrap_or("Unknown")
            .to_string();

        let release_date = source::field(row, "release_date").and_then(fields::parse_date);
        // year/month columns come from the upstream transform; when they are
        // missing, the parsed date carries the same information
        let release_year = source::field(row, "release_year")
            .and_then(fields::parse_int)
            .and_then(|v| i32::try_from(v).ok())
            .or_else(|| release_date.map(|d| i32::from(d.year())));
        let release_month = source::field(row, "release_month")
            .and_then(fields::parse_int)
            .and_then(|v| i32::try_from(v).ok())
            .or_else(|| release_date.map(|d| i32::from(d.month())));

        let budget = source::field(row, "budget").and_then(fields::parse_int).unwrap_or(0);
        let revenue = source::field(row, "revenue").and_then(fields::parse_int).unwrap_or(0);
        // a present profit is taken verbatim even when it disagrees with
        // revenue - budget; only an absent one is derived
        let profit = source::field(row, "profit")
            .and_then(fields::parse_int)
            .unwrap_or(revenue - budget);
        let runtime = source::field(row, "runtime")
            .and_then(fields::parse_int)
            .and_then(|v| i32::try_from(v).ok());
        let vote_average = source::field(row, "vote_average").and_then(fields::parse_float);
        let popularity = source::field(row, "popularity").and_then(fields::parse_float);

        let director_text = source::first_populated(row, DIRECTOR_COLUMNS).map(str::to_string);

        let genres = source::first_populated(row, GENRE_COLUMNS)
            .map(fields::parse_name_list)
            .unwrap_or_default();
        let cast = source::first_populated(row, CAST_COLUMNS)
            .map(fields::parse_name_list)
            .unwrap_or_default();
        let directors = source::first_populated(row, DIRECTOR_COLUMNS)
            .map(fields::parse_name_list)
            .unwrap_or_default();

        Ok(Self {
            id,
            title,
            original_title: source::field(row, "original_title").map(str::to_string),
            overview: source::field(row, "overview").map(str::to_string),
            release_date,
            release_year,
            release_month,
            budget,
            revenue,
            profit,
            runtime,
            vote_average,
            popularity,
            director_text,
            genres,
            cast,
            directors,
        })
    }
}
