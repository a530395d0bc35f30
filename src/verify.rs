use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use crate::error::LoadResult;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenreCount {
    pub name: String,
    pub movies: i64,
}

/// Total rows in the movies table.
pub async fn movie_count(db: &DatabaseConnection) -> LoadResult<i64> {
    let stmt = Statement::from_string(
        db.get_database_backend(),
        "SELECT COUNT(*) AS total FROM movies".to_string(),
    );
    match db.query_one(stmt).await? {
        Some(row) => Ok(row.try_get("", "total")?),
        None => Ok(0),
    }
}

/// Top genres by movie count. Read-only; exercises the joins the downstream
/// reporting queries rely on.
pub async fn genre_ranking(db: &DatabaseConnection, limit: usize) -> LoadResult<Vec<GenreCount>> {
    let sql = format!(
        "SELECT g.name AS name, COUNT(mg.movie_id) AS movie_count \
         FROM genres g \
         JOIN movie_genres mg ON g.id = mg.genre_id \
         GROUP BY g.name \
         ORDER BY movie_count DESC \
         LIMIT {limit}"
    );
    let rows = db.query_all(Statement::from_string(db.get_database_backend(), sql)).await?;

    rows.iter()
        .map(|row| {
            Ok(GenreCount { name: row.try_get("", "name")?, movies: row.try_get("", "movie_count")? })
        })
        .collect()
}
