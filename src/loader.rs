use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, TransactionTrait,
};
use tracing::{debug, info};

use crate::{
    entities::{movie, movie_cast, movie_director, movie_genre},
    error::LoadResult,
    models::MovieRecord,
    resolver::EntityResolver,
    source::SourceRow,
};

pub const DEFAULT_BATCH_SIZE: usize = 500;

#[derive(Clone, Copy, Debug, Default)]
pub struct LoadSummary {
    pub movies: usize,
    pub genres: usize,
    pub actors: usize,
    pub directors: usize,
}

/// Load `rows` in source order, one transaction per `batch_size` chunk. A
/// storage error rolls the open transaction back and propagates; chunks
/// committed before it stay committed. Every write is an idempotent replace,
/// so a failed run can simply be rerun from the start.
pub async fn run(
    db: &DatabaseConnection,
    rows: &[SourceRow],
    batch_size: usize,
) -> LoadResult<LoadSummary> {
    let batch_size = batch_size.max(1);
    let mut resolver = EntityResolver::new();
    let mut processed = 0usize;

    for batch in rows.chunks(batch_size) {
        let txn = db.begin().await?;
        match load_batch(&txn, &mut resolver, batch, processed).await {
            Ok(()) => {
                txn.commit().await?;
                processed += batch.len();
                info!(processed, total = rows.len(), "batch committed");
            },
            Err(err) => {
                txn.rollback().await?;
                return Err(err);
            },
        }
    }

    Ok(LoadSummary {
        movies: processed,
        genres: resolver.distinct_genres(),
        actors: resolver.distinct_actors(),
        directors: resolver.distinct_directors(),
    })
}

async fn load_batch(
    txn: &DatabaseTransaction,
    resolver: &mut EntityResolver,
    batch: &[SourceRow],
    already_processed: usize,
) -> LoadResult<()> {
    for (offset, row) in batch.iter().enumerate() {
        // line 1 is the header
        let line = already_processed + offset + 2;
        let record = MovieRecord::from_row(row, line)?;
        load_row(txn, resolver, &record).await?;
    }
    Ok(())
}

async fn load_row<C: ConnectionTrait>(
    conn: &C,
    resolver: &mut EntityResolver,
    record: &MovieRecord,
) -> LoadResult<()> {
    debug!(movie_id = record.id, title = %record.title, "loading movie");

    // the junction rows reference this id, so the movie row is replaced first
    movie::Entity::delete_by_id(record.id).exec(conn).await?;
    movie::Entity::insert(movie::ActiveModel {
        id: Set(record.id),
        title: Set(record.title.clone()),
        original_title: Set(record.original_title.clone()),
        overview: Set(record.overview.clone()),
        release_date: Set(record.release_date.map(|d| d.to_string())),
        release_year: Set(record.release_year),
        release_month: Set(record.release_month),
        budget: Set(record.budget),
        revenue: Set(record.revenue),
        profit: Set(record.profit),
        runtime: Set(record.runtime),
        vote_average: Set(record.vote_average),
        popularity: Set(record.popularity),
        director_text: Set(record.director_text.clone()),
    })
    .exec(conn)
    .await?;

    for name in &record.genres {
        let Some(genre_id) = resolver.genre_id(conn, name).await? else {
            continue;
        };
        movie_genre::Entity::delete_many()
            .filter(movie_genre::Column::MovieId.eq(record.id))
            .filter(movie_genre::Column::GenreId.eq(genre_id))
            .exec(conn)
            .await?;
        movie_genre::Entity::insert(movie_genre::ActiveModel {
            movie_id: Set(record.id),
            genre_id: Set(genre_id),
        })
        .exec(conn)
        .await?;
    }

    for (position, name) in record.cast.iter().enumerate() {
        let Some(actor_id) = resolver.actor_id(conn, name).await? else {
            continue;
        };
        movie_cast::Entity::delete_many()
            .filter(movie_cast::Column::MovieId.eq(record.id))
            .filter(movie_cast::Column::ActorId.eq(actor_id))
            .exec(conn)
            .await?;
        movie_cast::Entity::insert(movie_cast::ActiveModel {
            movie_id: Set(record.id),
            actor_id: Set(actor_id),
            cast_order: Set(Some(position as i32)),
        })
        .exec(conn)
        .await?;
    }

    for name in &record.directors {
        let Some(director_id) = resolver.director_id(conn, name).await? else {
            continue;
        };
        movie_director::Entity::delete_many()
            .filter(movie_director::Column::MovieId.eq(record.id))
            .filter(movie_director::Column::DirectorId.eq(director_id))
            .exec(conn)
            .await?;
        movie_director::Entity::insert(movie_director::ActiveModel {
            movie_id: Set(record.id),
            director_id: Set(director_id),
        })
        .exec(conn)
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

    use super::*;
    use crate::{
        db,
        entities::{actor, director, genre},
        error::LoadError,
    };

    async fn test_db() -> DatabaseConnection {
        db::connect_and_migrate("sqlite::memory:").await.unwrap()
    }

    fn row(pairs: &[(&str, &str)]) -> SourceRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn three_movies() -> Vec<SourceRow> {
        vec![
            row(&[
                ("id", "1"),
                ("title", "Alien"),
                ("genres", r#"[{"id": 27, "name": "Horror"}, {"id": 18, "name": "Drama"}]"#),
                ("cast", r#"["Sigourney Weaver", "Tom Skerritt"]"#),
                ("director", "Ridley Scott"),
                ("budget", "11000000"),
                ("revenue", "104931801"),
                ("release_date", "1979-05-25"),
            ]),
            row(&[
                ("id", "2"),
                ("title", "Aliens"),
                ("genres", "Action, Drama"),
                ("cast", r#"["Sigourney Weaver", "Michael Biehn"]"#),
                ("director", "James Cameron"),
            ]),
            row(&[("id", "3"), ("title", "Alien 3"), ("genres", r#"["Horror"]"#)]),
        ]
    }

    #[tokio::test]
    async fn end_to_end_shared_genre_is_stored_once() {
        let db = test_db().await;
        let summary = run(&db, &three_movies(), DEFAULT_BATCH_SIZE).await.unwrap();

        assert_eq!(summary.movies, 3);

        let dramas = genre::Entity::find()
            .filter(genre::Column::Name.eq("Drama"))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(dramas.len(), 1);

        let drama_links = movie_genre::Entity::find()
            .filter(movie_genre::Column::GenreId.eq(dramas[0].id))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(drama_links.len(), 2);
    }

    #[tokio::test]
    async fn loading_twice_matches_loading_once() {
        let db = test_db().await;
        let rows = three_movies();

        run(&db, &rows, DEFAULT_BATCH_SIZE).await.unwrap();
        let movies_once = movie::Entity::find().all(&db).await.unwrap();
        let genres_once = genre::Entity::find().all(&db).await.unwrap();
        let links_once = movie_genre::Entity::find().all(&db).await.unwrap();
        let cast_once = movie_cast::Entity::find().all(&db).await.unwrap();

        run(&db, &rows, DEFAULT_BATCH_SIZE).await.unwrap();
        assert_eq!(movie::Entity::find().all(&db).await.unwrap(), movies_once);
        assert_eq!(genre::Entity::find().all(&db).await.unwrap(), genres_once);
        assert_eq!(movie_genre::Entity::find().all(&db).await.unwrap(), links_once);
        assert_eq!(movie_cast::Entity::find().all(&db).await.unwrap(), cast_once);
    }

    #[tokio::test]
    async fn reloaded_movie_row_is_replaced_not_appended() {
        let db = test_db().await;

        run(&db, &[row(&[("id", "1"), ("title", "Working Title")])], 500).await.unwrap();
        run(&db, &[row(&[("id", "1"), ("title", "Alien")])], 500).await.unwrap();

        let movies = movie::Entity::find().all(&db).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Alien");
    }

    #[tokio::test]
    async fn cast_order_follows_credited_order() {
        let db = test_db().await;
        let rows = vec![row(&[
            ("id", "1"),
            ("title", "Alien"),
            ("cast", r#"["Sigourney Weaver", "Tom Skerritt", "John Hurt"]"#),
        ])];
        run(&db, &rows, DEFAULT_BATCH_SIZE).await.unwrap();

        let entries = movie_cast::Entity::find()
            .order_by_asc(movie_cast::Column::CastOrder)
            .all(&db)
            .await
            .unwrap();
        assert_eq!(entries.len(), 3);

        let mut names = Vec::new();
        for entry in &entries {
            let actor = actor::Entity::find_by_id(entry.actor_id).one(&db).await.unwrap().unwrap();
            names.push(actor.name);
        }
        assert_eq!(names, ["Sigourney Weaver", "Tom Skerritt", "John Hurt"]);
        assert_eq!(
            entries.iter().map(|e| e.cast_order).collect::<Vec<_>>(),
            [Some(0), Some(1), Some(2)]
        );
    }

    #[tokio::test]
    async fn scalar_defaults_land_in_storage() {
        let db = test_db().await;
        let rows = vec![row(&[
            ("id", "1"),
            ("title", "Alien"),
            ("budget", "100"),
            ("revenue", "300"),
        ])];
        run(&db, &rows, DEFAULT_BATCH_SIZE).await.unwrap();

        let stored = movie::Entity::find_by_id(1).one(&db).await.unwrap().unwrap();
        assert_eq!(stored.profit, 200);
        assert_eq!(stored.runtime, None);
        assert_eq!(stored.release_date, None);
    }

    #[tokio::test]
    async fn failing_batch_is_undone_earlier_batches_stay() {
        let db = test_db().await;
        let rows = vec![
            row(&[("id", "1"), ("title", "Alien")]),
            row(&[("id", "2"), ("title", "Aliens")]),
            row(&[("id", "not-an-id"), ("title", "Broken")]),
            row(&[("id", "4"), ("title", "Never Reached")]),
        ];

        let err = run(&db, &rows, 2).await.unwrap_err();
        assert!(matches!(err, LoadError::InvalidId { line: 4, .. }));

        let ids: Vec<i32> = movie::Entity::find()
            .order_by_asc(movie::Column::Id)
            .all(&db)
            .await
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, [1, 2]);
    }

    #[tokio::test]
    async fn junction_rows_reference_existing_parents() {
        let db = test_db().await;
        run(&db, &three_movies(), DEFAULT_BATCH_SIZE).await.unwrap();

        for link in movie_genre::Entity::find().all(&db).await.unwrap() {
            assert!(movie::Entity::find_by_id(link.movie_id).one(&db).await.unwrap().is_some());
            assert!(genre::Entity::find_by_id(link.genre_id).one(&db).await.unwrap().is_some());
        }
        for link in movie_director::Entity::find().all(&db).await.unwrap() {
            assert!(movie::Entity::find_by_id(link.movie_id).one(&db).await.unwrap().is_some());
            assert!(
                director::Entity::find_by_id(link.director_id)
                    .one(&db)
                    .await
                    .unwrap()
                    .is_some()
            );
        }
    }

    #[tokio::test]
    async fn deleting_a_movie_cascades_to_junction_rows() {
        let db = test_db().await;
        run(&db, &three_movies(), DEFAULT_BATCH_SIZE).await.unwrap();

        movie::Entity::delete_by_id(1).exec(&db).await.unwrap();

        let orphans = movie_genre::Entity::find()
            .filter(movie_genre::Column::MovieId.eq(1))
            .all(&db)
            .await
            .unwrap();
        assert!(orphans.is_empty());
    }
}
