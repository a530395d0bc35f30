use std::collections::HashMap;

use sea_orm::{ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::{
    entities::{actor, director, genre},
    error::LoadResult,
};

/// Get-or-create surrogate ids for named entities, with one in-memory cache
/// per table. The cache lives for a single load pass; the loader is the only
/// writer, so a cached id stays valid for the whole run.
#[derive(Debug, Default)]
pub struct EntityResolver {
    genres: HashMap<String, i32>,
    actors: HashMap<String, i32>,
    directors: HashMap<String, i32>,
}

impl EntityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn genre_id<C: ConnectionTrait>(
        &mut self,
        conn: &C,
        name: &str,
    ) -> LoadResult<Option<i32>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        if let Some(&id) = self.genres.get(name) {
            return Ok(Some(id));
        }

        let id = match genre::Entity::find()
            .filter(genre::Column::Name.eq(name))
            .one(conn)
            .await?
        {
            Some(row) => row.id,
            None => {
                let model = genre::ActiveModel {
                    id: Default::default(),
                    name: Set(name.to_string()),
                };
                genre::Entity::insert(model).exec(conn).await?.last_insert_id
            },
        };

        self.genres.insert(name.to_string(), id);
        Ok(Some(id))
    }

    pub async fn actor_id<C: ConnectionTrait>(
        &mut self,
        conn: &C,
        name: &str,
    ) -> LoadResult<Option<i32>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        if let Some(&id) = self.actors.get(name) {
            return Ok(Some(id));
        }

        let id = match actor::Entity::find()
            .filter(actor::Column::Name.eq(name))
            .one(conn)
            .await?
        {
            Some(row) => row.id,
            None => {
                let model = actor::ActiveModel {
                    id: Default::default(),
                    name: Set(name.to_string()),
                };
                actor::Entity::insert(model).exec(conn).await?.last_insert_id
            },
        };

        self.actors.insert(name.to_string(), id);
        Ok(Some(id))
    }

    pub async fn director_id<C: ConnectionTrait>(
        &mut self,
        conn: &C,
        name: &str,
    ) -> LoadResult<Option<i32>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        if let Some(&id) = self.directors.get(name) {
            return Ok(Some(id));
        }

        let id = match director::Entity::find()
            .filter(director::Column::Name.eq(name))
            .one(conn)
            .await?
        {
            Some(row) => row.id,
            None => {
                let model = director::ActiveModel {
                    id: Default::default(),
                    name: Set(name.to_string()),
                };
                director::Entity::insert(model).exec(conn).await?.last_insert_id
            },
        };

        self.directors.insert(name.to_string(), id);
        Ok(Some(id))
    }

    pub fn distinct_genres(&self) -> usize {
        self.genres.len()
    }

    pub fn distinct_actors(&self) -> usize {
        self.actors.len()
    }

    pub fn distinct_directors(&self) -> usize {
        self.directors.len()
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::EntityTrait;

    use super::*;
    use crate::{db, entities::genre};

    async fn test_db() -> sea_orm::DatabaseConnection {
        db::connect_and_migrate("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn same_name_resolves_to_same_id() {
        let db = test_db().await;
        let mut resolver = EntityResolver::new();

        let first = resolver.genre_id(&db, "Drama").await.unwrap().unwrap();
        let second = resolver.genre_id(&db, "Drama").await.unwrap().unwrap();
        assert_eq!(first, second);

        let rows = genre::Entity::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Drama");
    }

    #[tokio::test]
    async fn cold_cache_reuses_existing_row() {
        let db = test_db().await;

        let mut warm = EntityResolver::new();
        let original = warm.actor_id(&db, "Sigourney Weaver").await.unwrap().unwrap();

        // a fresh resolver must find the stored row, not create a duplicate
        let mut cold = EntityResolver::new();
        let found = cold.actor_id(&db, "Sigourney Weaver").await.unwrap().unwrap();

        assert_eq!(original, found);
        assert_eq!(crate::entities::actor::Entity::find().all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_name_resolves_to_none() {
        let db = test_db().await;
        let mut resolver = EntityResolver::new();

        assert_eq!(resolver.director_id(&db, "").await.unwrap(), None);
        assert_eq!(resolver.director_id(&db, "   ").await.unwrap(), None);
        assert_eq!(resolver.distinct_directors(), 0);
    }

    #[tokio::test]
    async fn distinct_counts_track_names_not_lookups() {
        let db = test_db().await;
        let mut resolver = EntityResolver::new();

        resolver.genre_id(&db, "Action").await.unwrap();
        resolver.genre_id(&db, "Action").await.unwrap();
        resolver.genre_id(&db, "Drama").await.unwrap();

        assert_eq!(resolver.distinct_genres(), 2);
    }
}
