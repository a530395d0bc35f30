use migration::Migrator;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;

use crate::error::LoadResult;

pub async fn connect_and_migrate(database_url: &str) -> LoadResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;

    // foreign_keys is off by default in SQLite; the junction cascades need it
    for pragma in
        ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL", "PRAGMA foreign_keys=ON"]
    {
        db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string()))
            .await?;
    }

    Migrator::up(&db, None).await?;
    Ok(db)
}
