use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    // the id comes from the source dataset, never generated here
                    .col(integer(Movies::Id).primary_key())
                    .col(string(Movies::Title))
                    .col(string_null(Movies::OriginalTitle))
                    .col(string_null(Movies::Overview))
                    .col(string_null(Movies::ReleaseDate))
                    .col(integer_null(Movies::ReleaseYear))
                    .col(integer_null(Movies::ReleaseMonth))
                    .col(big_integer(Movies::Budget))
                    .col(big_integer(Movies::Revenue))
                    .col(big_integer(Movies::Profit))
                    .col(integer_null(Movies::Runtime))
                    .col(double_null(Movies::VoteAverage))
                    .col(double_null(Movies::Popularity))
                    .col(string_null(Movies::DirectorText))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_movies_release_year")
                    .table(Movies::Table)
                    .col(Movies::ReleaseYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(pk_auto(Genres::Id))
                    .col(string(Genres::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_genres_name")
                    .table(Genres::Table)
                    .col(Genres::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(pk_auto(Actors::Id))
                    .col(string(Actors::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_actors_name")
                    .table(Actors::Table)
                    .col(Actors::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Directors::Table)
                    .if_not_exists()
                    .col(pk_auto(Directors::Id))
                    .col(string(Directors::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_directors_name")
                    .table(Directors::Table)
                    .col(Directors::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieGenres::Table)
                    .if_not_exists()
                    .col(integer(MovieGenres::MovieId))
                    .col(integer(MovieGenres::GenreId))
                    .primary_key(
                        Index::create().col(MovieGenres::MovieId).col(MovieGenres::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genres_movie")
                            .from(MovieGenres::Table, MovieGenres::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genres_genre")
                            .from(MovieGenres::Table, MovieGenres::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_movie_genres_movie")
                    .table(MovieGenres::Table)
                    .col(MovieGenres::MovieId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieCast::Table)
                    .if_not_exists()
                    .col(integer(MovieCast::MovieId))
                    .col(integer(MovieCast::ActorId))
                    .col(integer_null(MovieCast::CastOrder))
                    .primary_key(Index::create().col(MovieCast::MovieId).col(MovieCast::ActorId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_cast_movie")
                            .from(MovieCast::Table, MovieCast::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_cast_actor")
                            .from(MovieCast::Table, MovieCast::ActorId)
                            .to(Actors::Table, Actors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_movie_cast_movie")
                    .table(MovieCast::Table)
                    .col(MovieCast::MovieId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieDirectors::Table)
                    .if_not_exists()
                    .col(integer(MovieDirectors::MovieId))
                    .col(integer(MovieDirectors::DirectorId))
                    .primary_key(
                        Index::create().col(MovieDirectors::MovieId).col(MovieDirectors::DirectorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_directors_movie")
                            .from(MovieDirectors::Table, MovieDirectors::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_directors_director")
                            .from(MovieDirectors::Table, MovieDirectors::DirectorId)
                            .to(Directors::Table, Directors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MovieDirectors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieCast::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieGenres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Directors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    OriginalTitle,
    Overview,
    ReleaseDate,
    ReleaseYear,
    ReleaseMonth,
    Budget,
    Revenue,
    Profit,
    Runtime,
    VoteAverage,
    Popularity,
    DirectorText,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Directors {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum MovieGenres {
    Table,
    MovieId,
    GenreId,
}

#[derive(DeriveIden)]
enum MovieCast {
    Table,
    MovieId,
    ActorId,
    CastOrder,
}

#[derive(DeriveIden)]
enum MovieDirectors {
    Table,
    MovieId,
    DirectorId,
}
