use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("input is missing required column '{0}'")]
    MissingColumn(String),

    #[error("line {line}: movie id '{value}' is not an integer")]
    InvalidId { line: usize, value: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

pub type LoadResult<T> = Result<T, LoadError>;
