//! Persistence module split across logical submodules. The database is the
//! source of the content collections; navigation state never touches it.

mod articles;
mod connection;
mod requests;
mod schedules;
mod seed;
mod songs;

use chrono::NaiveDate;

use crate::error::ShellError;

pub use articles::{fetch_articles, insert_article};
pub use connection::{data_dir, default_db_path, ensure_schema, open_in_memory, DATA_DIR_NAME};
pub use requests::{fetch_requests, insert_request};
pub use schedules::{fetch_schedules, insert_schedule};
pub use seed::seed_if_empty;
pub use songs::{fetch_songs, insert_song};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, ShellError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ShellError::InvalidDate(raw.to_string()))
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
