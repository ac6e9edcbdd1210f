// poll participants, as handed to us by the chat layer

use crate::Error;
use crate::core::{Db, tally::escape_markdown};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

// id is stable, names are overwritten on every store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Voter {
    pub fn new(id: i64, first_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: None,
            username: None,
        }
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }

    // [Jane Doe](tg://user?id=42)
    pub fn mention(&self) -> String {
        format!("[{}](tg://user?id={})", escape_markdown(&self.full_name()), self.id)
    }

    pub async fn store(&self, db: &Db) -> Result<(), Error> {
        let mut tx = db.pool().begin().await?;
        self.upsert(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    // id never changes, only the display fields do
    pub(crate) async fn upsert(&self, conn: &mut SqliteConnection) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO users (id, first_name, last_name, username)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE
             SET first_name = excluded.first_name,
                 last_name = excluded.last_name,
                 username = excluded.username",
        )
        .bind(self.id)
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(&self.username)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self, Error> {
        Ok(Self {
            id: required(row, "id")?,
            first_name: required(row, "first_name")?,
            last_name: nullable(row, "last_name")?,
            username: nullable(row, "username")?,
        })
    }
}

// sqlite hands NULL text back as "", so decode through Option and reject None
pub(crate) fn required<T>(row: &SqliteRow, column: &'static str) -> Result<T, Error>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    nullable(row, column)?.ok_or_else(|| Error::MalformedRow {
        column,
        reason: "is NULL".to_string(),
    })
}

pub(crate) fn nullable<T>(row: &SqliteRow, column: &'static str) -> Result<Option<T>, Error>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get::<Option<T>, _>(column).map_err(|e| {
        let reason = match e {
            sqlx::Error::ColumnNotFound(_) => "is missing".to_string(),
            sqlx::Error::ColumnDecode { source, .. } => format!("could not be decoded: {source}"),
            other => other.to_string(),
        };
        Error::MalformedRow { column, reason }
    })
}
