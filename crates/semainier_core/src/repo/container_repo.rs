//! Container repository: lists and sublists backing the ordering engine.
//!
//! # Responsibility
//! - Persist the (list, sublist) containers activities are scoped to.
//! - Let deletes cascade onto owned activities via schema foreign keys.
//!
//! # Invariants
//! - A sublist always belongs to exactly one list.
//! - Deleting a container hard-deletes its activities (FK cascade).

use crate::db::DbError;
use crate::model::container::{List, ListId, Sublist, SublistId};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ContainerRepoResult<T> = Result<T, ContainerRepoError>;

/// Errors from container persistence operations.
#[derive(Debug)]
pub enum ContainerRepoError {
    Db(DbError),
    NotFound(Uuid),
    InvalidData(String),
}

impl Display for ContainerRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "container not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted container data: {message}"),
        }
    }
}

impl Error for ContainerRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for ContainerRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ContainerRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for container records.
pub trait ContainerRepository {
    fn create_list(&self, list: &List) -> ContainerRepoResult<ListId>;
    fn create_sublist(&self, sublist: &Sublist) -> ContainerRepoResult<SublistId>;
    fn get_list(&self, id: ListId) -> ContainerRepoResult<Option<List>>;
    /// Deletes a list; owned sublists and activities cascade.
    fn delete_list(&self, id: ListId) -> ContainerRepoResult<()>;
    /// Deletes a sublist; owned activities cascade.
    fn delete_sublist(&self, id: SublistId) -> ContainerRepoResult<()>;
}

/// SQLite-backed container repository.
pub struct SqliteContainerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContainerRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContainerRepository for SqliteContainerRepository<'_> {
    fn create_list(&self, list: &List) -> ContainerRepoResult<ListId> {
        self.conn.execute(
            "INSERT INTO lists (uuid, name) VALUES (?1, ?2);",
            params![list.uuid.to_string(), list.name.as_str()],
        )?;
        Ok(list.uuid)
    }

    fn create_sublist(&self, sublist: &Sublist) -> ContainerRepoResult<SublistId> {
        self.conn.execute(
            "INSERT INTO sublists (uuid, list_uuid, name) VALUES (?1, ?2, ?3);",
            params![
                sublist.uuid.to_string(),
                sublist.list_uuid.to_string(),
                sublist.name.as_str(),
            ],
        )?;
        Ok(sublist.uuid)
    }

    fn get_list(&self, id: ListId) -> ContainerRepoResult<Option<List>> {
        let row = self
            .conn
            .query_row(
                "SELECT uuid, name FROM lists WHERE uuid = ?1;",
                [id.to_string()],
                |row| {
                    let uuid_text: String = row.get(0)?;
                    let name: String = row.get(1)?;
                    Ok((uuid_text, name))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((uuid_text, name)) => {
                let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
                    ContainerRepoError::InvalidData(format!(
                        "invalid uuid `{uuid_text}` in lists.uuid"
                    ))
                })?;
                Ok(Some(List { uuid, name }))
            }
        }
    }

    fn delete_list(&self, id: ListId) -> ContainerRepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM lists WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(ContainerRepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_sublist(&self, id: SublistId) -> ContainerRepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM sublists WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(ContainerRepoError::NotFound(id));
        }
        Ok(())
    }
}
