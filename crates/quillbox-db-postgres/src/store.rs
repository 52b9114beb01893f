//! PostgreSQL implementation of the `NoteStore` and `UserStore` ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::{PgPool, Postgres};
use time::OffsetDateTime;
use uuid::Uuid;

use quillbox_core::{Note, NoteDraft, NoteId, TagFilter, User, UserId, generate_user_id};
use quillbox_storage::{NoteStore, StorageError, UserStore};

use crate::config::PostgresConfig;
use crate::error::{PostgresError, is_unique_violation};
use crate::migrations;
use crate::pool;

/// Row shape of the `notes` table.
type NoteRow = (
    i64,
    Uuid,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

/// Row shape of the `users` table.
type UserRow = (Uuid, String, String, DateTime<Utc>);

/// Converts chrono DateTime to time OffsetDateTime.
fn chrono_to_time(dt: DateTime<Utc>) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(dt.timestamp()).unwrap_or(OffsetDateTime::UNIX_EPOCH)
        + time::Duration::nanoseconds(dt.timestamp_subsec_nanos() as i64)
}

/// Converts time OffsetDateTime to chrono DateTime.
fn time_to_chrono(dt: OffsetDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(dt.unix_timestamp(), dt.nanosecond())
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Splits a persisted comma-joined tag column back into the domain list.
fn split_tags(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        Vec::new()
    } else {
        joined.split(',').map(String::from).collect()
    }
}

fn db_err(e: sqlx_core::error::Error) -> StorageError {
    StorageError::from(PostgresError::Database(e))
}

fn note_from_row(row: NoteRow) -> Note {
    let (id, owner_id, title, content, tags, created_at, updated_at) = row;
    Note {
        id,
        owner_id,
        title,
        content,
        tags: split_tags(&tags),
        created_at: chrono_to_time(created_at),
        updated_at: chrono_to_time(updated_at),
    }
}

fn user_from_row(row: UserRow) -> User {
    let (id, email, password_hash, created_at) = row;
    User {
        id,
        email,
        password_hash,
        created_at: chrono_to_time(created_at),
    }
}

/// PostgreSQL storage backend for notes and users.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore` with the given configuration.
    ///
    /// This will create a connection pool and, if configured, run the
    /// embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created or if
    /// migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await.map_err(StorageError::from)?;

        if config.run_migrations {
            migrations::run(&pool).await.map_err(StorageError::from)?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PgStore` from an existing connection pool.
    ///
    /// Migrations are not run automatically when using this constructor.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn insert(&self, owner: UserId, draft: NoteDraft) -> Result<Note, StorageError> {
        let now = Utc::now();
        let joined = draft.tags.join(",");

        let (id,): (i64,) = query_as(
            r#"INSERT INTO notes (owner_id, title, content, tags, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $5)
               RETURNING id"#,
        )
        .bind(owner)
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(&joined)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(Note {
            id,
            owner_id: owner,
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
            created_at: chrono_to_time(now),
            updated_at: chrono_to_time(now),
        })
    }

    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, StorageError> {
        let row: Option<NoteRow> = query_as(
            r#"SELECT id, owner_id, title, content, tags, created_at, updated_at
               FROM notes
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(note_from_row))
    }

    async fn save(&self, note: &Note) -> Result<Note, StorageError> {
        let result = query(
            r#"UPDATE notes
               SET title = $2, content = $3, tags = $4, updated_at = $5
               WHERE id = $1"#,
        )
        .bind(note.id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.joined_tags())
        .bind(time_to_chrono(note.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("note", note.id));
        }

        Ok(note.clone())
    }

    async fn delete(&self, id: NoteId) -> Result<(), StorageError> {
        let result = query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("note", id));
        }

        Ok(())
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        filter: &TagFilter,
    ) -> Result<Vec<Note>, StorageError> {
        // One conjunctive LIKE clause per filter token, matched against the
        // comma-joined tags column.
        let mut sql = String::from(
            "SELECT id, owner_id, title, content, tags, created_at, updated_at \
             FROM notes WHERE owner_id = $1",
        );
        for idx in 0..filter.tokens().len() {
            sql.push_str(&format!(" AND tags LIKE ${}", idx + 2));
        }
        sql.push_str(" ORDER BY id");

        let mut q = query_as::<Postgres, NoteRow>(&sql).bind(owner);
        for token in filter.tokens() {
            q = q.bind(format!("%{token}%"));
        }

        let rows = q.fetch_all(&self.pool).await.map_err(db_err)?;
        Ok(rows.into_iter().map(note_from_row).collect())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, StorageError> {
        let id = generate_user_id();
        let now = Utc::now();

        query(
            r#"INSERT INTO users (id, email, password_hash, created_at)
               VALUES ($1, $2, $3, $4)"#,
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StorageError::already_exists("user", email)
            } else {
                db_err(e)
            }
        })?;

        Ok(User {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: chrono_to_time(now),
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row: Option<UserRow> = query_as(
            r#"SELECT id, email, password_hash, created_at
               FROM users
               WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(user_from_row))
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let row: Option<UserRow> = query_as(
            r#"SELECT id, email, password_hash, created_at
               FROM users
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(user_from_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_tags_handles_empty_column() {
        assert!(split_tags("").is_empty());
        assert_eq!(split_tags("work"), vec!["work"]);
        assert_eq!(split_tags("work,urgent"), vec!["work", "urgent"]);
    }

    #[test]
    fn timestamp_conversion_round_trips() {
        let now = Utc::now();
        let converted = time_to_chrono(chrono_to_time(now));
        assert_eq!(converted.timestamp(), now.timestamp());
        assert_eq!(
            converted.timestamp_subsec_nanos(),
            now.timestamp_subsec_nanos()
        );
    }

    #[test]
    fn list_query_numbers_like_params_after_owner() {
        // Mirror of the SQL assembly in list_by_owner.
        let filter = TagFilter::parse("work,urgent");
        let mut sql = String::from("... WHERE owner_id = $1");
        for idx in 0..filter.tokens().len() {
            sql.push_str(&format!(" AND tags LIKE ${}", idx + 2));
        }
        assert!(sql.ends_with("$1 AND tags LIKE $2 AND tags LIKE $3"));
    }
}
