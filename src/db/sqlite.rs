use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

use crate::db::models::{AdminCredential, Project, ProjectKind};
use crate::db::schema::SQLITE_INIT;
use crate::error::AppError;

pub type SqlitePool = Pool<Sqlite>;

/// Repository for project rows.
#[derive(Clone)]
pub struct ProjectStore {
    pool: SqlitePool,
}

impl ProjectStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = SqlitePool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// All projects in insertion order.
    pub async fn list(&self) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, kind, file_ref, external_id FROM projects ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_project).collect()
    }

    pub async fn get(&self, id: i64) -> Result<Option<Project>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, kind, file_ref, external_id FROM projects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_project).transpose()
    }

    pub async fn insert(
        &self,
        name: &str,
        kind: ProjectKind,
        file_ref: &str,
        external_id: Option<&str>,
    ) -> Result<Project, AppError> {
        let result = sqlx::query(
            "INSERT INTO projects (name, kind, file_ref, external_id) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(kind.as_str())
        .bind(file_ref)
        .bind(external_id)
        .execute(&self.pool)
        .await?;

        Ok(Project {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            kind,
            file_ref: file_ref.to_string(),
            external_id: external_id.map(str::to_string),
        })
    }

    /// Remove a row. Returns `false` when the row was already absent, which
    /// keeps repeated deletes of the same id a no-op.
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_project(row: SqliteRow) -> Result<Project, AppError> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let kind_str: String = row.try_get("kind")?;
        let file_ref: String = row.try_get("file_ref")?;
        let external_id: Option<String> = row.try_get("external_id")?;

        let kind = ProjectKind::parse(&kind_str).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown project kind: {kind_str}").into())
        })?;

        Ok(Project {
            id,
            name,
            kind,
            file_ref,
            external_id,
        })
    }
}

/// Access to the singleton admin credential row.
#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
}

impl CredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the default credential unless one already exists.
    pub async fn seed(&self, pin_hash: &str, email: Option<&str>) -> Result<(), AppError> {
        sqlx::query("INSERT OR IGNORE INTO admin (id, pin_hash, email) VALUES (1, ?, ?)")
            .bind(pin_hash)
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get(&self) -> Result<AdminCredential, AppError> {
        let row = sqlx::query("SELECT pin_hash, email FROM admin WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(AdminCredential {
            pin_hash: row.try_get("pin_hash")?,
            email: row.try_get("email")?,
        })
    }

    /// Overwrite the credential wholesale (PIN reset).
    pub async fn set(&self, pin_hash: &str, email: Option<&str>) -> Result<(), AppError> {
        sqlx::query("UPDATE admin SET pin_hash = ?, email = ? WHERE id = 1")
            .bind(pin_hash)
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
