//! PostgreSQL storage backend implementation.
//!
//! Uses sqlx for database operations and implements the StorageBackend trait.
//! Each trait method runs inside one transaction; a transaction that is
//! dropped before `commit` is rolled back by sqlx.

use super::{StorageError, traits::*};
use crate::models::{BoneRecord, DiagramRecord, DiagramStatus, StoredDiagram};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::HashMap;
use tracing::{debug, info};

/// Embedded schema migrations (`migrations/`).
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const DIAGRAM_COLUMNS: &str = "id, title, created_by, status, tags, created_at, updated_at";
const BONE_COLUMNS: &str = "id, name, created_by, parent_id, diagram_id";

#[derive(Debug, FromRow)]
struct DiagramRow {
    id: String,
    title: String,
    created_by: String,
    status: Option<String>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DiagramRow> for DiagramRecord {
    type Error = StorageError;

    fn try_from(row: DiagramRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .as_deref()
            .map(str::parse::<DiagramStatus>)
            .transpose()
            .map_err(StorageError::Other)?;

        Ok(DiagramRecord {
            id: row.id,
            title: row.title,
            created_by: row.created_by,
            status,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct BoneRow {
    id: String,
    name: String,
    created_by: String,
    parent_id: Option<String>,
    diagram_id: String,
}

impl From<BoneRow> for BoneRecord {
    fn from(row: BoneRow) -> Self {
        BoneRecord {
            id: row.id,
            name: row.name,
            created_by: row.created_by,
            parent_id: row.parent_id,
            diagram_id: row.diagram_id,
        }
    }
}

fn db_err(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() || db.is_foreign_key_violation() => {
            StorageError::ConstraintViolation(db.message().to_string())
        }
        _ => StorageError::ConnectionError(e.to_string()),
    }
}

/// PostgreSQL storage backend implementation.
pub struct PostgresStorageBackend {
    pool: PgPool,
}

impl PostgresStorageBackend {
    /// Create a new PostgreSQL storage backend.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::ConnectionError(format!("Migration failed: {}", e)))?;
        info!("Database migrations applied");
        Ok(())
    }

    async fn fetch_diagram(
        conn: &mut PgConnection,
        diagram_id: &str,
        for_update: bool,
    ) -> Result<Option<DiagramRecord>, StorageError> {
        let lock = if for_update { " FOR UPDATE" } else { "" };
        let sql = format!("SELECT {DIAGRAM_COLUMNS} FROM diagrams WHERE id = $1{lock}");
        sqlx::query_as::<_, DiagramRow>(&sql)
            .bind(diagram_id)
            .fetch_optional(conn)
            .await
            .map_err(db_err)?
            .map(DiagramRecord::try_from)
            .transpose()
    }

    async fn fetch_bones(
        conn: &mut PgConnection,
        diagram_id: &str,
    ) -> Result<Vec<BoneRecord>, StorageError> {
        let sql = format!("SELECT {BONE_COLUMNS} FROM bones WHERE diagram_id = $1 ORDER BY ordinal");
        let rows = sqlx::query_as::<_, BoneRow>(&sql)
            .bind(diagram_id)
            .fetch_all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(BoneRecord::from).collect())
    }

    async fn insert_bones(
        conn: &mut PgConnection,
        bones: &[BoneRecord],
    ) -> Result<(), StorageError> {
        for (ordinal, bone) in bones.iter().enumerate() {
            let ordinal = i32::try_from(ordinal)
                .map_err(|_| StorageError::Other("too many bones in one diagram".to_string()))?;
            sqlx::query(
                r#"
                INSERT INTO bones (id, name, created_by, parent_id, diagram_id, ordinal)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&bone.id)
            .bind(&bone.name)
            .bind(&bone.created_by)
            .bind(bone.parent_id.as_deref())
            .bind(&bone.diagram_id)
            .bind(ordinal)
            .execute(&mut *conn)
            .await
            .map_err(db_err)?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for PostgresStorageBackend {
    async fn list_diagrams(&self) -> Result<Vec<StoredDiagram>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let sql = format!("SELECT {DIAGRAM_COLUMNS} FROM diagrams ORDER BY created_at, id");
        let rows = sqlx::query_as::<_, DiagramRow>(&sql)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_err)?;

        let sql = format!("SELECT {BONE_COLUMNS} FROM bones ORDER BY diagram_id, ordinal");
        let bone_rows = sqlx::query_as::<_, BoneRow>(&sql)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;

        let mut bones_by_diagram: HashMap<String, Vec<BoneRecord>> = HashMap::new();
        for row in bone_rows {
            bones_by_diagram
                .entry(row.diagram_id.clone())
                .or_default()
                .push(BoneRecord::from(row));
        }

        rows.into_iter()
            .map(|row| -> Result<StoredDiagram, StorageError> {
                let record = DiagramRecord::try_from(row)?;
                let bones = bones_by_diagram.remove(&record.id).unwrap_or_default();
                Ok(StoredDiagram { record, bones })
            })
            .collect()
    }

    async fn get_diagram(&self, diagram_id: &str) -> Result<Option<StoredDiagram>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let Some(record) = Self::fetch_diagram(&mut tx, diagram_id, false).await? else {
            return Ok(None);
        };
        let bones = Self::fetch_bones(&mut tx, diagram_id).await?;
        tx.commit().await.map_err(db_err)?;

        Ok(Some(StoredDiagram { record, bones }))
    }

    async fn get_bone(&self, bone_id: &str) -> Result<Option<BoneRecord>, StorageError> {
        let sql = format!("SELECT {BONE_COLUMNS} FROM bones WHERE id = $1");
        let row = sqlx::query_as::<_, BoneRow>(&sql)
            .bind(bone_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.map(BoneRecord::from))
    }

    async fn create_diagram(
        &self,
        diagram: DiagramRecord,
        bones: Vec<BoneRecord>,
    ) -> Result<StoredDiagram, StorageError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            r#"
            INSERT INTO diagrams (id, title, created_by, status, tags, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&diagram.id)
        .bind(&diagram.title)
        .bind(&diagram.created_by)
        .bind(diagram.status.map(|s| s.as_str()))
        .bind(&diagram.tags)
        .bind(diagram.created_at)
        .bind(diagram.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        Self::insert_bones(&mut tx, &bones).await?;

        // Read back so timestamps carry the database's precision.
        let record = Self::fetch_diagram(&mut tx, &diagram.id, false)
            .await?
            .ok_or_else(|| StorageError::not_found("diagram", &diagram.id))?;
        let bones = Self::fetch_bones(&mut tx, &diagram.id).await?;
        tx.commit().await.map_err(db_err)?;

        debug!("Created diagram {} with {} bones", record.id, bones.len());
        Ok(StoredDiagram { record, bones })
    }

    async fn update_diagram(
        &self,
        diagram_id: &str,
        patch: DiagramPatch,
        bones: Option<Vec<BoneRecord>>,
    ) -> Result<Option<StoredDiagram>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let Some(mut record) = Self::fetch_diagram(&mut tx, diagram_id, true).await? else {
            return Ok(None);
        };
        patch.apply(&mut record, Utc::now());

        sqlx::query(
            r#"
            UPDATE diagrams
            SET title = $2, created_by = $3, status = $4, tags = $5, created_at = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(diagram_id)
        .bind(&record.title)
        .bind(&record.created_by)
        .bind(record.status.map(|s| s.as_str()))
        .bind(&record.tags)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if let Some(bones) = bones {
            let deleted = sqlx::query("DELETE FROM bones WHERE diagram_id = $1")
                .bind(diagram_id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?
                .rows_affected();
            debug!(
                "Deleted {} bones of diagram {}, inserting {}",
                deleted,
                diagram_id,
                bones.len()
            );
            Self::insert_bones(&mut tx, &bones).await?;
        }

        let record = Self::fetch_diagram(&mut tx, diagram_id, false)
            .await?
            .ok_or_else(|| StorageError::not_found("diagram", diagram_id))?;
        let bones = Self::fetch_bones(&mut tx, diagram_id).await?;
        tx.commit().await.map_err(db_err)?;

        Ok(Some(StoredDiagram { record, bones }))
    }

    async fn delete_diagram(&self, diagram_id: &str) -> Result<bool, StorageError> {
        let rows_affected = sqlx::query("DELETE FROM diagrams WHERE id = $1")
            .bind(diagram_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn count_diagrams(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM diagrams")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
