//! Persistence for `ObjectType`: CRUD, cursor pagination, full-text search,
//! and version history.

use registry_domain::{diff_snapshots, DiffEntry, ObjectType, VersionSnapshot};
use registry_error::{RegistryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::cursor::Cursor;
use crate::filter::{ListFilter, SortField};
use crate::rows::ObjectTypeRow;

const SCALAR_FIELDS: &[&str] = &["name", "displayName", "description", "category", "tags"];

/// A page of results plus the cursor to request the next one, if any.
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

pub struct ObjectTypeRepository {
    pool: PgPool,
}

impl ObjectTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, object_type: &ObjectType) -> Result<ObjectType> {
        let properties = serde_json::to_value(&object_type.properties)
            .map_err(|e| RegistryError::storage(e.to_string()))?;
        let metadata = serde_json::to_value(&object_type.metadata).map_err(|e| RegistryError::storage(e.to_string()))?;

        let mut tx = self.pool.begin().await?;

        let row: ObjectTypeRow = sqlx::query_as(
            r#"
            INSERT INTO object_types
                (id, name, display_name, description, category, tags, properties, metadata,
                 version, is_deleted, created_at, created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, false, $10, $11, $10, $11)
            RETURNING *
            "#,
        )
        .bind(object_type.id)
        .bind(&object_type.name)
        .bind(&object_type.display_name)
        .bind(&object_type.description)
        .bind(&object_type.category)
        .bind(&object_type.tags)
        .bind(&properties)
        .bind(&metadata)
        .bind(object_type.version)
        .bind(object_type.created_at)
        .bind(&object_type.created_by)
        .fetch_one(&mut *tx)
        .await?;

        insert_version_snapshot(&mut tx, "object_type_versions", object_type.id, object_type.version, &row_snapshot(&row)?, None, &object_type.created_by)
            .await?;

        tx.commit().await?;

        row.try_into()
    }

    pub async fn get_by_id(&self, id: Uuid, include_deleted: bool) -> Result<ObjectType> {
        let row: ObjectTypeRow = sqlx::query_as(if include_deleted {
            "SELECT * FROM object_types WHERE id = $1"
        } else {
            "SELECT * FROM object_types WHERE id = $1 AND is_deleted = false"
        })
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RegistryError::not_found(format!("object type '{}'", id)))?;

        row.try_into()
    }

    pub async fn get_by_name(&self, name: &str) -> Result<ObjectType> {
        let row: ObjectTypeRow = sqlx::query_as("SELECT * FROM object_types WHERE name = $1 AND is_deleted = false")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RegistryError::not_found(format!("object type '{}'", name)))?;

        row.try_into()
    }

    pub async fn update(&self, object_type: &ObjectType, change_description: Option<&str>) -> Result<ObjectType> {
        let properties = serde_json::to_value(&object_type.properties)
            .map_err(|e| RegistryError::storage(e.to_string()))?;
        let metadata = serde_json::to_value(&object_type.metadata).map_err(|e| RegistryError::storage(e.to_string()))?;

        let mut tx = self.pool.begin().await?;

        let row: ObjectTypeRow = sqlx::query_as(
            r#"
            UPDATE object_types
            SET display_name = $2, description = $3, category = $4, tags = $5, properties = $6,
                metadata = $7, version = $8, updated_at = $9, updated_by = $10
            WHERE id = $1 AND is_deleted = false
            RETURNING *
            "#,
        )
        .bind(object_type.id)
        .bind(&object_type.display_name)
        .bind(&object_type.description)
        .bind(&object_type.category)
        .bind(&object_type.tags)
        .bind(&properties)
        .bind(&metadata)
        .bind(object_type.version)
        .bind(object_type.updated_at)
        .bind(&object_type.updated_by)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RegistryError::not_found(format!("object type '{}'", object_type.id)))?;

        insert_version_snapshot(
            &mut tx,
            "object_type_versions",
            object_type.id,
            object_type.version,
            &row_snapshot(&row)?,
            change_description,
            &object_type.updated_by,
        )
        .await?;

        tx.commit().await?;

        row.try_into()
    }

    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE object_types SET is_deleted = true, updated_at = now(), updated_by = $2 WHERE id = $1 AND is_deleted = false",
        )
        .bind(id)
        .bind(actor)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::not_found(format!("object type '{}'", id)));
        }

        Ok(())
    }

    pub async fn list(&self, filter: &ListFilter) -> Result<Page<ObjectType>> {
        let mut sql = String::from("SELECT * FROM object_types WHERE 1 = 1");
        let mut bind_count: usize = 0;
        let sort_field = filter.sort_field.unwrap_or(SortField::CreatedAt);
        let sort_column = sort_field.as_column();

        if !filter.include_deleted {
            sql.push_str(" AND is_deleted = false");
        }
        if filter.category.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND category = ${}", bind_count));
        }
        if !filter.tags.is_empty() {
            bind_count += 1;
            sql.push_str(&format!(" AND tags && ${}::text[]", bind_count));
        }
        if filter.created_after.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND created_at >= ${}", bind_count));
        }
        if filter.created_before.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND created_at <= ${}", bind_count));
        }
        if filter.cursor.is_some() {
            sql.push_str(&format!(" AND ({}, id) < (${}, ${})", sort_column, bind_count + 1, bind_count + 2));
        }

        sql.push_str(&format!(" ORDER BY {} {}, id {}", sort_column, filter.sort_direction.as_sql(), filter.sort_direction.as_sql()));
        sql.push_str(&format!(" LIMIT {}", filter.page_size as i64 + 1));

        let mut query = sqlx::query_as::<_, ObjectTypeRow>(&sql);
        if let Some(category) = &filter.category {
            query = query.bind(category.clone());
        }
        if !filter.tags.is_empty() {
            query = query.bind(filter.tags.clone());
        }
        if let Some(created_after) = filter.created_after {
            query = query.bind(created_after);
        }
        if let Some(created_before) = filter.created_before {
            query = query.bind(created_before);
        }
        if let Some(cursor) = &filter.cursor {
            match cursor {
                Cursor::Name { value, id } => query = query.bind(value.clone()).bind(*id),
                Cursor::CreatedAt { value, id } => query = query.bind(*value).bind(*id),
                Cursor::UpdatedAt { value, id } => query = query.bind(*value).bind(*id),
            }
        }

        let mut rows = query.fetch_all(&self.pool).await?;

        let next_cursor = if rows.len() > filter.page_size as usize {
            rows.truncate(filter.page_size as usize);
            rows.last().map(|r| Cursor::for_sort_field(sort_field, &r.name, r.created_at, r.updated_at, r.id).encode())
        } else {
            None
        };

        let items = rows.into_iter().map(ObjectType::try_from).collect::<Result<Vec<_>>>()?;

        Ok(Page { items, next_cursor })
    }

    pub async fn count(&self, include_deleted: bool) -> Result<i64> {
        let sql = if include_deleted {
            "SELECT count(*) FROM object_types"
        } else {
            "SELECT count(*) FROM object_types WHERE is_deleted = false"
        };
        let (count,): (i64,) = sqlx::query_as(sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// Full-text search via `ts_rank`, tie-broken by `created_at DESC`. An
    /// empty query returns an empty page with no round-trip to the database.
    pub async fn search(&self, query: &str, page_size: i64) -> Result<Vec<ObjectType>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let page_size = crate::cursor::clamp_page_size(page_size) as i64;

        let rows: Vec<ObjectTypeRow> = sqlx::query_as(
            r#"
            SELECT *
            FROM object_types
            WHERE is_deleted = false
              AND search_vector @@ plainto_tsquery('english', $1)
            ORDER BY ts_rank(search_vector, plainto_tsquery('english', $1)) DESC, created_at DESC
            LIMIT $2
            "#,
        )
        .bind(query)
        .bind(page_size)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ObjectType::try_from).collect()
    }

    pub async fn get_version(&self, owner_id: Uuid, version: i64) -> Result<VersionSnapshot> {
        sqlx::query_as::<_, VersionSnapshot>(
            "SELECT owner_id, version, snapshot, change_description, created_at, created_by FROM object_type_versions WHERE owner_id = $1 AND version = $2",
        )
        .bind(owner_id)
        .bind(version)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RegistryError::not_found(format!("version {} of object type '{}'", version, owner_id)))
    }

    pub async fn list_versions(&self, owner_id: Uuid) -> Result<Vec<VersionSnapshot>> {
        sqlx::query_as::<_, VersionSnapshot>(
            "SELECT owner_id, version, snapshot, change_description, created_at, created_by FROM object_type_versions WHERE owner_id = $1 ORDER BY version DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    pub async fn compare_versions(&self, owner_id: Uuid, from: i64, to: i64) -> Result<Vec<DiffEntry>> {
        let from_snapshot = self.get_version(owner_id, from).await?;
        let to_snapshot = self.get_version(owner_id, to).await?;
        Ok(diff_snapshots(&from_snapshot.snapshot, &to_snapshot.snapshot, SCALAR_FIELDS))
    }

    /// Insert a batch of new ObjectTypes in a single transaction: all or
    /// nothing, so a duplicate name anywhere in the batch rolls the whole
    /// batch back.
    pub async fn batch_create(&self, object_types: &[ObjectType]) -> Result<Vec<ObjectType>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(object_types.len());

        for object_type in object_types {
            let properties = serde_json::to_value(&object_type.properties).map_err(|e| RegistryError::storage(e.to_string()))?;
            let metadata = serde_json::to_value(&object_type.metadata).map_err(|e| RegistryError::storage(e.to_string()))?;

            let row: ObjectTypeRow = sqlx::query_as(
                r#"
                INSERT INTO object_types
                    (id, name, display_name, description, category, tags, properties, metadata,
                     version, is_deleted, created_at, created_by, updated_at, updated_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, false, $10, $11, $10, $11)
                RETURNING *
                "#,
            )
            .bind(object_type.id)
            .bind(&object_type.name)
            .bind(&object_type.display_name)
            .bind(&object_type.description)
            .bind(&object_type.category)
            .bind(&object_type.tags)
            .bind(&properties)
            .bind(&metadata)
            .bind(object_type.version)
            .bind(object_type.created_at)
            .bind(&object_type.created_by)
            .fetch_one(&mut *tx)
            .await?;

            insert_version_snapshot(&mut tx, "object_type_versions", object_type.id, object_type.version, &row_snapshot(&row)?, None, &object_type.created_by)
                .await?;

            created.push(row.try_into()?);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Update a batch of ObjectTypes in a single transaction: all rows and
    /// their snapshots persist, or none do.
    pub async fn batch_update(&self, object_types: &[ObjectType]) -> Result<Vec<ObjectType>> {
        let mut tx = self.pool.begin().await?;
        let mut updated = Vec::with_capacity(object_types.len());

        for object_type in object_types {
            let properties = serde_json::to_value(&object_type.properties).map_err(|e| RegistryError::storage(e.to_string()))?;
            let metadata = serde_json::to_value(&object_type.metadata).map_err(|e| RegistryError::storage(e.to_string()))?;

            let row: ObjectTypeRow = sqlx::query_as(
                r#"
                UPDATE object_types
                SET display_name = $2, description = $3, category = $4, tags = $5, properties = $6,
                    metadata = $7, version = $8, updated_at = $9, updated_by = $10
                WHERE id = $1 AND is_deleted = false
                RETURNING *
                "#,
            )
            .bind(object_type.id)
            .bind(&object_type.display_name)
            .bind(&object_type.description)
            .bind(&object_type.category)
            .bind(&object_type.tags)
            .bind(&properties)
            .bind(&metadata)
            .bind(object_type.version)
            .bind(object_type.updated_at)
            .bind(&object_type.updated_by)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| RegistryError::not_found(format!("object type '{}'", object_type.id)))?;

            insert_version_snapshot(&mut tx, "object_type_versions", object_type.id, object_type.version, &row_snapshot(&row)?, None, &object_type.updated_by)
                .await?;

            updated.push(row.try_into()?);
        }

        tx.commit().await?;
        Ok(updated)
    }
}

fn row_snapshot(row: &ObjectTypeRow) -> Result<serde_json::Value> {
    serde_json::to_value(serde_json::json!({
        "name": row.name,
        "displayName": row.display_name,
        "description": row.description,
        "category": row.category,
        "tags": row.tags,
        "properties": row.properties,
        "metadata": row.metadata,
        "version": row.version,
    }))
    .map_err(|e| RegistryError::storage(e.to_string()))
}

async fn insert_version_snapshot(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    table: &str,
    owner_id: Uuid,
    version: i64,
    snapshot: &serde_json::Value,
    change_description: Option<&str>,
    actor: &str,
) -> Result<()> {
    let sql = format!(
        "INSERT INTO {} (owner_id, version, snapshot, change_description, created_at, created_by) VALUES ($1, $2, $3, $4, now(), $5)",
        table
    );
    sqlx::query(&sql)
        .bind(owner_id)
        .bind(version)
        .bind(snapshot)
        .bind(change_description)
        .bind(actor)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

// `VersionSnapshot` is defined in registry-domain without a `FromRow` derive
// since that crate has no storage dependency; implement it here instead.
impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for VersionSnapshot {
    fn from_row(row: &sqlx::postgres::PgRow) -> std::result::Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(VersionSnapshot {
            owner_id: row.try_get("owner_id")?,
            version: row.try_get("version")?,
            snapshot: row.try_get("snapshot")?,
            change_description: row.try_get("change_description")?,
            created_at: row.try_get("created_at")?,
            created_by: row.try_get("created_by")?,
        })
    }
}
