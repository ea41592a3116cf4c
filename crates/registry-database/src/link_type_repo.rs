//! Persistence for `LinkType`: CRUD, cursor pagination, and version history.
//! Referential-integrity and circular-reference checks are the Service
//! layer's job; this repository only guarantees the endpoint ids exist as a
//! foreign-key constraint at the schema level.

use registry_domain::{diff_snapshots, DiffEntry, LinkType, VersionSnapshot};
use registry_error::{RegistryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::cursor::Cursor;
use crate::filter::{ListFilter, SortField};
use crate::object_type_repo::Page;
use crate::rows::{encode_cardinality, LinkTypeRow};

const SCALAR_FIELDS: &[&str] = &["name", "displayName", "sourceTypeId", "targetTypeId", "cardinality"];

pub struct LinkTypeRepository {
    pool: PgPool,
}

impl LinkTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, link_type: &LinkType) -> Result<LinkType> {
        let properties = serde_json::to_value(&link_type.properties).map_err(|e| RegistryError::storage(e.to_string()))?;
        let metadata = serde_json::to_value(&link_type.metadata).map_err(|e| RegistryError::storage(e.to_string()))?;
        let cardinality = encode_cardinality(link_type.cardinality);

        let mut tx = self.pool.begin().await?;

        let row: LinkTypeRow = sqlx::query_as(
            r#"
            INSERT INTO link_types
                (id, name, display_name, source_type_id, target_type_id, cardinality, properties,
                 metadata, version, is_deleted, created_at, created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, false, $10, $11, $10, $11)
            RETURNING *
            "#,
        )
        .bind(link_type.id)
        .bind(&link_type.name)
        .bind(&link_type.display_name)
        .bind(link_type.source_type_id)
        .bind(link_type.target_type_id)
        .bind(cardinality)
        .bind(&properties)
        .bind(&metadata)
        .bind(link_type.version)
        .bind(link_type.created_at)
        .bind(&link_type.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                RegistryError::referential_integrity("source or target object type does not exist")
            }
            _ => RegistryError::from(e),
        })?;

        insert_version_snapshot(&mut tx, link_type.id, link_type.version, &row_snapshot(&row)?, None, &link_type.created_by).await?;

        tx.commit().await?;

        row.try_into()
    }

    pub async fn get_by_id(&self, id: Uuid, include_deleted: bool) -> Result<LinkType> {
        let row: LinkTypeRow = sqlx::query_as(if include_deleted {
            "SELECT * FROM link_types WHERE id = $1"
        } else {
            "SELECT * FROM link_types WHERE id = $1 AND is_deleted = false"
        })
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RegistryError::not_found(format!("link type '{}'", id)))?;

        row.try_into()
    }

    pub async fn get_by_name(&self, name: &str) -> Result<LinkType> {
        let row: LinkTypeRow = sqlx::query_as("SELECT * FROM link_types WHERE name = $1 AND is_deleted = false")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RegistryError::not_found(format!("link type '{}'", name)))?;

        row.try_into()
    }

    pub async fn update(&self, link_type: &LinkType, change_description: Option<&str>) -> Result<LinkType> {
        let properties = serde_json::to_value(&link_type.properties).map_err(|e| RegistryError::storage(e.to_string()))?;
        let metadata = serde_json::to_value(&link_type.metadata).map_err(|e| RegistryError::storage(e.to_string()))?;
        let cardinality = encode_cardinality(link_type.cardinality);

        let mut tx = self.pool.begin().await?;

        let row: LinkTypeRow = sqlx::query_as(
            r#"
            UPDATE link_types
            SET display_name = $2, cardinality = $3, properties = $4, metadata = $5, version = $6,
                updated_at = $7, updated_by = $8
            WHERE id = $1 AND is_deleted = false
            RETURNING *
            "#,
        )
        .bind(link_type.id)
        .bind(&link_type.display_name)
        .bind(cardinality)
        .bind(&properties)
        .bind(&metadata)
        .bind(link_type.version)
        .bind(link_type.updated_at)
        .bind(&link_type.updated_by)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RegistryError::not_found(format!("link type '{}'", link_type.id)))?;

        insert_version_snapshot(&mut tx, link_type.id, link_type.version, &row_snapshot(&row)?, change_description, &link_type.updated_by).await?;

        tx.commit().await?;

        row.try_into()
    }

    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE link_types SET is_deleted = true, updated_at = now(), updated_by = $2 WHERE id = $1 AND is_deleted = false",
        )
        .bind(id)
        .bind(actor)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::not_found(format!("link type '{}'", id)));
        }

        Ok(())
    }

    /// Link types whose source or target is `object_type_id`, used by the
    /// Service layer's delete-with-dependents check.
    pub async fn list_for_object_type(&self, object_type_id: Uuid) -> Result<Vec<LinkType>> {
        let rows: Vec<LinkTypeRow> = sqlx::query_as(
            "SELECT * FROM link_types WHERE (source_type_id = $1 OR target_type_id = $1) AND is_deleted = false",
        )
        .bind(object_type_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LinkType::try_from).collect()
    }

    pub async fn list(&self, filter: &ListFilter) -> Result<Page<LinkType>> {
        let mut sql = String::from("SELECT * FROM link_types WHERE 1 = 1");
        let mut bind_count: usize = 0;
        let sort_field = filter.sort_field.unwrap_or(SortField::CreatedAt);
        let sort_column = sort_field.as_column();

        if !filter.include_deleted {
            sql.push_str(" AND is_deleted = false");
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

        let mut query = sqlx::query_as::<_, LinkTypeRow>(&sql);
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

        let items = rows.into_iter().map(LinkType::try_from).collect::<Result<Vec<_>>>()?;

        Ok(Page { items, next_cursor })
    }

    pub async fn count(&self, include_deleted: bool) -> Result<i64> {
        let sql = if include_deleted {
            "SELECT count(*) FROM link_types"
        } else {
            "SELECT count(*) FROM link_types WHERE is_deleted = false"
        };
        let (count,): (i64,) = sqlx::query_as(sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    pub async fn get_version(&self, owner_id: Uuid, version: i64) -> Result<VersionSnapshot> {
        sqlx::query_as::<_, VersionSnapshot>(
            "SELECT owner_id, version, snapshot, change_description, created_at, created_by FROM link_type_versions WHERE owner_id = $1 AND version = $2",
        )
        .bind(owner_id)
        .bind(version)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RegistryError::not_found(format!("version {} of link type '{}'", version, owner_id)))
    }

    pub async fn list_versions(&self, owner_id: Uuid) -> Result<Vec<VersionSnapshot>> {
        sqlx::query_as::<_, VersionSnapshot>(
            "SELECT owner_id, version, snapshot, change_description, created_at, created_by FROM link_type_versions WHERE owner_id = $1 ORDER BY version DESC",
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

    /// Is `object_type_id` reachable from itself via one or more existing
    /// live LinkTypes? Used for the self-referential create guard: a plain
    /// self-loop is allowed, but not one that would close an existing path
    /// back to the same ObjectType. A transitive-closure query over the live
    /// graph, not pointer chasing in memory.
    pub async fn check_circular_reference(&self, object_type_id: Uuid) -> Result<bool> {
        let (cyclic,): (bool,) = sqlx::query_as(
            r#"
            WITH RECURSIVE reachable(id) AS (
                SELECT target_type_id FROM link_types WHERE source_type_id = $1 AND is_deleted = false
                UNION
                SELECT lt.target_type_id
                FROM link_types lt
                JOIN reachable r ON lt.source_type_id = r.id
                WHERE lt.is_deleted = false
            )
            SELECT EXISTS (SELECT 1 FROM reachable WHERE id = $1)
            "#,
        )
        .bind(object_type_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(cyclic)
    }

    /// Insert a batch of new LinkTypes in a single transaction: all rows and
    /// their snapshots persist, or none do.
    pub async fn batch_create(&self, link_types: &[LinkType]) -> Result<Vec<LinkType>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(link_types.len());

        for link_type in link_types {
            let properties = serde_json::to_value(&link_type.properties).map_err(|e| RegistryError::storage(e.to_string()))?;
            let metadata = serde_json::to_value(&link_type.metadata).map_err(|e| RegistryError::storage(e.to_string()))?;
            let cardinality = encode_cardinality(link_type.cardinality);

            let row: LinkTypeRow = sqlx::query_as(
                r#"
                INSERT INTO link_types
                    (id, name, display_name, source_type_id, target_type_id, cardinality, properties,
                     metadata, version, is_deleted, created_at, created_by, updated_at, updated_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, false, $10, $11, $10, $11)
                RETURNING *
                "#,
            )
            .bind(link_type.id)
            .bind(&link_type.name)
            .bind(&link_type.display_name)
            .bind(link_type.source_type_id)
            .bind(link_type.target_type_id)
            .bind(cardinality)
            .bind(&properties)
            .bind(&metadata)
            .bind(link_type.version)
            .bind(link_type.created_at)
            .bind(&link_type.created_by)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    RegistryError::referential_integrity("source or target object type does not exist")
                }
                _ => RegistryError::from(e),
            })?;

            insert_version_snapshot(&mut tx, link_type.id, link_type.version, &row_snapshot(&row)?, None, &link_type.created_by).await?;

            created.push(row.try_into()?);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Update a batch of LinkTypes in a single transaction: all rows and
    /// their snapshots persist, or none do.
    pub async fn batch_update(&self, link_types: &[LinkType]) -> Result<Vec<LinkType>> {
        let mut tx = self.pool.begin().await?;
        let mut updated = Vec::with_capacity(link_types.len());

        for link_type in link_types {
            let properties = serde_json::to_value(&link_type.properties).map_err(|e| RegistryError::storage(e.to_string()))?;
            let metadata = serde_json::to_value(&link_type.metadata).map_err(|e| RegistryError::storage(e.to_string()))?;
            let cardinality = encode_cardinality(link_type.cardinality);

            let row: LinkTypeRow = sqlx::query_as(
                r#"
                UPDATE link_types
                SET display_name = $2, cardinality = $3, properties = $4, metadata = $5, version = $6,
                    updated_at = $7, updated_by = $8
                WHERE id = $1 AND is_deleted = false
                RETURNING *
                "#,
            )
            .bind(link_type.id)
            .bind(&link_type.display_name)
            .bind(cardinality)
            .bind(&properties)
            .bind(&metadata)
            .bind(link_type.version)
            .bind(link_type.updated_at)
            .bind(&link_type.updated_by)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| RegistryError::not_found(format!("link type '{}'", link_type.id)))?;

            insert_version_snapshot(&mut tx, link_type.id, link_type.version, &row_snapshot(&row)?, None, &link_type.updated_by).await?;

            updated.push(row.try_into()?);
        }

        tx.commit().await?;
        Ok(updated)
    }
}

fn row_snapshot(row: &LinkTypeRow) -> Result<serde_json::Value> {
    serde_json::to_value(serde_json::json!({
        "name": row.name,
        "displayName": row.display_name,
        "sourceTypeId": row.source_type_id,
        "targetTypeId": row.target_type_id,
        "cardinality": row.cardinality,
        "properties": row.properties,
        "metadata": row.metadata,
        "version": row.version,
    }))
    .map_err(|e| RegistryError::storage(e.to_string()))
}

async fn insert_version_snapshot(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    owner_id: Uuid,
    version: i64,
    snapshot: &serde_json::Value,
    change_description: Option<&str>,
    actor: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO link_type_versions (owner_id, version, snapshot, change_description, created_at, created_by) VALUES ($1, $2, $3, $4, now(), $5)",
    )
    .bind(owner_id)
    .bind(version)
    .bind(snapshot)
    .bind(change_description)
    .bind(actor)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_fields_cover_cardinality() {
        assert!(SCALAR_FIELDS.contains(&"cardinality"));
    }
}
