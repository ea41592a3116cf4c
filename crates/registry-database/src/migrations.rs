//! Schema migration runner. Migration files live under `migrations/` in
//! this crate and are embedded at compile time so the registry never
//! depends on a filesystem layout at deploy time.

use registry_error::Result;
use sqlx::PgPool;

/// One embedded migration: a stable version string and the SQL to run.
struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20260101000001_object_types",
        sql: include_str!("../migrations/20260101000001_object_types.sql"),
    },
    Migration {
        version: "20260101000002_link_types",
        sql: include_str!("../migrations/20260101000002_link_types.sql"),
    },
    Migration {
        version: "20260101000003_versions",
        sql: include_str!("../migrations/20260101000003_versions.sql"),
    },
    Migration {
        version: "20260101000004_search_vectors",
        sql: include_str!("../migrations/20260101000004_search_vectors.sql"),
    },
];

pub struct MigrationRunner;

impl MigrationRunner {
    /// Run every embedded migration that hasn't already been recorded,
    /// in ascending version order, each inside its own transaction.
    pub async fn run(pool: &PgPool) -> Result<()> {
        Self::create_migrations_table(pool).await?;

        for migration in MIGRATIONS {
            if !Self::is_applied(pool, migration.version).await? {
                Self::apply(pool, migration).await?;
                tracing::info!(version = migration.version, "applied migration");
            }
        }

        Ok(())
    }

    async fn create_migrations_table(pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version VARCHAR(255) PRIMARY KEY,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn is_applied(pool: &PgPool, version: &str) -> Result<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = $1)")
                .bind(version)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    async fn apply(pool: &PgPool, migration: &Migration) -> Result<()> {
        let mut tx = pool.begin().await?;

        for statement in split_statements(migration.sql) {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        sqlx::query("INSERT INTO schema_migrations (version) VALUES ($1)")
            .bind(migration.version)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Split a migration file on `;` statement terminators, treating anything
/// between a pair of `$$` markers (a plpgsql function body) as opaque so a
/// semicolon inside a trigger function doesn't split the statement early.
fn split_statements(sql: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut start = 0;
    let mut in_dollar_quote = false;
    let bytes = sql.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'$' && i + 1 < bytes.len() && bytes[i + 1] == b'$' {
            in_dollar_quote = !in_dollar_quote;
            i += 2;
            continue;
        }
        if bytes[i] == b';' && !in_dollar_quote {
            let statement = sql[start..i].trim();
            if !statement.is_empty() {
                statements.push(statement);
            }
            start = i + 1;
        }
        i += 1;
    }

    let tail = sql[start..].trim();
    if !tail.is_empty() {
        statements.push(tail);
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_multiple_statements() {
        let sql = "CREATE TABLE a (id int);\nCREATE TABLE b (id int);\n";
        assert_eq!(split_statements(sql).len(), 2);
    }

    #[test]
    fn dollar_quoted_function_body_stays_one_statement() {
        let sql = "CREATE FUNCTION f() RETURNS trigger AS $$\nBEGIN\n  NEW.x := 1;\n  RETURN NEW;\nEND;\n$$ LANGUAGE plpgsql;\nCREATE INDEX idx ON t (x);";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("BEGIN"));
    }

    #[test]
    fn embedded_migrations_are_nonempty() {
        for migration in MIGRATIONS {
            assert!(!migration.sql.trim().is_empty(), "{} is empty", migration.version);
        }
    }
}
