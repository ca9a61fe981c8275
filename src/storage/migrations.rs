//! 数据库迁移
//!
//! 已执行的版本记录在 `schema_migrations` 表中，只执行版本号大于当前版本的迁移。
//! 每个迁移与它的版本记录在同一个 `BEGIN IMMEDIATE` 事务中提交，
//! 失败时整体回滚，重复运行是幂等的。

use rusqlite::{params, Connection, Transaction, TransactionBehavior};

use crate::storage::{StorageError, StorageResult};

/// 当前数据库 schema 版本
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// 单个迁移：版本号、描述、SQL
struct Migration {
    version: i32,
    name: &'static str,
    sql: &'static str,
}

/// 按版本号升序排列
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "键值存储表",
    sql: r#"
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
}];

/// 运行尚未应用的迁移，返回迁移后的版本号
pub fn run_migrations(conn: &Connection) -> StorageResult<i32> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        );
        "#,
    )
    .map_err(|e| StorageError::Migration(format!("cannot create schema_migrations: {}", e)))?;

    let mut version = get_current_version(conn)?;
    tracing::debug!(current = version, target = CURRENT_SCHEMA_VERSION, "checking schema version");

    for migration in MIGRATIONS.iter().filter(move |m| m.version > version) {
        tracing::info!(version = migration.version, name = migration.name, "running migration");
        apply(conn, migration).map_err(|e| {
            tracing::error!(version = migration.version, error = %e, "migration failed");
            StorageError::Migration(format!("v{} failed: {}", migration.version, e))
        })?;
        version = migration.version;
    }

    Ok(version)
}

/// 当前 schema 版本，没有迁移记录时为 0
///
/// 要求 `schema_migrations` 表已存在（[`run_migrations`] 会创建它）。
pub fn get_current_version(conn: &Connection) -> StorageResult<i32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn apply(conn: &Connection, migration: &Migration) -> rusqlite::Result<()> {
    // 未提交的事务在 drop 时自动回滚
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute_batch(migration.sql)?;
    tx.execute(
        "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
        params![migration.version, migration.name, chrono::Utc::now().to_rfc3339()],
    )?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get(0),
        )
        .unwrap()
    }

    fn recorded_versions(conn: &Connection) -> Vec<(i32, String)> {
        let mut stmt = conn
            .prepare("SELECT version, name FROM schema_migrations ORDER BY version")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_migrations_are_ordered() {
        assert!(MIGRATIONS.windows(2).all(|w| w[0].version < w[1].version));
        assert_eq!(MIGRATIONS.last().map(|m| m.version), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_initial_migration() {
        let conn = Connection::open_in_memory().unwrap();

        assert_eq!(run_migrations(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
        assert_eq!(get_current_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
        assert!(table_exists(&conn, "kv_store"));
        assert_eq!(recorded_versions(&conn), vec![(1, "键值存储表".to_string())]);
    }

    #[test]
    fn test_idempotent_migration() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        assert_eq!(run_migrations(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
        assert_eq!(recorded_versions(&conn).len(), 1);
    }

    #[test]
    fn test_current_version_requires_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(get_current_version(&conn).is_err());
    }
}
