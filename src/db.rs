// ==========================================
// 拣选单履约系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为(外键/busy_timeout)
// - 统一建库 schema,写入 schema_version
// - 提供 Database 句柄: 每条命令一个显式事务(工作单元)
// ==========================================

use rusqlite::{Connection, Transaction};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::repository::error::{RepositoryError, RepositoryResult};

/// 默认 busy_timeout(毫秒)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema(幂等)
///
/// 五张表: actor / pick_order / line_item / pick_entry / time_event
/// 级联规则:
/// - 删除订单级联删除行项目、拣选记录、计时事件
/// - 操作员被历史引用时禁止删除(RESTRICT 兜底,业务层先行校验)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS actor (
            actor_id TEXT PRIMARY KEY,
            display_name TEXT NOT NULL UNIQUE,
            role TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS pick_order (
            order_id TEXT PRIMARY KEY,
            order_no TEXT NOT NULL UNIQUE,
            order_date TEXT NOT NULL,
            stage TEXT NOT NULL,
            created_at TEXT NOT NULL,
            picking_started_at TEXT,
            picking_ended_at TEXT,
            counting_ended_at TEXT,
            completed_at TEXT
        );

        CREATE TABLE IF NOT EXISTS line_item (
            item_id TEXT PRIMARY KEY,
            order_id TEXT NOT NULL
                REFERENCES pick_order(order_id) ON DELETE CASCADE,
            code TEXT NOT NULL,
            description TEXT NOT NULL,
            unit TEXT NOT NULL,
            requested_qty REAL NOT NULL CHECK (requested_qty > 0),
            justification TEXT,
            manually_added INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_line_item_order
            ON line_item(order_id);

        CREATE TABLE IF NOT EXISTS pick_entry (
            entry_id TEXT PRIMARY KEY,
            item_id TEXT NOT NULL
                REFERENCES line_item(item_id) ON DELETE CASCADE,
            trace_code TEXT NOT NULL,
            picked_qty REAL NOT NULL CHECK (picked_qty > 0),
            picker_id TEXT NOT NULL REFERENCES actor(actor_id),
            state TEXT NOT NULL,
            counted_qty REAL,
            reject_reason TEXT,
            counter_id TEXT REFERENCES actor(actor_id),
            counted_at TEXT,
            posted INTEGER NOT NULL DEFAULT 0,
            posted_at TEXT,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_pick_entry_item
            ON pick_entry(item_id);

        CREATE TABLE IF NOT EXISTS time_event (
            event_id TEXT PRIMARY KEY,
            order_id TEXT NOT NULL
                REFERENCES pick_order(order_id) ON DELETE CASCADE,
            actor_id TEXT NOT NULL REFERENCES actor(actor_id),
            kind TEXT NOT NULL,
            ts TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_time_event_order
            ON time_event(order_id, actor_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

// ==========================================
// Database - 共享存储句柄 + 工作单元
// ==========================================

/// 共享存储句柄
///
/// 单一权威存储: 所有命令经由 `with_transaction` 在同一个连接上
/// 以"每条命令一个事务"的方式执行,避免并发命令部分交错
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// 打开数据库文件并初始化 schema
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 打开内存数据库(测试用)
    pub fn open_in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        configure_sqlite_connection(&conn)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 在单个事务内执行一条命令(工作单元)
    ///
    /// 闭包返回 Ok 则提交, 返回 Err 则回滚 —— 被拒绝的命令
    /// 不得留下任何部分写入
    pub fn with_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let result = f(&tx)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(result)
    }

    /// 只读访问(查询型读模型; 不开事务)
    pub fn with_connection<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&Connection) -> Result<T, E>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        f(&conn)
    }
}
