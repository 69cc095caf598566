// ==========================================
// 拣选单履约系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================
// 说明: 仓储函数接收注入的 &Connection (事务 Deref 亦可),
//       使单条命令的工作单元可以横跨多个仓储
// ==========================================

pub mod actor_repo;
pub mod error;
pub mod line_item_repo;
pub mod order_repo;
pub mod pick_entry_repo;
pub mod time_event_repo;

pub use error::{RepositoryError, RepositoryResult};

use chrono::{DateTime, NaiveDateTime, Utc};

/// 时间戳的数据库统一存储格式 (UTC)
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 时间戳 -> 数据库文本
pub(crate) fn ts_to_db(ts: &DateTime<Utc>) -> String {
    ts.format(TS_FORMAT).to_string()
}

/// 可选时间戳 -> 数据库文本
pub(crate) fn opt_ts_to_db(ts: &Option<DateTime<Utc>>) -> Option<String> {
    ts.as_ref().map(ts_to_db)
}

/// 数据库文本 -> 时间戳(在行映射闭包内使用,错误归入 rusqlite 转换失败)
pub(crate) fn ts_from_db(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TS_FORMAT)
        .map(|n| n.and_utc())
        .map_err(|e| parse_failure("timestamp", &e.to_string()))
}

/// 数据库可选文本 -> 可选时间戳
pub(crate) fn opt_ts_from_db(s: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match s {
        Some(v) => ts_from_db(&v).map(Some),
        None => Ok(None),
    }
}

/// 行映射闭包内的枚举/时间戳解析失败统一包装
pub(crate) fn parse_failure(field: &str, message: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        format!("{}: {}", field, message).into(),
    )
}
