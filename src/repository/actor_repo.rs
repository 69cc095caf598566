// ==========================================
// 拣选单履约系统 - 操作员仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::actor::Actor;
use crate::repository::error::RepositoryResult;
use crate::repository::{parse_failure, ts_from_db, ts_to_db};

fn row_to_actor(row: &Row<'_>) -> rusqlite::Result<Actor> {
    let role: String = row.get("role")?;
    let created_at: String = row.get("created_at")?;
    Ok(Actor {
        actor_id: row.get("actor_id")?,
        display_name: row.get("display_name")?,
        role: role.parse().map_err(|e: String| parse_failure("role", &e))?,
        created_at: ts_from_db(&created_at)?,
    })
}

/// 插入操作员
pub fn insert(conn: &Connection, actor: &Actor) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT INTO actor (actor_id, display_name, role, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            actor.actor_id,
            actor.display_name,
            actor.role.to_string(),
            ts_to_db(&actor.created_at),
        ],
    )?;
    Ok(())
}

/// 按 ID 查找操作员
pub fn find_by_id(conn: &Connection, actor_id: &str) -> RepositoryResult<Option<Actor>> {
    let actor = conn
        .query_row(
            "SELECT actor_id, display_name, role, created_at FROM actor WHERE actor_id = ?1",
            params![actor_id],
            row_to_actor,
        )
        .optional()?;
    Ok(actor)
}

/// 按显示名查找操作员(显示名唯一)
pub fn find_by_name(conn: &Connection, display_name: &str) -> RepositoryResult<Option<Actor>> {
    let actor = conn
        .query_row(
            "SELECT actor_id, display_name, role, created_at FROM actor WHERE display_name = ?1",
            params![display_name],
            row_to_actor,
        )
        .optional()?;
    Ok(actor)
}

/// 列出全部操作员(按创建时间)
pub fn list_all(conn: &Connection) -> RepositoryResult<Vec<Actor>> {
    let mut stmt = conn.prepare(
        "SELECT actor_id, display_name, role, created_at FROM actor ORDER BY created_at, actor_id",
    )?;
    let actors = stmt
        .query_map([], row_to_actor)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(actors)
}

/// 操作员是否拥有历史引用(计时事件或拣选记录)
pub fn has_history(conn: &Connection, actor_id: &str) -> RepositoryResult<bool> {
    let events: i64 = conn.query_row(
        "SELECT COUNT(*) FROM time_event WHERE actor_id = ?1",
        params![actor_id],
        |row| row.get(0),
    )?;
    if events > 0 {
        return Ok(true);
    }
    let entries: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pick_entry WHERE picker_id = ?1 OR counter_id = ?1",
        params![actor_id],
        |row| row.get(0),
    )?;
    Ok(entries > 0)
}

/// 删除操作员
///
/// # 返回
/// - Ok(rows): 被删除的行数(0 表示不存在)
pub fn delete(conn: &Connection, actor_id: &str) -> RepositoryResult<usize> {
    let rows = conn.execute("DELETE FROM actor WHERE actor_id = ?1", params![actor_id])?;
    Ok(rows)
}
