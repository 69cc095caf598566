// ==========================================
// 拣选单履约系统 - 计时事件仓储
// ==========================================
// 红线: 事件流只追加,本仓储不提供更新/单条删除
// ==========================================

use rusqlite::{params, Connection, Row};

use crate::domain::time_event::TimeEvent;
use crate::repository::error::RepositoryResult;
use crate::repository::{parse_failure, ts_from_db, ts_to_db};

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<TimeEvent> {
    let kind: String = row.get("kind")?;
    let ts: String = row.get("ts")?;
    Ok(TimeEvent {
        event_id: row.get("event_id")?,
        order_id: row.get("order_id")?,
        actor_id: row.get("actor_id")?,
        kind: kind.parse().map_err(|e: String| parse_failure("kind", &e))?,
        ts: ts_from_db(&ts)?,
    })
}

/// 追加一条计时事件
pub fn append(conn: &Connection, event: &TimeEvent) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT INTO time_event (event_id, order_id, actor_id, kind, ts)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            event.event_id,
            event.order_id,
            event.actor_id,
            event.kind.to_string(),
            ts_to_db(&event.ts),
        ],
    )?;
    Ok(())
}

/// 列出订单全部计时事件
///
/// 排序: 时间戳升序, 同秒内按插入顺序(rowid), 保证因果序稳定
pub fn list_by_order(conn: &Connection, order_id: &str) -> RepositoryResult<Vec<TimeEvent>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT event_id, order_id, actor_id, kind, ts
        FROM time_event
        WHERE order_id = ?1
        ORDER BY ts, rowid
        "#,
    )?;
    let events = stmt
        .query_map(params![order_id], row_to_event)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(events)
}

/// 列出订单中某操作员的计时事件(同序)
pub fn list_by_order_actor(
    conn: &Connection,
    order_id: &str,
    actor_id: &str,
) -> RepositoryResult<Vec<TimeEvent>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT event_id, order_id, actor_id, kind, ts
        FROM time_event
        WHERE order_id = ?1 AND actor_id = ?2
        ORDER BY ts, rowid
        "#,
    )?;
    let events = stmt
        .query_map(params![order_id, actor_id], row_to_event)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(events)
}
