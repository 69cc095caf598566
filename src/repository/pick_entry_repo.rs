// ==========================================
// 拣选单履约系统 - 拣选记录仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::pick_entry::PickEntry;
use crate::domain::types::EntryState;
use crate::repository::error::RepositoryResult;
use crate::repository::{opt_ts_from_db, opt_ts_to_db, parse_failure, ts_from_db, ts_to_db};

const SELECT_COLUMNS: &str = r#"
    entry_id, item_id, trace_code, picked_qty, picker_id, state,
    counted_qty, reject_reason, counter_id, counted_at,
    posted, posted_at, created_at
"#;

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<PickEntry> {
    let state: String = row.get("state")?;
    let created_at: String = row.get("created_at")?;
    Ok(PickEntry {
        entry_id: row.get("entry_id")?,
        item_id: row.get("item_id")?,
        trace_code: row.get("trace_code")?,
        picked_qty: row.get("picked_qty")?,
        picker_id: row.get("picker_id")?,
        state: state
            .parse()
            .map_err(|e: String| parse_failure("state", &e))?,
        counted_qty: row.get("counted_qty")?,
        reject_reason: row.get("reject_reason")?,
        counter_id: row.get("counter_id")?,
        counted_at: opt_ts_from_db(row.get("counted_at")?)?,
        posted: row.get::<_, i64>("posted")? != 0,
        posted_at: opt_ts_from_db(row.get("posted_at")?)?,
        created_at: ts_from_db(&created_at)?,
    })
}

/// 插入拣选记录
pub fn insert(conn: &Connection, entry: &PickEntry) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT INTO pick_entry (
            entry_id, item_id, trace_code, picked_qty, picker_id, state,
            counted_qty, reject_reason, counter_id, counted_at,
            posted, posted_at, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
        params![
            entry.entry_id,
            entry.item_id,
            entry.trace_code,
            entry.picked_qty,
            entry.picker_id,
            entry.state.to_string(),
            entry.counted_qty,
            entry.reject_reason,
            entry.counter_id,
            opt_ts_to_db(&entry.counted_at),
            entry.posted as i64,
            opt_ts_to_db(&entry.posted_at),
            ts_to_db(&entry.created_at),
        ],
    )?;
    Ok(())
}

/// 更新拣选记录(状态/清点/拒绝/过账字段)
pub fn update(conn: &Connection, entry: &PickEntry) -> RepositoryResult<usize> {
    let rows = conn.execute(
        r#"
        UPDATE pick_entry SET
            trace_code = ?2, picked_qty = ?3, state = ?4,
            counted_qty = ?5, reject_reason = ?6, counter_id = ?7,
            counted_at = ?8, posted = ?9, posted_at = ?10
        WHERE entry_id = ?1
        "#,
        params![
            entry.entry_id,
            entry.trace_code,
            entry.picked_qty,
            entry.state.to_string(),
            entry.counted_qty,
            entry.reject_reason,
            entry.counter_id,
            opt_ts_to_db(&entry.counted_at),
            entry.posted as i64,
            opt_ts_to_db(&entry.posted_at),
        ],
    )?;
    Ok(rows)
}

/// 按 ID 查找拣选记录
pub fn find_by_id(conn: &Connection, entry_id: &str) -> RepositoryResult<Option<PickEntry>> {
    let sql = format!("SELECT {} FROM pick_entry WHERE entry_id = ?1", SELECT_COLUMNS);
    let entry = conn
        .query_row(&sql, params![entry_id], row_to_entry)
        .optional()?;
    Ok(entry)
}

/// 列出行项目全部拣选记录(按登记顺序)
pub fn list_by_item(conn: &Connection, item_id: &str) -> RepositoryResult<Vec<PickEntry>> {
    let sql = format!(
        "SELECT {} FROM pick_entry WHERE item_id = ?1 ORDER BY rowid",
        SELECT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let entries = stmt
        .query_map(params![item_id], row_to_entry)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

/// 列出订单全部拣选记录(跨行项目)
pub fn list_by_order(conn: &Connection, order_id: &str) -> RepositoryResult<Vec<PickEntry>> {
    let sql = format!(
        r#"
        SELECT {} FROM pick_entry
        WHERE item_id IN (SELECT item_id FROM line_item WHERE order_id = ?1)
        ORDER BY rowid
        "#,
        SELECT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let entries = stmt
        .query_map(params![order_id], row_to_entry)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

/// 订单内处于指定状态的拣选记录数量
pub fn count_by_order_state(
    conn: &Connection,
    order_id: &str,
    state: EntryState,
) -> RepositoryResult<i64> {
    let count: i64 = conn.query_row(
        r#"
        SELECT COUNT(*) FROM pick_entry
        WHERE state = ?2
          AND item_id IN (SELECT item_id FROM line_item WHERE order_id = ?1)
        "#,
        params![order_id, state.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// 删除拣选记录
pub fn delete(conn: &Connection, entry_id: &str) -> RepositoryResult<usize> {
    let rows = conn.execute(
        "DELETE FROM pick_entry WHERE entry_id = ?1",
        params![entry_id],
    )?;
    Ok(rows)
}
