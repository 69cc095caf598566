// ==========================================
// 拣选单履约系统 - 行项目仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::order::LineItem;
use crate::repository::error::RepositoryResult;
use crate::repository::{ts_from_db, ts_to_db};

const SELECT_COLUMNS: &str = r#"
    item_id, order_id, code, description, unit, requested_qty,
    justification, manually_added, created_at
"#;

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<LineItem> {
    let created_at: String = row.get("created_at")?;
    Ok(LineItem {
        item_id: row.get("item_id")?,
        order_id: row.get("order_id")?,
        code: row.get("code")?,
        description: row.get("description")?,
        unit: row.get("unit")?,
        requested_qty: row.get("requested_qty")?,
        justification: row.get("justification")?,
        manually_added: row.get::<_, i64>("manually_added")? != 0,
        created_at: ts_from_db(&created_at)?,
    })
}

/// 插入行项目
pub fn insert(conn: &Connection, item: &LineItem) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT INTO line_item (
            item_id, order_id, code, description, unit, requested_qty,
            justification, manually_added, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            item.item_id,
            item.order_id,
            item.code,
            item.description,
            item.unit,
            item.requested_qty,
            item.justification,
            item.manually_added as i64,
            ts_to_db(&item.created_at),
        ],
    )?;
    Ok(())
}

/// 更新行项目(代码/描述/单位/需求数量/偏差说明)
pub fn update(conn: &Connection, item: &LineItem) -> RepositoryResult<usize> {
    let rows = conn.execute(
        r#"
        UPDATE line_item SET
            code = ?2, description = ?3, unit = ?4,
            requested_qty = ?5, justification = ?6
        WHERE item_id = ?1
        "#,
        params![
            item.item_id,
            item.code,
            item.description,
            item.unit,
            item.requested_qty,
            item.justification,
        ],
    )?;
    Ok(rows)
}

/// 按 ID 查找行项目
pub fn find_by_id(conn: &Connection, item_id: &str) -> RepositoryResult<Option<LineItem>> {
    let sql = format!("SELECT {} FROM line_item WHERE item_id = ?1", SELECT_COLUMNS);
    let item = conn
        .query_row(&sql, params![item_id], row_to_item)
        .optional()?;
    Ok(item)
}

/// 列出订单全部行项目(保持导入顺序)
pub fn list_by_order(conn: &Connection, order_id: &str) -> RepositoryResult<Vec<LineItem>> {
    let sql = format!(
        "SELECT {} FROM line_item WHERE order_id = ?1 ORDER BY rowid",
        SELECT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map(params![order_id], row_to_item)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(items)
}

/// 订单行项目数量
pub fn count_by_order(conn: &Connection, order_id: &str) -> RepositoryResult<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM line_item WHERE order_id = ?1",
        params![order_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// 删除行项目(拣选记录随外键级联删除)
pub fn delete(conn: &Connection, item_id: &str) -> RepositoryResult<usize> {
    let rows = conn.execute("DELETE FROM line_item WHERE item_id = ?1", params![item_id])?;
    Ok(rows)
}
