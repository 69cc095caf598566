// ==========================================
// 拣选单履约系统 - 订单仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::order::Order;
use crate::domain::types::OrderStage;
use crate::repository::error::RepositoryResult;
use crate::repository::{opt_ts_from_db, opt_ts_to_db, parse_failure, ts_from_db, ts_to_db};

const SELECT_COLUMNS: &str = r#"
    order_id, order_no, order_date, stage, created_at,
    picking_started_at, picking_ended_at, counting_ended_at, completed_at
"#;

fn row_to_order(row: &Row<'_>) -> rusqlite::Result<Order> {
    let stage: String = row.get("stage")?;
    let created_at: String = row.get("created_at")?;
    Ok(Order {
        order_id: row.get("order_id")?,
        order_no: row.get("order_no")?,
        order_date: row.get("order_date")?,
        stage: stage
            .parse()
            .map_err(|e: String| parse_failure("stage", &e))?,
        created_at: ts_from_db(&created_at)?,
        picking_started_at: opt_ts_from_db(row.get("picking_started_at")?)?,
        picking_ended_at: opt_ts_from_db(row.get("picking_ended_at")?)?,
        counting_ended_at: opt_ts_from_db(row.get("counting_ended_at")?)?,
        completed_at: opt_ts_from_db(row.get("completed_at")?)?,
    })
}

/// 插入订单
pub fn insert(conn: &Connection, order: &Order) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT INTO pick_order (
            order_id, order_no, order_date, stage, created_at,
            picking_started_at, picking_ended_at, counting_ended_at, completed_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            order.order_id,
            order.order_no,
            order.order_date,
            order.stage.to_string(),
            ts_to_db(&order.created_at),
            opt_ts_to_db(&order.picking_started_at),
            opt_ts_to_db(&order.picking_ended_at),
            opt_ts_to_db(&order.counting_ended_at),
            opt_ts_to_db(&order.completed_at),
        ],
    )?;
    Ok(())
}

/// 更新订单阶段与转换时间戳
pub fn update(conn: &Connection, order: &Order) -> RepositoryResult<usize> {
    let rows = conn.execute(
        r#"
        UPDATE pick_order SET
            stage = ?2,
            picking_started_at = ?3,
            picking_ended_at = ?4,
            counting_ended_at = ?5,
            completed_at = ?6
        WHERE order_id = ?1
        "#,
        params![
            order.order_id,
            order.stage.to_string(),
            opt_ts_to_db(&order.picking_started_at),
            opt_ts_to_db(&order.picking_ended_at),
            opt_ts_to_db(&order.counting_ended_at),
            opt_ts_to_db(&order.completed_at),
        ],
    )?;
    Ok(rows)
}

/// 按 ID 查找订单
pub fn find_by_id(conn: &Connection, order_id: &str) -> RepositoryResult<Option<Order>> {
    let sql = format!("SELECT {} FROM pick_order WHERE order_id = ?1", SELECT_COLUMNS);
    let order = conn
        .query_row(&sql, params![order_id], row_to_order)
        .optional()?;
    Ok(order)
}

/// 按外部单号查找订单
pub fn find_by_order_no(conn: &Connection, order_no: &str) -> RepositoryResult<Option<Order>> {
    let sql = format!("SELECT {} FROM pick_order WHERE order_no = ?1", SELECT_COLUMNS);
    let order = conn
        .query_row(&sql, params![order_no], row_to_order)
        .optional()?;
    Ok(order)
}

/// 按阶段列出订单(按创建时间倒序)
pub fn list_by_stage(conn: &Connection, stage: OrderStage) -> RepositoryResult<Vec<Order>> {
    let sql = format!(
        "SELECT {} FROM pick_order WHERE stage = ?1 ORDER BY created_at DESC, order_id",
        SELECT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let orders = stmt
        .query_map(params![stage.to_string()], row_to_order)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(orders)
}

/// 删除订单(行项目/拣选记录/计时事件随外键级联删除)
pub fn delete(conn: &Connection, order_id: &str) -> RepositoryResult<usize> {
    let rows = conn.execute(
        "DELETE FROM pick_order WHERE order_id = ?1",
        params![order_id],
    )?;
    Ok(rows)
}
