// ==========================================
// 拣选单履约系统 - 读模型 API
// ==========================================
// 职责: 看板分组与整单快照(供 UI 展示与导出协作方消费)
// 保证: 快照内部一致(行项目汇总与记录明细匹配),不做格式化
// ==========================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::api::error::{ApiError, ApiResult};
use crate::api::fulfillment_api::load_items_with_entries;
use crate::config::GatePolicy;
use crate::db::Database;
use crate::domain::types::{EntryState, FillStatus, LedgerStatus, OrderStage};
use crate::engine::{reconciliation, time_ledger};
use crate::repository::{actor_repo, order_repo, time_event_repo};

// ==========================================
// 读模型结构
// ==========================================

/// 看板上的订单摘要
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub order_no: String,
    pub order_date: String,
    pub stage: OrderStage,
    pub created_at: DateTime<Utc>,
}

/// 看板视图: 按阶段分组(源系统的四列看板)
#[derive(Debug, Clone, Serialize)]
pub struct OrderBoard {
    pub validation: Vec<OrderSummary>,
    pub released: Vec<OrderSummary>,
    pub active: Vec<OrderSummary>,
    pub completed: Vec<OrderSummary>,
}

/// 快照中的拣选记录明细
#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    pub entry_id: String,
    pub trace_code: String,
    pub picked_qty: f64,
    pub picker_id: String,
    pub state: EntryState,
    pub counted_qty: Option<f64>,
    pub reject_reason: Option<String>,
    pub posted: bool,
}

/// 快照中的行项目汇总
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub item_id: String,
    pub code: String,
    pub description: String,
    pub unit: String,
    pub requested_qty: f64,
    pub picked_qty: f64,
    pub fill_status: FillStatus,
    pub manually_added: bool,
    pub justification: Option<String>,
    pub requires_justification: bool,
    pub entries: Vec<EntryReport>,
}

/// 快照中的操作员计时汇总
#[derive(Debug, Clone, Serialize)]
pub struct ActorLedgerReport {
    pub actor_id: String,
    pub display_name: String,
    pub total_seconds: i64,
    /// HH:MM:SS 展示格式
    pub formatted: String,
    pub status: LedgerStatus,
}

/// 整单快照(导出协作方的唯一输入)
#[derive(Debug, Clone, Serialize)]
pub struct OrderReport {
    pub order_id: String,
    pub order_no: String,
    pub order_date: String,
    pub stage: OrderStage,
    pub items: Vec<ItemReport>,
    pub ledger: Vec<ActorLedgerReport>,
    /// 团队累计工时(全部操作员之和,秒)
    pub team_total_seconds: i64,
    /// 校验窗口: 拣选收尾 -> 完成(秒)
    pub validation_window_seconds: Option<i64>,
    /// 总前置时间: 导入 -> 完成(秒)
    pub lead_time_seconds: Option<i64>,
    /// 当前完成门禁阻塞原因(完成后为空)
    pub gate: Vec<String>,
}

// ==========================================
// ReportApi - 读模型 API
// ==========================================

/// 读模型 API
///
/// 纯查询: 不修改任何实体,不开写事务
pub struct ReportApi {
    db: Database,
    policy: GatePolicy,
}

impl ReportApi {
    pub fn new(db: Database, policy: GatePolicy) -> Self {
        Self { db, policy }
    }

    /// 看板: 按阶段分组的订单列表
    pub fn order_board(&self) -> ApiResult<OrderBoard> {
        self.db.with_connection(|conn| {
            let summarize = |stage: OrderStage| -> ApiResult<Vec<OrderSummary>> {
                Ok(order_repo::list_by_stage(conn, stage)?
                    .into_iter()
                    .map(|o| OrderSummary {
                        order_id: o.order_id,
                        order_no: o.order_no,
                        order_date: o.order_date,
                        stage: o.stage,
                        created_at: o.created_at,
                    })
                    .collect())
            };
            Ok(OrderBoard {
                validation: summarize(OrderStage::Validation)?,
                released: summarize(OrderStage::Released)?,
                active: summarize(OrderStage::Active)?,
                completed: summarize(OrderStage::Completed)?,
            })
        })
    }

    /// 整单快照
    ///
    /// as_of 用于计算进行中计时区间的实时尾巴
    pub fn order_report(&self, order_id: &str, as_of: DateTime<Utc>) -> ApiResult<OrderReport> {
        self.db.with_connection(|conn| {
            let order = order_repo::find_by_id(conn, order_id)?
                .ok_or_else(|| ApiError::NotFound(format!("订单 {}", order_id)))?;

            let items_with_entries = load_items_with_entries(conn, order_id)?;
            let gate = reconciliation::order_gate(&items_with_entries, &self.policy);

            let items = items_with_entries
                .iter()
                .map(|(item, entries)| {
                    let picked = reconciliation::picked_total(entries);
                    ItemReport {
                        item_id: item.item_id.clone(),
                        code: item.code.clone(),
                        description: item.description.clone(),
                        unit: item.unit.clone(),
                        requested_qty: item.requested_qty,
                        picked_qty: picked,
                        fill_status: reconciliation::fill_status(item.requested_qty, picked),
                        manually_added: item.manually_added,
                        justification: item.justification.clone(),
                        requires_justification: reconciliation::requires_justification(
                            item, entries,
                        ),
                        entries: entries
                            .iter()
                            .map(|e| EntryReport {
                                entry_id: e.entry_id.clone(),
                                trace_code: e.trace_code.clone(),
                                picked_qty: e.picked_qty,
                                picker_id: e.picker_id.clone(),
                                state: e.state,
                                counted_qty: e.counted_qty,
                                reject_reason: e.reject_reason.clone(),
                                posted: e.posted,
                            })
                            .collect(),
                    }
                })
                .collect();

            // 计时汇总
            let events = time_event_repo::list_by_order(conn, order_id)?;
            let totals = time_ledger::compute_totals(&events, as_of);
            let names: HashMap<String, String> = actor_repo::list_all(conn)?
                .into_iter()
                .map(|a| (a.actor_id, a.display_name))
                .collect();

            let mut ledger: Vec<ActorLedgerReport> = totals
                .into_iter()
                .map(|(actor_id, clock)| ActorLedgerReport {
                    display_name: names
                        .get(&actor_id)
                        .cloned()
                        .unwrap_or_else(|| actor_id.clone()),
                    actor_id,
                    total_seconds: clock.total.num_seconds(),
                    formatted: time_ledger::format_duration(clock.total),
                    status: clock.status,
                })
                .collect();
            ledger.sort_by(|a, b| a.display_name.cmp(&b.display_name));
            let team_total_seconds = ledger.iter().map(|l| l.total_seconds).sum();

            // 源系统的派生指标: 校验窗口与总前置时间
            let validation_window_seconds = match (order.picking_ended_at, order.completed_at) {
                (Some(start), Some(end)) => Some((end - start).num_seconds().max(0)),
                _ => None,
            };
            let lead_time_seconds = order
                .completed_at
                .map(|end| (end - order.created_at).num_seconds().max(0));

            Ok(OrderReport {
                order_id: order.order_id,
                order_no: order.order_no,
                order_date: order.order_date,
                stage: order.stage,
                items,
                ledger,
                team_total_seconds,
                validation_window_seconds,
                lead_time_seconds,
                gate: gate.iter().map(|r| r.to_string()).collect(),
            })
        })
    }
}
