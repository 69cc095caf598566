// ==========================================
// 拣选单履约系统 - 履约命令面 (Workflow Orchestrator)
// ==========================================
// 职责: 对外命令入口,逐条路由到所属引擎
// 约束: 每条命令 = 一个原子工作单元(事务),拒绝即整体回滚
// 约束: 当前时间由调用方显式注入,单条命令内只读一次
// ==========================================

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{self, RawLineRow, RejectedRow};
use crate::config::GatePolicy;
use crate::db::Database;
use crate::domain::order::{LineItem, Order};
use crate::domain::pick_entry::PickEntry;
use crate::domain::time_event::TimeEvent;
use crate::domain::types::{qty_eq, EntryState, OrderStage, TimeEventKind};
use crate::engine::{reconciliation, state_machine, time_ledger};
use crate::repository::{
    actor_repo, line_item_repo, order_repo, pick_entry_repo, time_event_repo,
};

// ==========================================
// 命令输入/输出结构
// ==========================================

/// 导入协作方提交的整单数据
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSubmission {
    pub order_no: String,
    pub order_date: String,
    pub lines: Vec<RawLineRow>,
}

/// 导入结果: 逐行拒绝明细随单返回
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub order_id: String,
    pub order_no: String,
    pub imported: usize,
    pub rejected: Vec<RejectedRow>,
}

/// 校验阶段的行项目编辑
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineEdit {
    /// 手工新增(manually_added 置位)
    Add {
        code: String,
        description: String,
        unit: String,
        requested_qty: f64,
    },
    Update {
        item_id: String,
        code: String,
        description: String,
        unit: String,
        requested_qty: f64,
    },
    Remove { item_id: String },
}

// ==========================================
// FulfillmentApi - 履约命令面
// ==========================================

/// 履约命令面
///
/// 持有共享存储句柄与完成门禁策略; 所有命令显式接收
/// 操作者身份与当前时间
pub struct FulfillmentApi {
    db: Database,
    policy: GatePolicy,
}

impl FulfillmentApi {
    pub fn new(db: Database, policy: GatePolicy) -> Self {
        Self { db, policy }
    }

    pub fn gate_policy(&self) -> GatePolicy {
        self.policy
    }

    // ==========================================
    // 导入与校验阶段
    // ==========================================

    /// 导入订单: 创建 VALIDATION 阶段订单及行项目
    ///
    /// 畸形行逐行拒绝; 空单号/重复单号/无有效行 => ValidationError
    pub fn import_order(
        &self,
        submission: OrderSubmission,
        actor_id: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<ImportOutcome> {
        let order_no = submission.order_no.trim().to_string();
        if order_no.is_empty() {
            return Err(ApiError::ValidationError("外部单号不能为空".to_string()));
        }

        let (valid, rejected) = validator::validate_rows(&submission.lines);
        if valid.is_empty() {
            return Err(ApiError::ValidationError(format!(
                "没有可导入的行项目 (拒绝 {} 行)",
                rejected.len()
            )));
        }

        self.db.with_transaction(|tx| {
            ensure_actor(tx, actor_id)?;
            if order_repo::find_by_order_no(tx, &order_no)?.is_some() {
                return Err(ApiError::ValidationError(format!(
                    "外部单号已存在: {}",
                    order_no
                )));
            }

            let order = Order::new(&order_no, submission.order_date.trim(), now);
            order_repo::insert(tx, &order)?;
            for line in &valid {
                let item = LineItem::new(
                    &order.order_id,
                    &line.code,
                    &line.description,
                    &line.unit,
                    line.requested_qty,
                    false,
                    now,
                );
                line_item_repo::insert(tx, &item)?;
            }

            info!(
                order_no = %order_no,
                actor_id = %actor_id,
                imported = valid.len(),
                rejected = rejected.len(),
                "订单导入完成"
            );
            Ok(ImportOutcome {
                order_id: order.order_id,
                order_no,
                imported: valid.len(),
                rejected,
            })
        })
    }

    /// 校验阶段编辑行项目(新增/更新/删除)
    ///
    /// 仅 VALIDATION 阶段合法; 新增行标记 manually_added
    pub fn edit_during_validation(
        &self,
        order_id: &str,
        edits: Vec<LineEdit>,
        actor_id: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<()> {
        self.db.with_transaction(|tx| {
            ensure_actor(tx, actor_id)?;
            let order = get_order(tx, order_id)?;
            if !state_machine::can_edit_lines(order.stage) {
                return Err(ApiError::StateError(format!(
                    "订单 {} 处于 {} 阶段,行项目不可编辑",
                    order.order_no, order.stage
                )));
            }

            for edit in edits {
                match edit {
                    LineEdit::Add {
                        code,
                        description,
                        unit,
                        requested_qty,
                    } => {
                        check_line_fields(&code, requested_qty)?;
                        let unit = if unit.trim().is_empty() {
                            validator::DEFAULT_UNIT.to_string()
                        } else {
                            unit.trim().to_string()
                        };
                        let item = LineItem::new(
                            order_id,
                            code.trim(),
                            description.trim(),
                            &unit,
                            requested_qty,
                            true,
                            now,
                        );
                        line_item_repo::insert(tx, &item)?;
                    }
                    LineEdit::Update {
                        item_id,
                        code,
                        description,
                        unit,
                        requested_qty,
                    } => {
                        check_line_fields(&code, requested_qty)?;
                        let mut item = get_item_of_order(tx, &item_id, order_id)?;
                        item.code = code.trim().to_string();
                        item.description = description.trim().to_string();
                        item.unit = unit.trim().to_string();
                        item.requested_qty = requested_qty;
                        line_item_repo::update(tx, &item)?;
                    }
                    LineEdit::Remove { item_id } => {
                        let item = get_item_of_order(tx, &item_id, order_id)?;
                        line_item_repo::delete(tx, &item.item_id)?;
                    }
                }
            }
            debug!(order_id = %order_id, "校验阶段行项目编辑完成");
            Ok(())
        })
    }

    /// 释放: VALIDATION -> RELEASED; 行项目为空拒绝释放
    pub fn release(&self, order_id: &str, actor_id: &str, _now: DateTime<Utc>) -> ApiResult<()> {
        self.db.with_transaction(|tx| {
            ensure_actor(tx, actor_id)?;
            let mut order = get_order(tx, order_id)?;
            if !state_machine::can_release(order.stage) {
                return Err(ApiError::StateError(format!(
                    "订单 {} 处于 {} 阶段,不可释放",
                    order.order_no, order.stage
                )));
            }
            if line_item_repo::count_by_order(tx, order_id)? == 0 {
                return Err(ApiError::StateError(format!(
                    "订单 {} 没有行项目,不可释放",
                    order.order_no
                )));
            }
            state_machine::apply_release(&mut order);
            order_repo::update(tx, &order)?;
            info!(order_no = %order.order_no, actor_id = %actor_id, "订单已释放");
            Ok(())
        })
    }

    // ==========================================
    // 计时命令 (Time Ledger)
    // ==========================================

    /// 开始/恢复计时
    ///
    /// 首个 RESUME 隐式触发 RELEASED -> ACTIVE;
    /// 双击重复 RESUME 被容忍(未封闭区间被丢弃,不报错)
    pub fn record_resume(
        &self,
        order_id: &str,
        actor_id: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<()> {
        self.db.with_transaction(|tx| {
            let mut order = get_order(tx, order_id)?;
            ensure_actor(tx, actor_id)?;
            if !state_machine::can_record_time(order.stage) {
                return Err(ApiError::StateError(format!(
                    "订单 {} 处于 {} 阶段,不接受计时",
                    order.order_no, order.stage
                )));
            }

            let events = time_event_repo::list_by_order_actor(tx, order_id, actor_id)?;
            if time_ledger::is_running(&events, actor_id) {
                warn!(
                    order_id = %order_id,
                    actor_id = %actor_id,
                    "重复 RESUME: 上一未封闭区间将被丢弃"
                );
            }
            time_event_repo::append(
                tx,
                &TimeEvent::new(order_id, actor_id, TimeEventKind::Resume, now),
            )?;

            state_machine::begin_picking(&mut order, now);
            order_repo::update(tx, &order)?;
            Ok(())
        })
    }

    /// 暂停计时
    ///
    /// 无未封闭区间时静默接受(不追加事件,不影响累计)
    pub fn record_pause(
        &self,
        order_id: &str,
        actor_id: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<()> {
        self.db.with_transaction(|tx| {
            let order = get_order(tx, order_id)?;
            ensure_actor(tx, actor_id)?;
            if !state_machine::can_record_time(order.stage) {
                return Err(ApiError::StateError(format!(
                    "订单 {} 处于 {} 阶段,不接受计时",
                    order.order_no, order.stage
                )));
            }

            let events = time_event_repo::list_by_order_actor(tx, order_id, actor_id)?;
            if !time_ledger::is_running(&events, actor_id) {
                debug!(
                    order_id = %order_id,
                    actor_id = %actor_id,
                    "PAUSE 无前置 RESUME,静默忽略"
                );
                return Ok(());
            }
            time_event_repo::append(
                tx,
                &TimeEvent::new(order_id, actor_id, TimeEventKind::Pause, now),
            )?;
            Ok(())
        })
    }

    // ==========================================
    // 拣选记录命令 (Line Reconciliation)
    // ==========================================

    /// 新增拣选记录(DRAFT)
    pub fn add_entry(
        &self,
        item_id: &str,
        picker_id: &str,
        trace_code: &str,
        picked_qty: f64,
        now: DateTime<Utc>,
    ) -> ApiResult<String> {
        let trace_code = trace_code.trim();
        if trace_code.is_empty() {
            return Err(ApiError::InputError("追溯码不能为空".to_string()));
        }
        if !(picked_qty > 0.0) {
            return Err(ApiError::InputError(format!(
                "拣选数量必须为正: {}",
                picked_qty
            )));
        }

        self.db.with_transaction(|tx| {
            let item = get_item(tx, item_id)?;
            let order = get_order(tx, &item.order_id)?;
            ensure_actor(tx, picker_id)?;
            ensure_entries_mutable(&order)?;

            let entry = PickEntry::new(item_id, picker_id, trace_code, picked_qty, now);
            pick_entry_repo::insert(tx, &entry)?;
            debug!(
                entry_id = %entry.entry_id,
                item_code = %item.code,
                qty = picked_qty,
                "拣选记录已登记"
            );
            Ok(entry.entry_id)
        })
    }

    /// 编辑拣选记录(仅 DRAFT)
    ///
    /// 改写追溯码与数量,并清除待处理的拒绝原因 ——
    /// 被拒绝的记录经编辑后重新进入 submit 范围
    pub fn update_entry(
        &self,
        entry_id: &str,
        trace_code: &str,
        picked_qty: f64,
        actor_id: &str,
        _now: DateTime<Utc>,
    ) -> ApiResult<()> {
        let trace_code = trace_code.trim();
        if trace_code.is_empty() {
            return Err(ApiError::InputError("追溯码不能为空".to_string()));
        }
        if !(picked_qty > 0.0) {
            return Err(ApiError::InputError(format!(
                "拣选数量必须为正: {}",
                picked_qty
            )));
        }

        self.db.with_transaction(|tx| {
            ensure_actor(tx, actor_id)?;
            let mut entry = get_entry(tx, entry_id)?;
            let item = get_item(tx, &entry.item_id)?;
            let order = get_order(tx, &item.order_id)?;
            ensure_entries_mutable(&order)?;

            if entry.state != EntryState::Draft {
                return Err(ApiError::StateError(format!(
                    "拣选记录 {} 处于 {} 状态,不可编辑",
                    entry.trace_code, entry.state
                )));
            }
            entry.trace_code = trace_code.to_string();
            entry.picked_qty = picked_qty;
            entry.reject_reason = None;
            pick_entry_repo::update(tx, &entry)?;
            Ok(())
        })
    }

    /// 删除拣选记录
    ///
    /// 仅 DRAFT(含已拒绝)可删除; 已提交/已确认/已过账拒绝删除
    pub fn remove_entry(&self, entry_id: &str, actor_id: &str, _now: DateTime<Utc>) -> ApiResult<()> {
        self.db.with_transaction(|tx| {
            ensure_actor(tx, actor_id)?;
            let entry = get_entry(tx, entry_id)?;
            let item = get_item(tx, &entry.item_id)?;
            let order = get_order(tx, &item.order_id)?;
            ensure_entries_mutable(&order)?;

            if !reconciliation::removable(&entry) {
                return Err(ApiError::StateError(format!(
                    "拣选记录 {} 处于 {} 状态,不可删除",
                    entry.trace_code, entry.state
                )));
            }
            pick_entry_repo::delete(tx, entry_id)?;
            Ok(())
        })
    }

    /// 提交清点: DRAFT 且无待处理拒绝的记录 -> SUBMITTED
    ///
    /// # 参数
    /// - item_id: Some 限定单个行项目; None 整单提交
    ///
    /// # 返回
    /// - Ok(count): 实际提交的记录数(无可提交记录时为 0,不报错)
    pub fn submit_entries(
        &self,
        order_id: &str,
        item_id: Option<&str>,
        actor_id: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<usize> {
        self.db.with_transaction(|tx| {
            ensure_actor(tx, actor_id)?;
            let mut order = get_order(tx, order_id)?;
            ensure_entries_mutable(&order)?;

            let entries = match item_id {
                Some(id) => {
                    let item = get_item_of_order(tx, id, order_id)?;
                    pick_entry_repo::list_by_item(tx, &item.item_id)?
                }
                None => pick_entry_repo::list_by_order(tx, order_id)?,
            };

            let mut count = 0;
            for mut entry in entries {
                if !reconciliation::submittable(&entry) {
                    continue;
                }
                entry.state = EntryState::Submitted;
                pick_entry_repo::update(tx, &entry)?;
                count += 1;
            }

            // 首次整单提交视为拣选收尾,盖戳一次
            if item_id.is_none() && order.picking_ended_at.is_none() {
                order.picking_ended_at = Some(now);
                order_repo::update(tx, &order)?;
            }
            info!(order_no = %order.order_no, submitted = count, "拣选记录已提交清点");
            Ok(count)
        })
    }

    /// 清点确认
    ///
    /// 清点数量与拣选数量一致 => 直接 CONFIRMED;
    /// 不一致时必须显式 accept_divergence,否则返回
    /// DivergenceError 且不提交任何状态变化(不默收不默拒)
    pub fn confirm_count(
        &self,
        entry_id: &str,
        counted_qty: f64,
        accept_divergence: bool,
        counter_id: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<()> {
        if !(counted_qty >= 0.0) {
            return Err(ApiError::InputError(format!(
                "清点数量不能为负: {}",
                counted_qty
            )));
        }

        self.db.with_transaction(|tx| {
            let mut entry = get_entry(tx, entry_id)?;
            let item = get_item(tx, &entry.item_id)?;
            let mut order = get_order(tx, &item.order_id)?;
            ensure_actor(tx, counter_id)?;
            ensure_entries_mutable(&order)?;

            if entry.state != EntryState::Submitted {
                return Err(ApiError::StateError(format!(
                    "拣选记录 {} 处于 {} 状态,不可清点",
                    entry.trace_code, entry.state
                )));
            }

            if !qty_eq(counted_qty, entry.picked_qty) && !accept_divergence {
                return Err(ApiError::DivergenceError {
                    entry_id: entry.entry_id.clone(),
                    picked_qty: entry.picked_qty,
                    counted_qty,
                });
            }

            // 偏差被显式接受时保留清点值作为审计记录
            entry.state = EntryState::Confirmed;
            entry.counted_qty = Some(counted_qty);
            entry.counter_id = Some(counter_id.to_string());
            entry.counted_at = Some(now);
            pick_entry_repo::update(tx, &entry)?;

            // 最后一条 SUBMITTED 离开 SUBMITTED => 清点收尾盖戳一次
            if order.counting_ended_at.is_none()
                && pick_entry_repo::count_by_order_state(
                    tx,
                    &order.order_id,
                    EntryState::Submitted,
                )? == 0
            {
                order.counting_ended_at = Some(now);
                order_repo::update(tx, &order)?;
            }
            info!(
                entry_id = %entry_id,
                counted = counted_qty,
                divergent = !qty_eq(counted_qty, entry.picked_qty),
                "清点确认完成"
            );
            Ok(())
        })
    }

    /// 拒绝清点: SUBMITTED -> DRAFT
    ///
    /// 原因必填并保留在记录上; 先前的清点值被清除
    pub fn reject_entry(
        &self,
        entry_id: &str,
        reason: &str,
        counter_id: &str,
        _now: DateTime<Utc>,
    ) -> ApiResult<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ApiError::InputError("拒绝原因不能为空".to_string()));
        }

        self.db.with_transaction(|tx| {
            let mut entry = get_entry(tx, entry_id)?;
            let item = get_item(tx, &entry.item_id)?;
            let order = get_order(tx, &item.order_id)?;
            ensure_actor(tx, counter_id)?;
            ensure_entries_mutable(&order)?;

            if entry.state != EntryState::Submitted {
                return Err(ApiError::StateError(format!(
                    "拣选记录 {} 处于 {} 状态,不可拒绝",
                    entry.trace_code, entry.state
                )));
            }
            entry.state = EntryState::Draft;
            entry.reject_reason = Some(reason.to_string());
            entry.counted_qty = None;
            entry.counter_id = None;
            entry.counted_at = None;
            pick_entry_repo::update(tx, &entry)?;
            info!(entry_id = %entry_id, reason = %reason, "拣选记录被拒绝");
            Ok(())
        })
    }

    /// 切换 ERP 过账标志
    ///
    /// 过账是独立的管理事实,设计容忍地接受任意记录状态,
    /// 不被清点确认门禁
    pub fn mark_posted(
        &self,
        entry_id: &str,
        posted: bool,
        actor_id: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<()> {
        self.db.with_transaction(|tx| {
            ensure_actor(tx, actor_id)?;
            let mut entry = get_entry(tx, entry_id)?;
            let item = get_item(tx, &entry.item_id)?;
            let order = get_order(tx, &item.order_id)?;
            ensure_entries_mutable(&order)?;

            entry.posted = posted;
            entry.posted_at = if posted { Some(now) } else { None };
            pick_entry_repo::update(tx, &entry)?;
            debug!(entry_id = %entry_id, posted = posted, "ERP 过账标志已更新");
            Ok(())
        })
    }

    /// 记录行项目偏差说明
    ///
    /// 释放后行项目仅允许追加性/说明性编辑,本命令即说明写入口
    pub fn justify_line(
        &self,
        item_id: &str,
        justification: &str,
        actor_id: &str,
        _now: DateTime<Utc>,
    ) -> ApiResult<()> {
        let justification = justification.trim();
        if justification.is_empty() {
            return Err(ApiError::InputError("偏差说明不能为空".to_string()));
        }

        self.db.with_transaction(|tx| {
            ensure_actor(tx, actor_id)?;
            let mut item = get_item(tx, item_id)?;
            let order = get_order(tx, &item.order_id)?;
            if order.stage == OrderStage::Completed {
                return Err(ApiError::StateError(format!(
                    "订单 {} 已完成,偏差说明不可修改",
                    order.order_no
                )));
            }
            item.justification = Some(justification.to_string());
            line_item_repo::update(tx, &item)?;
            Ok(())
        })
    }

    // ==========================================
    // 终结转换
    // ==========================================

    /// 完成订单
    ///
    /// 门禁非空 => StateError 并列出全部阻塞原因;
    /// 成功时封闭全部未封闭计时区间(close_all 幂等)并盖完成戳
    pub fn complete(&self, order_id: &str, actor_id: &str, now: DateTime<Utc>) -> ApiResult<()> {
        self.db.with_transaction(|tx| {
            ensure_actor(tx, actor_id)?;
            let mut order = get_order(tx, order_id)?;
            if !state_machine::can_complete(order.stage) {
                return Err(ApiError::StateError(format!(
                    "订单 {} 处于 {} 阶段,不可完成",
                    order.order_no, order.stage
                )));
            }

            let items = load_items_with_entries(tx, order_id)?;
            let gate = reconciliation::order_gate(&items, &self.policy);
            if !gate.is_empty() {
                let reasons: Vec<String> = gate.iter().map(|r| r.to_string()).collect();
                return Err(ApiError::StateError(format!(
                    "订单 {} 完成被门禁阻塞: {}",
                    order.order_no,
                    reasons.join("; ")
                )));
            }

            // 封闭所有未封闭计时区间(末事件为 RESUME 的操作员)
            let events = time_event_repo::list_by_order(tx, order_id)?;
            for actor_id in time_ledger::actors_with_open_interval(&events) {
                time_event_repo::append(
                    tx,
                    &TimeEvent::new(order_id, &actor_id, TimeEventKind::Close, now),
                )?;
            }

            state_machine::apply_complete(&mut order, now);
            order_repo::update(tx, &order)?;
            info!(order_no = %order.order_no, "订单已完成");
            Ok(())
        })
    }

    /// 重开: COMPLETED -> ACTIVE
    ///
    /// 仅清空完成时间戳,不触碰任何拣选记录状态
    pub fn reopen(&self, order_id: &str, actor_id: &str, _now: DateTime<Utc>) -> ApiResult<()> {
        self.db.with_transaction(|tx| {
            ensure_actor(tx, actor_id)?;
            let mut order = get_order(tx, order_id)?;
            if !state_machine::can_reopen(order.stage) {
                return Err(ApiError::StateError(format!(
                    "订单 {} 处于 {} 阶段,不可重开",
                    order.order_no, order.stage
                )));
            }
            state_machine::apply_reopen(&mut order);
            order_repo::update(tx, &order)?;
            info!(order_no = %order.order_no, "订单已重开");
            Ok(())
        })
    }

    /// 删除订单(级联删除行项目/拣选记录/计时事件)
    ///
    /// 仅 VALIDATION 阶段允许,或对 COMPLETED 订单的管理性清除
    pub fn delete_order(&self, order_id: &str, actor_id: &str, _now: DateTime<Utc>) -> ApiResult<()> {
        self.db.with_transaction(|tx| {
            ensure_actor(tx, actor_id)?;
            let order = get_order(tx, order_id)?;
            if !state_machine::can_delete(order.stage) {
                return Err(ApiError::StateError(format!(
                    "订单 {} 处于 {} 阶段,不可删除",
                    order.order_no, order.stage
                )));
            }
            order_repo::delete(tx, order_id)?;
            info!(order_no = %order.order_no, stage = %order.stage, "订单已删除");
            Ok(())
        })
    }
}

// ==========================================
// 事务内辅助函数
// ==========================================

fn get_order(conn: &Connection, order_id: &str) -> ApiResult<Order> {
    order_repo::find_by_id(conn, order_id)?
        .ok_or_else(|| ApiError::NotFound(format!("订单 {}", order_id)))
}

fn get_item(conn: &Connection, item_id: &str) -> ApiResult<LineItem> {
    line_item_repo::find_by_id(conn, item_id)?
        .ok_or_else(|| ApiError::NotFound(format!("行项目 {}", item_id)))
}

fn get_item_of_order(conn: &Connection, item_id: &str, order_id: &str) -> ApiResult<LineItem> {
    let item = get_item(conn, item_id)?;
    if item.order_id != order_id {
        return Err(ApiError::NotFound(format!(
            "行项目 {} 不属于订单 {}",
            item_id, order_id
        )));
    }
    Ok(item)
}

fn get_entry(conn: &Connection, entry_id: &str) -> ApiResult<PickEntry> {
    pick_entry_repo::find_by_id(conn, entry_id)?
        .ok_or_else(|| ApiError::NotFound(format!("拣选记录 {}", entry_id)))
}

fn ensure_actor(conn: &Connection, actor_id: &str) -> ApiResult<()> {
    actor_repo::find_by_id(conn, actor_id)?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("操作员 {}", actor_id)))
}

fn ensure_entries_mutable(order: &Order) -> ApiResult<()> {
    if !state_machine::can_mutate_entries(order.stage) {
        return Err(ApiError::StateError(format!(
            "订单 {} 处于 {} 阶段,拣选记录不可变更",
            order.order_no, order.stage
        )));
    }
    Ok(())
}

fn check_line_fields(code: &str, requested_qty: f64) -> ApiResult<()> {
    if code.trim().is_empty() {
        return Err(ApiError::InputError("物料代码不能为空".to_string()));
    }
    if !(requested_qty > 0.0) {
        return Err(ApiError::InputError(format!(
            "需求数量必须为正: {}",
            requested_qty
        )));
    }
    Ok(())
}

/// 加载订单全部行项目及各自的拣选记录(门禁/读模型共用)
pub(crate) fn load_items_with_entries(
    conn: &Connection,
    order_id: &str,
) -> ApiResult<Vec<(LineItem, Vec<PickEntry>)>> {
    let items = line_item_repo::list_by_order(conn, order_id)?;
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        let entries = pick_entry_repo::list_by_item(conn, &item.item_id)?;
        result.push((item, entries));
    }
    Ok(result)
}
