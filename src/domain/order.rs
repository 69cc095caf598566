// ==========================================
// 拣选单履约系统 - 订单与行项目实体
// ==========================================
// 职责: 订单头 + 阶段时间戳, 行项目 + 需求数量
// 红线: 阶段必须可由转换时间戳推导,不落中间子状态
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::OrderStage;

// ==========================================
// Order - 订单(拣选单)
// ==========================================

/// 拣选单
///
/// 由导入创建,阶段沿 VALIDATION -> RELEASED -> ACTIVE -> COMPLETED 推进;
/// 仅 VALIDATION 阶段可整单删除(COMPLETED 阶段允许管理性清除)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    /// 外部单号(唯一、非空),来自源单据
    pub order_no: String,
    /// 源单据上的日期,自由格式字符串,不做解析
    pub order_date: String,
    pub stage: OrderStage,
    pub created_at: DateTime<Utc>,
    /// 首个 RESUME 触发 RELEASED -> ACTIVE 时盖戳(仅一次)
    pub picking_started_at: Option<DateTime<Utc>>,
    /// 首次整单提交清点时盖戳(仅一次)
    pub picking_ended_at: Option<DateTime<Utc>>,
    /// 最后一条 SUBMITTED 记录离开 SUBMITTED 时盖戳(仅一次)
    pub counting_ended_at: Option<DateTime<Utc>>,
    /// 完成时盖戳; reopen 清空
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// 导入创建: 初始阶段 VALIDATION
    pub fn new(order_no: &str, order_date: &str, now: DateTime<Utc>) -> Self {
        Self {
            order_id: Uuid::new_v4().to_string(),
            order_no: order_no.to_string(),
            order_date: order_date.to_string(),
            stage: OrderStage::Validation,
            created_at: now,
            picking_started_at: None,
            picking_ended_at: None,
            counting_ended_at: None,
            completed_at: None,
        }
    }
}

// ==========================================
// LineItem - 行项目
// ==========================================

/// 订单行项目
///
/// 数量/描述仅在 VALIDATION 阶段可改;
/// 释放后只允许追加性编辑与偏差说明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub item_id: String,
    pub order_id: String,
    pub code: String,
    pub description: String,
    pub unit: String,
    /// 需求数量,严格为正
    pub requested_qty: f64,
    /// 偏差说明文本(已拣 != 需求 或手工新增项需要)
    pub justification: Option<String>,
    /// 导入之后手工新增的行项目
    pub manually_added: bool,
    pub created_at: DateTime<Utc>,
}

impl LineItem {
    pub fn new(
        order_id: &str,
        code: &str,
        description: &str,
        unit: &str,
        requested_qty: f64,
        manually_added: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            item_id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            code: code.to_string(),
            description: description.to_string(),
            unit: unit.to_string(),
            requested_qty,
            justification: None,
            manually_added,
            created_at: now,
        }
    }
}
