// ==========================================
// 拣选单履约系统 - 拣选记录实体
// ==========================================
// 职责: 一次物理拣选批次(追溯码 + 数量)及其清点/过账生命周期
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::EntryState;

/// 拣选记录
///
/// 状态机: DRAFT --submit--> SUBMITTED --confirm--> CONFIRMED
///         SUBMITTED --reject(reason)--> DRAFT
/// 拒绝原因保留在记录上,直到再次编辑将其清除;
/// ERP 过账是独立的管理事实,不被清点确认门禁(默认策略)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickEntry {
    pub entry_id: String,
    pub item_id: String,
    /// 追溯码(非空),通常由条码采集预填
    pub trace_code: String,
    /// 拣选数量,严格为正
    pub picked_qty: f64,
    pub picker_id: String,
    pub state: EntryState,
    /// 清点数量; 拒绝时清空
    pub counted_qty: Option<f64>,
    /// 待处理的拒绝原因(非空即视为"已拒绝"的草稿)
    pub reject_reason: Option<String>,
    pub counter_id: Option<String>,
    pub counted_at: Option<DateTime<Utc>>,
    /// ERP 过账标志
    pub posted: bool,
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PickEntry {
    /// 新建拣选记录: 初始状态 DRAFT
    pub fn new(
        item_id: &str,
        picker_id: &str,
        trace_code: &str,
        picked_qty: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            entry_id: Uuid::new_v4().to_string(),
            item_id: item_id.to_string(),
            trace_code: trace_code.to_string(),
            picked_qty,
            picker_id: picker_id.to_string(),
            state: EntryState::Draft,
            counted_qty: None,
            reject_reason: None,
            counter_id: None,
            counted_at: None,
            posted: false,
            posted_at: None,
            created_at: now,
        }
    }
}
