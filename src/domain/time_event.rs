// ==========================================
// 拣选单履约系统 - 计时事件实体
// ==========================================
// 红线: 事件流只追加,除整单删除级联外不改不删
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::TimeEventKind;

/// 计时事件
///
/// 按 (订单, 操作员) 维度追加; RESUME/PAUSE 来自操作员,
/// CLOSE 仅由系统在订单完成时追加
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEvent {
    pub event_id: String,
    pub order_id: String,
    pub actor_id: String,
    pub kind: TimeEventKind,
    pub ts: DateTime<Utc>,
}

impl TimeEvent {
    pub fn new(order_id: &str, actor_id: &str, kind: TimeEventKind, ts: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            actor_id: actor_id.to_string(),
            kind,
            ts,
        }
    }
}
