// ==========================================
// 拣选单履约系统 - 操作员实体
// ==========================================
// 约束: 拥有历史数据(计时事件/拣选记录)的操作员禁止删除
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::ActorRole;

/// 操作员
///
/// 认证归约为不透明身份: 这里只承载身份与角色,
/// 凭证存储与校验不属于核心范围
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub actor_id: String,
    pub display_name: String,
    pub role: ActorRole,
    pub created_at: DateTime<Utc>,
}

impl Actor {
    /// 创建新操作员(生成 UUID)
    pub fn new(display_name: &str, role: ActorRole, now: DateTime<Utc>) -> Self {
        Self {
            actor_id: Uuid::new_v4().to_string(),
            display_name: display_name.to_string(),
            role,
            created_at: now,
        }
    }
}
