// ==========================================
// 拣选单履约系统 - 操作员管理 API
// ==========================================
// 职责: 操作员创建/查询/删除
// 约束: 拥有历史引用(计时事件/拣选记录)的操作员禁止删除
// ==========================================

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::db::Database;
use crate::domain::actor::Actor;
use crate::domain::types::ActorRole;
use crate::repository::actor_repo;

/// 缺省管理员显示名(启动播种用)
pub const DEFAULT_ADMIN_NAME: &str = "admin";

/// 操作员管理 API
pub struct ActorApi {
    db: Database,
}

impl ActorApi {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 创建操作员(显示名唯一、非空)
    pub fn create_actor(
        &self,
        display_name: &str,
        role: ActorRole,
        now: DateTime<Utc>,
    ) -> ApiResult<Actor> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(ApiError::InputError("操作员显示名不能为空".to_string()));
        }

        self.db.with_transaction(|tx| {
            if actor_repo::find_by_name(tx, display_name)?.is_some() {
                return Err(ApiError::ValidationError(format!(
                    "操作员显示名已存在: {}",
                    display_name
                )));
            }
            let actor = Actor::new(display_name, role, now);
            actor_repo::insert(tx, &actor)?;
            info!(actor_id = %actor.actor_id, name = %display_name, role = %role, "操作员已创建");
            Ok(actor)
        })
    }

    /// 列出全部操作员
    pub fn list_actors(&self) -> ApiResult<Vec<Actor>> {
        self.db.with_connection(|conn| Ok(actor_repo::list_all(conn)?))
    }

    /// 按 ID 查询操作员
    pub fn get_actor(&self, actor_id: &str) -> ApiResult<Actor> {
        self.db.with_connection(|conn| {
            actor_repo::find_by_id(conn, actor_id)?
                .ok_or_else(|| ApiError::NotFound(format!("操作员 {}", actor_id)))
        })
    }

    /// 删除操作员
    ///
    /// 存在计时事件或拣选记录引用时拒绝(StateError)
    pub fn delete_actor(&self, actor_id: &str) -> ApiResult<()> {
        self.db.with_transaction(|tx| {
            let actor = actor_repo::find_by_id(tx, actor_id)?
                .ok_or_else(|| ApiError::NotFound(format!("操作员 {}", actor_id)))?;
            if actor_repo::has_history(tx, actor_id)? {
                return Err(ApiError::StateError(format!(
                    "操作员 {} 拥有历史数据,不可删除",
                    actor.display_name
                )));
            }
            actor_repo::delete(tx, actor_id)?;
            info!(actor_id = %actor_id, "操作员已删除");
            Ok(())
        })
    }

    /// 播种缺省管理员(启动便利)
    ///
    /// 非关键引导步骤: 任何失败仅告警,不阻断启动
    pub fn seed_default_admin(&self, now: DateTime<Utc>) {
        let result: ApiResult<()> = self.db.with_transaction(|tx| {
            if actor_repo::find_by_name(tx, DEFAULT_ADMIN_NAME)?.is_some() {
                return Ok(());
            }
            let admin = Actor::new(DEFAULT_ADMIN_NAME, ActorRole::Admin, now);
            actor_repo::insert(tx, &admin)?;
            info!(actor_id = %admin.actor_id, "缺省管理员已播种");
            Ok(())
        });
        if let Err(e) = result {
            warn!(error = %e, "缺省管理员播种失败,忽略");
        }
    }
}
