// ==========================================
// 拣选单履约系统 - 配置层
// ==========================================
// 职责: 完成门禁策略与运行配置
// 存储: JSON 配置文件(缺省值兜底),默认位于平台数据目录
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

// ==========================================
// GatePolicy - 完成门禁策略
// ==========================================

/// 完成门禁组成
///
/// 源系统各版本的门禁规则不一致: 后期版本仅要求 ERP 过账
/// (清点降级为参考),早期版本还要求全量清点确认。
/// 这里作为策略参数而非写死某一版规则。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GatePolicy {
    /// 未过账的拣选记录阻塞完成
    pub require_posted: bool,
    /// 未清点确认的拣选记录阻塞完成(早期严格规则)
    pub require_confirmed: bool,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            require_posted: true,
            require_confirmed: false,
        }
    }
}

// ==========================================
// AppConfig - 运行配置
// ==========================================

/// 运行配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 数据库文件路径覆写(缺省: 平台数据目录)
    pub db_path: Option<String>,
    /// 完成门禁策略
    pub gate: GatePolicy,
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    ///
    /// 文件缺失返回缺省配置; 文件损坏时告警并回落缺省,
    /// 不让配置问题阻断启动
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "配置文件解析失败,使用缺省配置");
                Self::default()
            }
        }
    }

    /// 缺省数据库路径: <数据目录>/pick-fulfillment/fulfillment.db
    pub fn default_db_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pick-fulfillment")
            .join("fulfillment.db")
    }

    /// 解析生效的数据库路径
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_db_path)
    }
}
