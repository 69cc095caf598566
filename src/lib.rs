// ==========================================
// 拣选单履约系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 拣选/清点/ERP过账 履约流程引擎
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 门禁策略与运行配置
pub mod config;

// 数据库基础设施(连接初始化/PRAGMA/工作单元)
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 命令面与读模型
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ActorRole, EntryState, FillStatus, LedgerStatus, OrderStage, TimeEventKind,
};

// 领域实体
pub use domain::{Actor, LineItem, Order, PickEntry, TimeEvent};

// 引擎
pub use engine::{ActorClock, GateReason};

// 配置
pub use config::{AppConfig, GatePolicy};

// 数据库
pub use db::Database;

// API
pub use api::{
    ActorApi, ApiError, ApiResult, FulfillmentApi, ImportOutcome, LineEdit, OrderBoard,
    OrderReport, OrderSubmission, RawLineRow, ReportApi,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "拣选单履约系统";

// ==========================================
// 预编译检查
// ==========================================
