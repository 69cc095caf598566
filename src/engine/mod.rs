// ==========================================
// 拣选单履约系统 - 引擎层
// ==========================================
// 职责: 纯业务规则(计时重建/数量对账/阶段守卫)
// 红线: 引擎不做数据访问,输入输出均为领域对象
// ==========================================

pub mod reconciliation;
pub mod state_machine;
pub mod time_ledger;

// 重导出核心类型
pub use reconciliation::GateReason;
pub use time_ledger::ActorClock;
