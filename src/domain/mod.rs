// ==========================================
// 拣选单履约系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod actor;
pub mod order;
pub mod pick_entry;
pub mod time_event;
pub mod types;

// 重导出核心类型
pub use actor::Actor;
pub use order::{LineItem, Order};
pub use pick_entry::PickEntry;
pub use time_event::TimeEvent;
pub use types::{
    qty_eq, round_qty, ActorRole, EntryState, FillStatus, LedgerStatus, OrderStage, TimeEventKind,
};
