// ==========================================
// 拣选单履约系统 - API 层
// ==========================================
// 职责: 命令面(履约/操作员)与读模型,供外层(UI/导出)调用
// ==========================================

pub mod actor_api;
pub mod error;
pub mod fulfillment_api;
pub mod report_api;
pub mod validator;

// 重导出核心类型
pub use actor_api::ActorApi;
pub use error::{ApiError, ApiResult};
pub use fulfillment_api::{FulfillmentApi, ImportOutcome, LineEdit, OrderSubmission};
pub use report_api::{OrderBoard, OrderReport, ReportApi};
pub use validator::{RawLineRow, RejectedRow};
