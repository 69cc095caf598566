// ==========================================
// 拣选单履约系统 - API层错误类型
// ==========================================
// 职责: 定义命令面错误分类,转换 Repository 错误为业务错误
// 约束: 被拒绝的命令不留任何部分写入(由工作单元回滚保证)
// ==========================================

use thiserror::Error;

use crate::repository::error::RepositoryError;

/// API层错误类型
///
/// 分类:
/// - ValidationError: 导入畸形/重复单号/必填为空
/// - InputError: 非正数量/空追溯码/空拒绝原因
/// - StateError: 命令对当前阶段或记录状态非法
/// - DivergenceError: 清点数量偏差且未显式裁决
/// - NotFound: 引用的订单/行项目/记录/操作员不存在
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("导入校验失败: {0}")]
    ValidationError(String),

    #[error("无效输入: {0}")]
    InputError(String),

    #[error("状态非法: {0}")]
    StateError(String),

    /// 清点数量与拣选数量不一致且调用方未显式接受偏差
    #[error("清点偏差未裁决: entry_id={entry_id}, 拣选={picked_qty}, 清点={counted_qty}")]
    DivergenceError {
        entry_id: String,
        picked_qty: f64,
        counted_qty: f64,
    },

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将仓储层技术错误转换为命令面错误分类
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::ValidationError(msg),
            RepositoryError::ForeignKeyViolation(msg) => ApiError::StateError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("字段映射失败 (field={}): {}", field, message))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::LockError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(e) => ApiError::Other(e),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
