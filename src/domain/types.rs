// ==========================================
// 拣选单履约系统 - 领域类型定义
// ==========================================
// 职责: 定义订单阶段、拣选记录状态、计时事件等核心枚举
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 订单阶段 (Order Stage)
// ==========================================
// 四阶段模型: 校验 -> 已释放 -> 作业中 -> 已完成
// 清点/纠错等子状态不落库,由条目状态实时推导
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStage {
    Validation, // 导入后待校验
    Released,   // 已释放,等待拣选
    Active,     // 作业中(拣选/清点/过账)
    Completed,  // 已完成
}

impl fmt::Display for OrderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStage::Validation => write!(f, "VALIDATION"),
            OrderStage::Released => write!(f, "RELEASED"),
            OrderStage::Active => write!(f, "ACTIVE"),
            OrderStage::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl FromStr for OrderStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VALIDATION" => Ok(OrderStage::Validation),
            "RELEASED" => Ok(OrderStage::Released),
            "ACTIVE" => Ok(OrderStage::Active),
            "COMPLETED" => Ok(OrderStage::Completed),
            other => Err(format!("未知的订单阶段: {}", other)),
        }
    }
}

// ==========================================
// 拣选记录状态 (Pick Entry State)
// ==========================================
// 生命周期: DRAFT --submit--> SUBMITTED --confirm--> CONFIRMED
//           SUBMITTED --reject--> DRAFT (保留拒绝原因)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryState {
    Draft,     // 草稿,可编辑/可删除
    Submitted, // 已提交待清点
    Confirmed, // 清点确认(终态,后续可过账)
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryState::Draft => write!(f, "DRAFT"),
            EntryState::Submitted => write!(f, "SUBMITTED"),
            EntryState::Confirmed => write!(f, "CONFIRMED"),
        }
    }
}

impl FromStr for EntryState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(EntryState::Draft),
            "SUBMITTED" => Ok(EntryState::Submitted),
            "CONFIRMED" => Ok(EntryState::Confirmed),
            other => Err(format!("未知的拣选记录状态: {}", other)),
        }
    }
}

// ==========================================
// 计时事件类型 (Time Event Kind)
// ==========================================
// RESUME/PAUSE 由操作员追加, CLOSE 由系统在终结转换时追加
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeEventKind {
    Resume, // 开始/恢复计时
    Pause,  // 暂停计时
    Close,  // 系统封闭(订单完成)
}

impl fmt::Display for TimeEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeEventKind::Resume => write!(f, "RESUME"),
            TimeEventKind::Pause => write!(f, "PAUSE"),
            TimeEventKind::Close => write!(f, "CLOSE"),
        }
    }
}

impl FromStr for TimeEventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RESUME" => Ok(TimeEventKind::Resume),
            "PAUSE" => Ok(TimeEventKind::Pause),
            "CLOSE" => Ok(TimeEventKind::Close),
            other => Err(format!("未知的计时事件类型: {}", other)),
        }
    }
}

// ==========================================
// 操作员角色 (Actor Role)
// ==========================================
// 角色仅作为数据承载,命令层不做权限裁决(认证归约为不透明身份)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    Admin,
    Picker,
    Counter,
    Both,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRole::Admin => write!(f, "ADMIN"),
            ActorRole::Picker => write!(f, "PICKER"),
            ActorRole::Counter => write!(f, "COUNTER"),
            ActorRole::Both => write!(f, "BOTH"),
        }
    }
}

impl FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(ActorRole::Admin),
            "PICKER" => Ok(ActorRole::Picker),
            "COUNTER" => Ok(ActorRole::Counter),
            "BOTH" => Ok(ActorRole::Both),
            other => Err(format!("未知的操作员角色: {}", other)),
        }
    }
}

// ==========================================
// 行项目满足状态 (Fill Status)
// ==========================================
// 由已拣数量与需求数量实时比较得出,不落库
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FillStatus {
    Short,  // 欠拣
    Met,    // 恰好满足
    Excess, // 超拣
}

impl fmt::Display for FillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillStatus::Short => write!(f, "SHORT"),
            FillStatus::Met => write!(f, "MET"),
            FillStatus::Excess => write!(f, "EXCESS"),
        }
    }
}

// ==========================================
// 计时状态 (Ledger Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerStatus {
    Running, // 计时进行中
    Stopped, // 已停止
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerStatus::Running => write!(f, "RUNNING"),
            LedgerStatus::Stopped => write!(f, "STOPPED"),
        }
    }
}

// ==========================================
// 数量比较辅助
// ==========================================

/// 数量四舍五入到小数点后两位
///
/// 需求/已拣/清点数量的相等性比较统一经过该函数,
/// 避免浮点累加误差导致的状态抖动
pub fn round_qty(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// 两个数量在两位小数精度下是否相等
pub fn qty_eq(a: f64, b: f64) -> bool {
    (round_qty(a) - round_qty(b)).abs() < f64::EPSILON
}
