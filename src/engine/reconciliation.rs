// ==========================================
// 拣选单履约系统 - 数量对账引擎
// ==========================================
// 职责: 行项目级 需求/已拣/清点/过账 对账,
//       推导满足状态、偏差说明要求与整单完成门禁
// 输入: 行项目及其拣选记录
// 输出: FillStatus / GateReason 集合
// 红线: 纯计算,无 I/O
// ==========================================

use serde::Serialize;
use std::fmt;

use crate::config::GatePolicy;
use crate::domain::order::LineItem;
use crate::domain::pick_entry::PickEntry;
use crate::domain::types::{qty_eq, round_qty, EntryState, FillStatus};

// ==========================================
// 行项目级对账
// ==========================================

/// 行项目已拣总量: 所有现存记录求和(被删除的记录已不在集合中,
/// 被拒绝的记录仍计入 —— 实物已被拣出)
pub fn picked_total(entries: &[PickEntry]) -> f64 {
    round_qty(entries.iter().map(|e| e.picked_qty).sum())
}

/// 满足状态: 欠拣 / 恰好 / 超拣(两位小数精度比较)
pub fn fill_status(requested_qty: f64, picked_qty: f64) -> FillStatus {
    let requested = round_qty(requested_qty);
    let picked = round_qty(picked_qty);
    if qty_eq(picked, requested) {
        FillStatus::Met
    } else if picked < requested {
        FillStatus::Short
    } else {
        FillStatus::Excess
    }
}

/// 记录是否处于"已拒绝"状态(DRAFT 且保留拒绝原因)
pub fn is_rejected(entry: &PickEntry) -> bool {
    entry.state == EntryState::Draft && entry.reject_reason.is_some()
}

/// 记录是否可删除: 仅 DRAFT(含已拒绝的 DRAFT);
/// 已提交未拒绝、已确认、已过账的记录不可删除
pub fn removable(entry: &PickEntry) -> bool {
    entry.state == EntryState::Draft
}

/// 记录是否在 submit 范围内: DRAFT 且无待处理拒绝
pub fn submittable(entry: &PickEntry) -> bool {
    entry.state == EntryState::Draft && entry.reject_reason.is_none()
}

/// 行项目是否需要偏差说明
///
/// 条件: (已拣 != 需求) 或 手工新增项, 且尚无非空说明文本
pub fn requires_justification(item: &LineItem, entries: &[PickEntry]) -> bool {
    let divergent = !qty_eq(picked_total(entries), item.requested_qty);
    let needs = divergent || item.manually_added;
    if !needs {
        return false;
    }
    !item
        .justification
        .as_deref()
        .map(|j| !j.trim().is_empty())
        .unwrap_or(false)
}

// ==========================================
// 整单完成门禁
// ==========================================

/// 门禁阻塞原因
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateReason {
    /// 行项目缺少偏差说明
    MissingJustification { item_id: String, code: String },
    /// 拣选记录未过账 ERP
    EntryNotPosted { entry_id: String, trace_code: String },
    /// 拣选记录未清点确认(仅在策略要求清点时)
    EntryNotConfirmed { entry_id: String, trace_code: String },
}

impl fmt::Display for GateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateReason::MissingJustification { code, .. } => {
                write!(f, "行项目 {} 缺少偏差说明", code)
            }
            GateReason::EntryNotPosted { trace_code, .. } => {
                write!(f, "拣选记录 {} 未过账 ERP", trace_code)
            }
            GateReason::EntryNotConfirmed { trace_code, .. } => {
                write!(f, "拣选记录 {} 未清点确认", trace_code)
            }
        }
    }
}

/// 计算整单完成门禁(阻塞原因集合)
///
/// 门禁组成由策略参数决定:
/// - require_posted: 未过账且未被拒绝的记录阻塞完成(默认开)
/// - require_confirmed: 未确认且未被拒绝的记录阻塞完成(早期严格规则)
/// 集合为空时订单方可进入 COMPLETED
pub fn order_gate(
    items: &[(LineItem, Vec<PickEntry>)],
    policy: &GatePolicy,
) -> Vec<GateReason> {
    let mut reasons = Vec::new();

    for (item, entries) in items {
        if requires_justification(item, entries) {
            reasons.push(GateReason::MissingJustification {
                item_id: item.item_id.clone(),
                code: item.code.clone(),
            });
        }

        for entry in entries {
            // 已拒绝的记录视为已裁决,不参与门禁
            if is_rejected(entry) {
                continue;
            }
            if policy.require_confirmed && entry.state != EntryState::Confirmed {
                reasons.push(GateReason::EntryNotConfirmed {
                    entry_id: entry.entry_id.clone(),
                    trace_code: entry.trace_code.clone(),
                });
            }
            if policy.require_posted && !entry.posted {
                reasons.push(GateReason::EntryNotPosted {
                    entry_id: entry.entry_id.clone(),
                    trace_code: entry.trace_code.clone(),
                });
            }
        }
    }
    reasons
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(requested: f64, manually_added: bool, justification: Option<&str>) -> LineItem {
        let mut item = LineItem::new(
            "order-1",
            "10001",
            "轴承座",
            "UN",
            requested,
            manually_added,
            Utc::now(),
        );
        item.justification = justification.map(|s| s.to_string());
        item
    }

    fn entry(qty: f64) -> PickEntry {
        PickEntry::new("item-1", "picker-1", "RAST-001", qty, Utc::now())
    }

    #[test]
    fn test_fill_status_boundaries() {
        assert_eq!(fill_status(10.0, 9.99), FillStatus::Short);
        assert_eq!(fill_status(10.0, 10.0), FillStatus::Met);
        assert_eq!(fill_status(10.0, 10.01), FillStatus::Excess);
        // 浮点累加误差在两位小数精度下不改变判定
        assert_eq!(fill_status(0.3, 0.1 + 0.2), FillStatus::Met);
    }

    #[test]
    fn test_picked_total_includes_rejected() {
        let mut rejected = entry(3.0);
        rejected.reject_reason = Some("标签模糊".to_string());
        let entries = vec![entry(5.0), rejected];
        assert_eq!(picked_total(&entries), 8.0);
    }

    #[test]
    fn test_requires_justification_on_divergence() {
        let entries = vec![entry(5.0)];
        // 已拣 5 / 需求 10, 无说明 => 需要
        assert!(requires_justification(&item(10.0, false, None), &entries));
        // 有非空说明 => 不需要
        assert!(!requires_justification(
            &item(10.0, false, Some("库存不足")),
            &entries
        ));
        // 空白说明不算数
        assert!(requires_justification(
            &item(10.0, false, Some("  ")),
            &entries
        ));
        // 恰好满足 => 不需要
        assert!(!requires_justification(&item(5.0, false, None), &entries));
    }

    #[test]
    fn test_requires_justification_on_manual_add() {
        let entries = vec![entry(5.0)];
        // 手工新增项即使数量满足也需要说明
        assert!(requires_justification(&item(5.0, true, None), &entries));
        assert!(!requires_justification(
            &item(5.0, true, Some("客户口头追加")),
            &entries
        ));
    }

    #[test]
    fn test_order_gate_default_policy() {
        let policy = GatePolicy::default();
        let mut confirmed = entry(5.0);
        confirmed.state = EntryState::Confirmed;
        let mut posted = confirmed.clone();
        posted.posted = true;

        // 未过账 => 阻塞
        let gate = order_gate(&[(item(5.0, false, None), vec![confirmed])], &policy);
        assert_eq!(gate.len(), 1);
        assert!(matches!(gate[0], GateReason::EntryNotPosted { .. }));

        // 过账后门禁为空
        let gate = order_gate(&[(item(5.0, false, None), vec![posted])], &policy);
        assert!(gate.is_empty());
    }

    #[test]
    fn test_order_gate_rejected_entries_do_not_block() {
        let policy = GatePolicy::default();
        let mut rejected = entry(5.0);
        rejected.reject_reason = Some("数量存疑".to_string());
        // 已拒绝记录不阻塞,但其数量仍计入 => 偏差说明被要求
        let gate = order_gate(&[(item(5.0, false, Some("按拒绝裁决处理")), vec![rejected])], &policy);
        assert!(gate.is_empty());
    }

    #[test]
    fn test_order_gate_strict_policy_requires_confirmation() {
        let policy = GatePolicy {
            require_posted: true,
            require_confirmed: true,
        };
        let mut submitted = entry(5.0);
        submitted.state = EntryState::Submitted;
        submitted.posted = true;

        let gate = order_gate(&[(item(5.0, false, None), vec![submitted])], &policy);
        assert_eq!(gate.len(), 1);
        assert!(matches!(gate[0], GateReason::EntryNotConfirmed { .. }));
    }

    #[test]
    fn test_removable_and_submittable() {
        let draft = entry(5.0);
        assert!(removable(&draft));
        assert!(submittable(&draft));

        let mut rejected = entry(5.0);
        rejected.reject_reason = Some("追溯码不符".to_string());
        assert!(removable(&rejected));
        assert!(!submittable(&rejected)); // 待处理拒绝不进入 submit 范围

        let mut submitted = entry(5.0);
        submitted.state = EntryState::Submitted;
        assert!(!removable(&submitted));

        let mut confirmed = entry(5.0);
        confirmed.state = EntryState::Confirmed;
        assert!(!removable(&confirmed));
    }
}
