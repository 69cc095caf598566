// ==========================================
// 拣选单履约系统 - 订单状态机
// ==========================================
// 职责: 订单阶段转换的守卫与应用
// 阶段: VALIDATION -> RELEASED -> ACTIVE -> COMPLETED (reopen 回 ACTIVE)
// 红线: 不落中间子状态; 清点/纠错等由条目状态实时推导
// ==========================================

use chrono::{DateTime, Utc};

use crate::domain::order::Order;
use crate::domain::types::OrderStage;

// ==========================================
// 阶段守卫
// ==========================================

/// 行项目集合是否可编辑(add/update/remove): 仅校验阶段
pub fn can_edit_lines(stage: OrderStage) -> bool {
    stage == OrderStage::Validation
}

/// 是否可释放: 仅校验阶段(行项目非空由命令层检查)
pub fn can_release(stage: OrderStage) -> bool {
    stage == OrderStage::Validation
}

/// 是否接受计时事件(RESUME/PAUSE)
pub fn can_record_time(stage: OrderStage) -> bool {
    matches!(stage, OrderStage::Released | OrderStage::Active)
}

/// 拣选记录是否可变更(新增/编辑/删除/提交/清点/拒绝)
pub fn can_mutate_entries(stage: OrderStage) -> bool {
    stage == OrderStage::Active
}

/// 是否可尝试完成(门禁另行校验)
///
/// 允许从 RELEASED 直接完成: 守卫是门禁本身,而非子阶段
pub fn can_complete(stage: OrderStage) -> bool {
    matches!(stage, OrderStage::Released | OrderStage::Active)
}

/// 是否可重开
pub fn can_reopen(stage: OrderStage) -> bool {
    stage == OrderStage::Completed
}

/// 是否可删除: 校验阶段整单删除,或对已完成订单的管理性清除
pub fn can_delete(stage: OrderStage) -> bool {
    matches!(stage, OrderStage::Validation | OrderStage::Completed)
}

// ==========================================
// 转换应用
// ==========================================

/// 释放: VALIDATION -> RELEASED
pub fn apply_release(order: &mut Order) {
    order.stage = OrderStage::Released;
}

/// 首个 RESUME 的隐式转换: RELEASED -> ACTIVE
///
/// picking_started_at 仅在首次进入 ACTIVE 时盖戳一次;
/// 已处于 ACTIVE 的订单不受影响
pub fn begin_picking(order: &mut Order, now: DateTime<Utc>) {
    if order.stage == OrderStage::Released {
        order.stage = OrderStage::Active;
        if order.picking_started_at.is_none() {
            order.picking_started_at = Some(now);
        }
    }
}

/// 完成: -> COMPLETED,盖完成时间戳(台账封闭由命令层先行执行)
pub fn apply_complete(order: &mut Order, now: DateTime<Utc>) {
    order.stage = OrderStage::Completed;
    order.completed_at = Some(now);
}

/// 重开: COMPLETED -> ACTIVE,清空完成时间戳,不触碰任何拣选记录
pub fn apply_reopen(order: &mut Order) {
    order.stage = OrderStage::Active;
    order.completed_at = None;
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn order_in(stage: OrderStage) -> Order {
        let mut order = Order::new("12345", "01/03/2026", Utc::now());
        order.stage = stage;
        order
    }

    #[test]
    fn test_stage_guards() {
        assert!(can_edit_lines(OrderStage::Validation));
        assert!(!can_edit_lines(OrderStage::Released));

        assert!(can_record_time(OrderStage::Released));
        assert!(can_record_time(OrderStage::Active));
        assert!(!can_record_time(OrderStage::Validation));
        assert!(!can_record_time(OrderStage::Completed));

        assert!(can_mutate_entries(OrderStage::Active));
        assert!(!can_mutate_entries(OrderStage::Released));

        assert!(can_complete(OrderStage::Released));
        assert!(can_complete(OrderStage::Active));
        assert!(!can_complete(OrderStage::Completed));

        assert!(can_reopen(OrderStage::Completed));
        assert!(!can_reopen(OrderStage::Active));

        assert!(can_delete(OrderStage::Validation));
        assert!(can_delete(OrderStage::Completed));
        assert!(!can_delete(OrderStage::Active));
    }

    #[test]
    fn test_begin_picking_stamps_once() {
        let t1 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap();

        let mut order = order_in(OrderStage::Released);
        begin_picking(&mut order, t1);
        assert_eq!(order.stage, OrderStage::Active);
        assert_eq!(order.picking_started_at, Some(t1));

        // 后续 RESUME 不再改动时间戳
        begin_picking(&mut order, t2);
        assert_eq!(order.picking_started_at, Some(t1));
    }

    #[test]
    fn test_reopen_clears_completion_only() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap();
        let mut order = order_in(OrderStage::Active);
        apply_complete(&mut order, now);
        assert_eq!(order.stage, OrderStage::Completed);
        assert_eq!(order.completed_at, Some(now));

        apply_reopen(&mut order);
        assert_eq!(order.stage, OrderStage::Active);
        assert!(order.completed_at.is_none());
    }
}
