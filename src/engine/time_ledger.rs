// ==========================================
// 拣选单履约系统 - 计时台账引擎
// ==========================================
// 职责: 从 RESUME/PAUSE/CLOSE 事件流重建每位操作员的有效工时
// 输入: 订单的计时事件流(只追加)
// 输出: 每操作员 {累计时长, 实时状态}
// 红线: 纯读计算,无副作用; 历史数据永不拒绝
// ==========================================

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::domain::time_event::TimeEvent;
use crate::domain::types::{LedgerStatus, TimeEventKind};

// ==========================================
// ActorClock - 单操作员计时结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorClock {
    /// 累计有效时长(非负)
    pub total: Duration,
    /// 实时状态: 流尾存在未封闭区间即 RUNNING
    pub status: LedgerStatus,
}

// ==========================================
// 核心计算
// ==========================================

/// 重建每位操作员的累计工时与实时状态
///
/// 算法:
/// - 按操作员分组,组内按时间戳稳定排序
/// - RESUME 置 open_start(覆盖未封闭的前一个 open: 双击容忍,
///   两个 RESUME 之间的已流逝区间被丢弃)
/// - PAUSE/CLOSE 在 open_start 存在时累加 (ts - open_start) 并清空;
///   无前置 RESUME 的 PAUSE/CLOSE 视为无操作
/// - 流结束后 open_start 仍存在 => RUNNING,
///   时长附加 (as_of - open_start) 的实时尾巴(不落库)
pub fn compute_totals(
    events: &[TimeEvent],
    as_of: DateTime<Utc>,
) -> HashMap<String, ActorClock> {
    let mut grouped: HashMap<String, Vec<&TimeEvent>> = HashMap::new();
    for event in events {
        grouped.entry(event.actor_id.clone()).or_default().push(event);
    }

    let mut totals = HashMap::new();
    for (actor_id, mut actor_events) in grouped {
        // 稳定排序: 同时刻事件保持追加顺序
        actor_events.sort_by_key(|e| e.ts);

        let mut total = Duration::zero();
        let mut open_start: Option<DateTime<Utc>> = None;

        for event in actor_events {
            match event.kind {
                TimeEventKind::Resume => {
                    open_start = Some(event.ts);
                }
                TimeEventKind::Pause | TimeEventKind::Close => {
                    if let Some(start) = open_start.take() {
                        total = total + clamped_interval(start, event.ts);
                    }
                }
            }
        }

        let clock = match open_start {
            Some(start) => ActorClock {
                total: total + clamped_interval(start, as_of),
                status: LedgerStatus::Running,
            },
            None => ActorClock {
                total,
                status: LedgerStatus::Stopped,
            },
        };
        totals.insert(actor_id, clock);
    }
    totals
}

/// 区间时长,负值(时钟回拨)压为零
fn clamped_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
    let delta = end - start;
    if delta < Duration::zero() {
        Duration::zero()
    } else {
        delta
    }
}

/// 存在未封闭区间(末事件为 RESUME)的操作员列表
///
/// 驱动 close_all: 对返回的每位操作员各追加一条 CLOSE;
/// 第二次调用返回空集,保证 close_all 幂等
pub fn actors_with_open_interval(events: &[TimeEvent]) -> Vec<String> {
    let mut last_kind: HashMap<&str, TimeEventKind> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    // 事件流已按 (ts, 追加序) 排列
    for event in events {
        if !last_kind.contains_key(event.actor_id.as_str()) {
            order.push(&event.actor_id);
        }
        last_kind.insert(&event.actor_id, event.kind);
    }
    order
        .into_iter()
        .filter(|actor| last_kind.get(actor) == Some(&TimeEventKind::Resume))
        .map(|actor| actor.to_string())
        .collect()
}

/// 某操作员的末事件是否为 RESUME(计时进行中)
pub fn is_running(events: &[TimeEvent], actor_id: &str) -> bool {
    events
        .iter()
        .filter(|e| e.actor_id == actor_id)
        .next_back()
        .map(|e| e.kind == TimeEventKind::Resume)
        .unwrap_or(false)
}

/// 时长格式化为 HH:MM:SS(读模型展示用)
pub fn format_duration(d: Duration) -> String {
    let total_seconds = d.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, h, m, s).unwrap()
    }

    fn ev(actor: &str, kind: TimeEventKind, at: DateTime<Utc>) -> TimeEvent {
        TimeEvent::new("order-1", actor, kind, at)
    }

    #[test]
    fn test_closed_interval() {
        // 场景1: 09:00 RESUME, 09:30 PAUSE => 30 分钟, STOPPED
        let events = vec![
            ev("a", TimeEventKind::Resume, ts(9, 0, 0)),
            ev("a", TimeEventKind::Pause, ts(9, 30, 0)),
        ];
        let totals = compute_totals(&events, ts(12, 0, 0));
        let clock = totals.get("a").expect("应有操作员 a 的计时");
        assert_eq!(clock.total, Duration::minutes(30));
        assert_eq!(clock.status, LedgerStatus::Stopped);
    }

    #[test]
    fn test_live_tail_running() {
        // 场景2: 再次 10:00 RESUME, as_of 10:15 => 45 分钟, RUNNING
        let events = vec![
            ev("a", TimeEventKind::Resume, ts(9, 0, 0)),
            ev("a", TimeEventKind::Pause, ts(9, 30, 0)),
            ev("a", TimeEventKind::Resume, ts(10, 0, 0)),
        ];
        let totals = compute_totals(&events, ts(10, 15, 0));
        let clock = totals.get("a").unwrap();
        assert_eq!(clock.total, Duration::minutes(45));
        assert_eq!(clock.status, LedgerStatus::Running);
    }

    #[test]
    fn test_double_resume_discards_open_interval() {
        // 双击容忍: 第二个 RESUME 覆盖 open_start,
        // 09:00-09:10 的未封闭区间被丢弃
        let events = vec![
            ev("a", TimeEventKind::Resume, ts(9, 0, 0)),
            ev("a", TimeEventKind::Resume, ts(9, 10, 0)),
            ev("a", TimeEventKind::Pause, ts(9, 20, 0)),
        ];
        let totals = compute_totals(&events, ts(12, 0, 0));
        assert_eq!(totals.get("a").unwrap().total, Duration::minutes(10));
    }

    #[test]
    fn test_orphan_pause_and_close_are_noops() {
        // 无前置 RESUME 的 PAUSE/CLOSE 容忍为无操作
        let events = vec![
            ev("a", TimeEventKind::Pause, ts(9, 0, 0)),
            ev("a", TimeEventKind::Close, ts(9, 5, 0)),
            ev("a", TimeEventKind::Resume, ts(9, 10, 0)),
            ev("a", TimeEventKind::Close, ts(9, 40, 0)),
        ];
        let totals = compute_totals(&events, ts(12, 0, 0));
        let clock = totals.get("a").unwrap();
        assert_eq!(clock.total, Duration::minutes(30));
        assert_eq!(clock.status, LedgerStatus::Stopped);
    }

    #[test]
    fn test_multiple_actors_independent() {
        let events = vec![
            ev("a", TimeEventKind::Resume, ts(9, 0, 0)),
            ev("b", TimeEventKind::Resume, ts(9, 10, 0)),
            ev("a", TimeEventKind::Pause, ts(9, 30, 0)),
        ];
        let totals = compute_totals(&events, ts(9, 40, 0));
        assert_eq!(totals.get("a").unwrap().total, Duration::minutes(30));
        assert_eq!(totals.get("a").unwrap().status, LedgerStatus::Stopped);
        assert_eq!(totals.get("b").unwrap().total, Duration::minutes(30));
        assert_eq!(totals.get("b").unwrap().status, LedgerStatus::Running);
    }

    #[test]
    fn test_total_is_non_negative_with_clock_skew() {
        // as_of 早于 open_start(时钟回拨)时实时尾巴压为零
        let events = vec![ev("a", TimeEventKind::Resume, ts(10, 0, 0))];
        let totals = compute_totals(&events, ts(9, 0, 0));
        assert_eq!(totals.get("a").unwrap().total, Duration::zero());
    }

    #[test]
    fn test_actors_with_open_interval() {
        let mut events = vec![
            ev("a", TimeEventKind::Resume, ts(9, 0, 0)),
            ev("b", TimeEventKind::Resume, ts(9, 0, 0)),
            ev("b", TimeEventKind::Pause, ts(9, 30, 0)),
        ];
        assert_eq!(actors_with_open_interval(&events), vec!["a".to_string()]);

        // 追加 CLOSE 后再无未封闭区间 => close_all 幂等
        events.push(ev("a", TimeEventKind::Close, ts(9, 40, 0)));
        assert!(actors_with_open_interval(&events).is_empty());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::zero()), "00:00:00");
        assert_eq!(format_duration(Duration::minutes(30)), "00:30:00");
        assert_eq!(
            format_duration(Duration::hours(25) + Duration::seconds(61)),
            "25:01:01"
        );
    }
}
