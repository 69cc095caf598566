// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、API 实例构建、
//       操作员与订单的测试数据准备
// ==========================================

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use pick_fulfillment::api::{
    ActorApi, FulfillmentApi, OrderSubmission, RawLineRow, ReportApi,
};
use pick_fulfillment::config::GatePolicy;
use pick_fulfillment::db::Database;
use pick_fulfillment::domain::types::ActorRole;
use pick_fulfillment::logging;

// ==========================================
// 测试环境
// ==========================================

/// 测试环境
///
/// 内存数据库上的三个 API 实例, 外加预先播种的
/// 管理员/拣选员/清点员
pub struct TestEnv {
    pub db: Database,
    pub fulfillment: FulfillmentApi,
    pub actors: ActorApi,
    pub reports: ReportApi,
    pub admin_id: String,
    pub picker_id: String,
    pub counter_id: String,
}

/// 创建测试环境(缺省门禁策略: 仅要求过账)
pub fn setup() -> TestEnv {
    setup_with_policy(GatePolicy::default())
}

/// 创建测试环境(指定门禁策略)
pub fn setup_with_policy(policy: GatePolicy) -> TestEnv {
    logging::init_test();

    let db = Database::open_in_memory().expect("创建内存数据库失败");
    let actors = ActorApi::new(db.clone());

    let admin = actors
        .create_actor("管理员", ActorRole::Admin, ts(8, 0, 0))
        .expect("创建管理员失败");
    let picker = actors
        .create_actor("拣选员甲", ActorRole::Picker, ts(8, 0, 0))
        .expect("创建拣选员失败");
    let counter = actors
        .create_actor("清点员乙", ActorRole::Counter, ts(8, 0, 0))
        .expect("创建清点员失败");

    TestEnv {
        fulfillment: FulfillmentApi::new(db.clone(), policy),
        reports: ReportApi::new(db.clone(), policy),
        actors,
        db,
        admin_id: admin.actor_id,
        picker_id: picker.actor_id,
        counter_id: counter.actor_id,
    }
}

// ==========================================
// 时间与数据生成
// ==========================================

/// 固定测试日(2026-03-10)上的时刻
pub fn ts(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, h, m, s).unwrap()
}

/// 次日时刻(跨日场景用)
pub fn ts_next_day(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 11, h, m, s).unwrap()
}

/// 构造一条合法的导入行
pub fn raw_line(code: &str, qty: f64) -> RawLineRow {
    RawLineRow {
        code: code.to_string(),
        description: format!("物料 {}", code),
        unit: "UN".to_string(),
        requested_qty: qty,
    }
}

/// 构造两行的标准订单提交
pub fn standard_submission(order_no: &str) -> OrderSubmission {
    OrderSubmission {
        order_no: order_no.to_string(),
        order_date: "2026-03-10".to_string(),
        lines: vec![raw_line("MAT-001", 10.0), raw_line("MAT-002", 4.5)],
    }
}

// ==========================================
// 流程快捷方式
// ==========================================

impl TestEnv {
    /// 导入标准订单, 返回 order_id
    pub fn import_standard_order(&self, order_no: &str) -> String {
        self.fulfillment
            .import_order(standard_submission(order_no), &self.admin_id, ts(9, 0, 0))
            .expect("导入标准订单失败")
            .order_id
    }

    /// 导入并释放标准订单
    pub fn released_order(&self, order_no: &str) -> String {
        let order_id = self.import_standard_order(order_no);
        self.fulfillment
            .release(&order_id, &self.admin_id, ts(9, 5, 0))
            .expect("释放订单失败");
        order_id
    }

    /// 导入/释放/开始计时, 订单进入 ACTIVE
    pub fn active_order(&self, order_no: &str) -> String {
        let order_id = self.released_order(order_no);
        self.fulfillment
            .record_resume(&order_id, &self.picker_id, ts(9, 10, 0))
            .expect("开始计时失败");
        order_id
    }

    /// 取订单快照中首个行项目的 item_id
    pub fn first_item_id(&self, order_id: &str) -> String {
        let report = self
            .reports
            .order_report(order_id, ts(23, 0, 0))
            .expect("读取订单快照失败");
        report.items[0].item_id.clone()
    }

    /// 将订单推进到满足缺省完成门禁的状态
    ///
    /// 全部记录 CONFIRMED + 已过账, 偏差行补写说明
    pub fn confirm_and_post_all(&self, order_id: &str, at: DateTime<Utc>) {
        self.fulfillment
            .submit_entries(order_id, None, &self.picker_id, at)
            .expect("提交清点失败");
        let report = self
            .reports
            .order_report(order_id, at)
            .expect("读取订单快照失败");
        for item in &report.items {
            for entry in &item.entries {
                self.fulfillment
                    .confirm_count(&entry.entry_id, entry.picked_qty, false, &self.counter_id, at)
                    .expect("清点确认失败");
                self.fulfillment
                    .mark_posted(&entry.entry_id, true, &self.admin_id, at)
                    .expect("过账标记失败");
            }
            if item.requires_justification {
                self.fulfillment
                    .justify_line(&item.item_id, "测试裁决: 按实收处理", &self.admin_id, at)
                    .expect("写入偏差说明失败");
            }
        }
    }
}
