// ==========================================
// 拣选单履约系统 - 主入口
// ==========================================
// 职责: 日志/配置/数据库初始化,播种缺省管理员,打印看板概览
// 说明: 交互层(UI/导入/导出)为外部协作方,本入口仅做运维自检
// ==========================================

use chrono::Utc;

use pick_fulfillment::api::{ActorApi, ReportApi};
use pick_fulfillment::config::AppConfig;
use pick_fulfillment::db::Database;
use pick_fulfillment::logging;

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", pick_fulfillment::APP_NAME);
    tracing::info!("系统版本: {}", pick_fulfillment::VERSION);
    tracing::info!("==================================================");

    // 加载配置: 第一个命令行参数可指定配置文件路径
    let config_path = std::env::args().nth(1);
    let config = match config_path {
        Some(ref path) => AppConfig::load(std::path::Path::new(path)),
        None => AppConfig::default(),
    };

    // 打开数据库并初始化 schema
    let db_path = config.resolve_db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db_path = db_path.to_string_lossy().to_string();
    tracing::info!("使用数据库: {}", db_path);
    let db = Database::open(&db_path)?;

    // 播种缺省管理员(非关键引导,失败仅告警)
    let actor_api = ActorApi::new(db.clone());
    actor_api.seed_default_admin(Utc::now());

    // 看板概览
    let report_api = ReportApi::new(db, config.gate);
    let board = report_api.order_board()?;
    tracing::info!(
        validation = board.validation.len(),
        released = board.released.len(),
        active = board.active.len(),
        completed = board.completed.len(),
        "看板概览"
    );

    Ok(())
}
