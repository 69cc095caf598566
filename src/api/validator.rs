// ==========================================
// 拣选单履约系统 - 导入边界校验
// ==========================================
// 职责: 对导入协作方交付的结构化行逐行校验
// 策略: 畸形行逐行拒绝并记录原因,不整单中止
// ==========================================

use serde::{Deserialize, Serialize};

/// 导入协作方交付的原始行(表格抽取结果)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLineRow {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub requested_qty: f64,
}

/// 校验通过的行
#[derive(Debug, Clone)]
pub struct ValidLine {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub requested_qty: f64,
}

/// 被拒绝的行(行号 + 原因)
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    pub row_index: usize,
    pub reason: String,
}

/// 缺省计量单位(源单据常缺该列)
pub const DEFAULT_UNIT: &str = "UN";

/// 校验单行
///
/// 规则: 物料代码非空, 需求数量严格为正;
/// 单位为空时回落缺省单位
pub fn validate_line_row(row: &RawLineRow) -> Result<ValidLine, String> {
    let code = row.code.trim();
    if code.is_empty() {
        return Err("物料代码为空".to_string());
    }
    if !(row.requested_qty > 0.0) {
        return Err(format!("需求数量必须为正: {}", row.requested_qty));
    }
    let unit = row.unit.trim();
    Ok(ValidLine {
        code: code.to_string(),
        description: row.description.trim().to_string(),
        unit: if unit.is_empty() {
            DEFAULT_UNIT.to_string()
        } else {
            unit.to_string()
        },
        requested_qty: row.requested_qty,
    })
}

/// 逐行校验: 返回 (通过行, 拒绝行)
pub fn validate_rows(rows: &[RawLineRow]) -> (Vec<ValidLine>, Vec<RejectedRow>) {
    let mut valid = Vec::new();
    let mut rejected = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        match validate_line_row(row) {
            Ok(line) => valid.push(line),
            Err(reason) => rejected.push(RejectedRow {
                row_index: index,
                reason,
            }),
        }
    }
    (valid, rejected)
}
