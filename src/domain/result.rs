// ==========================================
// 维护任务清单对账系统 - 对账结果模型
// ==========================================
// 范围: 单批次对账输出(诊断映射 + 建议列表)
// ==========================================

use crate::domain::diagnostic::OrderDiagnostic;
use crate::domain::proposal::Proposal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// ==========================================
// ReconciliationResult - 对账结果
// ==========================================
// 批次本地数据,不跨调用存活
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub run_id: Uuid,                   // 本次运行标识
    pub generated_at: DateTime<Utc>,    // 生成时间
    pub total_orders: usize,            // 批次内不同工单数(统计分母)

    /// 工单号 -> 单工单诊断
    pub per_order_diagnostics: BTreeMap<String, OrderDiagnostic>,

    /// 主模板变更建议(固定顺序: 数量→描述→字段→删除→新增)
    pub master_change_proposals: Vec<Proposal>,
}
