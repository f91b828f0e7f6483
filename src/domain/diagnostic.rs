// ==========================================
// 维护任务清单对账系统 - 诊断领域模型
// ==========================================
// 范围: 单工单诊断 (OrderDiagnostic) + 全量学习聚合 (AggregatedLearning)
// 红线: 诊断记录创建后不可变; 聚合计数只增不减
// ==========================================

use crate::domain::operation::ExecutedOperation;
use crate::domain::types::CompareField;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// QuantityDelta - 工时差值记录
// ==========================================
// 口径: 实际小时 - 计划小时 (均按小时归一后求差)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityDelta {
    pub op_key: i64,      // 主模板作业键
    pub delta_hours: f64, // 实际-计划(小时)
}

// ==========================================
// FieldMismatch - 字段不一致记录
// ==========================================
// 仅在实际值存在且与计划值不同时产生; 相等不产生记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMismatch {
    pub op_key: i64,          // 主模板作业键
    pub field: CompareField,  // 不一致的字段
    pub actual: String,       // 工单侧观测值
}

// ==========================================
// OrderDiagnostic - 单工单诊断
// ==========================================
// 主键: order_id; 由 OrderAnalyzer 一次性构建,之后只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDiagnostic {
    pub order_id: String, // 维护工单号

    // ===== 结构差异 =====
    pub new_operations: Vec<ExecutedOperation>, // op_key=0 的临时作业
    pub missing_operations: BTreeSet<i64>,      // 主模板有而本工单缺失的作业键

    // ===== 字段差异 =====
    pub quantity_deltas: Vec<QuantityDelta>,  // 匹配作业的工时差值
    pub field_mismatches: Vec<FieldMismatch>, // 匹配作业的非数量字段不一致
}

impl OrderDiagnostic {
    /// 创建空诊断(无任何差异)
    pub fn empty(order_id: String) -> Self {
        Self {
            order_id,
            new_operations: Vec::new(),
            missing_operations: BTreeSet::new(),
            quantity_deltas: Vec::new(),
            field_mismatches: Vec::new(),
        }
    }
}

// ==========================================
// AggregatedLearning - 全量学习聚合
// ==========================================
// 由 LearningAggregator 对所有工单诊断做可交换/可结合的折叠得到
// BTreeMap 保证遍历顺序确定,建议输出在同类内稳定
#[derive(Debug, Clone, Default)]
pub struct AggregatedLearning {
    /// 作业键 -> 工时差值列表(小时)
    pub quantity_deltas: BTreeMap<i64, Vec<f64>>,

    /// (作业键, 字段, 观测值) -> 出现次数
    pub field_stats: BTreeMap<(i64, CompareField, String), u32>,

    /// 作业键 -> 缺失工单数
    pub missing_ops_count: BTreeMap<i64, u32>,

    /// 作业键 -> 出现工单数(删除规则的在场率分母口径)
    pub op_presence: BTreeMap<i64, u32>,

    /// 含临时作业的工单数(每工单最多记一次)
    pub new_op_order_count: u32,

    /// 所有临时作业记录(跨工单平铺)
    pub new_ops: Vec<ExecutedOperation>,
}
