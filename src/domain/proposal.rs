// ==========================================
// 维护任务清单对账系统 - 变更建议领域模型
// ==========================================
// 范围: 主模板变更建议 (Proposal) 及其证据块
// 红线: 建议彼此独立; 列表顺序 = 插入顺序(数量→描述→字段→删除→新增)
// ==========================================

use crate::domain::types::{CompareField, Confidence, ProposalType};
use serde::{Deserialize, Serialize};

// ==========================================
// ProposalChange - 建议的变更内容
// ==========================================
// 按建议类型取不同形态; 删除类建议无变更内容(Proposal.change=None)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProposalChange {
    /// 工时数量(及单位)变更
    Quantity {
        current_quantity: f64,
        current_unit: String,
        suggested_quantity: f64,
        suggested_unit: String,
        normalized_hours: f64, // 建议值按小时归一(2位小数)
    },
    /// 作业描述变更
    Description {
        current_description: Option<String>,
        suggested_description: String,
    },
    /// 通用字段变更
    Field {
        field: CompareField,
        current_value: Option<String>,
        suggested_value: String,
    },
    /// 新增主模板作业
    NewOperation {
        description: Option<String>,
        work_center: Option<String>,
        plant: Option<String>,
        quantity: f64,
        unit: String,
    },
}

// ==========================================
// ProposalEvidence - 建议支撑证据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProposalEvidence {
    /// 数量类: 样本量 + 离散度
    Quantity {
        mean_delta_hours: f64, // 截尾均值差(小时,2位小数)
        std_dev: f64,          // 标准差(2位小数)
        cv: f64,               // 变异系数(2位小数)
        sample_size: u32,      // 鲁棒样本量(z 过滤后)
    },
    /// 描述类: 聚类占比 + 变体集合
    Description {
        variants: Vec<String>,      // 主簇内去重后的原始描述变体
        occurrences: u32,           // 主簇内出现次数
        orders_affected_ratio: f64, // 主簇占总工单比(2位小数)
        semantic_threshold: f64,    // 聚类相似度阈值
    },
    /// 通用字段类: 出现占比
    Field {
        occurrences: u32,           // 观测值出现次数
        orders_affected_ratio: f64, // 占总工单比(2位小数)
    },
    /// 删除类: 缺失占比 + 在场率
    Missing {
        missing_orders: u32,        // 缺失工单数
        orders_affected_ratio: f64, // 缺失占总工单比(2位小数)
        presence_ratio: f64,        // 历史在场率(2位小数)
    },
    /// 新增类: 出现占比 + 平均工时
    Addition {
        occurrences: u32,           // 簇内临时作业记录数
        orders_affected_ratio: f64, // 涉及工单占比(2位小数)
        avg_quantity_hours: f64,    // 截尾平均工时(小时,2位小数)
    },
}

// ==========================================
// Proposal - 主模板变更建议
// ==========================================
// op_key=None 仅出现在 ADD_NEW_OPERATION(新增没有既有目标作业)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub op_key: Option<i64>,             // 目标主模板作业键
    pub proposal_type: ProposalType,     // 建议类型
    pub confidence: Confidence,          // 置信等级
    pub change: Option<ProposalChange>,  // 变更内容(删除类为 None)
    pub evidence: ProposalEvidence,      // 支撑证据
}
