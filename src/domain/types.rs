// ==========================================
// 维护任务清单对账系统 - 领域类型定义
// ==========================================
// 范围: 置信等级 / 建议类型 / 比对字段
// 红线: 建议类型是封闭枚举,不接受自由字符串
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 置信等级 (Confidence)
// ==========================================
// 由统计规则映射得到(CV / 占比阈值),不参与排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    High,   // 高置信
    Medium, // 中置信
    Low,    // 低置信
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "HIGH"),
            Confidence::Medium => write!(f, "MEDIUM"),
            Confidence::Low => write!(f, "LOW"),
        }
    }
}

// ==========================================
// 建议类型 (Proposal Type)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与下游 UI 契约一致)
// 注: WORKCENTER 不拆词,保持 UPDATE_<FIELD> 拼接口径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalType {
    #[serde(rename = "UPDATE_QUANTITY")]
    UpdateQuantity, // 工时数量变更(单位不变)
    #[serde(rename = "UPDATE_QUANTITY_AND_UNIT")]
    UpdateQuantityAndUnit, // 工时数量与单位联动变更
    #[serde(rename = "UPDATE_DESCRIPTION")]
    UpdateDescription, // 作业描述变更(语义聚类)
    #[serde(rename = "UPDATE_WORKCENTER")]
    UpdateWorkCenter, // 工作中心变更
    #[serde(rename = "UPDATE_PLANT")]
    UpdatePlant, // 工厂代码变更
    #[serde(rename = "DELETE_OPERATION")]
    DeleteOperation, // 删除主模板作业
    #[serde(rename = "ADD_NEW_OPERATION")]
    AddNewOperation, // 新增主模板作业
}

impl ProposalType {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            ProposalType::UpdateQuantity => "UPDATE_QUANTITY",
            ProposalType::UpdateQuantityAndUnit => "UPDATE_QUANTITY_AND_UNIT",
            ProposalType::UpdateDescription => "UPDATE_DESCRIPTION",
            ProposalType::UpdateWorkCenter => "UPDATE_WORKCENTER",
            ProposalType::UpdatePlant => "UPDATE_PLANT",
            ProposalType::DeleteOperation => "DELETE_OPERATION",
            ProposalType::AddNewOperation => "ADD_NEW_OPERATION",
        }
    }
}

impl fmt::Display for ProposalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 比对字段 (Compare Field)
// ==========================================
// 固定字段集: Quantity 走小时差值口径,其余走原值相等比对
// Ord 派生用于聚合结果的确定性遍历
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CompareField {
    Quantity,             // 工时数量(按小时归一后比较)
    Unit,                 // 工时单位
    WorkCenter,           // 工作中心
    Plant,                // 工厂
    OperationDescription, // 作业描述
}

impl CompareField {
    /// 非数量类字段的固定比对顺序
    pub const RAW_COMPARED: [CompareField; 4] = [
        CompareField::Unit,
        CompareField::WorkCenter,
        CompareField::Plant,
        CompareField::OperationDescription,
    ];

    /// 转换为字符串标识(与源系统字段名一致)
    pub fn as_str(&self) -> &str {
        match self {
            CompareField::Quantity => "Quantity",
            CompareField::Unit => "Unit",
            CompareField::WorkCenter => "WorkCenter",
            CompareField::Plant => "Plant",
            CompareField::OperationDescription => "OperationDescription",
        }
    }
}

impl fmt::Display for CompareField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
