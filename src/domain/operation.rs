// ==========================================
// 维护任务清单对账系统 - 作业领域模型
// ==========================================
// 范围: 主模板作业 (MasterOperation) + 已执行作业 (ExecutedOperation)
// 口径: op_key=0 表示"临时作业,不在主模板中",且不唯一
// 用途: 边界层写入,引擎层只读
// ==========================================

use serde::{Deserialize, Serialize};

/// 保留作业键: 执行侧 op_key=0 表示临时新增作业
pub const AD_HOC_OP_KEY: i64 = 0;

// ==========================================
// MasterOperation - 主模板作业
// ==========================================
// 一条任务清单作业一行; 单次运行内不可变
// quantity_hours / norm_description 为派生字段,由模型准备步填充
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterOperation {
    // ===== 主键 =====
    pub op_key: i64, // 任务清单作业内部键 (TaskListOperationInternalId)

    // ===== 比对字段 =====
    pub work_center: Option<String>, // 工作中心代码
    pub plant: Option<String>,       // 工厂代码
    pub quantity: f64,               // 计划工时数量
    pub unit: String,                // 工时单位 (H/MIN/D)
    pub description: Option<String>, // 作业描述(自由文本)

    // ===== 派生字段(边界归一化填充,不参与反序列化) =====
    #[serde(skip_deserializing)]
    pub quantity_hours: f64, // 计划工时(按小时归一)
    #[serde(skip_deserializing)]
    pub norm_description: Option<String>, // 归一化描述
}

// ==========================================
// ExecutedOperation - 已执行作业
// ==========================================
// 主键: (order_id, op_key); op_key=0 时不唯一
// quantity/unit 仅允许在 op_key=0 的临时作业上缺失
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutedOperation {
    // ===== 主键 =====
    pub order_id: String, // 维护工单号 (MaintenanceOrder)
    pub op_key: i64,      // 对应主模板作业键; 0=临时作业

    // ===== 比对字段 =====
    pub work_center: Option<String>, // 实际工作中心
    pub plant: Option<String>,       // 实际工厂
    pub quantity: Option<f64>,       // 实际工时数量
    pub unit: Option<String>,        // 实际工时单位
    pub description: Option<String>, // 实际作业描述

    // ===== 派生字段 =====
    #[serde(skip_deserializing)]
    pub quantity_hours: Option<f64>, // 实际工时(按小时归一; 临时作业缺量时为空)
    #[serde(skip_deserializing)]
    pub norm_description: Option<String>, // 归一化描述
}

impl ExecutedOperation {
    /// 是否为临时作业(不在主模板中)
    pub fn is_ad_hoc(&self) -> bool {
        self.op_key == AD_HOC_OP_KEY
    }
}
