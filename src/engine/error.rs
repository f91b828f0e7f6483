// ==========================================
// 维护任务清单对账系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 口径: 单位不支持是硬失败; 嵌入服务失败在语义规则边界降级
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 单位归一化错误 =====
    #[error("不支持的工时单位: {unit}")]
    UnsupportedUnit { unit: String },

    // ===== 边界校验错误 =====
    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    #[error("未提供任何数据")]
    NoDataSupplied,

    // ===== 嵌入服务错误 =====
    #[error("嵌入服务调用失败: {0}")]
    EmbeddingFailure(String),

    #[error("嵌入服务返回数量不匹配: expected={expected}, actual={actual}")]
    EmbeddingResponseMismatch { expected: usize, actual: usize },
}
