// ==========================================
// 维护任务清单对账系统 - API 层
// ==========================================
// 职责: 面向调用方(外部 HTTP 层)的业务接口
// 口径: 调用方负责把各种传输包络整形成规范扁平列表,本层不认包络
// ==========================================

use crate::config::ReconcilerConfig;
use crate::domain::operation::{ExecutedOperation, MasterOperation};
use crate::domain::result::ReconciliationResult;
use crate::engine::semantic::EmbeddingProvider;
use crate::engine::{EngineError, ReconcileOrchestrator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// ReconciliationRequest - 对账请求(规范模式)
// ==========================================
// 两个列表都缺失 = "未提供数据",区别于明确的空批次
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconciliationRequest {
    #[serde(default)]
    pub master_operations: Option<Vec<MasterOperation>>,

    #[serde(default)]
    pub executed_operations: Option<Vec<ExecutedOperation>>,
}

// ==========================================
// ReconciliationApi - 对账业务接口
// ==========================================
pub struct ReconciliationApi {
    orchestrator: ReconcileOrchestrator,
}

impl ReconciliationApi {
    /// 创建新的对账接口实例
    pub fn new(config: Arc<ReconcilerConfig>, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            orchestrator: ReconcileOrchestrator::new(config, embeddings),
        }
    }

    /// 执行一次对账
    ///
    /// # 返回
    /// - `Ok(result)`: 诊断 + 建议; 空批次得到空结果
    /// - `Err(NoDataSupplied)`: 请求里两个列表都缺失
    /// - `Err(UnsupportedUnit | FieldValueError)`: 边界校验硬失败
    pub async fn reconcile(
        &self,
        request: ReconciliationRequest,
    ) -> Result<ReconciliationResult, EngineError> {
        if request.master_operations.is_none() && request.executed_operations.is_none() {
            return Err(EngineError::NoDataSupplied);
        }

        let masters = request.master_operations.unwrap_or_default();
        let executed = request.executed_operations.unwrap_or_default();

        self.orchestrator.run_reconciliation(masters, executed).await
    }
}
