// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use maint_reconciler::{
    EmbeddingProvider, EngineError, ExecutedOperation, MasterOperation,
};

// ==========================================
// MasterOperation 构建器
// ==========================================

pub struct MasterOpBuilder {
    op_key: i64,
    work_center: Option<String>,
    plant: Option<String>,
    quantity: f64,
    unit: String,
    description: Option<String>,
}

impl MasterOpBuilder {
    pub fn new(op_key: i64) -> Self {
        Self {
            op_key,
            work_center: Some("WC01".to_string()),
            plant: Some("1000".to_string()),
            quantity: 1.0,
            unit: "H".to_string(),
            description: None,
        }
    }

    pub fn quantity(mut self, quantity: f64, unit: &str) -> Self {
        self.quantity = quantity;
        self.unit = unit.to_string();
        self
    }

    pub fn work_center(mut self, work_center: &str) -> Self {
        self.work_center = Some(work_center.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn build(self) -> MasterOperation {
        MasterOperation {
            op_key: self.op_key,
            work_center: self.work_center,
            plant: self.plant,
            quantity: self.quantity,
            unit: self.unit,
            description: self.description,
            quantity_hours: 0.0,
            norm_description: None,
        }
    }
}

// ==========================================
// ExecutedOperation 构建器
// ==========================================

pub struct ExecutedOpBuilder {
    order_id: String,
    op_key: i64,
    work_center: Option<String>,
    plant: Option<String>,
    quantity: Option<f64>,
    unit: Option<String>,
    description: Option<String>,
}

impl ExecutedOpBuilder {
    pub fn new(order_id: &str, op_key: i64) -> Self {
        Self {
            order_id: order_id.to_string(),
            op_key,
            work_center: Some("WC01".to_string()),
            plant: Some("1000".to_string()),
            quantity: Some(1.0),
            unit: Some("H".to_string()),
            description: None,
        }
    }

    pub fn quantity(mut self, quantity: f64, unit: &str) -> Self {
        self.quantity = Some(quantity);
        self.unit = Some(unit.to_string());
        self
    }

    pub fn no_quantity(mut self) -> Self {
        self.quantity = None;
        self.unit = None;
        self
    }

    pub fn work_center(mut self, work_center: &str) -> Self {
        self.work_center = Some(work_center.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn build(self) -> ExecutedOperation {
        ExecutedOperation {
            order_id: self.order_id,
            op_key: self.op_key,
            work_center: self.work_center,
            plant: self.plant,
            quantity: self.quantity,
            unit: self.unit,
            description: self.description,
            quantity_hours: None,
            norm_description: None,
        }
    }
}

// ==========================================
// 嵌入测试桩
// ==========================================

/// 所有文本映射为同一向量: 任意两段文本相似度为 1,聚成单簇
pub struct SameVectorProvider;

#[async_trait]
impl EmbeddingProvider for SameVectorProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }
}
