// ==========================================
// 维护任务清单对账系统 - 引擎层
// ==========================================
// 职责: 对账与建议生成的全部业务规则
// 红线: 引擎不做 I/O; 嵌入能力经 trait 注入; 所有阈值来自配置对象
// ==========================================

pub mod aggregator;
pub mod analyzer;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod proposal;
pub mod semantic;
pub mod stats;
pub mod text;
pub mod unit;

// 重导出核心引擎
pub use aggregator::LearningAggregator;
pub use analyzer::OrderAnalyzer;
pub use error::EngineError;
pub use orchestrator::ReconcileOrchestrator;
pub use proposal::ProposalGenerator;
pub use semantic::{EmbeddingProvider, NoOpEmbeddingProvider, SemanticClusterer};
pub use unit::UnitNormalizer;
