// ==========================================
// 维护任务清单对账系统 - 核心库
// ==========================================
// 系统定位: 决策支持 —— 从已执行维护工单学习,
// 为主任务清单模板生成有统计支撑的变更建议(人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 运行参数
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CompareField, Confidence, ProposalType};

// 领域实体
pub use domain::{
    AggregatedLearning, ExecutedOperation, FieldMismatch, MasterOperation, OrderDiagnostic,
    Proposal, ProposalChange, ProposalEvidence, QuantityDelta, ReconciliationResult,
};

// 引擎
pub use engine::{
    EmbeddingProvider, EngineError, LearningAggregator, NoOpEmbeddingProvider, OrderAnalyzer,
    ProposalGenerator, ReconcileOrchestrator, SemanticClusterer, UnitNormalizer,
};

// 配置
pub use config::ReconcilerConfig;

// API
pub use api::{ReconciliationApi, ReconciliationRequest};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "维护任务清单对账系统";
