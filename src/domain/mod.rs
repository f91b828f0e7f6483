// ==========================================
// 维护任务清单对账系统 - 领域层
// ==========================================
// 职责: 实体与类型定义,不含业务规则
// ==========================================

pub mod diagnostic;
pub mod operation;
pub mod proposal;
pub mod result;
pub mod types;

// 重导出核心实体
pub use diagnostic::{AggregatedLearning, FieldMismatch, OrderDiagnostic, QuantityDelta};
pub use operation::{ExecutedOperation, MasterOperation, AD_HOC_OP_KEY};
pub use proposal::{Proposal, ProposalChange, ProposalEvidence};
pub use result::ReconciliationResult;
pub use types::{CompareField, Confidence, ProposalType};
