// ==========================================
// 维护任务清单对账系统 - 引擎编排器
// ==========================================
// 用途: 协调 分析 -> 聚合 -> 建议 的单批次主流程
// 口径: 纯批函数,批内数据不跨调用存活,无共享可变状态
// ==========================================

use crate::config::ReconcilerConfig;
use crate::domain::operation::{ExecutedOperation, MasterOperation};
use crate::domain::result::ReconciliationResult;
use crate::engine::aggregator::LearningAggregator;
use crate::engine::analyzer::OrderAnalyzer;
use crate::engine::error::EngineError;
use crate::engine::model::{prepare_executed_operations, prepare_master_operations};
use crate::engine::proposal::ProposalGenerator;
use crate::engine::semantic::{EmbeddingProvider, SemanticClusterer};
use crate::engine::unit::UnitNormalizer;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

// ==========================================
// ReconcileOrchestrator - 引擎编排器
// ==========================================

pub struct ReconcileOrchestrator {
    units: UnitNormalizer,
    analyzer: OrderAnalyzer,
    aggregator: LearningAggregator,
    proposer: ProposalGenerator,
}

impl ReconcileOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 引擎配置(只读)
    /// - embeddings: 注入的文本嵌入后端(语义描述建议用)
    pub fn new(config: Arc<ReconcilerConfig>, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            units: UnitNormalizer::new(config.clone()),
            analyzer: OrderAnalyzer::new(),
            aggregator: LearningAggregator::new(),
            proposer: ProposalGenerator::new(config, SemanticClusterer::new(embeddings)),
        }
    }

    /// 执行完整对账流程(单批次)
    ///
    /// # 参数
    /// - master_operations: 主模板作业列表
    /// - executed_operations: 已执行作业列表(可跨多个工单)
    ///
    /// # 返回
    /// 逐工单诊断 + 主模板变更建议; 空批次返回空结果而不报错
    #[instrument(
        skip(self, master_operations, executed_operations),
        fields(master = master_operations.len(), executed = executed_operations.len())
    )]
    pub async fn run_reconciliation(
        &self,
        master_operations: Vec<MasterOperation>,
        executed_operations: Vec<ExecutedOperation>,
    ) -> Result<ReconciliationResult, EngineError> {
        let run_id = Uuid::new_v4();
        info!(%run_id, "对账批次开始");

        // 1. 模型准备: 边界校验 + 工时/描述归一
        let masters = prepare_master_operations(master_operations, &self.units)?;
        let executed = prepare_executed_operations(executed_operations, &self.units)?;

        // 主模板键索引; 重复键保留首行
        let mut master_index: BTreeMap<i64, MasterOperation> = BTreeMap::new();
        for master in masters {
            master_index.entry(master.op_key).or_insert(master);
        }

        // 2. 按工单分组
        let mut orders: BTreeMap<String, Vec<ExecutedOperation>> = BTreeMap::new();
        for op in executed {
            orders.entry(op.order_id.clone()).or_default().push(op);
        }

        // 3. 逐工单分析
        let mut diagnostics = BTreeMap::new();
        for (order_id, ops) in &orders {
            let diagnostic = self.analyzer.analyze(order_id, ops, &master_index);
            diagnostics.insert(order_id.clone(), diagnostic);
        }

        // 4. 全量聚合
        let agg = self.aggregator.aggregate(diagnostics.values());
        let total_orders = diagnostics.len();

        // 5. 建议生成
        let proposals = self.proposer.propose(&master_index, &agg, total_orders).await;

        info!(
            %run_id,
            total_orders,
            proposals = proposals.len(),
            "对账批次完成"
        );

        Ok(ReconciliationResult {
            run_id,
            generated_at: Utc::now(),
            total_orders,
            per_order_diagnostics: diagnostics,
            master_change_proposals: proposals,
        })
    }
}
