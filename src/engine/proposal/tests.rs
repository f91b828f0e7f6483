use super::ProposalGenerator;
use crate::config::ReconcilerConfig;
use crate::domain::diagnostic::AggregatedLearning;
use crate::domain::operation::{ExecutedOperation, MasterOperation};
use crate::domain::proposal::{ProposalChange, ProposalEvidence};
use crate::domain::types::{CompareField, Confidence, ProposalType};
use crate::engine::error::EngineError;
use crate::engine::semantic::{EmbeddingProvider, NoOpEmbeddingProvider, SemanticClusterer};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

// ==========================================
// 测试辅助
// ==========================================

/// 测试桩: 含相同关键词的文本映射为同一向量
struct KeywordStubProvider;

#[async_trait]
impl EmbeddingProvider for KeywordStubProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
        Ok(texts
            .iter()
            .map(|t| {
                if t.contains("seal") {
                    vec![1.0, 0.0, 0.0]
                } else if t.contains("valve") {
                    vec![0.0, 1.0, 0.0]
                } else {
                    vec![0.0, 0.0, 1.0]
                }
            })
            .collect())
    }
}

fn generator(config: ReconcilerConfig) -> ProposalGenerator {
    let config = Arc::new(config);
    ProposalGenerator::new(config, SemanticClusterer::new(Arc::new(KeywordStubProvider)))
}

fn generator_without_embeddings(config: ReconcilerConfig) -> ProposalGenerator {
    let config = Arc::new(config);
    ProposalGenerator::new(config, SemanticClusterer::new(Arc::new(NoOpEmbeddingProvider)))
}

/// 创建测试用的主模板作业(派生字段直接按 H 口径填好)
fn master_op(op_key: i64, quantity: f64, unit: &str, hours: f64, description: &str) -> MasterOperation {
    MasterOperation {
        op_key,
        work_center: Some("WC01".to_string()),
        plant: Some("1000".to_string()),
        quantity,
        unit: unit.to_string(),
        description: Some(description.to_string()),
        quantity_hours: hours,
        norm_description: crate::engine::text::normalize_description(Some(description)),
    }
}

fn master_index(ops: Vec<MasterOperation>) -> BTreeMap<i64, MasterOperation> {
    ops.into_iter().map(|m| (m.op_key, m)).collect()
}

fn ad_hoc_op(order_id: &str, description: &str, hours: f64) -> ExecutedOperation {
    ExecutedOperation {
        order_id: order_id.to_string(),
        op_key: 0,
        work_center: Some("WC07".to_string()),
        plant: Some("1000".to_string()),
        quantity: Some(hours),
        unit: Some("H".to_string()),
        description: Some(description.to_string()),
        quantity_hours: Some(hours),
        norm_description: crate::engine::text::normalize_description(Some(description)),
    }
}

/// 把 n 个工单的新增作业注入聚合(每工单一条,同一描述)
fn inject_new_ops(agg: &mut AggregatedLearning, orders: usize, description: &str, hours: f64) {
    for i in 0..orders {
        agg.new_ops
            .push(ad_hoc_op(&format!("ORD-{}", i), description, hours));
        agg.new_op_order_count += 1;
    }
}

// ==========================================
// 数量建议测试
// ==========================================

#[tokio::test]
async fn test_quantity_一致差值_high置信() {
    // 10 个工单,计划 4H,实际一致 4.4H (delta +0.4, CV=0)
    let engine = generator(ReconcilerConfig::default());
    let index = master_index(vec![master_op(10, 4.0, "H", 4.0, "Pump check")]);

    let mut agg = AggregatedLearning::default();
    agg.quantity_deltas.insert(10, vec![0.4; 10]);

    let proposals = engine.propose(&index, &agg, 10).await;

    assert_eq!(proposals.len(), 1);
    let p = &proposals[0];
    assert_eq!(p.proposal_type, ProposalType::UpdateQuantity);
    assert_eq!(p.confidence, Confidence::High);
    assert_eq!(p.op_key, Some(10));
    match p.change.as_ref().unwrap() {
        ProposalChange::Quantity {
            suggested_quantity,
            suggested_unit,
            normalized_hours,
            ..
        } => {
            assert!((suggested_quantity - 4.4).abs() < 1e-9);
            assert_eq!(suggested_unit, "H");
            assert!((normalized_hours - 4.4).abs() < 1e-9);
        }
        other => panic!("期望数量变更,实际 {:?}", other),
    }
    match &p.evidence {
        ProposalEvidence::Quantity { sample_size, cv, .. } => {
            assert_eq!(*sample_size, 10);
            assert_eq!(*cv, 0.0);
        }
        other => panic!("期望数量证据,实际 {:?}", other),
    }
}

#[tokio::test]
async fn test_quantity_样本不足或差值不实质_跳过() {
    let engine = generator(ReconcilerConfig::default());
    let index = master_index(vec![
        master_op(10, 4.0, "H", 4.0, "Pump check"),
        master_op(20, 2.0, "H", 2.0, "Valve check"),
    ]);

    let mut agg = AggregatedLearning::default();
    // 键 10: 只有 2 个样本
    agg.quantity_deltas.insert(10, vec![1.0, 1.0]);
    // 键 20: 均值差 0.1 < 0.25,不实质
    agg.quantity_deltas.insert(20, vec![0.1; 8]);

    let proposals = engine.propose(&index, &agg, 10).await;
    assert!(proposals.is_empty());
}

#[tokio::test]
async fn test_quantity_单位联动变更() {
    // 计划 15H,一致多 3H -> 18H: H 不可读(>16),D=2.25 可读
    let engine = generator(ReconcilerConfig::default());
    let index = master_index(vec![master_op(10, 15.0, "H", 15.0, "Overhaul")]);

    let mut agg = AggregatedLearning::default();
    agg.quantity_deltas.insert(10, vec![3.0; 5]);

    let proposals = engine.propose(&index, &agg, 5).await;

    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0].proposal_type, ProposalType::UpdateQuantityAndUnit);
    match proposals[0].change.as_ref().unwrap() {
        ProposalChange::Quantity {
            suggested_quantity,
            suggested_unit,
            ..
        } => {
            assert_eq!(suggested_unit, "D");
            assert!((suggested_quantity - 2.25).abs() < 1e-9);
        }
        other => panic!("期望数量变更,实际 {:?}", other),
    }
}

#[tokio::test]
async fn test_quantity_离群值被z过滤剔除() {
    let engine = generator(ReconcilerConfig::default());
    let index = master_index(vec![master_op(10, 4.0, "H", 4.0, "Pump check")]);

    let mut agg = AggregatedLearning::default();
    let mut deltas = vec![0.5; 9];
    deltas.push(50.0); // z = 3.0 -> 剔除
    agg.quantity_deltas.insert(10, deltas);

    let proposals = engine.propose(&index, &agg, 10).await;

    assert_eq!(proposals.len(), 1);
    match &proposals[0].evidence {
        ProposalEvidence::Quantity {
            sample_size,
            mean_delta_hours,
            ..
        } => {
            assert_eq!(*sample_size, 9);
            assert!((mean_delta_hours - 0.5).abs() < 1e-9);
        }
        other => panic!("期望数量证据,实际 {:?}", other),
    }
}

// ==========================================
// 描述建议测试
// ==========================================

fn description_stats(agg: &mut AggregatedLearning, op_key: i64, variant: &str, count: u32) {
    agg.field_stats.insert(
        (op_key, CompareField::OperationDescription, variant.to_string()),
        count,
    );
}

#[tokio::test]
async fn test_description_主簇达标_建议最高频原文() {
    let engine = generator(ReconcilerConfig::default());
    let index = master_index(vec![master_op(10, 4.0, "H", 4.0, "Replace bearing")]);

    let mut agg = AggregatedLearning::default();
    description_stats(&mut agg, 10, "Seal Replacement", 4);
    description_stats(&mut agg, 10, "seal replacement!", 2);

    // 主簇 6 条 / 10 工单 = 0.6 达标,但不 > 0.8 -> MEDIUM
    let proposals = engine.propose(&index, &agg, 10).await;

    assert_eq!(proposals.len(), 1);
    let p = &proposals[0];
    assert_eq!(p.proposal_type, ProposalType::UpdateDescription);
    assert_eq!(p.confidence, Confidence::Medium);
    match p.change.as_ref().unwrap() {
        ProposalChange::Description {
            suggested_description,
            current_description,
        } => {
            assert_eq!(suggested_description, "Seal Replacement");
            assert_eq!(current_description.as_deref(), Some("Replace bearing"));
        }
        other => panic!("期望描述变更,实际 {:?}", other),
    }
    match &p.evidence {
        ProposalEvidence::Description {
            variants,
            occurrences,
            orders_affected_ratio,
            ..
        } => {
            assert_eq!(variants.len(), 2);
            assert_eq!(*occurrences, 6);
            assert!((orders_affected_ratio - 0.6).abs() < 1e-9);
        }
        other => panic!("期望描述证据,实际 {:?}", other),
    }
}

#[tokio::test]
async fn test_description_与现描述归一化等同_跳过() {
    let engine = generator(ReconcilerConfig::default());
    // 现描述归一化后与变体相同 -> 无实质变更
    let index = master_index(vec![master_op(10, 4.0, "H", 4.0, "Seal   Replacement")]);

    let mut agg = AggregatedLearning::default();
    description_stats(&mut agg, 10, "Seal Replacement", 7);

    let proposals = engine.propose(&index, &agg, 10).await;
    assert!(proposals.is_empty());
}

#[tokio::test]
async fn test_description_特性开关关闭_整类跳过() {
    let mut config = ReconcilerConfig::default();
    config.description.enable_semantic = false;
    let engine = generator(config);
    let index = master_index(vec![master_op(10, 4.0, "H", 4.0, "Replace bearing")]);

    let mut agg = AggregatedLearning::default();
    description_stats(&mut agg, 10, "Seal Replacement", 9);

    let proposals = engine.propose(&index, &agg, 10).await;
    assert!(proposals.is_empty());
}

#[tokio::test]
async fn test_description_嵌入服务失败_只降级描述类() {
    let engine = generator_without_embeddings(ReconcilerConfig::default());
    let index = master_index(vec![master_op(10, 4.0, "H", 4.0, "Replace bearing")]);

    let mut agg = AggregatedLearning::default();
    description_stats(&mut agg, 10, "Seal Replacement", 9);
    // 数量规则不受影响
    agg.quantity_deltas.insert(10, vec![0.4; 10]);

    let proposals = engine.propose(&index, &agg, 10).await;

    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0].proposal_type, ProposalType::UpdateQuantity);
}

// ==========================================
// 通用字段建议测试
// ==========================================

#[tokio::test]
async fn test_field_占比阈值与置信映射() {
    let engine = generator(ReconcilerConfig::default());
    let index = master_index(vec![
        master_op(10, 4.0, "H", 4.0, "Pump check"),
        master_op(20, 2.0, "H", 2.0, "Valve check"),
        master_op(30, 1.0, "H", 1.0, "Greasing"),
    ]);

    let mut agg = AggregatedLearning::default();
    // 9/10 > 0.8 -> HIGH
    agg.field_stats.insert((10, CompareField::WorkCenter, "WC99".to_string()), 9);
    // 7/10 在 [0.6, 0.8] -> MEDIUM
    agg.field_stats.insert((20, CompareField::Plant, "2000".to_string()), 7);
    // 5/10 < 0.6 -> 跳过
    agg.field_stats.insert((30, CompareField::WorkCenter, "WC55".to_string()), 5);
    // Unit 不走通用字段规则
    agg.field_stats.insert((10, CompareField::Unit, "MIN".to_string()), 9);

    let proposals = engine.propose(&index, &agg, 10).await;

    assert_eq!(proposals.len(), 2);
    let wc = proposals
        .iter()
        .find(|p| p.proposal_type == ProposalType::UpdateWorkCenter)
        .unwrap();
    assert_eq!(wc.confidence, Confidence::High);
    assert_eq!(wc.op_key, Some(10));
    match wc.change.as_ref().unwrap() {
        ProposalChange::Field {
            current_value,
            suggested_value,
            ..
        } => {
            assert_eq!(current_value.as_deref(), Some("WC01"));
            assert_eq!(suggested_value, "WC99");
        }
        other => panic!("期望字段变更,实际 {:?}", other),
    }

    let plant = proposals
        .iter()
        .find(|p| p.proposal_type == ProposalType::UpdatePlant)
        .unwrap();
    assert_eq!(plant.confidence, Confidence::Medium);
}

// ==========================================
// 删除建议测试
// ==========================================

#[tokio::test]
async fn test_delete_默认配置下整类关闭() {
    // 默认 min_orders_needed_for_delete = 10,不满足 > 10 -> 不评估
    let engine = generator(ReconcilerConfig::default());
    let index = master_index(vec![master_op(20, 2.0, "H", 2.0, "Valve check")]);

    let mut agg = AggregatedLearning::default();
    agg.missing_ops_count.insert(20, 10);

    let proposals = engine.propose(&index, &agg, 10).await;
    assert!(proposals.is_empty());
}

#[tokio::test]
async fn test_delete_门槛满足_medium置信() {
    let mut config = ReconcilerConfig::default();
    config.deletion.min_orders_needed_for_delete = 11;
    config.deletion.min_presence_ratio = 0.0;
    let engine = generator(config);
    let index = master_index(vec![master_op(20, 2.0, "H", 2.0, "Valve check")]);

    // 键 20 在 10 个工单中全部缺失
    let mut agg = AggregatedLearning::default();
    agg.missing_ops_count.insert(20, 10);

    let proposals = engine.propose(&index, &agg, 10).await;

    assert_eq!(proposals.len(), 1);
    let p = &proposals[0];
    assert_eq!(p.proposal_type, ProposalType::DeleteOperation);
    assert_eq!(p.confidence, Confidence::Medium);
    assert_eq!(p.op_key, Some(20));
    assert!(p.change.is_none());
}

#[tokio::test]
async fn test_delete_在场率不足_跳过() {
    // 默认 min_presence_ratio = 0.2: 从未出现过的作业键不出删除建议
    let mut config = ReconcilerConfig::default();
    config.deletion.min_orders_needed_for_delete = 11;
    let engine = generator(config);
    let index = master_index(vec![master_op(20, 2.0, "H", 2.0, "Valve check")]);

    let mut agg = AggregatedLearning::default();
    agg.missing_ops_count.insert(20, 10);
    // op_presence 无键 20 -> 在场率 0 < 0.2

    let proposals = engine.propose(&index, &agg, 10).await;
    assert!(proposals.is_empty());

    // 出现 3/10 且缺失 7/10 (重复执行场景): 在场率 0.3 >= 0.2 -> 出建议
    let mut config = ReconcilerConfig::default();
    config.deletion.min_orders_needed_for_delete = 11;
    let engine = generator(config);
    let mut agg = AggregatedLearning::default();
    agg.missing_ops_count.insert(20, 7);
    agg.op_presence.insert(20, 3);

    let proposals = engine.propose(&master_index(vec![master_op(20, 2.0, "H", 2.0, "Valve check")]), &agg, 10).await;
    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0].proposal_type, ProposalType::DeleteOperation);
}

// ==========================================
// 新增建议测试
// ==========================================

#[tokio::test]
async fn test_addition_全局门槛边界_0_4不含等于() {
    // 4/10 = 0.4 不满足严格大于 -> 整类跳过
    let engine = generator(ReconcilerConfig::default());
    let index = master_index(vec![]);

    let mut agg = AggregatedLearning::default();
    inject_new_ops(&mut agg, 4, "Seal replacement", 1.5);

    let proposals = engine.propose(&index, &agg, 10).await;
    assert!(proposals.is_empty());
}

#[tokio::test]
async fn test_addition_簇占比不足_跳过() {
    // 5/10: 全局门槛 0.5 > 0.4 通过,但描述簇占比 0.5 < 0.6 -> 无建议
    let engine = generator(ReconcilerConfig::default());
    let index = master_index(vec![]);

    let mut agg = AggregatedLearning::default();
    inject_new_ops(&mut agg, 5, "Seal replacement", 1.5);

    let proposals = engine.propose(&index, &agg, 10).await;
    assert!(proposals.is_empty());
}

#[tokio::test]
async fn test_addition_达标_high置信() {
    let engine = generator(ReconcilerConfig::default());
    let index = master_index(vec![]);

    let mut agg = AggregatedLearning::default();
    inject_new_ops(&mut agg, 7, "Seal replacement", 1.5);

    let proposals = engine.propose(&index, &agg, 10).await;

    assert_eq!(proposals.len(), 1);
    let p = &proposals[0];
    assert_eq!(p.proposal_type, ProposalType::AddNewOperation);
    assert_eq!(p.confidence, Confidence::High);
    assert_eq!(p.op_key, None);
    match p.change.as_ref().unwrap() {
        ProposalChange::NewOperation {
            description,
            work_center,
            quantity,
            unit,
            ..
        } => {
            assert_eq!(description.as_deref(), Some("Seal replacement"));
            assert_eq!(work_center.as_deref(), Some("WC07"));
            assert!((quantity - 1.5).abs() < 1e-9);
            assert_eq!(unit, "H");
        }
        other => panic!("期望新增作业,实际 {:?}", other),
    }
    match &p.evidence {
        ProposalEvidence::Addition {
            occurrences,
            orders_affected_ratio,
            avg_quantity_hours,
        } => {
            assert_eq!(*occurrences, 7);
            assert!((orders_affected_ratio - 0.7).abs() < 1e-9);
            assert!((avg_quantity_hours - 1.5).abs() < 1e-9);
        }
        other => panic!("期望新增证据,实际 {:?}", other),
    }
}

#[tokio::test]
async fn test_addition_全簇缺量纲_跳过() {
    let engine = generator(ReconcilerConfig::default());
    let index = master_index(vec![]);

    let mut agg = AggregatedLearning::default();
    for i in 0..7 {
        let mut op = ad_hoc_op(&format!("ORD-{}", i), "Seal replacement", 1.5);
        op.quantity = None;
        op.unit = None;
        op.quantity_hours = None;
        agg.new_ops.push(op);
        agg.new_op_order_count += 1;
    }

    let proposals = engine.propose(&index, &agg, 10).await;
    assert!(proposals.is_empty());
}

// ==========================================
// 输出顺序契约测试
// ==========================================

#[tokio::test]
async fn test_proposal_列表固定顺序() {
    let mut config = ReconcilerConfig::default();
    config.deletion.min_orders_needed_for_delete = 11;
    config.deletion.min_presence_ratio = 0.0;
    let engine = generator(config);

    let index = master_index(vec![
        master_op(10, 4.0, "H", 4.0, "Pump check"),
        master_op(20, 2.0, "H", 2.0, "Valve overhaul"),
        master_op(30, 1.0, "H", 1.0, "Greasing"),
    ]);

    let mut agg = AggregatedLearning::default();
    // 数量: 键 10
    agg.quantity_deltas.insert(10, vec![0.5; 10]);
    // 描述: 键 20
    description_stats(&mut agg, 20, "Seal Replacement", 7);
    // 字段: 键 10
    agg.field_stats.insert((10, CompareField::WorkCenter, "WC99".to_string()), 9);
    // 删除: 键 30
    agg.missing_ops_count.insert(30, 8);
    // 新增
    inject_new_ops(&mut agg, 7, "Shaft alignment", 2.0);

    let proposals = engine.propose(&index, &agg, 10).await;

    let types: Vec<ProposalType> = proposals.iter().map(|p| p.proposal_type).collect();
    assert_eq!(
        types,
        vec![
            ProposalType::UpdateQuantity,
            ProposalType::UpdateDescription,
            ProposalType::UpdateWorkCenter,
            ProposalType::DeleteOperation,
            ProposalType::AddNewOperation,
        ]
    );
}
