// ==========================================
// 维护任务清单对账系统 - 学习聚合引擎
// ==========================================
// 职责: 把全部单工单诊断折叠为全量统计
// 红线: 折叠可交换可结合 —— 不相交工单子集的部分聚合可按元素并/加合并,
//       便于并行化时免去重排序
// 口径: 在场数按"该工单产生过该键工时差值"推导(匹配即在场)
// ==========================================

use crate::domain::diagnostic::{AggregatedLearning, OrderDiagnostic};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

// ==========================================
// LearningAggregator - 学习聚合引擎
// ==========================================
// 无状态纯折叠,不持有任何跨调用数据
pub struct LearningAggregator;

impl LearningAggregator {
    /// 创建新的学习聚合引擎
    pub fn new() -> Self {
        Self
    }

    /// 聚合全部工单诊断
    #[instrument(skip(self, diagnostics))]
    pub fn aggregate<'a, I>(&self, diagnostics: I) -> AggregatedLearning
    where
        I: IntoIterator<Item = &'a OrderDiagnostic>,
    {
        let mut agg = AggregatedLearning::default();
        for diagnostic in diagnostics {
            self.absorb(&mut agg, diagnostic);
        }

        debug!(
            delta_keys = agg.quantity_deltas.len(),
            field_entries = agg.field_stats.len(),
            missing_keys = agg.missing_ops_count.len(),
            new_ops = agg.new_ops.len(),
            "学习聚合完成"
        );

        agg
    }

    /// 折叠单个工单诊断(计数只增不减)
    pub fn absorb(&self, agg: &mut AggregatedLearning, diagnostic: &OrderDiagnostic) {
        // 工时差值: 按键追加
        for delta in &diagnostic.quantity_deltas {
            agg.quantity_deltas
                .entry(delta.op_key)
                .or_default()
                .push(delta.delta_hours);
        }

        // 在场数: 本工单匹配到的键,每工单至多记一次
        let present_keys: BTreeSet<i64> =
            diagnostic.quantity_deltas.iter().map(|d| d.op_key).collect();
        for op_key in present_keys {
            *agg.op_presence.entry(op_key).or_insert(0) += 1;
        }

        // 字段不一致: (键, 字段, 观测值) 计数
        for mismatch in &diagnostic.field_mismatches {
            *agg.field_stats
                .entry((mismatch.op_key, mismatch.field, mismatch.actual.clone()))
                .or_insert(0) += 1;
        }

        // 缺失计数
        for op_key in &diagnostic.missing_operations {
            *agg.missing_ops_count.entry(*op_key).or_insert(0) += 1;
        }

        // 临时作业: 平铺记录 + 每工单记一次
        if !diagnostic.new_operations.is_empty() {
            agg.new_ops.extend(diagnostic.new_operations.iter().cloned());
            agg.new_op_order_count += 1;
        }
    }

    /// 合并两个不相交工单子集的部分聚合(并行归并用)
    pub fn merge(&self, mut left: AggregatedLearning, right: AggregatedLearning) -> AggregatedLearning {
        for (op_key, deltas) in right.quantity_deltas {
            left.quantity_deltas.entry(op_key).or_default().extend(deltas);
        }
        for (key, count) in right.field_stats {
            *left.field_stats.entry(key).or_insert(0) += count;
        }
        for (op_key, count) in right.missing_ops_count {
            *left.missing_ops_count.entry(op_key).or_insert(0) += count;
        }
        for (op_key, count) in right.op_presence {
            *left.op_presence.entry(op_key).or_insert(0) += count;
        }
        left.new_op_order_count += right.new_op_order_count;
        left.new_ops.extend(right.new_ops);
        left
    }
}

impl Default for LearningAggregator {
    fn default() -> Self {
        Self::new()
    }
}
