// ==========================================
// 维护任务清单对账系统 - 单工单分析引擎
// ==========================================
// 职责: 逐工单比对已执行作业与主模板,产出诊断记录
// 输入: 单工单的已执行作业 + 主模板键索引
// 输出: OrderDiagnostic (创建后只读)
// 口径: 按作业键内连接; 执行侧多出的非 0 键静默忽略(已知缺口,不报错)
// ==========================================

use crate::domain::diagnostic::{FieldMismatch, OrderDiagnostic, QuantityDelta};
use crate::domain::operation::MasterOperation;
use crate::domain::types::CompareField;
use crate::domain::ExecutedOperation;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

// ==========================================
// OrderAnalyzer - 单工单分析引擎
// ==========================================
// 无状态引擎,比对口径固定
pub struct OrderAnalyzer;

impl OrderAnalyzer {
    /// 创建新的单工单分析引擎
    pub fn new() -> Self {
        Self
    }

    /// 分析单个工单
    ///
    /// # 参数
    /// - order_id: 维护工单号
    /// - order_ops: 该工单的全部已执行作业(已经过模型准备)
    /// - master_index: 主模板作业键索引
    ///
    /// # 返回
    /// 单工单诊断: 临时作业 / 缺失作业键 / 工时差值 / 字段不一致
    #[instrument(skip(self, order_ops, master_index), fields(ops = order_ops.len()))]
    pub fn analyze(
        &self,
        order_id: &str,
        order_ops: &[ExecutedOperation],
        master_index: &BTreeMap<i64, MasterOperation>,
    ) -> OrderDiagnostic {
        let mut diagnostic = OrderDiagnostic::empty(order_id.to_string());

        // 1. 临时作业 (op_key = 0)
        diagnostic.new_operations = order_ops
            .iter()
            .filter(|op| op.is_ad_hoc())
            .cloned()
            .collect();

        // 2. 缺失作业: 主模板键集 - 工单键集
        let order_keys: BTreeSet<i64> = order_ops.iter().map(|op| op.op_key).collect();
        diagnostic.missing_operations = master_index
            .keys()
            .filter(|key| !order_keys.contains(key))
            .copied()
            .collect();

        // 3. 匹配比对: 逐执行行按键查主模板,查不到即跳过
        for op in order_ops.iter().filter(|op| !op.is_ad_hoc()) {
            let master = match master_index.get(&op.op_key) {
                Some(master) => master,
                None => {
                    debug!(op_key = op.op_key, "执行侧多出的作业键,不参与比对");
                    continue;
                }
            };

            self.compare_matched(op, master, &mut diagnostic);
        }

        diagnostic
    }

    /// 比对一对匹配作业的全部字段
    fn compare_matched(
        &self,
        actual: &ExecutedOperation,
        planned: &MasterOperation,
        diagnostic: &mut OrderDiagnostic,
    ) {
        // Quantity: 差值口径(小时),无论是否相等都记录
        if let Some(actual_hours) = actual.quantity_hours {
            diagnostic.quantity_deltas.push(QuantityDelta {
                op_key: actual.op_key,
                delta_hours: actual_hours - planned.quantity_hours,
            });
        }

        // 其余字段: 原值相等比对,仅在实际值存在且不同的情况下记录
        for field in CompareField::RAW_COMPARED {
            let (actual_value, planned_value) = match field {
                CompareField::Unit => (actual.unit.as_deref(), Some(planned.unit.as_str())),
                CompareField::WorkCenter => {
                    (actual.work_center.as_deref(), planned.work_center.as_deref())
                }
                CompareField::Plant => (actual.plant.as_deref(), planned.plant.as_deref()),
                CompareField::OperationDescription => {
                    (actual.description.as_deref(), planned.description.as_deref())
                }
                CompareField::Quantity => continue,
            };

            if let Some(actual_value) = actual_value {
                if Some(actual_value) != planned_value {
                    diagnostic.field_mismatches.push(FieldMismatch {
                        op_key: actual.op_key,
                        field,
                        actual: actual_value.to_string(),
                    });
                }
            }
        }
    }
}

impl Default for OrderAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
