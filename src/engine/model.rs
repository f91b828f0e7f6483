// ==========================================
// 维护任务清单对账系统 - 模型准备
// ==========================================
// 职责: 对账前的边界校验与派生字段填充
// 输入: 扁平化的主模板作业 / 已执行作业列表(规范模式,不含传输包络)
// 输出: 填充 quantity_hours / norm_description 后的同构列表
// 红线: 匹配侧(op_key!=0)缺数量或单位是校验失败,不静默跳过
// ==========================================

use crate::domain::operation::{ExecutedOperation, MasterOperation};
use crate::engine::error::EngineError;
use crate::engine::text::normalize_description;
use crate::engine::unit::UnitNormalizer;

/// 准备主模板作业: 工时归一 + 描述归一
///
/// 未知单位以 `UnsupportedUnit` 硬失败
pub fn prepare_master_operations(
    ops: Vec<MasterOperation>,
    units: &UnitNormalizer,
) -> Result<Vec<MasterOperation>, EngineError> {
    ops.into_iter()
        .map(|mut op| {
            op.quantity_hours = units.to_hours(op.quantity, &op.unit)?;
            op.norm_description = normalize_description(op.description.as_deref());
            Ok(op)
        })
        .collect()
}

/// 准备已执行作业: 工时归一 + 描述归一
///
/// 口径:
/// - op_key != 0 的匹配行必须带数量与单位,缺失是 `FieldValueError`
/// - op_key = 0 的临时行允许缺量,quantity_hours 留空
/// - 只要单位存在,未知单位一律 `UnsupportedUnit`
pub fn prepare_executed_operations(
    ops: Vec<ExecutedOperation>,
    units: &UnitNormalizer,
) -> Result<Vec<ExecutedOperation>, EngineError> {
    ops.into_iter()
        .map(|mut op| {
            op.quantity_hours = match (op.quantity, op.unit.as_deref()) {
                (Some(qty), Some(unit)) => Some(units.to_hours(qty, unit)?),
                (quantity, unit) if !op.is_ad_hoc() => {
                    let field = if quantity.is_none() { "quantity" } else { "unit" };
                    return Err(EngineError::FieldValueError {
                        field: field.to_string(),
                        message: format!(
                            "工单 {} 作业 {} 缺少必填字段 (unit={:?})",
                            op.order_id, op.op_key, unit
                        ),
                    });
                }
                _ => None,
            };
            op.norm_description = normalize_description(op.description.as_deref());
            Ok(op)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReconcilerConfig;
    use std::sync::Arc;

    fn units() -> UnitNormalizer {
        UnitNormalizer::new(Arc::new(ReconcilerConfig::default()))
    }

    fn master(op_key: i64, quantity: f64, unit: &str, description: Option<&str>) -> MasterOperation {
        MasterOperation {
            op_key,
            work_center: Some("WC01".to_string()),
            plant: Some("1000".to_string()),
            quantity,
            unit: unit.to_string(),
            description: description.map(|s| s.to_string()),
            quantity_hours: 0.0,
            norm_description: None,
        }
    }

    fn executed(order_id: &str, op_key: i64, quantity: Option<f64>, unit: Option<&str>) -> ExecutedOperation {
        ExecutedOperation {
            order_id: order_id.to_string(),
            op_key,
            work_center: None,
            plant: None,
            quantity,
            unit: unit.map(|s| s.to_string()),
            description: None,
            quantity_hours: None,
            norm_description: None,
        }
    }

    #[test]
    fn test_prepare_master_派生字段() {
        let prepared =
            prepare_master_operations(vec![master(10, 2.0, "D", Some("Check Pump!"))], &units())
                .unwrap();
        assert_eq!(prepared[0].quantity_hours, 16.0);
        assert_eq!(prepared[0].norm_description.as_deref(), Some("check pump"));
    }

    #[test]
    fn test_prepare_master_未知单位() {
        let err = prepare_master_operations(vec![master(10, 2.0, "KG", None)], &units()).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedUnit { .. }));
    }

    #[test]
    fn test_prepare_executed_匹配行缺量失败() {
        let err =
            prepare_executed_operations(vec![executed("O1", 10, None, Some("H"))], &units())
                .unwrap_err();
        assert!(matches!(err, EngineError::FieldValueError { .. }));
    }

    #[test]
    fn test_prepare_executed_临时行允许缺量() {
        let prepared =
            prepare_executed_operations(vec![executed("O1", 0, None, None)], &units()).unwrap();
        assert_eq!(prepared[0].quantity_hours, None);

        let prepared =
            prepare_executed_operations(vec![executed("O1", 0, Some(30.0), Some("MIN"))], &units())
                .unwrap();
        assert_eq!(prepared[0].quantity_hours, Some(0.5));
    }
}
