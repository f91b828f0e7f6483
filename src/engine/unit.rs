// ==========================================
// 维护任务清单对账系统 - 单位归一化引擎
// ==========================================
// 职责: (数量,单位) 与规范小时值的双向换算
// 输入: 配置中的单位换算表 + 可读区间
// 输出: 小时值 / 人类可读的 (数量,单位) 建议
// 红线: 未知单位是硬失败,没有缺省单位兜底
// ==========================================

use crate::config::ReconcilerConfig;
use crate::engine::error::EngineError;
use crate::engine::stats::round2;
use std::sync::Arc;

/// 规范小时单位代码(归一化基准)
const HOUR_UNIT: &str = "H";

// ==========================================
// UnitNormalizer - 单位归一化引擎
// ==========================================
pub struct UnitNormalizer {
    config: Arc<ReconcilerConfig>,
}

impl UnitNormalizer {
    /// 创建新的单位归一化引擎
    pub fn new(config: Arc<ReconcilerConfig>) -> Self {
        Self { config }
    }

    /// 将 (数量, 单位) 换算为小时值
    ///
    /// # 返回
    /// - `Ok(hours)`: 归一化小时值
    /// - `Err(UnsupportedUnit)`: 单位不在换算表内
    pub fn to_hours(&self, quantity: f64, unit: &str) -> Result<f64, EngineError> {
        let spec = self
            .config
            .unit_spec(unit)
            .ok_or_else(|| EngineError::UnsupportedUnit {
                unit: unit.to_string(),
            })?;

        Ok(quantity * spec.factor_to_hours)
    }

    /// 为小时值选择最人类可读的 (数量, 单位) 表达
    ///
    /// 选择顺序(决定建议表达的稳定性,防止 1D 与 8H 来回摆动):
    /// 1. preferred_unit 有落在可读区间内的候选 -> 用它
    /// 2. 否则按单位表顺序 (H -> MIN -> D) 取第一个可读候选
    /// 3. 都不可读 -> 原样返回小时值,单位 H
    ///
    /// 数量一律保留 2 位小数
    pub fn suggest_quantity_and_unit(
        &self,
        hours_value: f64,
        preferred_unit: Option<&str>,
    ) -> (f64, String) {
        // 每个单位换算出候选数量,只保留落在可读区间内的
        let candidates: Vec<(&str, f64)> = self
            .config
            .units
            .iter()
            .filter_map(|spec| {
                let qty = hours_value / spec.factor_to_hours;
                if qty >= spec.readable_min && qty <= spec.readable_max {
                    Some((spec.code.as_str(), round2(qty)))
                } else {
                    None
                }
            })
            .collect();

        // 1. 能留在原单位就留在原单位
        if let Some(preferred) = preferred_unit {
            if let Some((unit, qty)) = candidates.iter().find(|(u, _)| *u == preferred) {
                return (*qty, unit.to_string());
            }
        }

        // 2. 单位表顺序即优先级
        if let Some((unit, qty)) = candidates.first() {
            return (*qty, unit.to_string());
        }

        // 3. 兜底: 小时原值
        (round2(hours_value), HOUR_UNIT.to_string())
    }
}
