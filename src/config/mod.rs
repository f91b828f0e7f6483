// ==========================================
// 维护任务清单对账系统 - 配置层
// ==========================================
// 职责: 引擎运行参数(单位换算表 / 统计阈值 / 特性开关)
// 红线: 配置对象构造后只读,不使用进程级全局可变状态
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// UnitSpec - 工时单位规格
// ==========================================
// factor_to_hours: 单位到小时的固定换算系数
// readable_min/max: 该单位"人类可读"的数量区间,用于建议单位选择
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub code: String,          // 单位代码 (H/MIN/D)
    pub factor_to_hours: f64,  // 换算系数 (1 单位 = factor 小时)
    pub readable_min: f64,     // 可读数量下限
    pub readable_max: f64,     // 可读数量上限
}

impl UnitSpec {
    fn new(code: &str, factor_to_hours: f64, readable_min: f64, readable_max: f64) -> Self {
        Self {
            code: code.to_string(),
            factor_to_hours,
            readable_min,
            readable_max,
        }
    }
}

// ==========================================
// 数量建议规则参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityRuleConfig {
    /// z 分数离群剔除阈值(|z| >= 阈值即剔除)
    #[serde(default = "default_zscore_cutoff")]
    pub zscore_cutoff: f64,

    /// 剔除离群后的最小鲁棒样本量
    #[serde(default = "default_min_samples")]
    pub min_robust_samples: usize,

    /// 截尾均值的单侧截尾比例
    #[serde(default = "default_trim_proportion")]
    pub trim_proportion: f64,

    /// 实质性差值下限(小时); 均值差绝对值低于此值不出建议
    #[serde(default = "default_min_material_delta")]
    pub min_material_delta_hours: f64,

    /// 变异系数 HIGH 置信上界
    #[serde(default = "default_cv_high")]
    pub cv_high: f64,

    /// 变异系数 MEDIUM 置信上界
    #[serde(default = "default_cv_medium")]
    pub cv_medium: f64,
}

impl Default for QuantityRuleConfig {
    fn default() -> Self {
        Self {
            zscore_cutoff: default_zscore_cutoff(),
            min_robust_samples: default_min_samples(),
            trim_proportion: default_trim_proportion(),
            min_material_delta_hours: default_min_material_delta(),
            cv_high: default_cv_high(),
            cv_medium: default_cv_medium(),
        }
    }
}

// ==========================================
// 描述建议规则参数(语义聚类)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionRuleConfig {
    /// 特性开关: 关闭时完全跳过描述类建议
    #[serde(default = "default_true")]
    pub enable_semantic: bool,

    /// 单作业键的最小描述不一致次数
    #[serde(default = "default_min_samples")]
    pub min_occurrences: usize,

    /// 语义聚类相似度阈值
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// 主簇占总工单比下限
    #[serde(default = "default_dominant_ratio")]
    pub dominant_ratio: f64,

    /// HIGH 置信占比下界(严格大于)
    #[serde(default = "default_high_ratio")]
    pub high_confidence_ratio: f64,
}

impl Default for DescriptionRuleConfig {
    fn default() -> Self {
        Self {
            enable_semantic: true,
            min_occurrences: default_min_samples(),
            similarity_threshold: default_similarity_threshold(),
            dominant_ratio: default_dominant_ratio(),
            high_confidence_ratio: default_high_ratio(),
        }
    }
}

// ==========================================
// 通用字段建议规则参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRuleConfig {
    /// 观测值占总工单比下限(含等于)
    #[serde(default = "default_dominant_ratio")]
    pub min_ratio: f64,

    /// HIGH 置信占比下界(严格大于)
    #[serde(default = "default_high_ratio")]
    pub high_confidence_ratio: f64,
}

impl Default for FieldRuleConfig {
    fn default() -> Self {
        Self {
            min_ratio: default_dominant_ratio(),
            high_confidence_ratio: default_high_ratio(),
        }
    }
}

// ==========================================
// 删除建议规则参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionRuleConfig {
    /// 全局启用门槛: 仅当该值 > 10 时评估删除建议
    #[serde(default = "default_min_orders_for_delete")]
    pub min_orders_needed_for_delete: u32,

    /// 最小历史在场率(出现工单数/总工单数)
    #[serde(default = "default_min_presence_ratio")]
    pub min_presence_ratio: f64,

    /// 缺失占总工单比下界(严格大于)
    #[serde(default = "default_dominant_ratio")]
    pub missing_ratio: f64,
}

impl Default for DeletionRuleConfig {
    fn default() -> Self {
        Self {
            min_orders_needed_for_delete: default_min_orders_for_delete(),
            min_presence_ratio: default_min_presence_ratio(),
            missing_ratio: default_dominant_ratio(),
        }
    }
}

// ==========================================
// 新增建议规则参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionRuleConfig {
    /// 全局门槛: 含临时作业的工单占比下界(严格大于)
    #[serde(default = "default_new_op_gate")]
    pub new_op_order_ratio_gate: f64,

    /// 单描述簇涉及工单占比下限(含等于)
    #[serde(default = "default_dominant_ratio")]
    pub cluster_ratio: f64,

    /// 平均工时的单侧截尾比例
    #[serde(default = "default_trim_proportion")]
    pub trim_proportion: f64,
}

impl Default for AdditionRuleConfig {
    fn default() -> Self {
        Self {
            new_op_order_ratio_gate: default_new_op_gate(),
            cluster_ratio: default_dominant_ratio(),
            trim_proportion: default_trim_proportion(),
        }
    }
}

// ==========================================
// ReconcilerConfig - 引擎配置根对象
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// 单位规格表; 向量顺序即建议单位的优先级 (H → MIN → D)
    #[serde(default = "default_units")]
    pub units: Vec<UnitSpec>,

    #[serde(default)]
    pub quantity: QuantityRuleConfig,

    #[serde(default)]
    pub description: DescriptionRuleConfig,

    #[serde(default)]
    pub field_rule: FieldRuleConfig,

    #[serde(default)]
    pub deletion: DeletionRuleConfig,

    #[serde(default)]
    pub addition: AdditionRuleConfig,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            units: default_units(),
            quantity: QuantityRuleConfig::default(),
            description: DescriptionRuleConfig::default(),
            field_rule: FieldRuleConfig::default(),
            deletion: DeletionRuleConfig::default(),
            addition: AdditionRuleConfig::default(),
        }
    }
}

impl ReconcilerConfig {
    /// 按单位代码查找单位规格
    pub fn unit_spec(&self, code: &str) -> Option<&UnitSpec> {
        self.units.iter().find(|u| u.code == code)
    }
}

// ==========================================
// 默认值(与源系统业务口径一致)
// ==========================================

fn default_units() -> Vec<UnitSpec> {
    vec![
        UnitSpec::new("H", 1.0, 0.25, 16.0),
        UnitSpec::new("MIN", 1.0 / 60.0, 1.0, 600.0),
        // 业务口径: 1 天 = 8 工作小时
        UnitSpec::new("D", 8.0, 0.25, 5.0),
    ]
}

fn default_zscore_cutoff() -> f64 {
    2.5
}

fn default_min_samples() -> usize {
    3
}

fn default_trim_proportion() -> f64 {
    0.1
}

fn default_min_material_delta() -> f64 {
    0.25
}

fn default_cv_high() -> f64 {
    0.3
}

fn default_cv_medium() -> f64 {
    0.5
}

fn default_similarity_threshold() -> f64 {
    0.8
}

fn default_dominant_ratio() -> f64 {
    0.6
}

fn default_high_ratio() -> f64 {
    0.8
}

fn default_min_orders_for_delete() -> u32 {
    10
}

fn default_min_presence_ratio() -> f64 {
    0.2
}

fn default_new_op_gate() -> f64 {
    0.4
}

fn default_true() -> bool {
    true
}
