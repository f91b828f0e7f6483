// ==========================================
// 维护任务清单对账系统 - 变更建议引擎核心
// ==========================================
// 职责: 五类建议规则(数量/描述/通用字段/删除/新增)
// 输入: AggregatedLearning + 主模板索引 + 总工单数(统计分母)
// 输出: 固定顺序的建议列表,同类内按作业键/描述键稳定
// 红线: 嵌入服务失败只降级描述类建议,其余规则照常执行
// ==========================================

use crate::config::ReconcilerConfig;
use crate::domain::diagnostic::AggregatedLearning;
use crate::domain::operation::{ExecutedOperation, MasterOperation};
use crate::domain::proposal::{Proposal, ProposalChange, ProposalEvidence};
use crate::domain::types::{CompareField, Confidence, ProposalType};
use crate::engine::semantic::SemanticClusterer;
use crate::engine::stats::{filter_by_zscore, most_common, round2, std_dev, trimmed_mean};
use crate::engine::text::normalize_description;
use crate::engine::unit::UnitNormalizer;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ==========================================
// ProposalGenerator - 变更建议引擎
// ==========================================
pub struct ProposalGenerator {
    config: Arc<ReconcilerConfig>,
    units: UnitNormalizer,
    clusterer: SemanticClusterer,
}

impl ProposalGenerator {
    /// 创建新的变更建议引擎
    ///
    /// # 参数
    /// - config: 引擎配置(只读)
    /// - clusterer: 语义聚类引擎(内部持有注入的嵌入后端)
    pub fn new(config: Arc<ReconcilerConfig>, clusterer: SemanticClusterer) -> Self {
        Self {
            units: UnitNormalizer::new(config.clone()),
            config,
            clusterer,
        }
    }

    /// 生成全部主模板变更建议
    ///
    /// # 参数
    /// - master_index: 主模板作业键索引
    /// - agg: 全量学习聚合
    /// - total_orders: 批次内不同工单数(所有占比规则的分母)
    ///
    /// # 返回
    /// 固定顺序的建议列表: 数量 -> 描述 -> 通用字段 -> 删除 -> 新增
    #[instrument(skip(self, master_index, agg))]
    pub async fn propose(
        &self,
        master_index: &BTreeMap<i64, MasterOperation>,
        agg: &AggregatedLearning,
        total_orders: usize,
    ) -> Vec<Proposal> {
        if total_orders == 0 {
            return Vec::new();
        }

        let mut proposals = Vec::new();

        proposals.extend(self.propose_quantity_changes(master_index, agg));

        if self.config.description.enable_semantic {
            proposals.extend(
                self.propose_description_changes(master_index, agg, total_orders)
                    .await,
            );
        } else {
            debug!("语义描述建议已关闭,跳过");
        }

        proposals.extend(self.propose_field_changes(master_index, agg, total_orders));
        proposals.extend(self.propose_deletions(agg, total_orders));
        proposals.extend(self.propose_additions(agg, total_orders));

        info!(count = proposals.len(), total_orders, "建议生成完成");
        proposals
    }

    // ==========================================
    // 数量建议 (统计过滤 + 单位联动)
    // ==========================================

    /// 数量建议: z 过滤 -> 鲁棒样本量 -> 截尾均值 -> 实质性 -> CV 置信
    fn propose_quantity_changes(
        &self,
        master_index: &BTreeMap<i64, MasterOperation>,
        agg: &AggregatedLearning,
    ) -> Vec<Proposal> {
        let rules = &self.config.quantity;
        let mut proposals = Vec::new();

        for (op_key, deltas) in &agg.quantity_deltas {
            // 1. 离群剔除
            let filtered = filter_by_zscore(deltas, rules.zscore_cutoff);
            if filtered.len() < rules.min_robust_samples {
                continue; // 样本不足是正常跳过,不是错误
            }

            // 2. 截尾均值 + 离散度
            let mean_delta = match trimmed_mean(&filtered, rules.trim_proportion) {
                Some(m) => m,
                None => continue,
            };
            let sd = std_dev(&filtered).unwrap_or(0.0);
            let cv = if mean_delta != 0.0 {
                sd / mean_delta.abs()
            } else {
                f64::INFINITY
            };

            // 3. 实质性门槛
            if mean_delta.abs() < rules.min_material_delta_hours {
                continue;
            }

            let master = match master_index.get(op_key) {
                Some(master) => master,
                None => {
                    warn!(op_key, "差值键在主模板中不存在,跳过");
                    continue;
                }
            };

            // 4. 建议值与可读单位(优先保留现单位)
            let suggested_hours = master.quantity_hours + mean_delta;
            let (suggested_qty, suggested_unit) = self
                .units
                .suggest_quantity_and_unit(suggested_hours, Some(&master.unit));

            let confidence = if cv < rules.cv_high {
                Confidence::High
            } else if cv < rules.cv_medium {
                Confidence::Medium
            } else {
                Confidence::Low
            };

            let proposal_type = if suggested_unit != master.unit {
                ProposalType::UpdateQuantityAndUnit
            } else {
                ProposalType::UpdateQuantity
            };

            proposals.push(Proposal {
                op_key: Some(*op_key),
                proposal_type,
                confidence,
                change: Some(ProposalChange::Quantity {
                    current_quantity: master.quantity,
                    current_unit: master.unit.clone(),
                    suggested_quantity: suggested_qty,
                    suggested_unit,
                    normalized_hours: round2(suggested_hours),
                }),
                evidence: ProposalEvidence::Quantity {
                    mean_delta_hours: round2(mean_delta),
                    std_dev: round2(sd),
                    cv: round2(cv),
                    sample_size: filtered.len() as u32,
                },
            });
        }

        proposals
    }

    // ==========================================
    // 描述建议 (语义聚类)
    // ==========================================

    /// 描述建议: 归一化变体 -> 语义聚簇 -> 主簇占比 -> 最高频原文
    async fn propose_description_changes(
        &self,
        master_index: &BTreeMap<i64, MasterOperation>,
        agg: &AggregatedLearning,
        total_orders: usize,
    ) -> Vec<Proposal> {
        let rules = &self.config.description;
        let mut proposals = Vec::new();

        // 按作业键收集描述变体(保留出现次数的多重性)
        let mut desc_map: BTreeMap<i64, Vec<String>> = BTreeMap::new();
        for ((op_key, field, actual), count) in &agg.field_stats {
            if *field != CompareField::OperationDescription {
                continue;
            }
            let variants = desc_map.entry(*op_key).or_default();
            for _ in 0..*count {
                variants.push(actual.clone());
            }
        }

        for (op_key, desc_list) in desc_map {
            if desc_list.len() < rules.min_occurrences {
                continue;
            }

            // 归一化,原文按下标对齐
            let mut norm_descs = Vec::new();
            let mut raw_descs = Vec::new();
            for desc in &desc_list {
                if let Some(normalized) = normalize_description(Some(desc)) {
                    norm_descs.push(normalized);
                    raw_descs.push(desc.clone());
                }
            }
            if norm_descs.is_empty() {
                continue;
            }

            // 语义聚簇; 嵌入服务失败 -> 本键降级跳过
            let clusters = match self
                .clusterer
                .cluster(&norm_descs, rules.similarity_threshold)
                .await
            {
                Ok(clusters) => clusters,
                Err(e) => {
                    warn!(op_key, error = %e, "嵌入服务不可用,跳过该键的描述建议");
                    continue;
                }
            };

            // 主簇: 最大簇,并列取先出现者
            let dominant = match first_largest(&clusters) {
                Some(cluster) => cluster,
                None => continue,
            };
            let ratio = dominant.len() as f64 / total_orders as f64;
            if ratio < rules.dominant_ratio {
                continue;
            }

            // 代表文本: 主簇内最高频原文
            let cluster_raw: Vec<String> =
                dominant.iter().map(|i| raw_descs[*i].clone()).collect();
            let suggested = match most_common(&cluster_raw) {
                Some(s) => s,
                None => continue,
            };

            let master = match master_index.get(&op_key) {
                Some(master) => master,
                None => continue,
            };

            // 归一化后等同现描述 -> 无实质变更
            if master.norm_description == normalize_description(Some(&suggested)) {
                continue;
            }

            let confidence = if ratio > rules.high_confidence_ratio {
                Confidence::High
            } else {
                Confidence::Medium
            };

            proposals.push(Proposal {
                op_key: Some(op_key),
                proposal_type: ProposalType::UpdateDescription,
                confidence,
                change: Some(ProposalChange::Description {
                    current_description: master.description.clone(),
                    suggested_description: suggested,
                }),
                evidence: ProposalEvidence::Description {
                    variants: distinct_preserving_order(&cluster_raw),
                    occurrences: cluster_raw.len() as u32,
                    orders_affected_ratio: round2(ratio),
                    semantic_threshold: rules.similarity_threshold,
                },
            });
        }

        proposals
    }

    // ==========================================
    // 通用字段建议
    // ==========================================

    /// 通用字段建议: 同一观测值占比达标即建议覆盖主模板
    ///
    /// Unit 由数量规则联动处理,描述由语义规则处理,均不在此出建议
    fn propose_field_changes(
        &self,
        master_index: &BTreeMap<i64, MasterOperation>,
        agg: &AggregatedLearning,
        total_orders: usize,
    ) -> Vec<Proposal> {
        let rules = &self.config.field_rule;
        let mut proposals = Vec::new();

        for ((op_key, field, observed), count) in &agg.field_stats {
            let ratio = *count as f64 / total_orders as f64;
            if ratio < rules.min_ratio {
                continue;
            }

            let (proposal_type, current_value) = match field {
                CompareField::WorkCenter => {
                    let master = match master_index.get(op_key) {
                        Some(master) => master,
                        None => continue,
                    };
                    (ProposalType::UpdateWorkCenter, master.work_center.clone())
                }
                CompareField::Plant => {
                    let master = match master_index.get(op_key) {
                        Some(master) => master,
                        None => continue,
                    };
                    (ProposalType::UpdatePlant, master.plant.clone())
                }
                // Unit/描述走专门规则
                _ => continue,
            };

            let confidence = if ratio > rules.high_confidence_ratio {
                Confidence::High
            } else {
                Confidence::Medium
            };

            proposals.push(Proposal {
                op_key: Some(*op_key),
                proposal_type,
                confidence,
                change: Some(ProposalChange::Field {
                    field: *field,
                    current_value,
                    suggested_value: observed.clone(),
                }),
                evidence: ProposalEvidence::Field {
                    occurrences: *count,
                    orders_affected_ratio: round2(ratio),
                },
            });
        }

        proposals
    }

    // ==========================================
    // 删除建议 (结构性)
    // ==========================================

    /// 删除建议: 全局门槛 + 在场率下限 + 缺失占比
    fn propose_deletions(&self, agg: &AggregatedLearning, total_orders: usize) -> Vec<Proposal> {
        let rules = &self.config.deletion;
        let mut proposals = Vec::new();

        // 全局启用门槛未达标时整类关闭
        if rules.min_orders_needed_for_delete <= 10 {
            return proposals;
        }

        for (op_key, missing_count) in &agg.missing_ops_count {
            let presence = agg.op_presence.get(op_key).copied().unwrap_or(0);
            let presence_ratio = presence as f64 / total_orders as f64;

            if presence_ratio < rules.min_presence_ratio {
                continue;
            }

            let missing_ratio = *missing_count as f64 / total_orders as f64;
            if missing_ratio > rules.missing_ratio {
                proposals.push(Proposal {
                    op_key: Some(*op_key),
                    proposal_type: ProposalType::DeleteOperation,
                    confidence: Confidence::Medium,
                    change: None,
                    evidence: ProposalEvidence::Missing {
                        missing_orders: *missing_count,
                        orders_affected_ratio: round2(missing_ratio),
                        presence_ratio: round2(presence_ratio),
                    },
                });
            }
        }

        proposals
    }

    // ==========================================
    // 新增建议 (临时作业聚类)
    // ==========================================

    /// 新增建议: 全局新作业占比门槛 -> 按归一化描述分簇 -> 簇内属性聚合
    fn propose_additions(&self, agg: &AggregatedLearning, total_orders: usize) -> Vec<Proposal> {
        let rules = &self.config.addition;
        let mut proposals = Vec::new();

        let new_op_ratio = agg.new_op_order_count as f64 / total_orders as f64;
        if agg.new_ops.is_empty() || new_op_ratio <= rules.new_op_order_ratio_gate {
            return proposals;
        }

        // 按归一化描述分簇(无描述的记录不参与)
        let mut clusters: BTreeMap<String, Vec<&ExecutedOperation>> = BTreeMap::new();
        for op in &agg.new_ops {
            if let Some(key) = &op.norm_description {
                clusters.entry(key.clone()).or_default().push(op);
            }
        }

        for (desc_key, ops) in clusters {
            let affected_orders: BTreeSet<&str> =
                ops.iter().map(|op| op.order_id.as_str()).collect();
            let ratio = affected_orders.len() as f64 / total_orders as f64;

            if ratio < rules.cluster_ratio {
                debug!(desc_key = %desc_key, ratio, "临时作业簇占比不足,跳过");
                continue;
            }

            // 属性聚合: 工作中心/工厂取最高频,工时取截尾均值
            let wc_values: Vec<String> =
                ops.iter().filter_map(|op| op.work_center.clone()).collect();
            let plant_values: Vec<String> = ops.iter().filter_map(|op| op.plant.clone()).collect();

            let qty_hours: Vec<f64> = ops.iter().filter_map(|op| op.quantity_hours).collect();
            if qty_hours.is_empty() {
                continue; // 没有任何记录同时带数量与单位
            }
            let avg_hours = match trimmed_mean(&qty_hours, rules.trim_proportion) {
                Some(avg) => avg,
                None => continue,
            };

            let (suggested_qty, suggested_unit) =
                self.units.suggest_quantity_and_unit(avg_hours, None);

            proposals.push(Proposal {
                op_key: None,
                proposal_type: ProposalType::AddNewOperation,
                confidence: Confidence::High,
                change: Some(ProposalChange::NewOperation {
                    description: ops[0].description.clone(),
                    work_center: most_common(&wc_values),
                    plant: most_common(&plant_values),
                    quantity: suggested_qty,
                    unit: suggested_unit,
                }),
                evidence: ProposalEvidence::Addition {
                    occurrences: ops.len() as u32,
                    orders_affected_ratio: round2(ratio),
                    avg_quantity_hours: round2(avg_hours),
                },
            });
        }

        proposals
    }
}

/// 最大簇,并列时取先出现者
fn first_largest(clusters: &[Vec<usize>]) -> Option<&Vec<usize>> {
    let mut best: Option<&Vec<usize>> = None;
    for cluster in clusters {
        match best {
            Some(b) if cluster.len() <= b.len() => {}
            _ => best = Some(cluster),
        }
    }
    best
}

/// 去重并保持首次出现顺序
fn distinct_preserving_order(values: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut result = Vec::new();
    for value in values {
        if seen.insert(value.clone()) {
            result.push(value.clone());
        }
    }
    result
}
