// ==========================================
// 维护任务清单对账系统 - 语义聚类引擎
// ==========================================
// 职责: 将描述变体按语义相似度分簇
// 说明: Engine 层定义嵌入能力 trait,具体后端由外部注入(依赖倒置)
// 算法: 余弦相似度矩阵 + 单遍贪心聚簇(非传递!)
// ==========================================

use crate::engine::error::EngineError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

// ==========================================
// EmbeddingProvider - 文本嵌入能力
// ==========================================

/// 批量文本嵌入能力
///
/// 无状态批函数: 每段文本映射为一个定长向量。
/// 后端身份与延迟对聚类正确性无影响; 失败由调用方降级处理。
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError>;
}

/// 空实现: 始终失败
///
/// 未接入嵌入后端时使用; 语义描述建议随之整体降级为跳过
pub struct NoOpEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for NoOpEmbeddingProvider {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
        Err(EngineError::EmbeddingFailure("嵌入服务未配置".to_string()))
    }
}

// ==========================================
// SemanticClusterer - 语义聚类引擎
// ==========================================
pub struct SemanticClusterer {
    provider: Arc<dyn EmbeddingProvider>,
}

impl SemanticClusterer {
    /// 创建新的语义聚类引擎
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// 按语义相似度分簇
    ///
    /// 单遍贪心: 按原顺序扫描,未入簇的文本作为种子开新簇,
    /// 再把其后所有与种子相似度 >= threshold 的未入簇文本并入。
    /// 注意这不是传递闭包 —— B、C 可以都进 A 的簇而 B-C 相似度低于阈值。
    ///
    /// # 返回
    /// 互不相交且覆盖全部下标的簇列表,簇顺序按种子首次出现
    pub async fn cluster(
        &self,
        texts: &[String],
        threshold: f64,
    ) -> Result<Vec<Vec<usize>>, EngineError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self.provider.embed(texts).await?;
        if embeddings.len() != texts.len() {
            return Err(EngineError::EmbeddingResponseMismatch {
                expected: texts.len(),
                actual: embeddings.len(),
            });
        }

        debug!(count = texts.len(), threshold, "语义聚类开始");

        let n = texts.len();
        let mut used = vec![false; n];
        let mut clusters: Vec<Vec<usize>> = Vec::new();

        for i in 0..n {
            if used[i] {
                continue;
            }

            let mut cluster = vec![i];
            used[i] = true;

            for j in (i + 1)..n {
                if !used[j] && cosine_similarity(&embeddings[i], &embeddings[j]) >= threshold {
                    cluster.push(j);
                    used[j] = true;
                }
            }

            clusters.push(cluster);
        }

        Ok(clusters)
    }
}

/// 余弦相似度; 零向量相似度记 0
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
