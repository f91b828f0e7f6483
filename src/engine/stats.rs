// ==========================================
// 维护任务清单对账系统 - 统计工具
// ==========================================
// 职责: 数量规则与新增规则共用的统计原语
// 口径: 标准差取总体口径(分母 n); 截尾均值每侧去 floor(n*p) 个
// ==========================================

/// 算术平均; 空样本返回 None
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// 总体标准差(分母 n); 空样本返回 None
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// 按 |z| < cutoff 过滤离群值
///
/// 边界口径: 样本离散度为 0 (全部相同)时,没有任何值偏离,
/// 全部保留 —— 最一致的证据不能因除零被整体丢弃
pub fn filter_by_zscore(values: &[f64], cutoff: f64) -> Vec<f64> {
    let m = match mean(values) {
        Some(m) => m,
        None => return Vec::new(),
    };
    let sd = std_dev(values).unwrap_or(0.0);

    if sd == 0.0 {
        return values.to_vec();
    }

    values
        .iter()
        .copied()
        .filter(|v| ((v - m) / sd).abs() < cutoff)
        .collect()
}

/// 截尾均值: 排序后每侧去掉 floor(n * proportion) 个再取均值
///
/// 空样本或截尾后为空时返回 None
pub fn trimmed_mean(values: &[f64], proportion: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let cut = (sorted.len() as f64 * proportion).floor() as usize;
    if cut * 2 >= sorted.len() {
        return None;
    }
    let kept = &sorted[cut..sorted.len() - cut];

    mean(kept)
}

/// 出现次数最多的值; 并列时取先出现者
pub fn most_common<T: Eq + std::hash::Hash + Clone>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }

    let mut counts: std::collections::HashMap<&T, usize> = std::collections::HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }

    let mut best: Option<(&T, usize)> = None;
    for v in values {
        let c = counts[v];
        match best {
            // 严格大于才替换,保证并列时先出现者获胜
            Some((_, bc)) if c <= bc => {}
            _ => best = Some((v, c)),
        }
    }

    best.map(|(v, _)| v.clone())
}

/// 四舍五入到 2 位小数(输出口径)
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_std() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
        assert_eq!(std_dev(&[1.0, 1.0, 1.0]), Some(0.0));
        // 总体口径: std([2,4]) = 1
        assert_eq!(std_dev(&[2.0, 4.0]), Some(1.0));
    }

    #[test]
    fn test_zscore_过滤离群值() {
        let values = vec![1.0, 1.1, 0.9, 1.0, 1.05, 0.95, 100.0];
        let filtered = filter_by_zscore(&values, 2.5);
        assert_eq!(filtered.len(), 6);
        assert!(!filtered.contains(&100.0));
    }

    #[test]
    fn test_zscore_零离散度全保留() {
        let values = vec![0.5, 0.5, 0.5, 0.5];
        let filtered = filter_by_zscore(&values, 2.5);
        assert_eq!(filtered, values);
    }

    #[test]
    fn test_trimmed_mean_截尾口径() {
        // n=10, p=0.1 -> 每侧去 1 个
        let values = vec![-100.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 100.0];
        assert_eq!(trimmed_mean(&values, 0.1), Some(1.0));
        // n=5, p=0.1 -> floor(0.5)=0, 等同普通均值
        assert_eq!(trimmed_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.1), Some(3.0));
        assert_eq!(trimmed_mean(&[], 0.1), None);
    }

    #[test]
    fn test_most_common_并列取先出现() {
        let values = vec!["b", "a", "a", "b"];
        assert_eq!(most_common(&values), Some("b"));
        let values = vec!["x", "y", "y"];
        assert_eq!(most_common(&values), Some("y"));
        let empty: Vec<&str> = vec![];
        assert_eq!(most_common(&empty), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.006), 1.01);
        assert_eq!(round2(0.4333333), 0.43);
        assert_eq!(round2(-0.125), -0.13);
    }
}
