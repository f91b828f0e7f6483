// ==========================================
// 维护任务清单对账系统 - 描述文本归一化
// ==========================================
// 职责: 自由文本作业描述的规范形
// 用途: 相等比对 + 语义聚类前的预处理
// 口径: 小写 / 去掉 [a-z0-9 空白] 以外字符 / 空白折叠为单空格
// ==========================================

/// 归一化作业描述
///
/// # 返回
/// - `Some(normalized)`: 规范形(非空)
/// - `None`: 输入缺失、为空白,或归一化后不剩任何内容
pub fn normalize_description(desc: Option<&str>) -> Option<String> {
    let desc = desc?.trim().to_lowercase();
    if desc.is_empty() {
        return None;
    }

    // 删除 [a-z0-9 空白] 以外的字符(删除而非替换为空格)
    let stripped: String = desc
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}
