// ==========================================
// 维护任务清单对账系统 - 变更建议引擎
// ==========================================
// 职责: 把全量学习聚合转化为主模板变更建议
// 输出顺序(对外契约): 数量 -> 描述 -> 通用字段 -> 删除 -> 新增
// ==========================================

mod core;

#[cfg(test)]
mod tests;

pub use core::ProposalGenerator;
