// ==========================================
// 维护任务清单对账系统 - 命令行入口
// ==========================================
// 用途: 读取规范模式的 JSON 请求文件,执行一次对账,输出结果 JSON
// 说明: HTTP 接入与载荷整形属于外部协作方,本入口只认规范扁平列表
// ==========================================

use anyhow::{bail, Context, Result};
use maint_reconciler::{
    logging, ReconcilerConfig, ReconciliationApi, ReconciliationRequest, NoOpEmbeddingProvider,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", maint_reconciler::APP_NAME);
    tracing::info!("系统版本: {}", maint_reconciler::VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let input_path = match args.next() {
        Some(path) => path,
        None => bail!("用法: maint-reconciler <request.json> [config.json]"),
    };

    // 可选: 从文件加载配置,否则用默认口径
    let config = match args.next() {
        Some(config_path) => {
            let raw = std::fs::read_to_string(&config_path)
                .with_context(|| format!("读取配置文件失败: {}", config_path))?;
            serde_json::from_str::<ReconcilerConfig>(&raw)
                .with_context(|| format!("解析配置文件失败: {}", config_path))?
        }
        None => ReconcilerConfig::default(),
    };

    let raw = std::fs::read_to_string(&input_path)
        .with_context(|| format!("读取请求文件失败: {}", input_path))?;
    let request: ReconciliationRequest =
        serde_json::from_str(&raw).with_context(|| format!("解析请求文件失败: {}", input_path))?;

    // 未接入嵌入后端: 语义描述建议自动降级为跳过
    let api = ReconciliationApi::new(Arc::new(config), Arc::new(NoOpEmbeddingProvider));

    let result = api
        .reconcile(request)
        .await
        .context("对账执行失败")?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
