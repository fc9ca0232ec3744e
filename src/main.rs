//cartview/src/main.rs
//! 演示宿主：打开工作区，按 JSON 行打印惰性树的前两层

use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use cartview::logging;
use cartview::models::Expansion;
use cartview::services::{DiscoveryEngine, LocalWorkspaceFs, ProjectFileValidator};
use cartview::views::{CartridgesProvider, TracingNotifier};

fn main() -> io::Result<()> {
    let _logging = logging::init();

    let workspace_root = env::args().nth(1).map(PathBuf::from);
    let active_file = env::args().nth(2).map(PathBuf::from);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .or_else(|e| {
            tracing::error!(
                error = %e,
                "Failed to create multi-thread tokio runtime, falling back to current-thread"
            );
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
        })?;

    runtime.block_on(run(workspace_root, active_file))
}

async fn run(workspace_root: Option<PathBuf>, active_file: Option<PathBuf>) -> io::Result<()> {
    let engine = DiscoveryEngine::new(LocalWorkspaceFs::default(), ProjectFileValidator);
    let provider = Arc::new(CartridgesProvider::new(
        workspace_root,
        engine,
        TracingNotifier,
    ));

    // 模拟一次"文档打开"：活动路径上的节点会渲染为展开
    if let Some(path) = active_file {
        provider.refresh(Some(path));
    }

    let roots = provider.root_nodes().await.map_err(io::Error::other)?;
    for node in &roots {
        println!("{}", serde_json::to_string(node)?);
        if node.expansion == Expansion::None {
            continue;
        }
        let children = provider.children(node).await.map_err(io::Error::other)?;
        for child in &children {
            println!("  {}", serde_json::to_string(child)?);
        }
    }

    Ok(())
}
