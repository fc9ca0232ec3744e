//! Cartridge 树视图提供者
//!
//! 有状态门面：持有活动文件路径和变更通知通道，回答
//! "根节点有哪些"与"这个节点的子节点有哪些"。每次查询
//! 都从头重算，不缓存任何子树。

use crate::models::node::{NodeError, TreeNode};
use crate::services::cartridge::{CartridgeValidator, DiscoveryEngine};
use crate::services::fs::{FsError, WorkspaceFs};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

#[derive(Debug)]
pub enum ProviderError {
    Fs(FsError),
    Node(NodeError),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Fs(e) => write!(f, "discovery failed: {}", e),
            ProviderError::Node(e) => write!(f, "bad node: {}", e),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<FsError> for ProviderError {
    fn from(e: FsError) -> Self {
        ProviderError::Fs(e)
    }
}

impl From<NodeError> for ProviderError {
    fn from(e: NodeError) -> Self {
        ProviderError::Node(e)
    }
}

/// 即发即忘的用户提示通道
pub trait UserNotifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// 默认宿主提示面：写进日志
pub struct TracingNotifier;

impl UserNotifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(note = %message, "user notification");
    }
}

/// 文档打开事件转发任务的守护句柄，Drop 时停止转发
pub struct DocumentEventsGuard {
    handle: JoinHandle<()>,
}

impl Drop for DocumentEventsGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct CartridgesProvider<F, V, N> {
    workspace_root: Option<PathBuf>,
    engine: DiscoveryEngine<F, V>,
    notifier: N,
    /// 最近打开文件的路径；tokio 宿主是多线程的，读写都过锁
    active_file: RwLock<Option<PathBuf>>,
    changed: broadcast::Sender<()>,
}

impl<F, V, N> CartridgesProvider<F, V, N>
where
    F: WorkspaceFs,
    V: CartridgeValidator,
    N: UserNotifier,
{
    pub fn new(
        workspace_root: Option<PathBuf>,
        engine: DiscoveryEngine<F, V>,
        notifier: N,
    ) -> Self {
        let (changed, _) = broadcast::channel(16);
        Self {
            workspace_root,
            engine,
            notifier,
            active_file: RwLock::new(None),
            changed,
        }
    }

    pub fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }

    /// 宿主订阅此通道以得知何时重新拉取树
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changed.subscribe()
    }

    pub fn active_file(&self) -> Option<PathBuf> {
        self.snapshot_active()
    }

    fn snapshot_active(&self) -> Option<PathBuf> {
        self.active_file
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 有 path 时替换活动文件；无论如何都发一次变更信号，
    /// 支持"按当前状态重渲染"的手动刷新。
    pub fn refresh(&self, path: Option<PathBuf>) {
        if let Some(path) = path {
            *self
                .active_file
                .write()
                .unwrap_or_else(|e| e.into_inner()) = Some(path);
        }
        // 没有订阅者时发送失败，不是错误
        let _ = self.changed.send(());
    }

    /// 根节点：每个通过校验的 cartridge 一个节点，按发现顺序。
    /// 工作区缺失或为空时提示用户并返回空集/占位节点。
    pub async fn root_nodes(&self) -> Result<Vec<TreeNode>, ProviderError> {
        let Some(root) = self.workspace_root.as_deref() else {
            self.notifier.notify("No workspace open");
            return Ok(Vec::new());
        };

        if !self.engine.fs().path_exists(root).await {
            self.notifier.notify("No workspace found");
            return Ok(Vec::new());
        }

        let cartridges = self.engine.discover_cartridges(root).await?;
        if cartridges.is_empty() {
            return Ok(vec![TreeNode::workspace_notice(
                "No cartridges found",
                root.to_path_buf(),
            )]);
        }

        let active = self.snapshot_active();
        tracing::debug!(count = cartridges.len(), "cartridges resolved");
        Ok(cartridges
            .into_iter()
            .map(|path| TreeNode::cartridge(path, active.as_deref()))
            .collect())
    }

    /// 子节点：目录在前文件在后；两边都为空时给一个占位节点。
    pub async fn children(&self, node: &TreeNode) -> Result<Vec<TreeNode>, ProviderError> {
        let (dirs, files) = self.engine.list_children(&node.location).await?;
        if dirs.is_empty() && files.is_empty() {
            return Ok(vec![TreeNode::no_files_placeholder()]);
        }

        // 活动文件在每轮子节点发现开始时取一次快照
        let active = self.snapshot_active();
        let mut nodes = Vec::with_capacity(dirs.len() + files.len());
        for name in &dirs {
            nodes.push(TreeNode::folder(name, node, active.as_deref())?);
        }
        for name in &files {
            nodes.push(TreeNode::file(name, node)?);
        }
        Ok(nodes)
    }
}

impl<F, V, N> CartridgesProvider<F, V, N>
where
    F: WorkspaceFs + 'static,
    V: CartridgeValidator + 'static,
    N: UserNotifier + 'static,
{
    /// 把宿主的文档打开事件接到 refresh 上：每打开一个文件，
    /// 活动路径前进一步并触发一次变更信号。
    pub fn watch_document_events(
        self: &Arc<Self>,
        mut opened: mpsc::UnboundedReceiver<PathBuf>,
    ) -> DocumentEventsGuard {
        let provider = Arc::clone(self);
        let handle = tokio::spawn(async move {
            while let Some(path) = opened.recv().await {
                tracing::debug!(path = %path.display(), "document opened");
                provider.refresh(Some(path));
            }
        });
        DocumentEventsGuard { handle }
    }
}
