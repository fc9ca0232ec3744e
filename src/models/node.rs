//! 树节点数据模型
//!
//! 每个节点都是一次查询中新构造的纯值，构造后不再修改。
//! 宿主按 (kind, location) 做 diff，节点身份不跨刷新保留。

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    /// 占位节点：工作区级状态消息（例如"未找到 cartridge"）
    WorkspaceNotice,
    /// cartridge 根目录（深度 0）
    Cartridge,
    Folder,
    File,
}

/// 展开提示：告诉宿主如何渲染子节点
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Expansion {
    /// 不可能有子节点（文件、占位节点）
    None,
    Collapsed,
    Expanded,
}

#[derive(Debug)]
pub enum NodeError {
    EmptyName,
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::EmptyName => write!(f, "node name is empty"),
        }
    }
}

impl std::error::Error for NodeError {}

/// 附加在文件节点上的打开动作，激活时由宿主执行
#[derive(Clone, Debug, Serialize)]
pub struct OpenAction {
    pub verb: &'static str,
    pub target: PathBuf,
}

impl OpenAction {
    pub fn open(target: PathBuf) -> Self {
        Self {
            verb: "open",
            target,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub label: String,
    /// 绝对路径；仅占位节点允许为空
    pub location: PathBuf,
    pub expansion: Expansion,
    pub open_action: Option<OpenAction>,
}

// 宿主 diff 只看 (kind, location)
impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.location == other.location
    }
}

impl Eq for TreeNode {}

/// 活动文件落在 location 之下（按路径段对齐的前缀）时返回 Expanded
fn expansion_for(location: &Path, active_file: Option<&Path>) -> Expansion {
    match active_file {
        Some(active) if active.starts_with(location) => Expansion::Expanded,
        _ => Expansion::Collapsed,
    }
}

impl TreeNode {
    pub fn cartridge(location: PathBuf, active_file: Option<&Path>) -> Self {
        let label = location
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| location.to_string_lossy().to_string());
        let expansion = expansion_for(&location, active_file);

        Self {
            kind: NodeKind::Cartridge,
            label,
            location,
            expansion,
            open_action: None,
        }
    }

    pub fn folder(
        child_name: &str,
        parent: &TreeNode,
        active_file: Option<&Path>,
    ) -> Result<Self, NodeError> {
        if child_name.is_empty() {
            return Err(NodeError::EmptyName);
        }

        let location = parent.location.join(child_name);
        let expansion = expansion_for(&location, active_file);

        Ok(Self {
            kind: NodeKind::Folder,
            label: child_name.to_string(),
            location,
            expansion,
            open_action: None,
        })
    }

    pub fn file(file_name: &str, parent: &TreeNode) -> Result<Self, NodeError> {
        if file_name.is_empty() {
            return Err(NodeError::EmptyName);
        }

        let location = parent.location.join(file_name);

        Ok(Self {
            kind: NodeKind::File,
            label: file_name.to_string(),
            location: location.clone(),
            expansion: Expansion::None,
            open_action: Some(OpenAction::open(location)),
        })
    }

    /// 工作区级占位节点，location 指向工作区根
    pub fn workspace_notice(label: &str, location: PathBuf) -> Self {
        Self {
            kind: NodeKind::WorkspaceNotice,
            label: label.to_string(),
            location,
            expansion: Expansion::None,
            open_action: None,
        }
    }

    /// 空目录占位节点：File 类型，location 为空，不可激活
    pub fn no_files_placeholder() -> Self {
        Self {
            kind: NodeKind::File,
            label: "no files".to_string(),
            location: PathBuf::new(),
            expansion: Expansion::None,
            open_action: None,
        }
    }
}
