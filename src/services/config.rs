//! 工作区发现配置

use serde::{Deserialize, Serialize};

/// Cartridge 发现规则：标记文件名 + 遍历时跳过的目录
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// 标记 cartridge 根的文件名，精确匹配
    pub marker_name: String,
    /// 版本控制与依赖目录，按名字跳过整棵子树
    pub excluded_dirs: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            marker_name: ".project".to_string(),
            excluded_dirs: vec![
                ".git".to_string(),
                ".svn".to_string(),
                ".hg".to_string(),
                "node_modules".to_string(),
                "target".to_string(),
            ],
        }
    }
}
