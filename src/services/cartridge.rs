//! Cartridge 发现引擎
//!
//! 两个独立职责：
//! - 全工作区定位 cartridge 根（标记文件搜索 + 并发校验过滤）
//! - 按节点列出一级子树（目录在前，文件在后），绝不预走深层

use crate::services::fs::{Result, WorkspaceFs};
use futures::future::join_all;
use std::path::{Path, PathBuf};

/// 真 cartridge 的 `.project` 带有的 Eclipse nature 标识
pub const CARTRIDGE_NATURE: &str = "com.demandware.xml";

/// 外部校验谓词：标记文件内容是否指向真正的 cartridge
#[allow(async_fn_in_trait)]
pub trait CartridgeValidator: Send + Sync {
    async fn is_valid_cartridge(&self, marker_file: &Path) -> bool;
}

/// 读取标记文件内容并检查 cartridge nature，过滤无关 IDE 工程
pub struct ProjectFileValidator;

impl CartridgeValidator for ProjectFileValidator {
    async fn is_valid_cartridge(&self, marker_file: &Path) -> bool {
        match tokio::fs::read_to_string(marker_file).await {
            Ok(content) => content.contains(CARTRIDGE_NATURE),
            Err(e) => {
                tracing::warn!(
                    path = %marker_file.display(),
                    error = %e,
                    "marker file unreadable, treated as invalid"
                );
                false
            }
        }
    }
}

pub struct DiscoveryEngine<F, V> {
    fs: F,
    validator: V,
}

impl<F: WorkspaceFs, V: CartridgeValidator> DiscoveryEngine<F, V> {
    pub fn new(fs: F, validator: V) -> Self {
        Self { fs, validator }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// 定位并校验 cartridge 根，返回标记文件所在目录。
    ///
    /// 校验全部并发提交、全部等待，再按发现顺序过滤——
    /// 单个校验完成的先后不影响结果顺序。
    /// 零标记、零通过都返回空集而非错误。
    pub async fn discover_cartridges(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let markers = self.fs.find_marker_files(root).await?;
        tracing::debug!(root = %root.display(), count = markers.len(), "marker files found");

        let verdicts = join_all(
            markers
                .iter()
                .map(|marker| self.validator.is_valid_cartridge(marker)),
        )
        .await;

        Ok(markers
            .into_iter()
            .zip(verdicts)
            .filter(|(_, valid)| *valid)
            .map(|(marker, _)| {
                marker
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or(marker)
            })
            .collect())
    }

    /// 一级子树：目录与文件并发获取，组装时目录恒在前。
    pub async fn list_children(&self, location: &Path) -> Result<(Vec<String>, Vec<String>)> {
        let (dirs, files) = tokio::join!(
            self.fs.list_directories(location),
            self.fs.list_files(location)
        );
        Ok((dirs?, files?))
    }
}
