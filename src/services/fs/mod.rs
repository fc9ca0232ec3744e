//! 工作区文件系统端口
//!
//! 抽象树视图需要的四个文件系统操作，便于注入内存实现做测试。
//! 本地实现基于 tokio::fs；标记文件搜索使用 ignore 的 WalkBuilder。

use crate::services::config::WorkspaceConfig;
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, FsError>;

#[derive(Debug)]
pub enum FsError {
    Io(io::Error),
    Walk(ignore::Error),
    TaskJoin(String),
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::Io(e) => write!(f, "IO error: {}", e),
            FsError::Walk(e) => write!(f, "marker search failed: {}", e),
            FsError::TaskJoin(e) => write!(f, "marker search task failed: {}", e),
        }
    }
}

impl std::error::Error for FsError {}

impl From<io::Error> for FsError {
    fn from(e: io::Error) -> Self {
        FsError::Io(e)
    }
}

impl From<ignore::Error> for FsError {
    fn from(e: ignore::Error) -> Self {
        FsError::Walk(e)
    }
}

#[allow(async_fn_in_trait)]
pub trait WorkspaceFs: Send + Sync {
    async fn path_exists(&self, path: &Path) -> bool;

    /// 一级子目录名（不含路径）
    async fn list_directories(&self, path: &Path) -> Result<Vec<String>>;

    /// 一级文件名（不含路径）
    async fn list_files(&self, path: &Path) -> Result<Vec<String>>;

    /// 递归查找标记文件，返回绝对路径，顺序为遍历顺序。
    /// 不跟随符号链接，跳过版本控制与依赖目录。
    async fn find_marker_files(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

pub struct LocalWorkspaceFs {
    config: WorkspaceConfig,
}

impl LocalWorkspaceFs {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    async fn list_entries(&self, path: &Path, want_dirs: bool) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(path).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            let matches = if want_dirs {
                file_type.is_dir()
            } else {
                file_type.is_file()
            };
            if matches {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(names)
    }
}

impl Default for LocalWorkspaceFs {
    fn default() -> Self {
        Self::new(WorkspaceConfig::default())
    }
}

impl WorkspaceFs for LocalWorkspaceFs {
    async fn path_exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn list_directories(&self, path: &Path) -> Result<Vec<String>> {
        self.list_entries(path, true).await
    }

    async fn list_files(&self, path: &Path) -> Result<Vec<String>> {
        self.list_entries(path, false).await
    }

    async fn find_marker_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        // WalkBuilder 是同步 API，放到阻塞线程池执行
        let root = root.to_path_buf();
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || walk_marker_files(&root, &config))
            .await
            .map_err(|e| FsError::TaskJoin(e.to_string()))?
    }
}

fn walk_marker_files(root: &Path, config: &WorkspaceConfig) -> Result<Vec<PathBuf>> {
    let excluded = config.excluded_dirs.clone();
    let walker = WalkBuilder::new(root)
        .follow_links(false) // 不跟随符号链接，防止递归循环
        .hidden(false) // 标记文件是点文件，不能跳过隐藏项
        .git_ignore(false) // cartridge 可能被 gitignore，发现仍需列出
        .git_global(false)
        .git_exclude(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            !(is_dir
                && excluded
                    .iter()
                    .any(|name| entry.file_name() == OsStr::new(name)))
        })
        .build();

    let mut found = Vec::new();
    for entry in walker {
        // 遍历错误直接向上抛：标记搜索是发现流程唯一的失败通道
        let entry = entry?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file && entry.file_name() == OsStr::new(&config.marker_name) {
            found.push(entry.path().to_path_buf());
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_path_exists() {
        let dir = tempdir().unwrap();
        let fs = LocalWorkspaceFs::default();

        assert!(fs.path_exists(dir.path()).await);
        assert!(!fs.path_exists(&dir.path().join("missing")).await);
    }

    #[tokio::test]
    async fn test_list_directories_and_files() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("templates")).unwrap();
        fs::create_dir(dir.path().join("scripts")).unwrap();
        File::create(dir.path().join("README.md")).unwrap();

        let fs = LocalWorkspaceFs::default();

        let mut dirs = fs.list_directories(dir.path()).await.unwrap();
        dirs.sort();
        assert_eq!(dirs, vec!["scripts", "templates"]);

        let files = fs.list_files(dir.path()).await.unwrap();
        assert_eq!(files, vec!["README.md"]);
    }

    #[tokio::test]
    async fn test_list_on_missing_path_is_error() {
        let fs = LocalWorkspaceFs::default();
        let result = fs.list_files(Path::new("/nonexistent/cartview")).await;
        assert!(matches!(result, Err(FsError::Io(_))));
    }

    #[tokio::test]
    async fn test_find_marker_files_recursive() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("cart1")).unwrap();
        fs::create_dir_all(dir.path().join("deep/nested/cart2")).unwrap();
        File::create(dir.path().join("cart1/.project")).unwrap();
        File::create(dir.path().join("deep/nested/cart2/.project")).unwrap();
        File::create(dir.path().join("cart1/unrelated.txt")).unwrap();

        let fs = LocalWorkspaceFs::default();
        let mut markers = fs.find_marker_files(dir.path()).await.unwrap();
        markers.sort();

        assert_eq!(
            markers,
            vec![
                dir.path().join("cart1/.project"),
                dir.path().join("deep/nested/cart2/.project"),
            ]
        );
    }

    #[tokio::test]
    async fn test_find_marker_files_skips_excluded_dirs() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/dep")).unwrap();
        fs::create_dir_all(dir.path().join(".git/info")).unwrap();
        File::create(dir.path().join("node_modules/dep/.project")).unwrap();
        File::create(dir.path().join(".git/info/.project")).unwrap();
        fs::create_dir_all(dir.path().join("cart1")).unwrap();
        File::create(dir.path().join("cart1/.project")).unwrap();

        let fs = LocalWorkspaceFs::default();
        let markers = fs.find_marker_files(dir.path()).await.unwrap();

        assert_eq!(markers, vec![dir.path().join("cart1/.project")]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_find_marker_files_ignores_symlinks() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("real/cart1")).unwrap();
        File::create(dir.path().join("real/cart1/.project")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let fs = LocalWorkspaceFs::default();
        let markers = fs.find_marker_files(dir.path()).await.unwrap();

        // 只通过真实路径找到一次
        assert_eq!(markers, vec![dir.path().join("real/cart1/.project")]);
    }

    #[tokio::test]
    async fn test_find_marker_files_custom_marker_name() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join(".cartridge")).unwrap();
        File::create(dir.path().join(".project")).unwrap();

        let fs = LocalWorkspaceFs::new(WorkspaceConfig {
            marker_name: ".cartridge".to_string(),
            ..WorkspaceConfig::default()
        });
        let markers = fs.find_marker_files(dir.path()).await.unwrap();

        assert_eq!(markers, vec![dir.path().join(".cartridge")]);
    }
}
