//! 服务层模块
//!
//! - WorkspaceFs: 文件系统端口（本地实现 + 测试替身）
//! - DiscoveryEngine: cartridge 发现与一级子树列举
//! - WorkspaceConfig: 发现规则配置

pub mod cartridge;
pub mod config;
pub mod fs;

pub use cartridge::{CartridgeValidator, DiscoveryEngine, ProjectFileValidator};
pub use config::WorkspaceConfig;
pub use fs::{FsError, LocalWorkspaceFs, WorkspaceFs};
