//! cartview - 多根工作区的 cartridge 惰性树视图模型
//!
//! 模块结构：
//! - models: 数据模型（TreeNode, Expansion, OpenAction）
//! - services: 服务层（WorkspaceFs, DiscoveryEngine, WorkspaceConfig）
//! - views: 视图层（CartridgesProvider）

pub mod logging;
pub mod models;
pub mod services;
pub mod views;
