//! 视图层模块
//!
//! - CartridgesProvider: cartridge 树的惰性视图模型

pub mod cartridges;

pub use cartridges::{
    CartridgesProvider, DocumentEventsGuard, ProviderError, TracingNotifier, UserNotifier,
};
