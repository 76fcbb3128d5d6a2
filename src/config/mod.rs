//! 配置管理
//!
//! 分层加载 `config.toml`、`config.{APP_ENV}.toml` 与 `LEARNHUB_*` 环境变量。

mod loader;
mod structs;

pub use structs::*;
