//! Crab Shop Server - 小型电商后端
//!
//! # 架构概述
//!
//! - **存储** (`db`): 每个集合一个 JSON 文件，整体读写，原子替换
//! - **仓库** (`db::repository`): 商品校验、ID 分配、code 唯一；购物车行项目累加
//! - **消息总线** (`message`): 商品目录变更后向所有 WebSocket 连接广播全量快照
//! - **HTTP API** (`api`): 商品 / 购物车 RESTful 接口 + `/ws` 实时通道
//!
//! # 模块结构
//!
//! ```text
//! shop-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── db/            # 集合存储和仓库
//! ├── message/       # 消息总线
//! ├── services/      # 目录服务 (修改 + 广播)
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由组装和中间件
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod message;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use db::{CartRepository, ProductRepository, RecordStore};
pub use message::MessageBus;
pub use services::CatalogService;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger_with_file};

/// 设置运行环境
///
/// 1. 加载 `.env`
/// 2. 创建工作目录
/// 3. 初始化日志 (控制台 + work_dir/logs 按天滚动)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    init_logger_with_file(
        &config.log_level,
        config.log_json,
        Some(config.logs_dir().as_path()),
    )?;

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______           __
  / ____/________ _/ /_
 / /   / ___/ __ `/ __ \
/ /___/ /  / /_/ / /_/ /
\____/_/   \__,_/_.___/
   _____ __
  / ___// /_  ____  ____
  \__ \/ __ \/ __ \/ __ \
 ___/ / / / / /_/ / /_/ /
/____/_/ /_/\____/ .___/
                /_/
    "#
    );
}
