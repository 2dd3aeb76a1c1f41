use std::time::Instant;

use crate::core::Config;
use crate::db::{CartRepository, ProductRepository, RecordStore};
use crate::message::MessageBus;
use crate::services::CatalogService;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 所有字段内部都是 Arc 共享，Clone 成本极低，
/// 作为 axum State 注入每个处理器。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | products | ProductRepository | 商品集合 (products.json) |
/// | carts | CartRepository | 购物车集合 (carts.json) |
/// | message_bus | MessageBus | 实时广播 |
/// | catalog | CatalogService | 商品修改 + 广播 |
/// | started_at | Instant | 启动时刻 (健康检查的运行时长) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 商品仓库 (只读查询直接使用)
    pub products: ProductRepository,
    /// 购物车仓库
    pub carts: CartRepository,
    /// 消息总线
    pub message_bus: MessageBus,
    /// 商品目录服务 (所有商品修改都经过这里)
    pub catalog: CatalogService,
    /// 启动时刻
    pub started_at: Instant,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据目录 (work_dir/data)
    /// 2. 集合仓库 (products.json / carts.json)
    /// 3. 消息总线和目录服务
    ///
    /// 集合文件不存在或损坏时以空集合启动，不会失败。
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let data_dir = config.data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let products = ProductRepository::new(RecordStore::new(config.products_file()));
        let carts = CartRepository::new(RecordStore::new(config.carts_file()));
        let message_bus = MessageBus::with_capacity(config.broadcast_capacity);
        let catalog = CatalogService::new(products.clone(), message_bus.clone());

        tracing::info!(data_dir = %data_dir.display(), "Server state initialized");

        Ok(Self {
            config: config.clone(),
            products,
            carts,
            message_bus,
            catalog,
            started_at: Instant::now(),
        })
    }
}
