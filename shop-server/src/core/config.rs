use std::path::PathBuf;

/// 服务器配置 - 商城后端的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (数据、日志) |
/// | DATA_DIR | <WORK_DIR>/data | JSON 集合文件目录 |
/// | HTTP_HOST | 0.0.0.0 | 监听地址 |
/// | HTTP_PORT | 8080 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false (生产环境 true) | JSON 格式日志 |
/// | BROADCAST_CAPACITY | 256 | 广播通道容量 |
/// | WS_PING_INTERVAL_SECS | 30 | WebSocket 心跳间隔(秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/shop HTTP_PORT=9090 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据和日志
    pub work_dir: String,
    /// 集合文件目录 (products.json / carts.json)
    pub data_dir: String,
    /// 监听地址
    pub http_host: String,
    /// HTTP 服务端口
    pub http_port: u16,
    /// 运行环境: development | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 是否输出 JSON 日志
    pub log_json: bool,
    /// 广播通道容量
    pub broadcast_capacity: usize,
    /// WebSocket 心跳间隔 (秒)
    pub ws_ping_interval_secs: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into());
        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("data")
                .to_string_lossy()
                .into_owned()
        });
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            work_dir,
            data_dir,
            http_host: std::env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(is_production),
            broadcast_capacity: std::env::var("BROADCAST_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|c: &usize| *c > 0)
                .unwrap_or(256),
            ws_ping_interval_secs: std::env::var("WS_PING_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|s: &u64| *s > 0)
                .unwrap_or(30),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景，数据目录跟随工作目录
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.data_dir = PathBuf::from(&config.work_dir)
            .join("data")
            .to_string_lossy()
            .into_owned();
        config.http_port = http_port;
        config
    }

    /// 集合文件目录
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// 日志目录
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 商品集合文件
    pub fn products_file(&self) -> PathBuf {
        self.data_dir().join("products.json")
    }

    /// 购物车集合文件
    pub fn carts_file(&self) -> PathBuf {
        self.data_dir().join("carts.json")
    }

    /// 监听地址 `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_move_data_dir_with_work_dir() {
        let config = Config::with_overrides("/tmp/shop-test", 9999);
        assert_eq!(config.http_port, 9999);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/shop-test/data"));
        assert_eq!(
            config.products_file(),
            PathBuf::from("/tmp/shop-test/data/products.json")
        );
        assert_eq!(
            config.carts_file(),
            PathBuf::from("/tmp/shop-test/data/carts.json")
        );
        assert_eq!(config.logs_dir(), PathBuf::from("/tmp/shop-test/logs"));
    }

    #[test]
    fn test_bind_addr() {
        let mut config = Config::with_overrides("/tmp/shop-test", 8181);
        config.http_host = "127.0.0.1".into();
        assert_eq!(config.bind_addr(), "127.0.0.1:8181");
    }
}
