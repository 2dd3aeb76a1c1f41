use thiserror::Error;

/// 服务器启动/运行错误
///
/// 只在启动流程中使用，请求级错误统一走 [`shared::error::AppError`]。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("无法绑定地址 {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("服务运行错误: {0}")]
    Serve(#[from] std::io::Error),
}

/// 服务器 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
