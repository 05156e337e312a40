use thiserror::Error;

/// 应用程序错误类型
///
/// 核心流水线本身不会因为单个学号失败而中断，
/// 这里的错误只出现在 HTTP 客户端构建和导出写入这些边界上，
/// 班级表加载失败直接返回 `ConfigError`。
#[derive(Debug, Error)]
pub enum AppError {
    /// HTTP 客户端构建失败
    #[error("HTTP 客户端错误: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// CSV 导出失败
    #[error("导出错误: {0}")]
    Export(#[from] csv::Error),
    /// 文件读写失败
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 一次网络获取失败
///
/// 超时、连接错误、非 2xx 状态码统一归为这一种，
/// 远端本身无法区分"暂时失败"和"没有这条记录"，这里也不区分。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("获取 {target} 失败: {reason}")]
pub struct TransportFailure {
    /// 请求目标（学号或页面名）
    pub target: String,
    /// 底层原因（仅用于日志）
    pub reason: String,
}

impl TransportFailure {
    pub fn new(target: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            target: target.into(),
            reason: reason.to_string(),
        }
    }
}

/// 考试目录发现失败
///
/// 只在目录服务内部使用，对外总是降级为兜底目录。
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 获取首页失败
    #[error(transparent)]
    Transport(#[from] TransportFailure),
    /// 页面中找不到考试列表脚本
    #[error("页面中没有找到考试列表")]
    ScriptMissing,
    /// 考试列表 JSON 无法解析
    #[error("考试列表解析失败: {0}")]
    Json(#[from] serde_json::Error),
    /// 过滤后没有匹配的考试
    #[error("没有包含 '{marker}' 的考试")]
    NoMatchingExam { marker: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 班级描述的区间不合法
    #[error("班级 {section} 的 {intake} 区间 {start}..={end} 不合法: {reason}")]
    InvalidRange {
        section: String,
        intake: &'static str,
        start: u32,
        end: u32,
        reason: &'static str,
    },
    /// 读取班级表文件失败
    #[error("无法读取班级表 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 班级表 TOML 解析失败
    #[error("无法解析班级表 {path}: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
