use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 成绩查询地址（接收 htno / examId 查询参数）
    pub results_url: String,
    /// 考试目录所在的首页地址
    pub catalog_url: String,
    /// 默认考试编号
    pub exam_id: String,
    /// 默认班级
    pub section: String,
    /// 默认入学年份（两位）
    pub year: String,
    /// 同时在途的请求上限，保护远端服务，不能去掉
    pub max_concurrent_requests: usize,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 考试目录过滤用的专业标识
    pub program_marker: String,
    /// 结果缓存容量（条目数）
    pub cache_capacity: u64,
    /// 结果缓存存活时间（秒），None 表示进程内一直有效
    pub cache_ttl_secs: Option<u64>,
    /// 自定义班级表 TOML 文件
    pub sections_file: Option<String>,
    /// 导出目录
    pub output_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            results_url: "https://vnrvjietexams.net/eduprime3exam/Results/Results".to_string(),
            catalog_url: "https://vnrvjietexams.net/eduprime3exam/Results".to_string(),
            exam_id: "7463".to_string(),
            section: "CSBS".to_string(),
            year: "23".to_string(),
            max_concurrent_requests: 15,
            request_timeout_secs: 5,
            program_marker: "B.Tech".to_string(),
            cache_capacity: 256,
            cache_ttl_secs: None,
            sections_file: None,
            output_dir: ".".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            results_url: std::env::var("RESULTS_URL").unwrap_or(default.results_url),
            catalog_url: std::env::var("CATALOG_URL").unwrap_or(default.catalog_url),
            exam_id: std::env::var("EXAM_ID").unwrap_or(default.exam_id),
            section: std::env::var("SECTION").unwrap_or(default.section),
            year: std::env::var("YEAR").unwrap_or(default.year),
            max_concurrent_requests: std::env::var("MAX_CONCURRENT_REQUESTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_requests).max(1),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            program_marker: std::env::var("PROGRAM_MARKER").unwrap_or(default.program_marker),
            cache_capacity: std::env::var("CACHE_CAPACITY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.cache_capacity),
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS").ok().and_then(|v| v.parse().ok()).or(default.cache_ttl_secs),
            sections_file: std::env::var("SECTIONS_FILE").ok().or(default.sections_file),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 单次请求超时
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 结果缓存存活时间
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }
}
