//! 成绩页面获取 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端，只暴露"取回原始页面"的能力

use crate::config::Config;
use crate::error::{AppResult, TransportFailure};
use crate::models::Identifier;
use async_trait::async_trait;
use tracing::debug;

/// 远端成绩服务
///
/// 职责：
/// - 每次调用只发一次请求，不重试
/// - 任何传输错误、超时、非成功状态码都归为 `TransportFailure`
/// - 不认识页面结构
#[async_trait]
pub trait ResultSource: Send + Sync {
    /// 获取某个学号在某次考试中的成绩页面
    async fn fetch_result(
        &self,
        identifier: &Identifier,
        exam_id: &str,
    ) -> Result<String, TransportFailure>;

    /// 获取包含考试列表的首页
    async fn fetch_landing_page(&self) -> Result<String, TransportFailure>;
}

/// 基于 reqwest 的成绩服务客户端
pub struct HttpResultSource {
    client: reqwest::Client,
    results_url: String,
    catalog_url: String,
}

impl HttpResultSource {
    /// 创建新的客户端，连接与读取共用配置中的超时
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.request_timeout())
            .user_agent(concat!("roll_results/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            results_url: config.results_url.clone(),
            catalog_url: config.catalog_url.clone(),
        })
    }

    async fn get_text(
        &self,
        target: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<String, TransportFailure> {
        let response = request
            .send()
            .await
            .map_err(|e| TransportFailure::new(target, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportFailure::new(target, format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| TransportFailure::new(target, e))
    }
}

#[async_trait]
impl ResultSource for HttpResultSource {
    async fn fetch_result(
        &self,
        identifier: &Identifier,
        exam_id: &str,
    ) -> Result<String, TransportFailure> {
        debug!("请求成绩页面: {} (考试 {})", identifier, exam_id);
        let request = self
            .client
            .get(&self.results_url)
            .query(&[("htno", identifier.as_str()), ("examId", exam_id)]);
        self.get_text(identifier.as_str(), request).await
    }

    async fn fetch_landing_page(&self) -> Result<String, TransportFailure> {
        debug!("请求考试目录首页: {}", self.catalog_url);
        let request = self.client.get(&self.catalog_url);
        self.get_text("考试目录首页", request).await
    }
}
