//! 排名结果缓存 - 编排层
//!
//! 键为 (班级, 年份, 考试编号)，值为排好序的记录列表。
//! 同一个键并发未命中时只计算一次（moka `try_get_with`），
//! 有学号获取失败的批次不写入缓存。

use crate::models::StudentRecord;
use moka::future::Cache;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// 缓存键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub section: String,
    pub year: String,
    pub exam_id: String,
}

impl CacheKey {
    pub fn new(section: &str, year: &str, exam_id: &str) -> Self {
        Self {
            section: section.to_string(),
            year: year.trim().to_string(),
            exam_id: exam_id.trim().to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.section, self.year, self.exam_id)
    }
}

/// 不完整的计算结果（批次中有学号获取失败），不应被缓存
#[derive(Debug)]
pub struct Uncached(pub Arc<Vec<StudentRecord>>);

/// 排名结果缓存
#[derive(Clone)]
pub struct ResultCache {
    inner: Cache<CacheKey, Arc<Vec<StudentRecord>>>,
}

impl ResultCache {
    /// `ttl` 为 None 时条目在进程内一直有效（仍受容量限制）
    pub fn new(max_capacity: u64, ttl: Option<Duration>) -> Self {
        let mut builder = Cache::builder().max_capacity(max_capacity);
        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            inner: builder.build(),
        }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Arc<Vec<StudentRecord>>> {
        self.inner.get(key).await
    }

    /// 命中直接返回；未命中时调用 `compute` 计算
    ///
    /// `compute` 返回 `Err(Uncached)` 时结果照常返回给所有等待者，但不写入缓存
    pub async fn get_or_compute<F, Fut>(&self, key: CacheKey, compute: F) -> Arc<Vec<StudentRecord>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<StudentRecord>, Uncached>>,
    {
        match self
            .inner
            .try_get_with(key, async move { compute().await.map(Arc::new) })
            .await
        {
            Ok(records) => records,
            Err(uncached) => Arc::clone(&uncached.0),
        }
    }

    pub async fn invalidate(&self, key: &CacheKey) {
        self.inner.invalidate(key).await;
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

impl fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCache")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}
