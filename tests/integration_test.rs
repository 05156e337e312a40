use async_trait::async_trait;
use roll_results::config::Config;
use roll_results::models::{Identifier, SectionTable};
use roll_results::orchestrator::{BatchProcessor, ResultsService};
use roll_results::services::RollGenerator;
use roll_results::{HttpResultSource, ResultSource, TransportFailure};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// ========== 测试用的远端服务 ==========

fn result_page(name: &str, sgpa: &str, subjects: &[(&str, &str, &str)]) -> String {
    let rows: String = subjects
        .iter()
        .enumerate()
        .map(|(i, (title, grade, outcome))| {
            format!(
                "<tr><td>{}</td><td>C{}</td><td>{}</td><td>3</td><td>{}</td><td>{}</td></tr>",
                i + 1,
                i + 1,
                title,
                grade,
                outcome
            )
        })
        .collect();
    format!(
        r#"<html><body>
        <table><tr><td>Student Name</td><td>: {}</td></tr><tr><td>SGPA</td><td>: {}</td></tr></table>
        <table><tr><th>#</th><th>Code</th><th>Subject</th><th>Cr</th><th>Grade</th><th>Result</th></tr>{}</table>
        </body></html>"#,
        name, sgpa, rows
    )
}

const EMPTY_PAGE: &str = "<html><body><p>No Data Found</p></body></html>";

#[derive(Default)]
struct FakeSource {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    delays: HashMap<String, u64>,
    default_delay_ms: u64,
    down: AtomicBool,
    landing: Option<String>,
    fetches: AtomicUsize,
    landing_fetches: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeSource {
    fn with_page(mut self, id: &str, page: String) -> Self {
        self.pages.insert(id.to_string(), page);
        self
    }

    fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    fn delay(mut self, id: &str, ms: u64) -> Self {
        self.delays.insert(id.to_string(), ms);
        self
    }
}

#[async_trait]
impl ResultSource for FakeSource {
    async fn fetch_result(
        &self,
        identifier: &Identifier,
        _exam_id: &str,
    ) -> Result<String, TransportFailure> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .delays
            .get(identifier.as_str())
            .copied()
            .unwrap_or(self.default_delay_ms);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.down.load(Ordering::SeqCst) || self.failing.contains(identifier.as_str()) {
            return Err(TransportFailure::new(identifier.as_str(), "connection reset"));
        }
        Ok(self
            .pages
            .get(identifier.as_str())
            .cloned()
            .unwrap_or_else(|| EMPTY_PAGE.to_string()))
    }

    async fn fetch_landing_page(&self) -> Result<String, TransportFailure> {
        self.landing_fetches.fetch_add(1, Ordering::SeqCst);
        self.landing
            .clone()
            .ok_or_else(|| TransportFailure::new("landing", "timed out"))
    }
}

fn csbs_source() -> FakeSource {
    FakeSource::default()
        .with_page("23071A3201", result_page("ASHA", "7.80", &[("Maths", "A", "PASS")]))
        .with_page("23071A3202", result_page("RAVI", "9.20", &[("Physics", "O", "PASS")]))
        .with_page("23071A3203", "<p>Result Withheld</p>".to_string())
        .with_page("23071A3204", result_page("MEERA", "", &[("Maths", "F", "FAIL")]))
        .with_page("24075A3201", result_page("KIRAN", "7.80", &[("Maths", "B+", "PASS")]))
}

fn test_config() -> Config {
    Config {
        max_concurrent_requests: 4,
        ..Default::default()
    }
}

// ========== 批量处理 ==========

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_never_exceeds_bound() {
    let source = Arc::new(FakeSource {
        default_delay_ms: 15,
        ..Default::default()
    });
    let processor = BatchProcessor::new(Arc::clone(&source), 3, false);
    let ids = RollGenerator::default().generate("23", "CSBS");

    let report = processor.run(ids, "7463").await;

    assert_eq!(report.total, 75);
    assert_eq!(report.not_found, 75);
    assert!(report.is_empty());
    assert!(!report.had_failures());
    assert_eq!(source.fetches.load(Ordering::SeqCst), 75);
    let max = source.max_in_flight.load(Ordering::SeqCst);
    assert!(max <= 3, "同时在途请求数 {} 超过上限", max);
    assert!(max >= 2, "没有并发执行");
}

#[tokio::test]
async fn test_failures_are_isolated_and_counted() {
    let source = Arc::new(csbs_source().failing("23071A3205").failing("23071A3206"));
    let processor = BatchProcessor::new(source, 5, false);
    let ids = RollGenerator::default().generate("23", "CSBS");

    let report = processor.run(ids, "7463").await;

    assert_eq!(report.found, 4);
    assert_eq!(report.withheld, 1);
    assert_eq!(report.failed, 2);
    assert_eq!(report.not_found, 75 - 4 - 1 - 2);
    assert!(report.had_failures());
    assert_eq!(report.records.len(), 5);
    // 提交顺序
    let ids: Vec<&str> = report.records.iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(
        ids,
        vec!["23071A3201", "23071A3202", "23071A3203", "23071A3204", "24075A3201"]
    );
}

// ========== 查询门面 ==========

#[tokio::test]
async fn test_section_results_are_ranked() {
    let service = ResultsService::new(Arc::new(csbs_source()), SectionTable::builtin(), &test_config());

    let records = service.section_results("CSBS", "23", "7463").await;
    let summary: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.identifier.as_str(), r.score.as_str()))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("23071A3202", "9.20"),
            ("23071A3201", "7.80"),
            ("24075A3201", "7.80"),
            ("23071A3204", "0.00"),
            ("23071A3203", "Withheld"),
        ]
    );
}

#[tokio::test]
async fn test_ranking_independent_of_completion_order() {
    let ids = RollGenerator::default().generate("23", "CSBS");

    let fast_first = ids
        .iter()
        .enumerate()
        .fold(csbs_source(), |s, (i, id)| s.delay(id.as_str(), i as u64 % 7));
    let slow_first = ids
        .iter()
        .enumerate()
        .fold(csbs_source(), |s, (i, id)| s.delay(id.as_str(), 20 - (i as u64 % 7) * 3));

    let a = ResultsService::new(Arc::new(fast_first), SectionTable::builtin(), &test_config());
    let b = ResultsService::new(Arc::new(slow_first), SectionTable::builtin(), &test_config());

    let ra = a.section_results("CSBS", "23", "7463").await;
    let rb = b.section_results("CSBS", "23", "7463").await;
    assert_eq!(ra, rb);
}

#[tokio::test]
async fn test_cache_hit_is_idempotent_and_skips_remote() {
    let source = Arc::new(csbs_source());
    let service = ResultsService::new(Arc::clone(&source), SectionTable::builtin(), &test_config());

    let first = service.section_results("CSBS", "23", "7463").await;
    let fetches = source.fetches.load(Ordering::SeqCst);
    assert_eq!(fetches, 75);

    let second = service.section_results("CSBS", "23", "7463").await;
    assert_eq!(first, second);
    assert_eq!(source.fetches.load(Ordering::SeqCst), fetches);

    service.invalidate("CSBS", "23", "7463").await;
    let third = service.section_results("CSBS", "23", "7463").await;
    assert_eq!(first, third);
    assert_eq!(source.fetches.load(Ordering::SeqCst), fetches * 2);
}

#[tokio::test]
async fn test_outage_is_not_cached() {
    let source = Arc::new(csbs_source());
    source.down.store(true, Ordering::SeqCst);
    let service = ResultsService::new(Arc::clone(&source), SectionTable::builtin(), &test_config());

    let during_outage = service.section_results("CSBS", "23", "7463").await;
    assert!(during_outage.is_empty());
    assert_eq!(source.fetches.load(Ordering::SeqCst), 75);

    source.down.store(false, Ordering::SeqCst);
    let recovered = service.section_results("CSBS", "23", "7463").await;
    assert_eq!(recovered.len(), 5);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 150);

    // 完整的结果才会缓存
    let cached = service.section_results("CSBS", "23", "7463").await;
    assert_eq!(cached, recovered);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 150);
}

#[tokio::test]
async fn test_unknown_section_is_empty_without_remote_calls() {
    let source = Arc::new(csbs_source());
    let service = ResultsService::new(Arc::clone(&source), SectionTable::builtin(), &test_config());

    assert!(service.section_results("NOPE", "23", "7463").await.is_empty());
    assert!(service.section_report("NOPE", "23", "7463").await.is_empty());
    assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_export_contract() {
    let service = ResultsService::new(Arc::new(csbs_source()), SectionTable::builtin(), &test_config());

    let mut out = Vec::new();
    let written = service
        .export_section("CSBS", "23", "7463", &mut out)
        .await
        .unwrap();
    assert_eq!(written, 5);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Identifier,Name,Maths,Physics,Score,Verdict");
    assert_eq!(lines[1], "23071A3202,RAVI,N/A,O,9.20,PASS");
    assert_eq!(lines[4], "23071A3204,MEERA,F,N/A,0.00,FAIL");
    assert_eq!(lines[5], "23071A3203,Result Withheld,N/A,N/A,Withheld,WITHHELD");
}

#[tokio::test]
async fn test_student_detail() {
    let service = ResultsService::new(Arc::new(csbs_source()), SectionTable::builtin(), &test_config());

    let found = service
        .student_detail(&Identifier::parse("23071A3202").unwrap(), "7463")
        .await
        .unwrap();
    assert_eq!(found.name, "RAVI");
    assert_eq!(found.subjects[0].grade_point.points(), Some(10));

    let missing = service
        .student_detail(&Identifier::parse("23071A3299").unwrap(), "7463")
        .await;
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_catalog_fallback_is_cached_until_invalidated() {
    let source = Arc::new(FakeSource::default());
    let service = ResultsService::new(Arc::clone(&source), SectionTable::builtin(), &test_config());

    let catalog = service.exam_catalog().await;
    assert!(catalog.is_fallback());
    assert!(catalog.name("7463").is_some());

    service.exam_catalog().await;
    assert_eq!(source.landing_fetches.load(Ordering::SeqCst), 1);

    service.invalidate_catalog().await;
    service.exam_catalog().await;
    assert_eq!(source.landing_fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_catalog_discovered_from_landing_page() {
    let source = Arc::new(FakeSource {
        landing: Some(
            r#"<script>window.exams = [{"examId": 7489, "examName": "B.Tech II Year Regular"}, {"examId": 12, "examName": "MBA"}];</script>"#
                .to_string(),
        ),
        ..Default::default()
    });
    let service = ResultsService::new(source, SectionTable::builtin(), &test_config());

    let catalog = service.exam_catalog().await;
    assert!(!catalog.is_fallback());
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.name("7489"), Some("B.Tech II Year Regular"));
}

// ========== HTTP 客户端 ==========

enum StubBehaviour {
    Ok(&'static str),
    Status(u16),
    Hang,
}

/// 本地回环 HTTP 桩，记录收到的请求行
async fn spawn_stub(behaviour: StubBehaviour) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            if let Some(line) = request.lines().next() {
                seen_clone.lock().unwrap().push(line.to_string());
            }

            let response = match &behaviour {
                StubBehaviour::Ok(body) => format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                ),
                StubBehaviour::Status(code) => format!(
                    "HTTP/1.1 {} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    code
                ),
                StubBehaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(10)).await;
                    continue;
                }
            };
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{}", addr), seen)
}

fn http_config(base: &str) -> Config {
    Config {
        results_url: format!("{}/Results/Results", base),
        catalog_url: format!("{}/Results", base),
        request_timeout_secs: 1,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_http_source_sends_query_and_returns_body() {
    let (base, seen) = spawn_stub(StubBehaviour::Ok("<p>hello</p>")).await;
    let source = HttpResultSource::new(&http_config(&base)).unwrap();

    let id = Identifier::parse("23071A3201").unwrap();
    let body = source.fetch_result(&id, "7463").await.unwrap();
    assert_eq!(body, "<p>hello</p>");

    let line = seen.lock().unwrap()[0].clone();
    assert!(line.starts_with("GET /Results/Results?"), "{}", line);
    assert!(line.contains("htno=23071A3201"));
    assert!(line.contains("examId=7463"));
}

#[tokio::test]
async fn test_http_source_non_success_is_failure() {
    let (base, _) = spawn_stub(StubBehaviour::Status(500)).await;
    let source = HttpResultSource::new(&http_config(&base)).unwrap();

    let id = Identifier::parse("23071A3201").unwrap();
    let err = source.fetch_result(&id, "7463").await.unwrap_err();
    assert_eq!(err.target, "23071A3201");
    assert!(source.fetch_landing_page().await.is_err());
}

#[tokio::test]
async fn test_http_source_timeout_is_failure() {
    let (base, _) = spawn_stub(StubBehaviour::Hang).await;
    let source = HttpResultSource::new(&http_config(&base)).unwrap();

    let id = Identifier::parse("23071A3201").unwrap();
    let started = std::time::Instant::now();
    assert!(source.fetch_result(&id, "7463").await.is_err());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_live_section_export() {
    roll_results::logger::init(true);

    let config = Config::from_env();
    let source = Arc::new(HttpResultSource::new(&config).expect("创建客户端失败"));
    let service = ResultsService::new(source, SectionTable::builtin(), &config);

    let records = service
        .section_results(&config.section, &config.year, &config.exam_id)
        .await;
    println!("查到 {} 条记录", records.len());
}
