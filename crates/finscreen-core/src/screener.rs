//! End-to-end screening: build, compile, fetch with retry, normalize, order.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use finscreen_fields::{FieldValidator, FieldVocabulary};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::config::ScreenerConfig;
use crate::domain::{StockRecord, Ticker};
use crate::error::{FilterError, ResponseIssue, ScreenError};
use crate::filter::{self, parse_date, Overrides, ScreenerIntent, SortField, SortOrder, SortSpec};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::normalize::{normalize_csv, RowIssue};
use crate::query::{self, QueryParams};
use crate::retry::{Sleeper, TokioSleeper};

/// Outcome of one screening run.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    pub run_id: Uuid,
    pub intent: ScreenerIntent,
    /// Query string as sent, with the API key redacted.
    pub query: String,
    pub records: Vec<StockRecord>,
    pub issues: Vec<RowIssue>,
    pub response_issue: Option<ResponseIssue>,
    pub attempts: u32,
    #[serde(serialize_with = "serialize_millis")]
    pub retry_delays: Vec<Duration>,
    /// RFC 3339, UTC.
    pub fetched_at: String,
}

/// Requested fields for explicit tickers.
#[derive(Debug, Clone, Serialize)]
pub struct FundamentalsReport {
    pub run_id: Uuid,
    pub tickers: Vec<Ticker>,
    pub fields: Vec<String>,
    /// One object per returned ticker, holding `ticker` plus the requested
    /// fields.
    pub rows: Vec<Map<String, Value>>,
    pub issues: Vec<RowIssue>,
    pub response_issue: Option<ResponseIssue>,
    pub attempts: u32,
    #[serde(serialize_with = "serialize_millis")]
    pub retry_delays: Vec<Duration>,
    pub fetched_at: String,
}

fn serialize_millis<S>(delays: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(delays.iter().map(|delay| delay.as_millis() as u64))
}

struct Fetched {
    body: String,
    attempts: u32,
    retry_delays: Vec<Duration>,
}

/// Screening client. Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Screener {
    config: ScreenerConfig,
    http: Arc<dyn HttpClient>,
    sleeper: Arc<dyn Sleeper>,
    vocabulary: &'static FieldVocabulary,
}

impl std::fmt::Debug for Screener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screener")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Screener {
    pub fn new(config: ScreenerConfig) -> Self {
        let http = Arc::new(ReqwestHttpClient::with_user_agent(&config.user_agent));
        Self {
            config,
            http,
            sleeper: Arc::new(TokioSleeper),
            vocabulary: FieldVocabulary::builtin(),
        }
    }

    pub fn with_http(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = http;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// Run one intent with caller overrides.
    ///
    /// Filter errors and a missing API key are reported before any request
    /// is made. Row-level problems end up in the report, not as errors.
    pub async fn run(
        &self,
        intent: ScreenerIntent,
        overrides: &Overrides,
    ) -> Result<ScreeningReport, ScreenError> {
        let spec = filter::build(intent, overrides)?;
        let api_key = self.api_key()?;
        let params = query::compile(&spec, Some(api_key));
        let query = params.to_string();

        let fetched = self.fetch(params).await?;
        let normalized = normalize_csv(&fetched.body);

        let mut records = sort_records(normalized.records, spec.sort());
        let cap = usize::try_from(spec.max_results()).unwrap_or(usize::MAX);
        records.truncate(cap);

        let report = ScreeningReport {
            run_id: Uuid::new_v4(),
            intent,
            query,
            records,
            issues: normalized.issues,
            response_issue: normalized.response_issue,
            attempts: fetched.attempts,
            retry_delays: fetched.retry_delays,
            fetched_at: now_rfc3339(),
        };

        tracing::info!(
            run_id = %report.run_id,
            intent = intent.as_str(),
            records = report.records.len(),
            dropped = report.issues.len(),
            attempts = report.attempts,
            "screening finished"
        );
        Ok(report)
    }

    /// Fetch `fields` for explicit tickers. An empty `fields` selects every
    /// vocabulary field.
    pub async fn fundamentals<S: AsRef<str>>(
        &self,
        tickers: &[S],
        fields: &[S],
    ) -> Result<FundamentalsReport, ScreenError> {
        if tickers.is_empty() {
            return Err(FilterError::invalid("tickers", "at least one ticker is required").into());
        }
        let tickers = tickers
            .iter()
            .map(|ticker| Ticker::parse(ticker.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let fields: Vec<String> = if fields.is_empty() {
            self.vocabulary.names().map(str::to_owned).collect()
        } else {
            let validation = FieldValidator::new(self.vocabulary).validate(fields);
            if !validation.all_valid {
                return Err(ScreenError::UnknownFields(validation));
            }
            validation.valid_fields
        };

        let api_key = self.api_key()?;
        let fetched = self
            .fetch(query::compile_fundamentals(&tickers, Some(api_key)))
            .await?;
        let normalized = normalize_csv(&fetched.body);

        let rows = normalized
            .records
            .iter()
            .map(|record| project(record, &fields))
            .collect::<Vec<_>>();

        let report = FundamentalsReport {
            run_id: Uuid::new_v4(),
            tickers,
            fields,
            rows,
            issues: normalized.issues,
            response_issue: normalized.response_issue,
            attempts: fetched.attempts,
            retry_delays: fetched.retry_delays,
            fetched_at: now_rfc3339(),
        };

        tracing::info!(
            run_id = %report.run_id,
            tickers = report.tickers.len(),
            rows = report.rows.len(),
            attempts = report.attempts,
            "fundamentals finished"
        );
        Ok(report)
    }

    fn api_key(&self) -> Result<&str, ScreenError> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ScreenError::MissingApiKey)
    }

    async fn fetch(&self, params: QueryParams) -> Result<Fetched, ScreenError> {
        let request = HttpRequest::get(self.config.export_url())
            .with_query(params.into_vec())
            .with_timeout_ms(self.config.timeout_ms);
        let retry = &self.config.retry;
        let max_attempts = retry.max_attempts();
        let mut retry_delays = Vec::new();
        let mut attempt = 0;

        loop {
            attempt += 1;
            if !self.config.rate_limit_delay.is_zero() {
                self.sleeper.sleep(self.config.rate_limit_delay).await;
            }

            let (error, retryable) = match self.http.execute(request.clone()).await {
                Ok(response) if response.is_success() => {
                    return Ok(Fetched {
                        body: response.body,
                        attempts: attempt,
                        retry_delays,
                    });
                }
                Ok(response) => (
                    ScreenError::Status {
                        status: response.status,
                        attempts: attempt,
                    },
                    retry.should_retry_status(response.status),
                ),
                Err(source) => {
                    let retryable = source.retryable();
                    (
                        ScreenError::Network {
                            attempts: attempt,
                            source,
                        },
                        retryable,
                    )
                }
            };

            if !retryable || attempt >= max_attempts {
                tracing::warn!(attempt, error = %error, "fetch failed; giving up");
                return Err(error);
            }

            let delay = retry.delay_for_retry(attempt - 1);
            tracing::warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "fetch attempt failed; retrying"
            );
            retry_delays.push(delay);
            self.sleeper.sleep(delay).await;
        }
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("<unformattable>"))
}

fn project(record: &StockRecord, fields: &[String]) -> Map<String, Value> {
    let mut row = Map::new();
    let Ok(Value::Object(mut all)) = serde_json::to_value(record) else {
        return row;
    };
    if let Some(ticker) = all.remove("ticker") {
        row.insert(String::from("ticker"), ticker);
    }
    for field in fields {
        if let Some(value) = all.remove(field.as_str()) {
            row.insert(field.clone(), value);
        }
    }
    row
}

#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Number(f64),
    Text(String),
    Date(Date),
}

impl SortValue {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

fn sort_value(record: &StockRecord, field: SortField) -> Option<SortValue> {
    let number = match field {
        SortField::Ticker => return Some(SortValue::Text(record.ticker.as_str().to_owned())),
        SortField::EarningsDate => {
            return record
                .earnings_date
                .as_deref()
                .and_then(|raw| raw.split_whitespace().next())
                .and_then(|day| parse_date(day).ok())
                .map(SortValue::Date);
        }
        SortField::Price => record.price,
        SortField::PriceChange => record.change,
        SortField::AfterhoursChange => record.afterhours_change,
        SortField::Volume => record.volume.map(|volume| volume as f64),
        SortField::RelativeVolume => record.relative_volume,
        SortField::MarketCap => record.market_cap,
        SortField::Pe => record.pe_ratio,
        SortField::DividendYield => record.dividend_yield,
        SortField::Rsi => record.rsi,
        SortField::Sma200 => record.sma200,
        SortField::Performance1w => record.performance_1w,
        SortField::EpsGrowthYoy => record.eps_growth_next_y,
        SortField::EpsGrowthQoq => record.eps_growth_qtr,
        SortField::EpsSurprise => record.eps_surprise,
        SortField::Aum => record.aum,
    };
    number.filter(|value| !value.is_nan()).map(SortValue::Number)
}

/// Stable sort on the requested column; records without a value go last in
/// either direction.
fn sort_records(records: Vec<StockRecord>, sort: Option<SortSpec>) -> Vec<StockRecord> {
    let Some(sort) = sort else {
        return records;
    };

    let mut keyed: Vec<(Option<SortValue>, StockRecord)> = records
        .into_iter()
        .map(|record| (sort_value(&record, sort.field), record))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => match sort.order {
            SortOrder::Asc => a.compare(b),
            SortOrder::Desc => b.compare(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    keyed.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    use super::*;
    use crate::http_client::{HttpError, HttpResponse};
    use crate::retry::RetryConfig;

    const CSV: &str = "No.,Ticker,Price,Change,Relative Volume,Earnings Date\n\
        1,AAA,12.00,3.10%,2.1,07/30/2025 04:30:00 PM\n\
        2,BBB,45.50,-,1.8,07/28/2025 08:00:00 AM\n\
        3,CCC,22.25,5.75%,3.2,-\n\
        4,,10.00,1.00%,1.1,-\n";

    struct RecordingHttpClient {
        responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn scripted(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self
                .responses
                .lock()
                .expect("response script should not be poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::non_retryable("script exhausted")));
            Box::pin(async move { response })
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        pauses: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        fn pauses(&self) -> Vec<Duration> {
            self.pauses
                .lock()
                .expect("pause log should not be poisoned")
                .clone()
        }
    }

    impl Sleeper for RecordingSleeper {
        fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
            self.pauses
                .lock()
                .expect("pause log should not be poisoned")
                .push(duration);
            Box::pin(async {})
        }
    }

    fn screener(
        http: Arc<RecordingHttpClient>,
        sleeper: Arc<RecordingSleeper>,
    ) -> Screener {
        let config = ScreenerConfig::default()
            .with_api_key("test-key")
            .with_rate_limit_delay(Duration::from_millis(250));
        Screener::new(config).with_http(http).with_sleeper(sleeper)
    }

    #[test]
    fn run_sorts_descending_with_absent_values_last() {
        let http = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok(CSV))]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let report = block_on(
            screener(http.clone(), sleeper.clone()).run(ScreenerIntent::VolumeSurge, &Overrides::default()),
        )
        .expect("run should succeed");

        let tickers: Vec<&str> = report.records.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["CCC", "AAA", "BBB"]);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.attempts, 1);
        assert!(report.retry_delays.is_empty());
        assert_eq!(sleeper.pauses(), vec![Duration::from_millis(250)]);
        assert!(report.query.contains("auth=***"));

        let request = &http.recorded_requests()[0];
        assert_eq!(request.url, "https://elite.finviz.com/export.ashx");
        assert_eq!(request.query_value("auth"), Some("test-key"));
        assert_eq!(request.query_value("o"), Some("-change"));
    }

    #[test]
    fn run_sorts_earnings_dates_ascending_and_truncates() {
        let http = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok(CSV))]);
        let sleeper = Arc::new(RecordingSleeper::default());
        let overrides = Overrides {
            max_results: Some(2),
            ..Overrides::default()
        };

        let report = block_on(screener(http, sleeper).run(ScreenerIntent::Earnings, &overrides))
            .expect("run should succeed");

        let tickers: Vec<&str> = report.records.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["BBB", "AAA"]);
    }

    #[test]
    fn retries_then_succeeds_recording_two_delays() {
        let http = RecordingHttpClient::scripted(vec![
            Err(HttpError::timeout("timed out")),
            Ok(HttpResponse::with_status(503, "busy")),
            Ok(HttpResponse::ok(CSV)),
        ]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let report = block_on(
            screener(http.clone(), sleeper.clone()).run(ScreenerIntent::RelativeVolume, &Overrides::default()),
        )
        .expect("third attempt should succeed");

        assert_eq!(report.attempts, 3);
        assert_eq!(
            report.retry_delays,
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
        assert_eq!(http.recorded_requests().len(), 3);
        assert_eq!(
            sleeper.pauses(),
            vec![
                Duration::from_millis(250),
                Duration::from_secs(1),
                Duration::from_millis(250),
                Duration::from_secs(2),
                Duration::from_millis(250),
            ]
        );
    }

    #[test]
    fn exhausted_retries_surface_the_network_error() {
        let http = RecordingHttpClient::scripted(vec![
            Err(HttpError::connect("refused")),
            Err(HttpError::connect("refused")),
            Err(HttpError::connect("refused")),
        ]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let error = block_on(
            screener(http.clone(), sleeper).run(ScreenerIntent::Etf, &Overrides::default()),
        )
        .expect_err("all attempts fail");

        assert!(matches!(error, ScreenError::Network { attempts: 3, .. }));
        assert_eq!(http.recorded_requests().len(), 3);
    }

    #[test]
    fn exhausted_status_retries_keep_the_last_status() {
        let http = RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::with_status(503, "busy")),
            Ok(HttpResponse::with_status(503, "busy")),
            Ok(HttpResponse::with_status(503, "busy")),
        ]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let error = block_on(
            screener(http.clone(), sleeper).run(ScreenerIntent::Etf, &Overrides::default()),
        )
        .expect_err("every attempt is busy");

        assert!(matches!(error, ScreenError::Status { status: 503, attempts: 3 }));
        assert_eq!(http.recorded_requests().len(), 3);
    }

    #[test]
    fn non_retryable_failures_stop_immediately() {
        let http = RecordingHttpClient::scripted(vec![Ok(HttpResponse::with_status(403, "denied"))]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let error = block_on(
            screener(http.clone(), sleeper).run(ScreenerIntent::Etf, &Overrides::default()),
        )
        .expect_err("403 is final");

        assert!(matches!(error, ScreenError::Status { status: 403, attempts: 1 }));
        assert_eq!(http.recorded_requests().len(), 1);
    }

    #[test]
    fn missing_api_key_fails_before_any_request() {
        let http = RecordingHttpClient::scripted(Vec::new());
        let screener = Screener::new(ScreenerConfig::default())
            .with_http(http.clone())
            .with_sleeper(Arc::new(RecordingSleeper::default()));

        let error = block_on(screener.run(ScreenerIntent::Earnings, &Overrides::default()))
            .expect_err("no key");

        assert_eq!(error.code(), "screen.missing_api_key");
        assert!(http.recorded_requests().is_empty());
    }

    #[test]
    fn zero_rate_limit_skips_the_pause() {
        let http = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok(CSV))]);
        let sleeper = Arc::new(RecordingSleeper::default());
        let screener = Screener::new(
            ScreenerConfig::default()
                .with_api_key("k")
                .with_rate_limit_delay(Duration::ZERO)
                .with_retry(RetryConfig::no_retry()),
        )
        .with_http(http)
        .with_sleeper(sleeper.clone());

        block_on(screener.run(ScreenerIntent::TechnicalAnalysis, &Overrides::default()))
            .expect("run should succeed");

        assert!(sleeper.pauses().is_empty());
    }

    #[test]
    fn fundamentals_rejects_unknown_fields_up_front() {
        let http = RecordingHttpClient::scripted(Vec::new());
        let screener = screener(http.clone(), Arc::new(RecordingSleeper::default()));

        let error = block_on(screener.fundamentals(&["AAPL"], &["price", "eps_yoy"]))
            .expect_err("unknown field");

        match error {
            ScreenError::UnknownFields(result) => {
                assert_eq!(result.invalid_fields, vec![String::from("eps_yoy")]);
                assert_eq!(result.suggestions_for("eps_yoy")[0], "eps_growth_this_y");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(http.recorded_requests().is_empty());
    }

    #[test]
    fn fundamentals_projects_requested_fields() {
        let http = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok(CSV))]);
        let screener = screener(http.clone(), Arc::new(RecordingSleeper::default()));

        let report = block_on(screener.fundamentals(&["aaa", "bbb"], &["price", "change"]))
            .expect("fundamentals should succeed");

        assert_eq!(report.rows.len(), 3);
        let first = &report.rows[0];
        assert_eq!(first.len(), 3);
        assert_eq!(first["ticker"], "AAA");
        assert_eq!(first["price"], 12.0);
        assert_eq!(report.rows[1]["change"], Value::Null);

        let request = &http.recorded_requests()[0];
        assert_eq!(request.query_value("t"), Some("AAA,BBB"));
        assert_eq!(request.query_value("v"), Some("152"));
    }

    #[test]
    fn report_serializes_delays_as_milliseconds() {
        let http = RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::with_status(429, "slow down")),
            Ok(HttpResponse::ok(CSV)),
        ]);
        let report = block_on(
            screener(http, Arc::new(RecordingSleeper::default()))
                .run(ScreenerIntent::RelativeVolume, &Overrides::default()),
        )
        .expect("second attempt should succeed");

        let json = serde_json::to_value(&report).expect("serialize");

        assert_eq!(json["retry_delays"], serde_json::json!([1000]));
        assert_eq!(json["intent"], "relative_volume");
        assert!(json["records"][0]["dividend_yield"].is_null());
    }

    fn block_on<F>(future: F) -> F::Output
    where
        F: Future,
    {
        let waker = noop_waker();
        let mut context = Context::from_waker(&waker);
        let mut future = std::pin::pin!(future);

        loop {
            match future.as_mut().poll(&mut context) {
                Poll::Ready(output) => return output,
                Poll::Pending => std::thread::yield_now(),
            }
        }
    }

    fn noop_waker() -> Waker {
        // SAFETY: the vtable functions never dereference the data pointer.
        unsafe { Waker::from_raw(noop_raw_waker()) }
    }

    fn noop_raw_waker() -> RawWaker {
        RawWaker::new(std::ptr::null(), &NOOP_RAW_WAKER_VTABLE)
    }

    unsafe fn noop_raw_waker_clone(_: *const ()) -> RawWaker {
        noop_raw_waker()
    }

    unsafe fn noop_raw_waker_wake(_: *const ()) {}

    unsafe fn noop_raw_waker_wake_by_ref(_: *const ()) {}

    unsafe fn noop_raw_waker_drop(_: *const ()) {}

    static NOOP_RAW_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(
        noop_raw_waker_clone,
        noop_raw_waker_wake,
        noop_raw_waker_wake_by_ref,
        noop_raw_waker_drop,
    );
}
