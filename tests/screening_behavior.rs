//! Behavior-driven tests for end-to-end screening runs
//!
//! These tests drive the screener through a scripted transport and verify
//! what the user sees: which request goes out, how failures are retried,
//! and how the returned rows are cleaned, ordered and capped.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use finscreen_core::http_client::NoopHttpClient;
use finscreen_core::{
    Bound, FilterError, HttpClient, HttpError, HttpRequest, HttpResponse, Overrides,
    ResponseIssue, RetryConfig, ScreenError, Screener, ScreenerConfig, ScreenerIntent, Sleeper,
};

const EXPORT: &str = "\u{feff}\"No.\",\"Ticker\",\"Company\",\"Sector\",\"Market Cap\",\"Price\",\"Change\",\"Volume\",\"Relative Volume\"\n\
    \"1\",\"NVDA\",\"NVIDIA Corp\",\"Technology\",\"2.9B\",\"120.40\",\"4.50%\",\"312,000,000\",\"2.4\"\n\
    \"2\",\"AMD\",\"Advanced Micro Devices\",\"Technology\",\"250.1B\",\"155.00\",\"6.25%\",\"80,000,000\",\"3.1\"\n\
    \"3\",\"\",\"\",\"\",\"-\",\"-\",\"-\",\"\",\"-\"\n\
    \"4\",\"XOM\",\"Exxon Mobil\",\"Energy\",\"480.0B\",\"110.10\",\"-\",\"15,000,000\",\"1.6\"\n";

struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log").clone()
    }
}

impl HttpClient for ScriptedTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests.lock().expect("request log").push(request);
        let next = self
            .responses
            .lock()
            .expect("response script")
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::non_retryable("no scripted response left")));
        Box::pin(async move { next })
    }
}

#[derive(Default)]
struct InstantSleeper {
    pauses: Mutex<Vec<Duration>>,
}

impl Sleeper for InstantSleeper {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        self.pauses.lock().expect("pause log").push(duration);
        Box::pin(async {})
    }
}

fn screener_with(transport: Arc<ScriptedTransport>) -> Screener {
    let config = ScreenerConfig::default()
        .with_api_key("integration-key")
        .with_base_url("http://screener.test");
    Screener::new(config)
        .with_http(transport)
        .with_sleeper(Arc::new(InstantSleeper::default()))
}

// =============================================================================
// Screening: Request Construction
// =============================================================================

#[tokio::test]
async fn when_volume_surge_runs_with_defaults_then_request_carries_profile_filters() {
    // Given: A screener whose transport returns a small export
    let transport = ScriptedTransport::new(vec![Ok(HttpResponse::ok(EXPORT))]);
    let screener = screener_with(transport.clone());

    // When: The user runs the volume surge intent without overrides
    let report = screener
        .run(ScreenerIntent::VolumeSurge, &Overrides::default())
        .await
        .expect("run should succeed");

    // Then: Exactly one request went to the export endpoint with the compiled query
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url, "http://screener.test/export.ashx");
    assert_eq!(
        request.query_value("f"),
        Some("cap_smallover,ind_stocksonly,sh_avgvol_o100,sh_price_o10,sh_relvol_o1.5,ta_change_u2,ta_sma200_pa")
    );
    assert_eq!(request.query_value("ft"), Some("4"));
    assert_eq!(request.query_value("auth"), Some("integration-key"));

    // And: The report shows the query without leaking the key
    assert!(report.query.contains("auth=***"));
    assert!(!report.query.contains("integration-key"));
}

#[tokio::test]
async fn when_user_overrides_price_then_only_that_filter_changes() {
    // Given: A price window override on top of the volume surge defaults
    let transport = ScriptedTransport::new(vec![Ok(HttpResponse::ok(EXPORT))]);
    let overrides = Overrides {
        price_min: Some(Bound::Number(20.0)),
        price_max: Some(Bound::Number(80.0)),
        ..Overrides::default()
    };

    // When: The run executes
    screener_with(transport.clone())
        .run(ScreenerIntent::VolumeSurge, &overrides)
        .await
        .expect("run should succeed");

    // Then: The price filter is replaced and the rest are untouched
    let requests = transport.requests();
    let filter = requests[0].query_value("f").expect("filter present");
    assert!(filter.contains("sh_price_20to80"));
    assert!(filter.contains("sh_relvol_o1.5"));
    assert!(filter.contains("ta_sma200_pa"));
    assert!(!filter.contains("sh_price_o10"));
}

#[tokio::test]
async fn when_overrides_conflict_then_no_request_is_made() {
    // Given: Both a price literal and a price minimum
    let transport = ScriptedTransport::new(Vec::new());
    let overrides = Overrides {
        price: Some(String::from("o5")),
        price_min: Some(Bound::Number(10.0)),
        ..Overrides::default()
    };

    // When: The run is attempted
    let error = screener_with(transport.clone())
        .run(ScreenerIntent::VolumeSurge, &overrides)
        .await
        .expect_err("conflicting overrides must fail");

    // Then: The caller learns which keys clash and the network was never touched
    assert_eq!(error.code(), "screen.conflicting_filter");
    assert!(matches!(
        error,
        ScreenError::Filter(FilterError::Conflicting { ref first, ref second })
            if first == "price" && second == "price_min"
    ));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn when_max_results_is_out_of_range_then_filter_error_is_returned() {
    // Given: A result cap above the service limit
    let transport = ScriptedTransport::new(Vec::new());
    let overrides = Overrides {
        max_results: Some(5_000),
        ..Overrides::default()
    };

    // When: The run is attempted
    let error = screener_with(transport.clone())
        .run(ScreenerIntent::Etf, &overrides)
        .await
        .expect_err("cap must be rejected");

    // Then: The error names the offending key
    match error {
        ScreenError::Filter(filter) => assert_eq!(filter.key(), "max_results"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(transport.requests().is_empty());
}

// =============================================================================
// Screening: Response Handling
// =============================================================================

#[tokio::test]
async fn when_export_has_rows_without_ticker_then_they_are_reported_not_fatal() {
    // Given: An export where one row lost its ticker
    let transport = ScriptedTransport::new(vec![Ok(HttpResponse::ok(EXPORT))]);

    // When: The relative volume intent runs
    let report = screener_with(transport)
        .run(ScreenerIntent::RelativeVolume, &Overrides::default())
        .await
        .expect("run should succeed");

    // Then: Good rows survive with units expanded and the bad row is listed
    assert_eq!(report.records.len(), 3);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].row, 2);

    let amd = report
        .records
        .iter()
        .find(|record| record.ticker.as_str() == "AMD")
        .expect("AMD kept");
    assert_eq!(amd.market_cap, Some(250_100_000_000.0));
    assert_eq!(amd.volume, Some(80_000_000));
    assert_eq!(amd.sector.as_deref(), Some("Technology"));
}

#[tokio::test]
async fn when_results_are_sorted_then_missing_values_go_last_and_cap_applies() {
    // Given: A run sorted by price change descending, capped at two rows
    let transport = ScriptedTransport::new(vec![Ok(HttpResponse::ok(EXPORT))]);
    let overrides = Overrides {
        sort_by: Some(String::from("price_change")),
        sort_order: Some(String::from("desc")),
        max_results: Some(2),
        ..Overrides::default()
    };

    // When: The run executes
    let report = screener_with(transport)
        .run(ScreenerIntent::TechnicalAnalysis, &overrides)
        .await
        .expect("run should succeed");

    // Then: The largest movers come first and the cap is honored
    let tickers: Vec<&str> = report.records.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["AMD", "NVDA"]);
}

#[tokio::test]
async fn when_ascending_sort_then_rows_without_a_value_still_go_last() {
    // Given: An ascending price change sort over rows where XOM has no change
    let transport = ScriptedTransport::new(vec![Ok(HttpResponse::ok(EXPORT))]);
    let overrides = Overrides {
        sort_by: Some(String::from("price_change")),
        sort_order: Some(String::from("asc")),
        ..Overrides::default()
    };

    // When: The run executes
    let report = screener_with(transport)
        .run(ScreenerIntent::TechnicalAnalysis, &overrides)
        .await
        .expect("run should succeed");

    // Then: Present values ascend and the absent one trails
    let tickers: Vec<&str> = report.records.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["NVDA", "AMD", "XOM"]);
}

#[tokio::test]
async fn when_service_returns_a_login_page_then_result_is_empty_with_reason() {
    // Given: The endpoint answers 200 with an HTML page instead of CSV
    let transport = ScriptedTransport::new(vec![Ok(HttpResponse::ok(
        "<!DOCTYPE html><html><body><form>Sign in</form></body></html>",
    ))]);

    // When: The run executes
    let report = screener_with(transport)
        .run(ScreenerIntent::Earnings, &Overrides::default())
        .await
        .expect("an unusable body is not an error");

    // Then: No records, and the reason is visible
    assert!(report.records.is_empty());
    assert_eq!(report.response_issue, Some(ResponseIssue::UnexpectedHtml));
}

#[tokio::test]
async fn when_service_answers_with_an_empty_body_then_result_is_empty_with_reason() {
    // Given: A transport that always answers 200 with nothing
    let screener = Screener::new(ScreenerConfig::default().with_api_key("integration-key"))
        .with_http(Arc::new(NoopHttpClient))
        .with_sleeper(Arc::new(InstantSleeper::default()));

    // When: The run executes
    let report = screener
        .run(ScreenerIntent::UpcomingEarnings, &Overrides::default())
        .await
        .expect("an empty body is not an error");

    // Then: One attempt, no records, and the empty body is reported
    assert_eq!(report.attempts, 1);
    assert!(report.records.is_empty());
    assert_eq!(report.response_issue, Some(ResponseIssue::EmptyBody));
}

// =============================================================================
// Screening: Retry and Failure
// =============================================================================

#[tokio::test]
async fn when_service_is_briefly_unavailable_then_run_retries_and_succeeds() {
    // Given: Two transient failures followed by a good response
    let transport = ScriptedTransport::new(vec![
        Ok(HttpResponse::with_status(502, "bad gateway")),
        Err(HttpError::timeout("timed out")),
        Ok(HttpResponse::ok(EXPORT)),
    ]);

    // When: The run executes with the default retry policy
    let report = screener_with(transport.clone())
        .run(ScreenerIntent::RelativeVolume, &Overrides::default())
        .await
        .expect("third attempt succeeds");

    // Then: Three attempts were made with doubling delays between them
    assert_eq!(report.attempts, 3);
    assert_eq!(
        report.retry_delays,
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn when_service_rejects_the_key_then_no_retry_happens() {
    // Given: An authorization failure
    let transport = ScriptedTransport::new(vec![Ok(HttpResponse::with_status(401, "unauthorized"))]);

    // When: The run executes
    let error = screener_with(transport.clone())
        .run(ScreenerIntent::Earnings, &Overrides::default())
        .await
        .expect_err("401 is final");

    // Then: The status is surfaced after a single attempt
    assert!(matches!(error, ScreenError::Status { status: 401, attempts: 1 }));
    assert!(!error.is_retryable());
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn when_retries_are_disabled_then_first_failure_is_final() {
    // Given: A retry policy with no retries and a flaky transport
    let transport = ScriptedTransport::new(vec![
        Err(HttpError::connect("connection refused")),
        Ok(HttpResponse::ok(EXPORT)),
    ]);
    let config = ScreenerConfig::default()
        .with_api_key("integration-key")
        .with_retry(RetryConfig::no_retry());
    let screener = Screener::new(config)
        .with_http(transport.clone())
        .with_sleeper(Arc::new(InstantSleeper::default()));

    // When: The run executes
    let error = screener
        .run(ScreenerIntent::Etf, &Overrides::default())
        .await
        .expect_err("no retry allowed");

    // Then: A network error after one attempt
    assert!(matches!(error, ScreenError::Network { attempts: 1, .. }));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn when_no_api_key_is_configured_then_run_fails_up_front() {
    // Given: A screener without credentials
    let transport = ScriptedTransport::new(Vec::new());
    let screener = Screener::new(ScreenerConfig::default())
        .with_http(transport.clone())
        .with_sleeper(Arc::new(InstantSleeper::default()));

    // When: The run is attempted
    let error = screener
        .run(ScreenerIntent::VolumeSurge, &Overrides::default())
        .await
        .expect_err("key required");

    // Then: A missing-key error, and nothing was sent
    assert!(matches!(error, ScreenError::MissingApiKey));
    assert!(transport.requests().is_empty());
}

// =============================================================================
// Fundamentals
// =============================================================================

#[tokio::test]
async fn when_fundamentals_are_requested_then_only_requested_fields_return() {
    // Given: A fundamentals lookup for two tickers
    let transport = ScriptedTransport::new(vec![Ok(HttpResponse::ok(EXPORT))]);

    // When: The user asks for price and sector
    let report = screener_with(transport.clone())
        .fundamentals(&["nvda", "amd"], &["price", "sector"])
        .await
        .expect("lookup should succeed");

    // Then: Each row holds the ticker plus exactly the requested fields
    assert_eq!(report.fields, vec!["price", "sector"]);
    let nvda = &report.rows[0];
    assert_eq!(nvda.len(), 3);
    assert_eq!(nvda["ticker"], "NVDA");
    assert_eq!(nvda["price"], 120.4);
    assert_eq!(nvda["sector"], "Technology");

    // And: The request used the fundamentals view with normalized tickers
    let requests = transport.requests();
    assert_eq!(requests[0].query_value("v"), Some("152"));
    assert_eq!(requests[0].query_value("t"), Some("NVDA,AMD"));
}

#[tokio::test]
async fn when_fundamentals_get_a_bad_ticker_then_nothing_is_sent() {
    // Given: A ticker that starts with a digit
    let transport = ScriptedTransport::new(Vec::new());

    // When: The lookup is attempted
    let error = screener_with(transport.clone())
        .fundamentals(&["AAPL", "9XYZ"], &[])
        .await
        .expect_err("bad ticker");

    // Then: A ticker error, before any request
    assert_eq!(error.code(), "screen.invalid_ticker");
    assert!(transport.requests().is_empty());
}
