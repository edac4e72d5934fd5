use serde::{Deserialize, Serialize};

use super::Ticker;

/// One screened security at one point in time.
///
/// Field names match the vocabulary in `finscreen-fields`, so a record
/// serializes to an object keyed by canonical field names. Every attribute
/// except `ticker` may be absent and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    // basic
    pub ticker: Ticker,
    pub company: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub index: Option<String>,
    /// Dollars, fully expanded from the unit suffix.
    pub market_cap: Option<f64>,
    pub ipo_date: Option<String>,
    pub employees: Option<u64>,
    pub optionable: Option<bool>,
    pub shortable: Option<bool>,
    // valuation
    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg: Option<f64>,
    pub ps_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub price_to_cash: Option<f64>,
    pub price_to_free_cash_flow: Option<f64>,
    /// Percent, e.g. `2.5` for 2.5%.
    pub dividend_yield: Option<f64>,
    pub dividend: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub book_value_per_share: Option<f64>,
    pub cash_per_share: Option<f64>,
    pub eps_ttm: Option<f64>,
    pub target_price: Option<f64>,
    // performance
    pub performance_1min: Option<f64>,
    pub performance_2min: Option<f64>,
    pub performance_3min: Option<f64>,
    pub performance_5min: Option<f64>,
    pub performance_10min: Option<f64>,
    pub performance_15min: Option<f64>,
    pub performance_30min: Option<f64>,
    pub performance_1h: Option<f64>,
    pub performance_2h: Option<f64>,
    pub performance_4h: Option<f64>,
    pub performance_1w: Option<f64>,
    pub performance_1m: Option<f64>,
    pub performance_3m: Option<f64>,
    pub performance_6m: Option<f64>,
    pub performance_ytd: Option<f64>,
    pub performance_1y: Option<f64>,
    pub performance_3y: Option<f64>,
    pub performance_5y: Option<f64>,
    pub performance_10y: Option<f64>,
    pub return_since_inception: Option<f64>,
    // technical
    pub beta: Option<f64>,
    pub atr: Option<f64>,
    pub volatility_week: Option<f64>,
    pub volatility_month: Option<f64>,
    pub rsi: Option<f64>,
    /// Percent distance of the price from the moving average.
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    /// Percent distance from the 52-week high (zero or negative).
    pub high_52w: Option<f64>,
    pub low_52w: Option<f64>,
    pub all_time_high: Option<f64>,
    pub all_time_low: Option<f64>,
    /// Current volume divided by average volume.
    pub relative_volume: Option<f64>,
    pub gap: Option<f64>,
    pub change_from_open: Option<f64>,
    // fundamental
    pub income: Option<f64>,
    pub sales: Option<f64>,
    pub roa: Option<f64>,
    pub roe: Option<f64>,
    pub roic: Option<f64>,
    pub gross_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub profit_margin: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub debt_equity: Option<f64>,
    pub lt_debt_equity: Option<f64>,
    // earnings
    /// As rendered by the service, e.g. `07/25/2024`.
    pub earnings_date: Option<String>,
    /// `BMO` (before open) or `AMC` (after close) when known.
    pub earnings_timing: Option<String>,
    pub eps_surprise: Option<f64>,
    pub revenue_surprise: Option<f64>,
    pub eps_estimate: Option<f64>,
    pub eps_actual: Option<f64>,
    pub revenue_estimate: Option<f64>,
    pub revenue_actual: Option<f64>,
    pub eps_revision: Option<f64>,
    pub revenue_revision: Option<f64>,
    pub eps_growth_this_y: Option<f64>,
    pub eps_growth_next_y: Option<f64>,
    pub eps_growth_past_5y: Option<f64>,
    pub eps_growth_next_5y: Option<f64>,
    pub eps_growth_qtr: Option<f64>,
    pub sales_growth_this_y: Option<f64>,
    pub sales_growth_past_5y: Option<f64>,
    pub sales_growth_qtr: Option<f64>,
    // etf
    pub aum: Option<f64>,
    pub expense_ratio: Option<f64>,
    pub net_asset_value: Option<f64>,
    pub net_asset_value_percent: Option<f64>,
    pub net_flows_1m: Option<f64>,
    pub net_flows_1m_percent: Option<f64>,
    pub net_flows_3m: Option<f64>,
    pub net_flows_3m_percent: Option<f64>,
    pub net_flows_ytd: Option<f64>,
    pub net_flows_ytd_percent: Option<f64>,
    pub net_flows_1y: Option<f64>,
    pub net_flows_1y_percent: Option<f64>,
    pub holdings: Option<u64>,
    pub etf_category: Option<String>,
    pub asset_type: Option<String>,
    pub etf_type: Option<String>,
    pub sector_theme: Option<String>,
    pub region: Option<String>,
    pub active_passive: Option<String>,
    // news
    /// 1 (strong buy) to 5 (sell).
    pub analyst_recom: Option<f64>,
    pub insider_transactions: Option<f64>,
    pub institutional_transactions: Option<f64>,
    pub tags: Option<String>,
    // trading
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub volume: Option<u64>,
    pub avg_volume: Option<u64>,
    pub prev_close: Option<f64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub trades: Option<u64>,
    pub afterhours_close: Option<f64>,
    pub afterhours_change: Option<f64>,
    pub float: Option<u64>,
    pub shares_outstanding: Option<u64>,
    pub float_percent: Option<f64>,
    pub float_short: Option<f64>,
    pub short_ratio: Option<f64>,
    pub short_interest: Option<u64>,
    pub insider_ownership: Option<f64>,
    pub institutional_ownership: Option<f64>,
}

impl StockRecord {
    /// A record carrying only its ticker.
    pub fn new(ticker: Ticker) -> Self {
        Self {
            ticker,
            company: None,
            sector: None,
            industry: None,
            country: None,
            index: None,
            market_cap: None,
            ipo_date: None,
            employees: None,
            optionable: None,
            shortable: None,
            pe_ratio: None,
            forward_pe: None,
            peg: None,
            ps_ratio: None,
            pb_ratio: None,
            price_to_cash: None,
            price_to_free_cash_flow: None,
            dividend_yield: None,
            dividend: None,
            payout_ratio: None,
            book_value_per_share: None,
            cash_per_share: None,
            eps_ttm: None,
            target_price: None,
            performance_1min: None,
            performance_2min: None,
            performance_3min: None,
            performance_5min: None,
            performance_10min: None,
            performance_15min: None,
            performance_30min: None,
            performance_1h: None,
            performance_2h: None,
            performance_4h: None,
            performance_1w: None,
            performance_1m: None,
            performance_3m: None,
            performance_6m: None,
            performance_ytd: None,
            performance_1y: None,
            performance_3y: None,
            performance_5y: None,
            performance_10y: None,
            return_since_inception: None,
            beta: None,
            atr: None,
            volatility_week: None,
            volatility_month: None,
            rsi: None,
            sma20: None,
            sma50: None,
            sma200: None,
            high_52w: None,
            low_52w: None,
            all_time_high: None,
            all_time_low: None,
            relative_volume: None,
            gap: None,
            change_from_open: None,
            income: None,
            sales: None,
            roa: None,
            roe: None,
            roic: None,
            gross_margin: None,
            operating_margin: None,
            profit_margin: None,
            current_ratio: None,
            quick_ratio: None,
            debt_equity: None,
            lt_debt_equity: None,
            earnings_date: None,
            earnings_timing: None,
            eps_surprise: None,
            revenue_surprise: None,
            eps_estimate: None,
            eps_actual: None,
            revenue_estimate: None,
            revenue_actual: None,
            eps_revision: None,
            revenue_revision: None,
            eps_growth_this_y: None,
            eps_growth_next_y: None,
            eps_growth_past_5y: None,
            eps_growth_next_5y: None,
            eps_growth_qtr: None,
            sales_growth_this_y: None,
            sales_growth_past_5y: None,
            sales_growth_qtr: None,
            aum: None,
            expense_ratio: None,
            net_asset_value: None,
            net_asset_value_percent: None,
            net_flows_1m: None,
            net_flows_1m_percent: None,
            net_flows_3m: None,
            net_flows_3m_percent: None,
            net_flows_ytd: None,
            net_flows_ytd_percent: None,
            net_flows_1y: None,
            net_flows_1y_percent: None,
            holdings: None,
            etf_category: None,
            asset_type: None,
            etf_type: None,
            sector_theme: None,
            region: None,
            active_passive: None,
            analyst_recom: None,
            insider_transactions: None,
            institutional_transactions: None,
            tags: None,
            price: None,
            change: None,
            volume: None,
            avg_volume: None,
            prev_close: None,
            open: None,
            high: None,
            low: None,
            trades: None,
            afterhours_close: None,
            afterhours_change: None,
            float: None,
            shares_outstanding: None,
            float_percent: None,
            float_short: None,
            short_ratio: None,
            short_interest: None,
            insider_ownership: None,
            institutional_ownership: None,
        }
    }
}
