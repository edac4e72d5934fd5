//! Built-in field table.
//!
//! Declaration order is significant: it is the iteration order of the
//! vocabulary, which search results and suggestions use to break ties.

use crate::metadata::DataType;

pub(crate) struct CategorySeed {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub(crate) const CATEGORIES: &[CategorySeed] = &[
    CategorySeed {
        id: "basic",
        name: "Basic Information",
        description: "Identity, classification and listing details",
    },
    CategorySeed {
        id: "valuation",
        name: "Valuation Metrics",
        description: "Price multiples, per-share values and dividends",
    },
    CategorySeed {
        id: "performance",
        name: "Performance Metrics",
        description: "Price performance from one minute to ten years",
    },
    CategorySeed {
        id: "technical",
        name: "Technical Indicators",
        description: "Moving averages, oscillators, volatility and ranges",
    },
    CategorySeed {
        id: "fundamental",
        name: "Fundamental Data",
        description: "Income statement, margins, returns and balance sheet ratios",
    },
    CategorySeed {
        id: "earnings",
        name: "Earnings & Growth",
        description: "Earnings events, surprises, revisions and growth rates",
    },
    CategorySeed {
        id: "etf",
        name: "ETF Specific",
        description: "Fund assets, flows and classification for exchange traded funds",
    },
    CategorySeed {
        id: "news",
        name: "News & Sentiment",
        description: "Analyst opinion and insider or institutional activity",
    },
    CategorySeed {
        id: "trading",
        name: "Trading Data",
        description: "Session prices, volume, share structure and short interest",
    },
];

#[derive(Clone, Copy)]
pub(crate) struct FieldSeed {
    pub name: &'static str,
    pub display: &'static str,
    pub category: &'static str,
    pub data_type: DataType,
    pub description: &'static str,
    pub format: &'static str,
    pub csv: &'static [&'static str],
    pub html: &'static [&'static str],
    pub related: &'static [&'static str],
    pub examples: &'static [&'static str],
}

const fn field(
    name: &'static str,
    display: &'static str,
    category: &'static str,
    data_type: DataType,
    description: &'static str,
) -> FieldSeed {
    FieldSeed {
        name,
        display,
        category,
        data_type,
        description,
        format: "",
        csv: &[],
        html: &[],
        related: &[],
        examples: &[],
    }
}

impl FieldSeed {
    const fn csv(self, csv: &'static [&'static str]) -> Self {
        Self { csv, ..self }
    }

    const fn html(self, html: &'static [&'static str]) -> Self {
        Self { html, ..self }
    }

    const fn related(self, related: &'static [&'static str]) -> Self {
        Self { related, ..self }
    }

    const fn examples(self, examples: &'static [&'static str]) -> Self {
        Self { examples, ..self }
    }

    const fn format(self, format: &'static str) -> Self {
        Self { format, ..self }
    }
}

use DataType::{Boolean, Currency, Date, Integer, Number, Percentage, Text};

pub(crate) const FIELDS: &[FieldSeed] = &[
    // basic
    field("ticker", "Ticker", "basic", Text, "Exchange ticker symbol of the security")
        .csv(&["Ticker"])
        .html(&["Ticker"])
        .related(&["company"]),
    field("company", "Company", "basic", Text, "Company or fund name")
        .csv(&["Company"])
        .html(&["Company"])
        .related(&["ticker", "sector", "industry"]),
    field("sector", "Sector", "basic", Text, "Economic sector classification")
        .csv(&["Sector"])
        .html(&["Sector"])
        .related(&["industry"]),
    field("industry", "Industry", "basic", Text, "Industry classification within the sector")
        .csv(&["Industry"])
        .html(&["Industry"])
        .related(&["sector"]),
    field("country", "Country", "basic", Text, "Country of the company headquarters")
        .csv(&["Country"])
        .html(&["Country"]),
    field("index", "Index", "basic", Text, "Major index membership such as S&P 500 or DJIA")
        .csv(&["Index"])
        .html(&["Index"]),
    field(
        "market_cap",
        "Market Capitalization",
        "basic",
        Currency,
        "Total value of a company's shares in the market. Key metric for company size classification",
    )
    .csv(&["Market Cap"])
    .html(&["Market Cap"])
    .format("Dollar amount with unit suffix (e.g. $50.2B, 850.3M)")
    .related(&["shares_outstanding", "price", "float"])
    .examples(&["market_cap = smallover", "market_cap_min = 2 (billions)"]),
    field("ipo_date", "IPO Date", "basic", Date, "Date of the initial public offering")
        .csv(&["IPO Date"])
        .html(&["IPO Date"]),
    field("employees", "Employees", "basic", Integer, "Full-time employee headcount")
        .csv(&["Employees"])
        .html(&["Employees"]),
    field("optionable", "Optionable", "basic", Boolean, "Whether listed options exist for the security")
        .csv(&["Optionable"])
        .html(&["Optionable"]),
    field("shortable", "Shortable", "basic", Boolean, "Whether the security can be sold short")
        .csv(&["Shortable"])
        .html(&["Shortable"]),
    // valuation
    field(
        "pe_ratio",
        "Price-to-Earnings Ratio",
        "valuation",
        Number,
        "Ratio of the current share price to trailing earnings per share",
    )
    .csv(&["P/E"])
    .html(&["P/E"])
    .format("Decimal number (e.g. 15.2, 22.8)")
    .related(&["forward_pe", "peg", "eps_ttm", "earnings_date"])
    .examples(&["pe_max = 30", "pe_min = 5, pe_max = 15"]),
    field("forward_pe", "Forward P/E", "valuation", Number, "Share price relative to next year's estimated earnings")
        .csv(&["Forward P/E"])
        .html(&["Forward P/E"])
        .related(&["pe_ratio", "eps_growth_next_y"]),
    field("peg", "PEG Ratio", "valuation", Number, "P/E ratio divided by expected earnings growth")
        .csv(&["PEG"])
        .html(&["PEG"])
        .related(&["pe_ratio", "eps_growth_next_5y"]),
    field("ps_ratio", "Price-to-Sales Ratio", "valuation", Number, "Market capitalization relative to trailing sales")
        .csv(&["P/S"])
        .html(&["P/S"])
        .related(&["sales"]),
    field("pb_ratio", "Price-to-Book Ratio", "valuation", Number, "Share price relative to book value per share")
        .csv(&["P/B"])
        .html(&["P/B"])
        .related(&["book_value_per_share"]),
    field("price_to_cash", "Price-to-Cash Ratio", "valuation", Number, "Share price relative to cash per share")
        .csv(&["P/Cash", "P/C"])
        .html(&["P/C"])
        .related(&["cash_per_share"]),
    field(
        "price_to_free_cash_flow",
        "Price-to-Free-Cash-Flow Ratio",
        "valuation",
        Number,
        "Market capitalization relative to free cash flow",
    )
    .csv(&["P/Free Cash Flow", "P/FCF"])
    .html(&["P/FCF"]),
    field(
        "dividend_yield",
        "Dividend Yield",
        "valuation",
        Percentage,
        "Annual dividend payment as a percentage of the stock price. Indicates income potential from dividends",
    )
    .csv(&["Dividend Yield", "Dividend %"])
    .html(&["Dividend %", "Dividend"])
    .related(&["dividend", "payout_ratio"])
    .examples(&["dividend_yield_min = 2", "dividend_yield_min = 3, dividend_yield_max = 8"]),
    field("dividend", "Dividend", "valuation", Currency, "Annual dividend per share in dollars")
        .csv(&["Dividend"])
        .related(&["dividend_yield", "payout_ratio"]),
    field("payout_ratio", "Payout Ratio", "valuation", Percentage, "Share of earnings paid out as dividends")
        .csv(&["Payout Ratio"])
        .html(&["Payout Ratio"])
        .related(&["dividend_yield", "eps_ttm"]),
    field("book_value_per_share", "Book Value per Share", "valuation", Currency, "Shareholder equity divided by shares outstanding")
        .csv(&["Book/sh"])
        .html(&["Book/sh"])
        .related(&["pb_ratio"]),
    field("cash_per_share", "Cash per Share", "valuation", Currency, "Cash and equivalents divided by shares outstanding")
        .csv(&["Cash/sh"])
        .html(&["Cash/sh"])
        .related(&["price_to_cash"]),
    field("eps_ttm", "EPS (ttm)", "valuation", Currency, "Diluted earnings per share over the trailing twelve months")
        .csv(&["EPS (ttm)"])
        .html(&["EPS"])
        .related(&["pe_ratio", "eps_growth_this_y"]),
    field("target_price", "Target Price", "valuation", Currency, "Mean analyst price target")
        .csv(&["Target Price"])
        .html(&["Target Price"])
        .related(&["price", "analyst_recom"]),
    // performance
    field("performance_1min", "Performance (1 Minute)", "performance", Percentage, "Price change over the last minute")
        .csv(&["Performance (1 Minute)"]),
    field("performance_2min", "Performance (2 Minutes)", "performance", Percentage, "Price change over the last two minutes")
        .csv(&["Performance (2 Minutes)"]),
    field("performance_3min", "Performance (3 Minutes)", "performance", Percentage, "Price change over the last three minutes")
        .csv(&["Performance (3 Minutes)"]),
    field("performance_5min", "Performance (5 Minutes)", "performance", Percentage, "Price change over the last five minutes")
        .csv(&["Performance (5 Minutes)"]),
    field("performance_10min", "Performance (10 Minutes)", "performance", Percentage, "Price change over the last ten minutes")
        .csv(&["Performance (10 Minutes)"]),
    field("performance_15min", "Performance (15 Minutes)", "performance", Percentage, "Price change over the last fifteen minutes")
        .csv(&["Performance (15 Minutes)"]),
    field("performance_30min", "Performance (30 Minutes)", "performance", Percentage, "Price change over the last thirty minutes")
        .csv(&["Performance (30 Minutes)"]),
    field("performance_1h", "Performance (1 Hour)", "performance", Percentage, "Price change over the last hour")
        .csv(&["Performance (1 Hour)"]),
    field("performance_2h", "Performance (2 Hours)", "performance", Percentage, "Price change over the last two hours")
        .csv(&["Performance (2 Hours)"]),
    field("performance_4h", "Performance (4 Hours)", "performance", Percentage, "Price change over the last four hours")
        .csv(&["Performance (4 Hours)"]),
    field("performance_1w", "Performance (Week)", "performance", Percentage, "Price change over the last week")
        .csv(&["Performance (Week)"])
        .html(&["Perf Week"])
        .related(&["performance_1m"]),
    field("performance_1m", "Performance (Month)", "performance", Percentage, "Price change over the last month")
        .csv(&["Performance (Month)"])
        .html(&["Perf Month"])
        .related(&["performance_1w", "performance_3m"]),
    field("performance_3m", "Performance (Quarter)", "performance", Percentage, "Price change over the last quarter")
        .csv(&["Performance (Quarter)"])
        .html(&["Perf Quart"]),
    field("performance_6m", "Performance (Half Year)", "performance", Percentage, "Price change over the last six months")
        .csv(&["Performance (Half Year)"])
        .html(&["Perf Half"]),
    field("performance_ytd", "Performance (YTD)", "performance", Percentage, "Price change since the start of the calendar year")
        .csv(&["Performance (YTD)"])
        .html(&["Perf YTD"]),
    field("performance_1y", "Performance (Year)", "performance", Percentage, "Price change over the last twelve months")
        .csv(&["Performance (Year)"])
        .html(&["Perf Year"]),
    field("performance_3y", "Return 3 Year", "performance", Percentage, "Total return over three years")
        .csv(&["Return 3 Year"]),
    field("performance_5y", "Return 5 Year", "performance", Percentage, "Total return over five years")
        .csv(&["Return 5 Year"]),
    field("performance_10y", "Return 10 Year", "performance", Percentage, "Total return over ten years")
        .csv(&["Return 10 Year"]),
    field("return_since_inception", "Return Since Inception", "performance", Percentage, "Total return since the fund or listing started")
        .csv(&["Return Since Inception"]),
    // technical
    field("beta", "Beta", "technical", Number, "Volatility relative to the overall market")
        .csv(&["Beta"])
        .html(&["Beta"]),
    field("atr", "Average True Range", "technical", Number, "Fourteen day average true range in price units")
        .csv(&["Average True Range"])
        .html(&["ATR"]),
    field("volatility_week", "Volatility (Week)", "technical", Percentage, "Average daily high-low range over the last week")
        .csv(&["Volatility (Week)"])
        .html(&["Volatility W", "Volatility"])
        .related(&["volatility_month"]),
    field("volatility_month", "Volatility (Month)", "technical", Percentage, "Average daily high-low range over the last month")
        .csv(&["Volatility (Month)"])
        .html(&["Volatility M"])
        .related(&["volatility_week"]),
    field("rsi", "Relative Strength Index (14)", "technical", Number, "Fourteen period momentum oscillator between 0 and 100")
        .csv(&["Relative Strength Index (14)", "RSI"])
        .html(&["RSI", "RSI (14)"])
        .format("Number between 0 and 100; below 30 oversold, above 70 overbought")
        .examples(&["rsi_max = 30", "rsi_min = 50, rsi_max = 70"]),
    field("sma20", "20-Day Simple Moving Average", "technical", Percentage, "Distance of the price from its 20 day simple moving average")
        .csv(&["20-Day Simple Moving Average", "SMA20"])
        .html(&["SMA20"])
        .related(&["sma50", "sma200"]),
    field("sma50", "50-Day Simple Moving Average", "technical", Percentage, "Distance of the price from its 50 day simple moving average")
        .csv(&["50-Day Simple Moving Average", "SMA50"])
        .html(&["SMA50"])
        .related(&["sma20", "sma200"]),
    field("sma200", "200-Day Simple Moving Average", "technical", Percentage, "Distance of the price from its 200 day simple moving average")
        .csv(&["200-Day Simple Moving Average", "SMA200"])
        .html(&["SMA200"])
        .related(&["sma20", "sma50"]),
    field("high_52w", "52-Week High", "technical", Percentage, "Distance of the price from its 52 week high")
        .csv(&["52-Week High"])
        .html(&["52W High"])
        .related(&["low_52w"]),
    field("low_52w", "52-Week Low", "technical", Percentage, "Distance of the price from its 52 week low")
        .csv(&["52-Week Low"])
        .html(&["52W Low"])
        .related(&["high_52w"]),
    field("all_time_high", "All-Time High", "technical", Percentage, "Distance of the price from its all-time high")
        .csv(&["All-Time High"]),
    field("all_time_low", "All-Time Low", "technical", Percentage, "Distance of the price from its all-time low")
        .csv(&["All-Time Low"]),
    field("relative_volume", "Relative Volume", "technical", Number, "Current volume divided by average volume")
        .csv(&["Relative Volume"])
        .html(&["Rel Volume"])
        .related(&["volume", "avg_volume"])
        .examples(&["relative_volume_min = 1.5"]),
    field("gap", "Gap", "technical", Percentage, "Opening price relative to the previous close")
        .csv(&["Gap"])
        .html(&["Gap"]),
    field("change_from_open", "Change from Open", "technical", Percentage, "Current price relative to the session open")
        .csv(&["Change from Open"])
        .html(&["from Open"]),
    // fundamental
    field("income", "Income", "fundamental", Currency, "Trailing twelve month net income")
        .csv(&["Income"])
        .html(&["Income"]),
    field("sales", "Sales", "fundamental", Currency, "Trailing twelve month revenue")
        .csv(&["Sales"])
        .html(&["Sales"])
        .related(&["ps_ratio", "sales_growth_qtr"]),
    field("roa", "Return on Assets", "fundamental", Percentage, "Net income relative to total assets")
        .csv(&["Return on Assets"])
        .html(&["ROA"]),
    field("roe", "Return on Equity", "fundamental", Percentage, "Net income relative to shareholder equity")
        .csv(&["Return on Equity"])
        .html(&["ROE"]),
    field("roic", "Return on Invested Capital", "fundamental", Percentage, "Operating profit relative to invested capital")
        .csv(&["Return on Invested Capital", "Return on Investment"])
        .html(&["ROI", "ROIC"]),
    field("gross_margin", "Gross Margin", "fundamental", Percentage, "Gross profit as a share of revenue")
        .csv(&["Gross Margin"])
        .html(&["Gross M"]),
    field("operating_margin", "Operating Margin", "fundamental", Percentage, "Operating income as a share of revenue")
        .csv(&["Operating Margin"])
        .html(&["Oper M"]),
    field("profit_margin", "Profit Margin", "fundamental", Percentage, "Net income as a share of revenue")
        .csv(&["Profit Margin"])
        .html(&["Profit M"]),
    field("current_ratio", "Current Ratio", "fundamental", Number, "Current assets divided by current liabilities")
        .csv(&["Current Ratio"])
        .html(&["Curr R"]),
    field("quick_ratio", "Quick Ratio", "fundamental", Number, "Liquid assets divided by current liabilities")
        .csv(&["Quick Ratio"])
        .html(&["Quick R"]),
    field("debt_equity", "Total Debt/Equity", "fundamental", Number, "Total debt divided by shareholder equity")
        .csv(&["Total Debt/Equity"])
        .html(&["Debt/Eq"])
        .related(&["lt_debt_equity"]),
    field("lt_debt_equity", "LT Debt/Equity", "fundamental", Number, "Long-term debt divided by shareholder equity")
        .csv(&["LT Debt/Equity"])
        .html(&["LTDebt/Eq"])
        .related(&["debt_equity"]),
    // earnings
    field("earnings_date", "Earnings Date", "earnings", Date, "Date of the next or most recent earnings announcement")
        .csv(&["Earnings Date", "Earnings", "Next Earnings Date"])
        .html(&["Earnings Date", "Earnings", "Next Earnings Date"])
        .related(&["earnings_timing", "eps_surprise"]),
    field("earnings_timing", "Earnings Time", "earnings", Text, "Whether earnings are released before the open or after the close")
        .csv(&["Earnings Time"])
        .html(&["Earnings Time"]),
    field("eps_surprise", "EPS Surprise", "earnings", Percentage, "Reported EPS relative to the consensus estimate")
        .csv(&["EPS Surprise"])
        .html(&["EPS Surprise"])
        .related(&["eps_estimate", "eps_actual"]),
    field("revenue_surprise", "Revenue Surprise", "earnings", Percentage, "Reported revenue relative to the consensus estimate")
        .csv(&["Revenue Surprise"])
        .html(&["Sales Surprise"])
        .related(&["revenue_estimate", "revenue_actual"]),
    field("eps_estimate", "EPS Estimate", "earnings", Currency, "Consensus EPS estimate for the quarter")
        .csv(&["EPS Estimate"]),
    field("eps_actual", "EPS Actual", "earnings", Currency, "Reported EPS for the quarter")
        .csv(&["EPS Actual"]),
    field("revenue_estimate", "Revenue Estimate", "earnings", Currency, "Consensus revenue estimate for the quarter")
        .csv(&["Revenue Estimate"]),
    field("revenue_actual", "Revenue Actual", "earnings", Currency, "Reported revenue for the quarter")
        .csv(&["Revenue Actual"]),
    field("eps_revision", "EPS Revision", "earnings", Percentage, "Change in the consensus EPS estimate over the last month")
        .csv(&["EPS Revision"])
        .related(&["revenue_revision"]),
    field("revenue_revision", "Revenue Revision", "earnings", Percentage, "Change in the consensus revenue estimate over the last month")
        .csv(&["Revenue Revision"])
        .related(&["eps_revision"]),
    field("eps_growth_this_y", "EPS Growth This Year", "earnings", Percentage, "Expected EPS growth for the current fiscal year")
        .csv(&["EPS this Y", "EPS growth this Y"])
        .html(&["EPS this Y"])
        .related(&["eps_growth_next_y", "eps_growth_qtr"]),
    field("eps_growth_next_y", "EPS Growth Next Year", "earnings", Percentage, "Expected EPS growth for the next fiscal year")
        .csv(&["EPS next Y", "EPS growth next Y"])
        .html(&["EPS next Y"]),
    field("eps_growth_past_5y", "EPS Growth Past 5 Years", "earnings", Percentage, "Annualised EPS growth over the past five years")
        .csv(&["EPS past 5Y", "EPS growth past 5Y"])
        .html(&["EPS past 5Y"]),
    field("eps_growth_next_5y", "EPS Growth Next 5 Years", "earnings", Percentage, "Expected annualised EPS growth over the next five years")
        .csv(&["EPS next 5Y", "EPS growth next 5Y"])
        .html(&["EPS next 5Y"]),
    field(
        "eps_growth_qtr",
        "EPS Growth Quarter-over-Quarter",
        "earnings",
        Percentage,
        "Percentage change in earnings per share compared to the same quarter a year ago. Shows short-term earnings momentum",
    )
    .csv(&["EPS Q/Q"])
    .html(&["EPS Q/Q"])
    .related(&["sales_growth_qtr", "eps_surprise"])
    .examples(&["eps_growth_qoq_min = 10", "eps_growth_qoq_positive = true"]),
    field("sales_growth_this_y", "Sales Growth This Year", "earnings", Percentage, "Expected revenue growth for the current fiscal year")
        .csv(&["Sales this Y"])
        .html(&["Sales this Y"]),
    field("sales_growth_past_5y", "Sales Growth Past 5 Years", "earnings", Percentage, "Annualised revenue growth over the past five years")
        .csv(&["Sales past 5Y"])
        .html(&["Sales past 5Y"]),
    field("sales_growth_qtr", "Sales Growth Quarter-over-Quarter", "earnings", Percentage, "Revenue growth compared to the same quarter a year ago")
        .csv(&["Sales Q/Q"])
        .html(&["Sales Q/Q"])
        .related(&["eps_growth_qtr"]),
    // etf
    field("aum", "Assets Under Management", "etf", Currency, "Total net assets held by the fund")
        .csv(&["Assets Under Management", "AUM"])
        .html(&["AUM"])
        .related(&["net_flows_1m", "expense_ratio"]),
    field("expense_ratio", "Expense Ratio", "etf", Percentage, "Annual fund operating expenses as a share of assets")
        .csv(&["Expense Ratio", "Expense"])
        .html(&["Expense"]),
    field("net_asset_value", "Net Asset Value", "etf", Currency, "Per-share value of the fund's holdings")
        .csv(&["Net Asset Value", "NAV"])
        .html(&["NAV"]),
    field("net_asset_value_percent", "Net Asset Value %", "etf", Percentage, "Premium or discount of the price to net asset value")
        .csv(&["Net Asset Value %", "NAV %"]),
    field("net_flows_1m", "Net Flows (1 Month)", "etf", Currency, "Net creations minus redemptions over one month")
        .csv(&["Net Flows (1 Month)"]),
    field("net_flows_1m_percent", "Net Flows % (1 Month)", "etf", Percentage, "One month net flows relative to assets")
        .csv(&["Net Flows % (1 Month)"]),
    field("net_flows_3m", "Net Flows (3 Month)", "etf", Currency, "Net creations minus redemptions over three months")
        .csv(&["Net Flows (3 Month)"]),
    field("net_flows_3m_percent", "Net Flows % (3 Month)", "etf", Percentage, "Three month net flows relative to assets")
        .csv(&["Net Flows % (3 Month)"]),
    field("net_flows_ytd", "Net Flows (YTD)", "etf", Currency, "Net creations minus redemptions since the start of the year")
        .csv(&["Net Flows (YTD)"]),
    field("net_flows_ytd_percent", "Net Flows % (YTD)", "etf", Percentage, "Year-to-date net flows relative to assets")
        .csv(&["Net Flows % (YTD)"]),
    field("net_flows_1y", "Net Flows (1 Year)", "etf", Currency, "Net creations minus redemptions over twelve months")
        .csv(&["Net Flows (1 Year)"]),
    field("net_flows_1y_percent", "Net Flows % (1 Year)", "etf", Percentage, "Twelve month net flows relative to assets")
        .csv(&["Net Flows % (1 Year)"]),
    field("holdings", "Total Holdings", "etf", Integer, "Number of positions held by the fund")
        .csv(&["Total Holdings", "Holdings"]),
    field("etf_category", "Category", "etf", Text, "Fund category assigned by the data service")
        .csv(&["Category"]),
    field("asset_type", "Asset Type", "etf", Text, "Primary asset class held by the fund")
        .csv(&["Asset Type"]),
    field("etf_type", "ETF Type", "etf", Text, "Structure such as plain, leveraged or inverse")
        .csv(&["ETF Type"]),
    field("sector_theme", "Sector/Theme", "etf", Text, "Sector or investment theme the fund targets")
        .csv(&["Sector/Theme"]),
    field("region", "Region", "etf", Text, "Geographic focus of the fund")
        .csv(&["Region"]),
    field("active_passive", "Active/Passive", "etf", Text, "Whether the fund is actively managed or tracks an index")
        .csv(&["Active/Passive"]),
    // news
    field("analyst_recom", "Analyst Recommendation", "news", Number, "Mean analyst rating from 1 (strong buy) to 5 (sell)")
        .csv(&["Recom", "Analyst Recom"])
        .html(&["Recom"])
        .related(&["target_price"]),
    field("insider_transactions", "Insider Transactions", "news", Percentage, "Six month change in insider holdings")
        .csv(&["Insider Transactions"])
        .html(&["Insider Trans"])
        .related(&["insider_ownership"]),
    field("institutional_transactions", "Institutional Transactions", "news", Percentage, "Three month change in institutional holdings")
        .csv(&["Institutional Transactions"])
        .html(&["Inst Trans"])
        .related(&["institutional_ownership"]),
    field("tags", "Tags", "news", Text, "Thematic tags assigned by the data service")
        .csv(&["Tags"]),
    // trading
    field("price", "Price", "trading", Currency, "Last traded price")
        .csv(&["Price"])
        .html(&["Price"])
        .related(&["change", "prev_close"])
        .examples(&["price_min = 10", "price = o5"]),
    field("change", "Change", "trading", Percentage, "Price change relative to the previous close")
        .csv(&["Change"])
        .html(&["Change", "Chg"])
        .related(&["price", "gap"]),
    field("volume", "Volume", "trading", Integer, "Shares traded in the current session")
        .csv(&["Volume"])
        .html(&["Volume"])
        .related(&["avg_volume", "relative_volume"]),
    field("avg_volume", "Average Volume", "trading", Integer, "Three month average daily share volume")
        .csv(&["Average Volume", "Avg Volume"])
        .html(&["Avg Volume"])
        .related(&["volume", "relative_volume"]),
    field("prev_close", "Previous Close", "trading", Currency, "Closing price of the previous session")
        .csv(&["Prev Close"])
        .html(&["Prev Close"]),
    field("open", "Open", "trading", Currency, "Opening price of the current session")
        .csv(&["Open"])
        .html(&["Open"]),
    field("high", "High", "trading", Currency, "Highest price of the current session")
        .csv(&["High"])
        .html(&["High"]),
    field("low", "Low", "trading", Currency, "Lowest price of the current session")
        .csv(&["Low"])
        .html(&["Low"]),
    field("trades", "Trades", "trading", Integer, "Number of trades in the current session")
        .csv(&["Trades"]),
    field("afterhours_close", "After-Hours Close", "trading", Currency, "Last price in the after-hours session")
        .csv(&["After-Hours Close"])
        .html(&["After-Hours Close"]),
    field("afterhours_change", "After-Hours Change", "trading", Percentage, "After-hours price relative to the regular close")
        .csv(&["After-Hours Change"])
        .html(&["After-Hours Change", "AH Change"]),
    field("float", "Shares Float", "trading", Integer, "Shares available for public trading")
        .csv(&["Shares Float"])
        .html(&["Float"])
        .related(&["shares_outstanding", "float_short"]),
    field("shares_outstanding", "Shares Outstanding", "trading", Integer, "Total shares issued and outstanding")
        .csv(&["Shares Outstanding"])
        .html(&["Outstanding"])
        .related(&["float", "market_cap"]),
    field("float_percent", "Float %", "trading", Percentage, "Float as a share of shares outstanding")
        .csv(&["Float %"]),
    field("float_short", "Short Float", "trading", Percentage, "Shares sold short as a share of the float")
        .csv(&["Short Float"])
        .html(&["Short Float"])
        .related(&["short_ratio", "short_interest"]),
    field("short_ratio", "Short Ratio", "trading", Number, "Days to cover the short interest at average volume")
        .csv(&["Short Ratio"])
        .html(&["Short Ratio"]),
    field("short_interest", "Short Interest", "trading", Integer, "Number of shares sold short")
        .csv(&["Short Interest"])
        .html(&["Short Interest"]),
    field("insider_ownership", "Insider Ownership", "trading", Percentage, "Share of outstanding shares held by insiders")
        .csv(&["Insider Ownership"])
        .html(&["Insider Own"])
        .related(&["insider_transactions"]),
    field("institutional_ownership", "Institutional Ownership", "trading", Percentage, "Share of outstanding shares held by institutions")
        .csv(&["Institutional Ownership"])
        .html(&["Inst Own"])
        .related(&["institutional_transactions"]),
];

/// Legacy or colloquial names that map onto a canonical field.
pub(crate) const ALIASES: &[(&str, &str)] = &[
    ("roi", "roic"),
    ("debt_to_equity", "debt_equity"),
    ("book_value", "book_value_per_share"),
    ("performance_week", "performance_1w"),
    ("performance_month", "performance_1m"),
    ("short_float", "float_short"),
    ("revenue", "sales"),
    ("eps", "eps_ttm"),
    ("company_name", "company"),
];
