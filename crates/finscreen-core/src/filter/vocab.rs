//! Closed token vocabularies accepted by enum-valued filters.
//!
//! Caller input is matched after normalization (trimmed, lowercased, spaces and
//! hyphens folded to underscores) against each entry's name, aliases and
//! service token, so `"Financial Services"`, `"financial_services"` and
//! `"financial"` all resolve to the same entry.

use crate::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenEntry {
    pub name: &'static str,
    /// Token emitted in the `f=` parameter.
    pub service: &'static str,
    pub aliases: &'static [&'static str],
}

const fn entry(name: &'static str, service: &'static str) -> TokenEntry {
    TokenEntry {
        name,
        service,
        aliases: &[],
    }
}

const fn aliased(
    name: &'static str,
    service: &'static str,
    aliases: &'static [&'static str],
) -> TokenEntry {
    TokenEntry {
        name,
        service,
        aliases,
    }
}

#[derive(Debug)]
pub struct TokenTable {
    /// Label used in error messages.
    pub label: &'static str,
    pub entries: &'static [TokenEntry],
}

impl TokenTable {
    /// Resolve caller input to an entry, or `InvalidValue` naming `key`.
    pub fn resolve(&self, key: &str, raw: &str) -> Result<&'static TokenEntry, FilterError> {
        self.find(raw).ok_or_else(|| {
            FilterError::invalid(
                key,
                format!(
                    "'{}' is not a valid {}; expected one of: {}",
                    raw.trim(),
                    self.label,
                    self.names().collect::<Vec<_>>().join(", ")
                ),
            )
        })
    }

    pub fn find(&self, raw: &str) -> Option<&'static TokenEntry> {
        let wanted = normalize_token(raw);
        if wanted.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| {
            normalize_token(entry.name) == wanted
                || normalize_token(entry.service) == wanted
                || entry
                    .aliases
                    .iter()
                    .any(|alias| normalize_token(alias) == wanted)
        })
    }

    /// Exact lookup by emitted service token.
    pub fn by_service(&self, service: &str) -> Option<&'static TokenEntry> {
        self.entries.iter().find(|entry| entry.service == service)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn services(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|entry| entry.service)
    }
}

pub fn normalize_token(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|ch| match ch {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

pub static MARKET_CAP: TokenTable = TokenTable {
    label: "market cap class",
    entries: &[
        entry("mega", "mega"),
        entry("large", "large"),
        entry("mid", "mid"),
        entry("small", "small"),
        entry("micro", "micro"),
        entry("nano", "nano"),
        entry("largeover", "largeover"),
        aliased("midover", "midover", &["mid_large", "mid_over"]),
        aliased("smallover", "smallover", &["small_over"]),
        aliased("microover", "microover", &["micro_over"]),
        entry("largeunder", "largeunder"),
        entry("midunder", "midunder"),
        entry("smallunder", "smallunder"),
        entry("microunder", "microunder"),
    ],
};

pub static SECTORS: TokenTable = TokenTable {
    label: "sector",
    entries: &[
        entry("basic_materials", "basicmaterials"),
        entry("communication_services", "communicationservices"),
        entry("consumer_cyclical", "consumercyclical"),
        entry("consumer_defensive", "consumerdefensive"),
        entry("energy", "energy"),
        aliased("financial_services", "financial", &["financials"]),
        aliased("healthcare", "healthcare", &["health_care"]),
        entry("industrials", "industrials"),
        entry("real_estate", "realestate"),
        entry("technology", "technology"),
        entry("utilities", "utilities"),
    ],
};

pub static EARNINGS_WINDOWS: TokenTable = TokenTable {
    label: "earnings window",
    entries: &[
        entry("today", "today"),
        entry("today_before", "todaybefore"),
        entry("today_after", "todayafter"),
        entry("tomorrow", "tomorrow"),
        entry("tomorrow_before", "tomorrowbefore"),
        entry("tomorrow_after", "tomorrowafter"),
        entry("yesterday", "yesterday"),
        entry("yesterday_before", "yesterdaybefore"),
        entry("yesterday_after", "yesterdayafter"),
        aliased(
            "next_5_days",
            "nextdays5",
            &["within_2_weeks", "next_2_weeks"],
        ),
        entry("this_week", "thisweek"),
        entry("next_week", "nextweek"),
        entry("prev_week", "prevweek"),
        entry("this_month", "thismonth"),
    ],
};

pub static INSTRUMENTS: TokenTable = TokenTable {
    label: "instrument type",
    entries: &[
        aliased("stocks", "stocksonly", &["stock", "stocks_only"]),
        aliased("etf", "exchangetradedfund", &["etfs", "fund"]),
    ],
};

pub static COUNTRIES: TokenTable = TokenTable {
    label: "country",
    entries: &[
        aliased("usa", "usa", &["us", "united_states"]),
        aliased("foreign", "notusa", &["non_usa", "not_usa"]),
        entry("canada", "canada"),
        entry("china", "china"),
        entry("germany", "germany"),
        entry("israel", "israel"),
        entry("japan", "japan"),
        aliased("united_kingdom", "unitedkingdom", &["uk"]),
    ],
};

pub static SMA_POSITIONS: TokenTable = TokenTable {
    label: "moving average position",
    entries: &[
        aliased("above", "pa", &["price_above"]),
        aliased("below", "pb", &["price_below"]),
        aliased("cross_above", "pca", &["crossed_above"]),
        aliased("cross_below", "pcb", &["crossed_below"]),
    ],
};

pub static PERFORMANCE_WINDOWS: TokenTable = TokenTable {
    label: "performance window",
    entries: &[
        entry("today_up", "dup"),
        entry("today_down", "ddown"),
        entry("week_up", "1wup"),
        entry("week_down", "1wdown"),
        aliased("month_up", "4wup", &["4_weeks_up"]),
        entry("month_down", "4wdown"),
        aliased("quarter_up", "13wup", &["13_weeks_up"]),
        entry("quarter_down", "13wdown"),
        entry("half_up", "26wup"),
        entry("half_down", "26wdown"),
        entry("year_up", "52wup"),
        entry("year_down", "52wdown"),
        entry("ytd_up", "ytdup"),
        entry("ytd_down", "ytddown"),
        aliased("month_flat_to_down_4", "0to-4w", &["0_to_negative_4w"]),
        aliased("week_up_5_or_more_down", "5to-1w", &["5_to_negative_1w"]),
    ],
};
