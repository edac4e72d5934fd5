//! Canonical screening filters and the per-intent builder.
//!
//! A [`FilterSpec`] is produced by [`build`] from an intent's immutable
//! [`Profile`] and the caller's [`Overrides`]. Every value is validated when
//! it enters a [`FilterSpec`], so the query compiler downstream cannot fail.

mod intent;
mod key;
mod overrides;
mod spec;
mod value;
pub mod vocab;

pub use intent::{build, DefaultValue, Profile, ScreenerIntent};
pub use key::{FilterKey, FilterShape};
pub use overrides::{EarningsDateInput, Overrides, TrendType};
pub(crate) use overrides::parse_date;
pub use spec::{
    FilterSpec, SortField, SortOrder, SortSpec, FUNDAMENTALS_VIEW, MAX_RESULTS_LIMIT, SCREEN_VIEW,
};
pub use value::{format_number, Bound, FilterValue, RangeEncoding, RangeValue};
