//! Domain types produced by the response normalizer.

mod record;
mod ticker;

pub use record::StockRecord;
pub use ticker::Ticker;
