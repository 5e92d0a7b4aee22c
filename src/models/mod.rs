//! Domain models shared across the StockLens service.

pub mod commentary;
pub mod dashboard;
pub mod flow;
pub mod news;
pub mod quote;

pub use commentary::{CommentaryBlock, Opinion, Opinions};
pub use dashboard::DashboardDocument;
pub use flow::{ChipEntry, InstitutionalActor, InstitutionalFlow, SHARES_PER_LOT};
pub use news::NewsItem;
pub use quote::{PricePoint, QuoteSnapshot};
