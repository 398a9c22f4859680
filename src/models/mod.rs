mod account;
mod id;
mod metric;
mod snapshot;

pub use account::Account;
pub use id::{Id, IdError};
pub use metric::Metric;
pub use snapshot::{CumulativeSnapshot, TotalSnapshot};
