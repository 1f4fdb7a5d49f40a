//! Types that represent the core data model, such as `Transaction` and `Period`.
mod amount;
mod period;
mod transaction;

pub use amount::{money, Amount, AmountError};
pub use period::{next_month, prev_month, Period, MONTH_NAMES};
pub use transaction::{NewTransaction, Transaction, TransactionType};
