pub mod ledger;
pub mod signed;

pub use ledger::InMemoryResetTokenLedger;
pub use ledger::PostgresResetTokenLedger;
pub use ledger::ResetTokenLedger;
pub use signed::SignedResetTokens;
