pub mod ledger;
pub mod system;
