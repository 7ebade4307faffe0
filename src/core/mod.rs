pub mod aggregator;
pub mod config;
pub mod consensus;
pub mod coverage;
pub mod layout;
pub mod overlap;
pub mod table;

pub use config::Config;
pub use table::DelimitedTable;
