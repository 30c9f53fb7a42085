// mod.rs - Input loaders for sequences and sampling dates

pub mod dates;
pub mod fasta;

pub use dates::{decimal_year, load_dates, parse_date, read_dates};
pub use fasta::DEFAULT_DATE_PATTERN;
