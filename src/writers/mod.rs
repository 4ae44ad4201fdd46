pub mod summary_formatter;

pub use summary_formatter::SummaryFormatter;
