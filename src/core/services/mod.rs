pub mod query_service;
pub mod summary_service;

pub use query_service::{QueryService, SearchOutcome, SortColumn, SortDirection, SortToggle};
pub use summary_service::{CategoryTotal, Summary, SummaryService};
