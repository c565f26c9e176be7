//! The continuation-token loop every check's data gathering goes through.

mod paginator;

pub use paginator::{Page, PaginationError, PaginationOptions, paginate, paginate_with};
