// Job catalogue: paginated listing and search over active postings.

pub mod filters;
pub mod handlers;
pub mod query;
