// Profiles, user directory search and resume upload.

pub mod handlers;
pub mod resume;
pub mod skills;
