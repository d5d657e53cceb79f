// Job application tracking: status pipeline, partial updates, analytics.
// Every read and write is scoped by user_id; a foreign id resolves as NotFound.

pub mod analytics;
pub mod handlers;
pub mod patch;
pub mod status;
