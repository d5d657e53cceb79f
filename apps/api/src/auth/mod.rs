// Account registration, login and user lookup.
// Other endpoints still take `user_id` as a query parameter; the issued token
// is for the frontend session only.

pub mod handlers;
pub mod password;
pub mod token;
