// handlers/public - endpoints that need no token

pub mod auth;
pub mod root;
