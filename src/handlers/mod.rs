// handlers - request handlers grouped by access tier
//
// public:    no token (/, /health, /auth/local/*)
// protected: bearer token required (/api/*)

pub mod protected;
pub mod public;
