// handlers/protected - endpoints behind jwt_auth_middleware (/api/*)
//
// Every handler here can rely on an `AuthUser` request extension.

pub mod favs;
