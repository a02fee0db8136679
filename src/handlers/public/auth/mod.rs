// handlers/public/auth - local account endpoints (/auth/local/*)

pub mod login;
pub mod register;
pub mod validate;

pub use login::login_post;
pub use register::register_post;
pub use validate::validate_get;
