pub use self::access_token::AccessToken;
pub use self::user::AuthUser;

mod access_token;
mod user;
