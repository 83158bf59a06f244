#[macro_use]
extern crate diesel;

pub mod models;
pub mod schema;
pub mod utils;
pub mod validators;

pub mod prelude {
    pub use crate::models::*;
    pub use crate::utils::errors::*;
}
