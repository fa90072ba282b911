mod book;
mod common;
pub use book::{book_routes, MAX_BODY_BYTES};
pub use common::{common_routes, common_routes_with_ready};
