pub mod handlers;
pub mod identity;
pub mod models;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
