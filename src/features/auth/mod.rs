mod validator;

pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;

pub use validator::JwtValidator;
