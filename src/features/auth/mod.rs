pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod model;
pub mod models;
pub mod routes;
pub mod services;

pub use clients::GoogleOAuthClient;
pub use services::{AuthService, TokenService};
