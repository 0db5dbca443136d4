pub mod claims;
pub mod errors;
pub mod keys;
pub mod service;

pub use claims::TokenClaims;
pub use errors::InvalidToken;
pub use errors::TokenError;
pub use service::BearerToken;
pub use service::TokenService;
