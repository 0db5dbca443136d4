pub mod authenticator;
pub mod claims;
pub mod errors;

pub use authenticator::Session;
pub use authenticator::SessionAuthenticator;
pub use authenticator::SessionState;
pub use claims::SessionClaims;
pub use errors::SessionError;
