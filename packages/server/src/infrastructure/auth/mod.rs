//! Authorization collaborators: JWT token verification and the session set.

pub mod jwt;
pub mod session;

pub use jwt::{JwtClaims, JwtTokenVerifier};
pub use session::InMemorySessionAuthority;
