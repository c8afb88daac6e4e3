pub mod session;

pub use session::{AnonymousAuthService, AuthProvider};
