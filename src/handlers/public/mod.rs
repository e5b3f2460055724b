// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and service discovery. Everything here is reachable
// without an Authorization header, so inputs are validated in full.

pub mod login;
pub mod root;

pub use login::login;
pub use root::{health, root};
