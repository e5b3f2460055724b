// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token required)
pub mod protected; // Tier 2: JWT authentication required (/records, /users, /profile)
pub mod public; // Tier 1: No authentication required (/, /health, /login)
