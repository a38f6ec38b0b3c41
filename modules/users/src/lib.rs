// === PUBLIC CONTRACT ===
pub mod contract;

// Re-export the public contract components
pub use contract::model;

// === MODULE DEFINITION ===
pub mod module;
pub use module::UsersModule;

// === INTERNAL MODULES ===
// Exposed for integration tests; the server binary only needs `UsersModule`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
