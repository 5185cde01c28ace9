// # Routes Module
//
// HTTP route handlers, grouped by resource. Public and protected routers
// are assembled in `server.rs`.

/// Login, logout and session endpoints
pub mod auth;

/// Health check and monitoring endpoints
pub mod health;

/// Employee CRUD endpoints
pub mod usuarios;
