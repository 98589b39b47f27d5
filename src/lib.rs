/*
 * Responsibility
 * - library root so integration tests can drive the real router
 * - binary stays a thin wrapper around app::run()
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
