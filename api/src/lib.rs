// Library exports for testing and external use

pub mod app;
pub mod dto;
pub mod handlers;
pub mod registry;
pub mod routes;
pub mod telemetry;
