pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod resource;
pub mod routes;
pub mod screens;
pub mod services;
