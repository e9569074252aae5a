//! A small HTTP service for creating, reading, updating and soft-deleting
//! comments attached to a slug.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod service;

pub use routes::app;
pub use service::CommentService;
