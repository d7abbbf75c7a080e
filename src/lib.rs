pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod layouts;
pub mod optimizer;
pub mod scorer;
// cmd and reports belong to the binary crate (main.rs).
