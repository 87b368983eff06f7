pub mod affect;
pub mod assets;
pub mod behavior;
pub mod collision;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod grid;
pub mod interaction;
pub mod inventory;
pub mod rng;
pub mod server_protocol;
pub mod speech;
pub mod types;
pub mod world;
