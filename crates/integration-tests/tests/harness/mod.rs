#![allow(dead_code)]

pub mod config;
pub mod mock_sidecar;
pub mod server;
pub mod wav;
