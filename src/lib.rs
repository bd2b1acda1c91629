pub mod config;

pub mod error;
pub mod mime;
pub mod pkt_line;
pub mod process;
pub mod repo;
pub mod serve;
pub mod service;

pub mod http;
