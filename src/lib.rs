pub mod analysis;
pub mod api;
pub mod config;
pub mod emoji;
pub mod error;
pub mod filter;
pub mod ml;
pub mod video_id;
pub mod youtube;
