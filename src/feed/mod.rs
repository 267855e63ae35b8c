pub mod client;
pub mod normalizer;

pub use client::{parse_feed_response, BlazeClient, ResultFeed};
pub use normalizer::normalize;
