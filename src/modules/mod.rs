pub mod pipeline;
pub mod quota;
pub mod transcode;
