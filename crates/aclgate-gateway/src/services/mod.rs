//! Built-in services: the guarded business methods and the admin streams.

pub mod admin;
pub mod biz;

pub use admin::{stream_logging, stream_statistics, AdminService, ChannelSink, PushSink, StreamEnd};
pub use biz::BizService;
