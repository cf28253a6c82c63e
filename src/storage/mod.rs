pub mod sink;

pub use sink::{FileOutputSink, FsOutputSink, SharedSink, suffixed_path};
