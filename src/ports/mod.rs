mod image_processor;
mod mime_resolver;
mod tool_runner;
mod upload_name_resolver;

pub use image_processor::ImageProcessor;
pub use mime_resolver::MimeResolver;
pub use tool_runner::ToolRunner;
pub use upload_name_resolver::UploadNameResolver;
