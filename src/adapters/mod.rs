pub mod image_magick;
pub mod mime_types;
pub mod process;
pub mod upload_names;

pub use image_magick::ImageMagick;
pub use mime_types::ExtensionMimeTypes;
pub use process::ProcessToolRunner;
pub use upload_names::OriginalFilename;
