use std::path::Path;

use crate::adapters::process::run_program;
use crate::domain::AppError;
use crate::ports::ImageProcessor;

/// [`ImageProcessor`] using the ImageMagick command-line tools.
///
/// `identify` reads dimensions, `mogrify` resizes in place and `convert`
/// renders thumbnails padded onto a white square.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageMagick;

impl ImageMagick {
    fn working_dir(path: &Path) -> &Path {
        path.parent().unwrap_or(Path::new("."))
    }
}

impl ImageProcessor for ImageMagick {
    fn size_of(&self, path: &Path) -> Option<String> {
        if !path.is_file() {
            return None;
        }
        let args = vec![
            "-format".to_string(),
            "%wx%h".to_string(),
            format!("{}[0]", path.display()),
        ];
        let size = run_program("identify", &args, Self::working_dir(path)).ok()?;
        (!size.is_empty()).then_some(size)
    }

    fn resize(&self, path: &Path, width: u32, height: u32) -> Result<(), AppError> {
        let args = vec![
            "-resize".to_string(),
            format!("{}x{}!", width, height),
            path.display().to_string(),
        ];
        run_program("mogrify", &args, Self::working_dir(path)).map(|_| ())
    }

    fn thumbnail(&self, src: &Path, dst: &Path, width: u32, height: u32) -> Result<(), AppError> {
        let geometry = format!("{}x{}", width, height);
        let args = vec![
            "-resize".to_string(),
            geometry.clone(),
            "-background".to_string(),
            "white".to_string(),
            "-gravity".to_string(),
            "center".to_string(),
            "-extent".to_string(),
            geometry,
            src.display().to_string(),
            dst.display().to_string(),
        ];
        run_program("convert", &args, Self::working_dir(src)).map(|_| ())
    }
}
