use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::open::reopen;
use crate::app::connector::{Connector, RequestContext};
use crate::domain::{AppError, SandboxedPath};

/// `tmb`: generate a batch of missing thumbnails for images in `current`.
pub(crate) fn tmb(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let thumbs = &connector.config().thumbs;
    let Some(images) = connector.image_processor().filter(|_| thumbs.enabled) else {
        return Err(AppError::NotImplemented("tmb".to_string()));
    };
    let current = ctx.current()?;
    if !current.is_dir() || connector.is_thumbnail_directory(&current) {
        return Err(AppError::InvalidParameters);
    }
    if !connector.perms(&current).read {
        return Err(AppError::AccessDenied);
    }

    let mut generated = BTreeMap::new();
    let mut pending = false;
    for image in connector.visible_children(&current) {
        if !is_image(connector, &image) {
            continue;
        }
        let thumbnail = connector.thumbnail_for(&image)?;
        if thumbnail.is_file() {
            continue;
        }
        if generated.len() >= thumbs.at_once {
            pending = true;
            break;
        }
        let size = thumbs.size;
        match images.thumbnail(&image.full_path(), &thumbnail.full_path(), size, size) {
            Ok(()) => {
                generated.insert(connector.hash(&image), connector.thumbnail_url(&image));
            }
            Err(err) => warn!(image = %image, error = %err, "thumbnail failed"),
        }
    }

    info!(dir = %current, count = generated.len(), pending, "generated thumbnails");
    ctx.response.current = Some(connector.hash(&current));
    ctx.response.images = Some(generated);
    if pending {
        ctx.response.tmb = Some(true);
    }
    Ok(())
}

/// `resize`: scale `target` in place to exactly `width` x `height`.
pub(crate) fn resize(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let Some(images) = connector.image_processor() else {
        return Err(AppError::NotImplemented("resize".to_string()));
    };
    let Some(target) = ctx.target.clone().filter(SandboxedPath::is_file) else {
        ctx.response.fail("Unable to resize file. It does not exist");
        return Ok(());
    };
    let (width, height) = match (ctx.request.width, ctx.request.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(AppError::InvalidParameters),
    };
    let perms = connector.perms(&target);
    if !perms.read || !perms.write {
        return Err(AppError::AccessDenied);
    }

    if let Err(err) = images.resize(&target.full_path(), width, height) {
        warn!(image = %target, error = %err, "resize failed");
        ctx.response.fail("Unable to resize image");
        return Ok(());
    }
    if let Err(err) = connector.remove_thumbnail(&target) {
        debug!(image = %target, error = %err, "stale thumbnail left behind");
    }

    info!(image = %target, width, height, "resized image");
    ctx.response.select = Some(vec![connector.hash(&target)]);
    reopen(connector, ctx)
}

fn is_image(connector: &Connector, path: &SandboxedPath) -> bool {
    path.is_file() && path.readable() && connector.mime_for(path).contains("image")
}
