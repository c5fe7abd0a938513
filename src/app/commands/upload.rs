use std::fs;
use std::io;

use tracing::{info, warn};

use super::open::reopen;
use crate::app::connector::{Connector, RequestContext, is_plain_name};
use crate::domain::{AppError, SandboxedPath, UploadedFile};

const SUMMARY: &str = "Some files were not uploaded";

/// `upload`: move staged files into `current`.
///
/// Oversized or unsavable files are reported per item; the rest are kept.
/// Replacing an existing file needs write permission on that file.
pub(crate) fn execute(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let current = ctx.current()?;
    if !connector.perms(&current).write {
        return Err(AppError::AccessDenied);
    }

    let limit = connector.config().upload_max_size.bytes();
    let mut select = Vec::new();
    for file in &ctx.request.upload {
        let name = connector.upload_name_for(file);
        if limit > 0 && file.byte_len() > limit {
            ctx.response.fail_item(SUMMARY, name, "File exceeds the maximum allowed filesize");
            continue;
        }
        match save(connector, &current, file, &name) {
            Ok(saved) => {
                info!(path = %saved, "uploaded file");
                select.push(connector.hash(&saved));
            }
            Err(AppError::AccessDenied) => {
                warn!(name = %name, "upload would replace a protected file");
                ctx.response.fail_item(SUMMARY, name, "Access Denied");
            }
            Err(err) => {
                warn!(name = %name, error = %err, "unable to save upload");
                ctx.response.fail_item(SUMMARY, name, "Unable to save uploaded file");
            }
        }
    }

    if !select.is_empty() {
        ctx.response.select = Some(select);
    }
    reopen(connector, ctx)
}

fn save(
    connector: &Connector,
    dir: &SandboxedPath,
    file: &UploadedFile,
    name: &str,
) -> Result<SandboxedPath, AppError> {
    if !is_plain_name(name) {
        return Err(AppError::InvalidParameters);
    }
    let dst = dir.join(name)?;
    if (dst.exists() || dst.is_symlink()) && !connector.perms(&dst).write {
        return Err(AppError::AccessDenied);
    }
    match fs::rename(&file.path, dst.full_path()) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(&file.path, dst.full_path())?;
            fs::remove_file(&file.path)?;
        }
        Err(err) => return Err(err.into()),
    }
    dst.set_mode(connector.config().upload_file_mode)?;
    Ok(dst)
}
