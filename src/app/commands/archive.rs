//! `extract` and `archive`, both delegated to external tools.

use std::path::PathBuf;

use tracing::{info, warn};

use super::open::reopen;
use crate::app::connector::{Connector, RequestContext, is_plain_name};
use crate::domain::{AppError, SandboxedPath};

/// `extract`: run the extractor registered for the target's MIME type in `current`.
pub(crate) fn extract(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let (target, current) = match (ctx.target.clone(), ctx.current.clone()) {
        (Some(target), Some(current)) if target.is_file() && current.is_dir() => (target, current),
        _ => return Err(AppError::InvalidParameters),
    };
    if !connector.perms(&target).read || !connector.perms(&current).write {
        return Err(AppError::AccessDenied);
    }

    let mime = connector.mime_for(&target);
    let Some((program, rest)) = connector
        .config()
        .extractors
        .get(&mime)
        .and_then(|command| command.split_first())
    else {
        ctx.response.fail("No extractor available for this file type");
        return Ok(());
    };

    let mut args = rest.to_vec();
    args.push(target.full_path().to_string_lossy().into_owned());
    if let Err(err) = connector.tool_runner().run(program, &args, &current.full_path()) {
        warn!(archive = %target, error = %err, "extractor failed");
        ctx.response.fail("Unable to extract files from archive");
        return Ok(());
    }

    info!(archive = %target, into = %current, "extracted archive");
    ctx.tree = true;
    reopen(connector, ctx)
}

/// `archive`: pack `targets` into a new archive inside `current`.
pub(crate) fn archive(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let current = ctx.current.clone().filter(SandboxedPath::is_dir);
    let targets: Option<Vec<SandboxedPath>> = ctx
        .targets
        .iter()
        .map(|t| t.path.clone().filter(|p| p.exists() || p.is_symlink()))
        .collect();
    let (Some(current), Some(targets)) = (current, targets) else {
        return Err(AppError::InvalidParameters);
    };
    let Some(first) = targets.first() else {
        return Err(AppError::InvalidParameters);
    };
    if !targets.iter().all(|t| connector.perms(t).read) || !connector.perms(&current).write {
        return Err(AppError::AccessDenied);
    }

    let archiver = ctx
        .request
        .mime_type
        .as_deref()
        .and_then(|mime| connector.config().archivers.get(mime));
    let Some((archiver, (program, rest))) =
        archiver.and_then(|a| a.command.split_first().map(|split| (a, split)))
    else {
        ctx.response.fail("No archiver available for this file type");
        return Ok(());
    };

    let stem = match ctx.request.name.as_deref() {
        Some(name) if is_plain_name(name) => name.to_string(),
        Some(_) => return Err(AppError::InvalidParameters),
        None => first.stem(),
    };
    let output = current.join(format!("{}{}", stem, archiver.extension))?.unique()?;

    let mut args = rest.to_vec();
    args.push(output.file_name());
    args.extend(targets.iter().map(|t| display(t.relative_to(&current))));
    if let Err(err) = connector.tool_runner().run(program, &args, &current.full_path()) {
        warn!(archive = %output, error = %err, "archiver failed");
        ctx.response.fail("Unable to create archive");
        return Ok(());
    }

    info!(archive = %output, files = targets.len(), "created archive");
    ctx.response.select = Some(vec![connector.hash(&output)]);
    reopen(connector, ctx)
}

fn display(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}
