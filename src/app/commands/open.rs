use crate::app::connector::{Connector, RequestContext};
use crate::domain::{AppError, SandboxedPath};

/// `open`: list a directory, the root when no target is given.
pub(crate) fn execute(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let target = match ctx.request.target {
        None => Some(connector.sandbox().root_path()),
        Some(_) => ctx.target.clone(),
    };

    match target {
        Some(dir) if dir.exists() => open_directory(connector, ctx, &dir),
        _ => {
            ctx.response.fail("Directory does not exist");
            let root = connector.sandbox().root_path();
            open_directory(connector, ctx, &root)
        }
    }
}

/// Re-open the working directory after a mutation, or the root if it is gone.
pub(crate) fn reopen(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let dir = ctx
        .current
        .clone()
        .filter(SandboxedPath::is_dir)
        .unwrap_or_else(|| connector.sandbox().root_path());
    open_directory(connector, ctx, &dir)
}

/// Fill `cwd` and `cdc`, plus `tree` and the init fields when requested.
pub(crate) fn open_directory(
    connector: &Connector,
    ctx: &mut RequestContext<'_>,
    dir: &SandboxedPath,
) -> Result<(), AppError> {
    if !connector.perms(dir).read {
        return Err(AppError::AccessDenied);
    }
    if !dir.is_dir() {
        return Err(AppError::NotImplemented("open".to_string()));
    }

    let cdc = connector
        .visible_children(dir)
        .iter()
        .map(|child| connector.entry_for(child, &mut ctx.response))
        .collect();
    ctx.response.cwd = Some(connector.cwd_for(dir));
    ctx.response.cdc = Some(cdc);

    if ctx.tree {
        ctx.response.tree = Some(connector.tree());
    }
    if ctx.request.init {
        let disabled = connector.config().disabled_commands.iter().map(|c| c.to_string()).collect();
        ctx.response.disabled = Some(disabled);
        ctx.response.params = Some(connector.client_params());
    }
    Ok(())
}
