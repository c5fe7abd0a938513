use tracing::{debug, info, warn};

use super::open::reopen;
use crate::app::connector::{Connector, RequestContext};
use crate::domain::{AppError, SandboxedPath};

const SUMMARY: &str = "Some files/directories were unable to be removed";

/// Why a node was left in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Refusal {
    AccessDenied,
    RemoveFailed,
}

impl Refusal {
    fn detail(self) -> &'static str {
        match self {
            Refusal::AccessDenied => "Access Denied",
            Refusal::RemoveFailed => "Remove failed",
        }
    }
}

/// `rm`: delete every target, children before their directory.
pub(crate) fn execute(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    if ctx.targets.is_empty() {
        ctx.response.fail("No files were selected for removal");
        return Ok(());
    }

    let targets = ctx.targets.clone();
    for target in targets {
        let Some(path) = target.path else {
            ctx.response.fail_item(SUMMARY, target.handle, Refusal::RemoveFailed.detail());
            continue;
        };
        if path.is_root() {
            warn!("removal of the root refused");
            let home = connector.config().home.clone();
            ctx.response.fail_item(SUMMARY, home, Refusal::AccessDenied.detail());
            continue;
        }
        for (node, refusal) in remove_tree(connector, &path) {
            ctx.response.fail_item(SUMMARY, node.file_name(), refusal.detail());
        }
    }

    ctx.tree = true;
    reopen(connector, ctx)
}

/// Post-order removal of `top`. Returns the nodes left behind.
///
/// Symlinked directories are unlinked, never descended into.
fn remove_tree(connector: &Connector, top: &SandboxedPath) -> Vec<(SandboxedPath, Refusal)> {
    let mut refused = Vec::new();
    let mut stack = vec![(top.clone(), false)];

    while let Some((node, expanded)) = stack.pop() {
        if !expanded && node.is_dir() && !node.is_symlink() {
            stack.push((node.clone(), true));
            match node.children() {
                Ok(children) => stack.extend(children.into_iter().map(|child| (child, false))),
                Err(err) => debug!(dir = %node, error = %err, "unable to list directory"),
            }
            continue;
        }

        if !connector.perms(&node).rm {
            warn!(path = %node, "removal refused");
            refused.push((node, Refusal::AccessDenied));
            continue;
        }
        match node.remove() {
            Ok(()) => {
                info!(path = %node, "removed");
                if let Err(err) = connector.remove_thumbnail(&node) {
                    debug!(path = %node, error = %err, "thumbnail left behind");
                }
            }
            Err(err) => {
                debug!(path = %node, error = %err, "remove failed");
                refused.push((node, Refusal::RemoveFailed));
            }
        }
    }
    refused
}
