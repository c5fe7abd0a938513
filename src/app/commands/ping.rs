use crate::app::connector::RequestContext;
use crate::domain::AppError;

/// Keep-alive: no body, asks the client to close the connection.
pub(crate) fn execute(ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    ctx.headers.insert("Connection".to_string(), "Close".to_string());
    Ok(())
}
