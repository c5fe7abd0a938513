use crate::domain::{AppError, HandleCodec, Headers, Request, Response, SandboxedPath};

/// A `targets` entry: the handle as sent plus what it resolved to.
#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    pub handle: String,
    pub path: Option<SandboxedPath>,
}

impl Resolved {
    /// Label used in `errorData`: the base name, or the raw handle if unresolved.
    pub fn label(&self) -> String {
        match &self.path {
            Some(path) => path.file_name(),
            None => self.handle.clone(),
        }
    }
}

/// State of a single request. Never shared between requests.
pub(crate) struct RequestContext<'r> {
    pub request: &'r Request,
    pub current: Option<SandboxedPath>,
    pub target: Option<SandboxedPath>,
    pub targets: Vec<Resolved>,
    pub response: Response,
    pub headers: Headers,
    /// Include the directory tree when the working directory is (re)opened.
    pub tree: bool,
}

impl<'r> RequestContext<'r> {
    pub fn new(request: &'r Request) -> Self {
        Self {
            request,
            current: None,
            target: None,
            targets: Vec::new(),
            response: Response::default(),
            headers: Headers::new(),
            tree: request.tree,
        }
    }

    /// Decode `current`, `target` and `targets`; absent handles stay unresolved.
    pub fn resolve(&mut self, codec: &HandleCodec) {
        self.current = self.request.current.as_deref().and_then(|h| codec.decode(h));
        self.target = self.request.target.as_deref().and_then(|h| codec.decode(h));
        self.targets = self
            .request
            .targets
            .iter()
            .map(|handle| Resolved { handle: handle.clone(), path: codec.decode(handle) })
            .collect();
    }

    pub fn current(&self) -> Result<SandboxedPath, AppError> {
        self.current.clone().ok_or(AppError::InvalidParameters)
    }

    pub fn target(&self) -> Result<SandboxedPath, AppError> {
        self.target.clone().ok_or(AppError::InvalidParameters)
    }

    /// The `name` parameter as a single plain path segment.
    pub fn name(&self) -> Result<&'r str, AppError> {
        match self.request.name.as_deref() {
            Some(name) if is_plain_name(name) => Ok(name),
            _ => Err(AppError::InvalidParameters),
        }
    }

    pub fn finish(self) -> (Headers, Response) {
        (self.headers, self.response)
    }
}

pub(crate) fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
