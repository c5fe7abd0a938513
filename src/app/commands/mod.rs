//! One module per connector command.

pub(crate) mod archive;
pub(crate) mod content;
pub(crate) mod duplicate;
pub(crate) mod images;
pub(crate) mod mkdir;
pub(crate) mod open;
pub(crate) mod paste;
pub(crate) mod ping;
pub(crate) mod remove;
pub(crate) mod rename;
pub(crate) mod upload;
