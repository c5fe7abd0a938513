//! Response payload sent back to the client.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::configuration::UploadLimit;
use crate::domain::permissions::Permissions;

/// Response headers; only `ping` sets any.
pub type Headers = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Per-item failure detail, keyed by item label.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub error_data: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<Cwd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdc: Option<Vec<Entry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<TreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ClientParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<Entry>,
    /// Handle of the directory a `tmb` call worked on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<BTreeMap<String, String>>,
    /// More thumbnails are pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmb: Option<bool>,
}

impl Response {
    /// Record a summary error unless one is already set.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error.get_or_insert_with(|| message.into());
    }

    /// Record a per-item failure together with its batch summary.
    pub fn fail_item(
        &mut self,
        summary: impl Into<String>,
        item: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.fail(summary);
        self.error_data.insert(item.into(), detail.into());
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Projection of one directory entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub name: String,
    pub hash: String,
    pub date: String,
    pub mime: String,
    pub size: u64,
    #[serde(flatten)]
    pub perms: Permissions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize: Option<bool>,
    /// `"WxH"`; serialized as null when the size could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dim: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmb: Option<String>,
    /// Handle of the symlink target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_to: Option<String>,
    /// Handle of the symlink target's directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Entry {
    pub fn is_directory(&self) -> bool {
        self.mime == "directory"
    }
}

/// Projection of the working directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cwd {
    pub name: String,
    pub hash: String,
    pub mime: String,
    pub rel: String,
    pub size: u64,
    pub date: String,
    #[serde(flatten)]
    pub perms: Permissions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub hash: String,
    pub dirs: Vec<TreeNode>,
    #[serde(flatten)]
    pub perms: Permissions,
}

impl TreeNode {
    /// Depth-first search by name path, e.g. `["foo", "bar"]`.
    pub fn find(&self, names: &[&str]) -> Option<&TreeNode> {
        match names.split_first() {
            None => Some(self),
            Some((first, rest)) => {
                self.dirs.iter().find(|dir| dir.name == *first).and_then(|dir| dir.find(rest))
            }
        }
    }
}

/// Client configuration echoed on `open` with `init`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientParams {
    pub dot_files: bool,
    pub upl_max_size: UploadLimit,
    pub archives: Vec<String>,
    pub extract: Vec<String>,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_response_serializes_to_empty_object() {
        assert_eq!(serde_json::to_value(Response::default()).unwrap(), json!({}));
    }

    #[test]
    fn first_error_is_kept() {
        let mut response = Response::default();
        response.fail_item("Some files were not copied.", "a.txt", "Access Denied");
        response.fail_item("Other", "b.txt", "Access Denied");
        assert_eq!(response.error.as_deref(), Some("Some files were not copied."));

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["errorData"]["b.txt"], "Access Denied");
    }

    #[test]
    fn entry_flattens_permissions_and_renames_link_to() {
        let entry = Entry {
            name: "alias".into(),
            hash: "YWxpYXM".into(),
            date: "2024-01-01 00:00:00 +0000".into(),
            mime: "text/plain".into(),
            size: 3,
            perms: Permissions::default(),
            url: None,
            resize: Some(true),
            dim: Some(None),
            tmb: None,
            link: Some("cmVhbA".into()),
            link_to: Some("real".into()),
            parent: Some("Lg".into()),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["read"], true);
        assert_eq!(value["rm"], true);
        assert_eq!(value["linkTo"], "real");
        assert!(value["dim"].is_null());
        assert!(value.get("url").is_none());
    }

    #[test]
    fn params_use_client_key_names() {
        let params = ClientParams {
            dot_files: true,
            upl_max_size: UploadLimit::default(),
            archives: vec![],
            extract: vec!["application/zip".into()],
            url: "/files".into(),
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["dotFiles"], true);
        assert_eq!(value["uplMaxSize"], "50M");
    }
}
