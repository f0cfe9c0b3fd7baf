use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Request to create a release for an existing tag.
pub struct CreateReleaseRequest {
    pub owner: String,
    pub repo: String,
    pub tag_name: String,
    /// Release title, always the tag name.
    pub name: String,
    /// Release notes.
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}
