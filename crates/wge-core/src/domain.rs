use serde::{Deserialize, Serialize};

/// Provider-assigned group/conversation id (e.g. `1234567890-12345678@g.us`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

/// The opaque trailing token of an invite link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InviteCode(pub String);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for InviteCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A group member as the bridge reports it, before normalization.
///
/// `id` is structurally `<local-part>@<domain>`; the name fields are all
/// optional and of varying quality, which is why `contacts::dedupe` applies
/// a fallback chain over them.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawParticipant {
    pub id: String,
    #[serde(default)]
    pub formatted_name: Option<String>,
    #[serde(default)]
    pub pushname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A normalized contact. Both fields may be empty but never absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub phone: String,
}

/// Group metadata as returned by the bridge.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GroupMetadata {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub participants: Vec<RawParticipant>,
}

/// Best-effort invite lookup result; only the id matters to the fallback
/// chain.
#[derive(Clone, Debug, Deserialize)]
pub struct InviteInfo {
    pub id: Option<GroupId>,
}

/// One entry of the caller's chat list, used by the search fallback.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatSummary {
    pub id: GroupId,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub name: String,
}

/// The outcome of one extraction, held in the single-slot cache.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ExtractionResult {
    pub group_id: Option<GroupId>,
    pub group_name: Option<String>,
    pub participants: Vec<Participant>,
}
