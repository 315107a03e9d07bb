use async_trait::async_trait;

use crate::{
    domain::{ChatSummary, GroupId, GroupMetadata, InviteCode, InviteInfo},
    Result,
};

/// Hexagonal port for the external WhatsApp client.
///
/// The bridge sidecar (whatsapp-web.js) owns the authenticated session and
/// all protocol work; this trait is the whole surface the core needs from it.
/// The adapter crate implements it over HTTP.
#[async_trait]
pub trait WhatsappPort: Send + Sync {
    /// Best-effort invite metadata lookup. Used only as a fallback source of
    /// the group id; callers treat failure as "no info".
    async fn get_invite_info(&self, code: &InviteCode) -> Result<InviteInfo>;

    /// Join the group behind an invite code. Fails when the invite is invalid
    /// or the session is already a member.
    async fn accept_invite(&self, code: &InviteCode) -> Result<GroupId>;

    /// Fetch subject and raw member list for a resolved group.
    async fn get_group_metadata(&self, id: &GroupId) -> Result<GroupMetadata>;

    /// List the session's chats, for the name-search fallback.
    async fn get_chats(&self) -> Result<Vec<ChatSummary>>;
}
