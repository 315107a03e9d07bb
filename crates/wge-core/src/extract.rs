use std::sync::Arc;

use regex::Regex;
use tracing::{info, warn};

use crate::{
    cache::ExtractionCache,
    contacts,
    domain::{ExtractionResult, GroupId, InviteCode},
    errors::Error,
    whatsapp::WhatsappPort,
    Result,
};

const UNNAMED_GROUP: &str = "Unnamed Group";

/// Pull the invite code out of a `chat.whatsapp.com` link.
///
/// Fails with `InvalidLink` before any bridge call is made.
pub fn parse_invite_link(link: &str) -> Result<InviteCode> {
    let re = Regex::new(r"(https?://)?chat\.whatsapp\.com/([A-Za-z0-9_-]+)")
        .expect("valid regex");
    let caps = re
        .captures(link)
        .ok_or_else(|| Error::InvalidLink(format!("unrecognized invite link: {link}")))?;
    Ok(InviteCode(caps[2].to_string()))
}

/// Turns an invite link into a populated, cached extraction result.
///
/// Holds the port and the cache; the HTTP layer owns serializing concurrent
/// `resolve` calls (the bridge session is shared, so interleaved resolutions
/// race on its state).
pub struct Extractor {
    client: Arc<dyn WhatsappPort>,
    cache: Arc<ExtractionCache>,
}

impl Extractor {
    pub fn new(client: Arc<dyn WhatsappPort>, cache: Arc<ExtractionCache>) -> Self {
        Self { client, cache }
    }

    /// Resolve an invite link to a group and extract its contacts.
    ///
    /// Fallback chain for the group id: accept the invite; else the id from
    /// the best-effort invite info; else search existing group chats for a
    /// name containing the invite code. Sub-failures along the way are
    /// logged and swallowed; only "no id from any branch" and metadata
    /// failures surface, as `Resolution`. The cache is only written on
    /// success.
    pub async fn resolve(&self, link: &str) -> Result<ExtractionResult> {
        let code = parse_invite_link(link)?;

        // Best-effort; only a fallback source of the group id.
        let invite_info = match self.client.get_invite_info(&code).await {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(error = %e, "invite info lookup failed");
                None
            }
        };

        let group_id = match self.client.accept_invite(&code).await {
            Ok(id) => {
                info!(group_id = %id, "accepted invite");
                Some(id)
            }
            Err(e) => {
                warn!(error = %e, "accept invite failed (maybe already a member)");
                match invite_info.and_then(|i| i.id) {
                    Some(id) => Some(id),
                    None => self.search_chats_for_code(&code).await,
                }
            }
        };

        let Some(group_id) = group_id else {
            return Err(Error::Resolution(
                "could not join or locate group".to_string(),
            ));
        };

        let metadata = self
            .client
            .get_group_metadata(&group_id)
            .await
            .map_err(|e| Error::Resolution(format!("group metadata fetch failed: {e}")))?;

        let participants = contacts::dedupe(&metadata.participants);
        // Blank subject falls through to the name, not to the placeholder.
        let group_name = metadata
            .subject
            .filter(|s| !s.is_empty())
            .or(metadata.name.filter(|s| !s.is_empty()))
            .unwrap_or_else(|| UNNAMED_GROUP.to_string());

        info!(
            group_id = %group_id,
            group_name = %group_name,
            count = participants.len(),
            "extraction complete"
        );

        let result = ExtractionResult {
            group_id: Some(group_id),
            group_name: Some(group_name),
            participants,
        };
        self.cache.set(result.clone());
        Ok(result)
    }

    /// Heuristic last resort: a group whose display name contains the invite
    /// code. Can match the wrong group when several names embed the same
    /// token; kept as-is, a documented limitation.
    async fn search_chats_for_code(&self, code: &InviteCode) -> Option<GroupId> {
        match self.client.get_chats().await {
            Ok(chats) => chats
                .into_iter()
                .find(|c| c.is_group && c.name.contains(&code.0))
                .map(|c| c.id),
            Err(e) => {
                warn!(error = %e, "chat search fallback failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::{ChatSummary, GroupMetadata, InviteInfo, RawParticipant};

    #[derive(Default)]
    struct FakeClient {
        invite_info: Option<GroupId>,
        invite_info_fails: bool,
        accept_result: Option<GroupId>,
        chats: Vec<ChatSummary>,
        metadata: GroupMetadata,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeClient {
        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WhatsappPort for FakeClient {
        async fn get_invite_info(&self, _code: &InviteCode) -> Result<InviteInfo> {
            self.record("invite_info");
            if self.invite_info_fails {
                return Err(Error::Bridge("invite info unavailable".to_string()));
            }
            Ok(InviteInfo {
                id: self.invite_info.clone(),
            })
        }

        async fn accept_invite(&self, _code: &InviteCode) -> Result<GroupId> {
            self.record("accept");
            self.accept_result
                .clone()
                .ok_or_else(|| Error::Bridge("invite expired".to_string()))
        }

        async fn get_group_metadata(&self, _id: &GroupId) -> Result<GroupMetadata> {
            self.record("metadata");
            Ok(self.metadata.clone())
        }

        async fn get_chats(&self) -> Result<Vec<ChatSummary>> {
            self.record("chats");
            Ok(self.chats.clone())
        }
    }

    fn gid(s: &str) -> GroupId {
        GroupId(s.to_string())
    }

    fn extractor(client: FakeClient) -> (Extractor, Arc<ExtractionCache>) {
        let cache = Arc::new(ExtractionCache::new());
        (Extractor::new(Arc::new(client), cache.clone()), cache)
    }

    const LINK: &str = "https://chat.whatsapp.com/AbC123_-xyz";

    #[test]
    fn parse_accepts_scheme_less_links() {
        let code = parse_invite_link("chat.whatsapp.com/AbC123").unwrap();
        assert_eq!(code.0, "AbC123");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            parse_invite_link("not a link"),
            Err(Error::InvalidLink(_))
        ));
    }

    #[tokio::test]
    async fn invalid_link_fails_before_any_bridge_call() {
        let client = Arc::new(FakeClient::default());
        let ex = Extractor::new(client.clone(), Arc::new(ExtractionCache::new()));
        let err = ex.resolve("not a link").await.unwrap_err();
        assert!(matches!(err, Error::InvalidLink(_)));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn accept_invite_is_the_primary_path() {
        let client = FakeClient {
            accept_result: Some(gid("joined@g.us")),
            metadata: GroupMetadata {
                subject: Some("Family".to_string()),
                name: None,
                participants: vec![RawParticipant {
                    id: "111@c.us".to_string(),
                    ..Default::default()
                }],
            },
            ..Default::default()
        };
        let (ex, cache) = extractor(client);
        let result = ex.resolve(LINK).await.unwrap();
        assert_eq!(result.group_id, Some(gid("joined@g.us")));
        assert_eq!(result.group_name.as_deref(), Some("Family"));
        assert_eq!(result.participants.len(), 1);
        assert_eq!(cache.get().group_id, Some(gid("joined@g.us")));
    }

    #[tokio::test]
    async fn blank_subject_falls_through_to_group_name() {
        let client = FakeClient {
            accept_result: Some(gid("joined@g.us")),
            metadata: GroupMetadata {
                subject: Some(String::new()),
                name: Some("Real Name".to_string()),
                participants: vec![],
            },
            ..Default::default()
        };
        let (ex, _) = extractor(client);
        let result = ex.resolve(LINK).await.unwrap();
        assert_eq!(result.group_name.as_deref(), Some("Real Name"));
    }

    #[tokio::test]
    async fn falls_back_to_invite_info_id_when_accept_fails() {
        let client = FakeClient {
            invite_info: Some(gid("known@g.us")),
            accept_result: None,
            ..Default::default()
        };
        let (ex, _) = extractor(client);
        let result = ex.resolve(LINK).await.unwrap();
        assert_eq!(result.group_id, Some(gid("known@g.us")));
        // Placeholder name when the bridge reports none.
        assert_eq!(result.group_name.as_deref(), Some("Unnamed Group"));
    }

    #[tokio::test]
    async fn falls_back_to_chat_name_search_as_last_resort() {
        let client = FakeClient {
            invite_info_fails: true,
            accept_result: None,
            chats: vec![
                ChatSummary {
                    id: gid("dm@c.us"),
                    is_group: false,
                    name: "AbC123_-xyz".to_string(),
                },
                ChatSummary {
                    id: gid("match@g.us"),
                    is_group: true,
                    name: "invite AbC123_-xyz backup".to_string(),
                },
            ],
            ..Default::default()
        };
        let (ex, _) = extractor(client);
        let result = ex.resolve(LINK).await.unwrap();
        assert_eq!(result.group_id, Some(gid("match@g.us")));
    }

    #[tokio::test]
    async fn all_strategies_failing_leaves_cache_untouched() {
        let prior = ExtractionResult {
            group_id: Some(gid("prior@g.us")),
            group_name: Some("Prior".to_string()),
            participants: vec![],
        };
        let client = FakeClient {
            invite_info_fails: true,
            accept_result: None,
            chats: vec![],
            ..Default::default()
        };
        let (ex, cache) = extractor(client);
        cache.set(prior.clone());

        let err = ex.resolve(LINK).await.unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
        assert_eq!(cache.get().group_id, prior.group_id);
    }

    #[tokio::test]
    async fn call_order_tries_cheap_operations_first() {
        let client = Arc::new(FakeClient {
            invite_info_fails: true,
            accept_result: None,
            chats: vec![ChatSummary {
                id: gid("g@g.us"),
                is_group: true,
                name: "AbC123_-xyz".to_string(),
            }],
            ..Default::default()
        });
        let cache = Arc::new(ExtractionCache::new());
        let ex = Extractor::new(client.clone(), cache);
        ex.resolve(LINK).await.unwrap();
        assert_eq!(
            client.calls(),
            vec!["invite_info", "accept", "chats", "metadata"]
        );
    }
}
