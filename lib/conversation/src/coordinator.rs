//! Turn routing for committed user utterances.
//!
//! Each committed utterance takes exactly one of three paths:
//!
//! 1. Knowledge answer: the knowledge base had matching documents; the
//!    joined contents are appended as an assistant message and the turn
//!    ends. No model response is requested on this path.
//! 2. Handle query: no documents, but a contact is selected; the
//!    utterance is forwarded as a user message and a response requested.
//! 3. Find profile: no documents and no contact; a system prompt steers
//!    the model toward contact lookup, then a response is requested.
//!
//! Knowledge hits pre-empt the contact flow unconditionally, including
//! mid-registration. The contact selection is revalidated against the
//! store on every routed turn, so a stale selection degrades to the
//! find-profile path instead of silently acting on a deleted contact.

use crate::channel::SessionChannel;
use crate::error::SessionFault;
use crate::message::{MessageRole, UtteranceContent};
use crate::prompts;
use std::sync::Arc;
use switchboard_contacts::ContactStore;
use switchboard_core::{DialogueState, PendingIntent};
use switchboard_retrieval::{KnowledgeRetriever, RetrievalPolicy};

/// The path a committed utterance was routed down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRoute {
    /// Answered directly from the knowledge base.
    KnowledgeAnswer,
    /// Forwarded to the model with a contact in scope.
    HandleQuery,
    /// Steered the model toward contact lookup.
    FindProfile,
}

/// Routes committed utterances for a session.
pub struct DialogueCoordinator {
    retriever: Arc<dyn KnowledgeRetriever>,
    store: Arc<dyn ContactStore>,
    policy: RetrievalPolicy,
}

impl DialogueCoordinator {
    /// Creates a coordinator over the given retriever and contact store.
    #[must_use]
    pub fn new(
        retriever: Arc<dyn KnowledgeRetriever>,
        store: Arc<dyn ContactStore>,
        policy: RetrievalPolicy,
    ) -> Self {
        Self {
            retriever,
            store,
            policy,
        }
    }

    /// Routes one committed user utterance.
    ///
    /// Mutates the dialogue state only after the corresponding channel
    /// writes succeed; a channel fault abandons the turn with state
    /// untouched beyond what was already committed.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionFault`] if a channel write fails.
    pub async fn on_utterance_committed(
        &self,
        state: &mut DialogueState,
        channel: &dyn SessionChannel,
        content: &UtteranceContent,
    ) -> Result<TurnRoute, SessionFault> {
        let utterance = content.normalize();
        tracing::info!(utterance = %utterance, "user utterance committed");

        let documents = match self.retriever.search(&utterance, &self.policy).await {
            Ok(documents) => documents,
            Err(error) => {
                tracing::warn!(%error, "knowledge retrieval failed, continuing without documents");
                Vec::new()
            }
        };

        if !documents.is_empty() {
            tracing::info!(hits = documents.len(), "answering from knowledge base");
            let answer = documents
                .iter()
                .map(|doc| doc.content.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            channel
                .append_message(MessageRole::Assistant, &answer)
                .await?;
            return Ok(TurnRoute::KnowledgeAnswer);
        }

        if self.revalidate_selection(state).await {
            tracing::info!("contact in scope, forwarding query");
            channel.append_message(MessageRole::User, &utterance).await?;
            channel.request_response().await?;
            return Ok(TurnRoute::HandleQuery);
        }

        tracing::info!("no contact selected, prompting for lookup");
        let prompt = prompts::lookup_contact_prompt(&utterance);
        channel.append_message(MessageRole::System, &prompt).await?;
        channel.request_response().await?;
        state.set_pending_intent(PendingIntent::AwaitingContactLookup);
        Ok(TurnRoute::FindProfile)
    }

    /// Checks the selected contact still exists, clearing it otherwise.
    ///
    /// A store failure counts as absent: acting on an unverifiable
    /// selection is worse than asking the user again.
    async fn revalidate_selection(&self, state: &mut DialogueState) -> bool {
        let Some(phone) = state.selected_phone() else {
            return false;
        };

        match self.store.get_by_phone(phone).await {
            Ok(Some(_)) => true,
            Ok(None) => {
                tracing::warn!(%phone, "selected contact no longer exists, clearing selection");
                state.clear_selected_contact();
                false
            }
            Err(error) => {
                tracing::warn!(%error, "contact store unavailable, treating selection as absent");
                state.clear_selected_contact();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{RecordedWrite, RecordingChannel};
    use switchboard_contacts::{Contact, FailingContactStore, MemoryContactStore};
    use switchboard_retrieval::{RetrievalError, StaticRetriever};

    fn coordinator_with(
        documents: Vec<String>,
        store: Arc<dyn ContactStore>,
    ) -> DialogueCoordinator {
        DialogueCoordinator::new(
            Arc::new(StaticRetriever::new(documents)),
            store,
            RetrievalPolicy::default(),
        )
    }

    fn sample_contact(phone: &str) -> Contact {
        Contact {
            phone: phone.to_string(),
            name: "Dana Levi".to_string(),
            mail: "dana@example.com".to_string(),
            company_name: "Acme".to_string(),
            meeting_ts: String::new(),
        }
    }

    #[tokio::test]
    async fn knowledge_hit_appends_answer_without_response_request() {
        let coordinator = coordinator_with(
            vec![
                "Our office hours are 9 to 5.".to_string(),
                "Office hours exclude holidays.".to_string(),
            ],
            Arc::new(MemoryContactStore::new()),
        );
        let channel = RecordingChannel::new();
        let mut state = DialogueState::new();

        let route = coordinator
            .on_utterance_committed(&mut state, &channel, &"office hours?".into())
            .await
            .unwrap();

        assert_eq!(route, TurnRoute::KnowledgeAnswer);
        let writes = channel.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(
            writes[0],
            RecordedWrite::Message {
                role: MessageRole::Assistant,
                content: "Our office hours are 9 to 5.\nOffice hours exclude holidays."
                    .to_string(),
            }
        );
        assert_eq!(channel.response_requests(), 0);
    }

    #[tokio::test]
    async fn miss_with_no_contact_prompts_lookup() {
        let coordinator = coordinator_with(Vec::new(), Arc::new(MemoryContactStore::new()));
        let channel = RecordingChannel::new();
        let mut state = DialogueState::new();

        let route = coordinator
            .on_utterance_committed(&mut state, &channel, &"hello there".into())
            .await
            .unwrap();

        assert_eq!(route, TurnRoute::FindProfile);
        assert_eq!(state.pending_intent(), PendingIntent::AwaitingContactLookup);

        let writes = channel.writes();
        assert_eq!(writes.len(), 2);
        assert!(matches!(
            &writes[0],
            RecordedWrite::Message {
                role: MessageRole::System,
                content
            } if content.contains("hello there")
        ));
        assert_eq!(channel.response_requests(), 1);
    }

    #[tokio::test]
    async fn miss_with_selected_contact_forwards_query() {
        let store = Arc::new(MemoryContactStore::new());
        store
            .insert_if_absent(&sample_contact("0541234567"))
            .await
            .unwrap();

        let coordinator = coordinator_with(Vec::new(), store);
        let channel = RecordingChannel::new();
        let mut state = DialogueState::new();
        state.select_contact("0541234567");

        let route = coordinator
            .on_utterance_committed(&mut state, &channel, &"when is my meeting?".into())
            .await
            .unwrap();

        assert_eq!(route, TurnRoute::HandleQuery);
        let writes = channel.writes();
        assert_eq!(
            writes[0],
            RecordedWrite::Message {
                role: MessageRole::User,
                content: "when is my meeting?".to_string(),
            }
        );
        assert_eq!(channel.response_requests(), 1);
    }

    #[tokio::test]
    async fn stale_selection_degrades_to_find_profile() {
        let coordinator = coordinator_with(Vec::new(), Arc::new(MemoryContactStore::new()));
        let channel = RecordingChannel::new();
        let mut state = DialogueState::new();
        state.select_contact("0549999999");

        let route = coordinator
            .on_utterance_committed(&mut state, &channel, &"anything".into())
            .await
            .unwrap();

        assert_eq!(route, TurnRoute::FindProfile);
        assert!(!state.has_selected_contact());
    }

    #[tokio::test]
    async fn store_failure_during_revalidation_degrades_to_find_profile() {
        let coordinator = coordinator_with(Vec::new(), Arc::new(FailingContactStore));
        let channel = RecordingChannel::new();
        let mut state = DialogueState::new();
        state.select_contact("0541234567");

        let route = coordinator
            .on_utterance_committed(&mut state, &channel, &"anything".into())
            .await
            .unwrap();

        assert_eq!(route, TurnRoute::FindProfile);
        assert!(!state.has_selected_contact());
    }

    #[tokio::test]
    async fn retrieval_failure_degrades_to_empty_branch() {
        let coordinator = DialogueCoordinator::new(
            Arc::new(StaticRetriever::failing(
                RetrievalError::BackendUnavailable {
                    reason: "down".to_string(),
                },
            )),
            Arc::new(MemoryContactStore::new()),
            RetrievalPolicy::default(),
        );
        let channel = RecordingChannel::new();
        let mut state = DialogueState::new();

        let route = coordinator
            .on_utterance_committed(&mut state, &channel, &"office hours?".into())
            .await
            .unwrap();

        assert_eq!(route, TurnRoute::FindProfile);
    }

    #[tokio::test]
    async fn knowledge_hit_pre_empts_selected_contact() {
        let store = Arc::new(MemoryContactStore::new());
        store
            .insert_if_absent(&sample_contact("0541234567"))
            .await
            .unwrap();

        let coordinator = coordinator_with(vec!["Pricing starts at 100.".to_string()], store);
        let channel = RecordingChannel::new();
        let mut state = DialogueState::new();
        state.select_contact("0541234567");

        let route = coordinator
            .on_utterance_committed(&mut state, &channel, &"what is the pricing?".into())
            .await
            .unwrap();

        assert_eq!(route, TurnRoute::KnowledgeAnswer);
        assert!(state.has_selected_contact());
        assert_eq!(channel.response_requests(), 0);
    }

    #[tokio::test]
    async fn mixed_segments_are_normalized_before_routing() {
        let coordinator = coordinator_with(Vec::new(), Arc::new(MemoryContactStore::new()));
        let channel = RecordingChannel::new();
        let mut state = DialogueState::new();

        let content = UtteranceContent::Segments(vec![
            crate::message::UtteranceSegment::Text("look".to_string()),
            crate::message::UtteranceSegment::Image,
        ]);

        coordinator
            .on_utterance_committed(&mut state, &channel, &content)
            .await
            .unwrap();

        let writes = channel.writes();
        assert!(matches!(
            &writes[0],
            RecordedWrite::Message { content, .. } if content.contains("look\n[image]")
        ));
    }

    #[tokio::test]
    async fn channel_fault_abandons_turn() {
        let coordinator = coordinator_with(Vec::new(), Arc::new(MemoryContactStore::new()));
        let channel = RecordingChannel::failing();
        let mut state = DialogueState::new();

        let result = coordinator
            .on_utterance_committed(&mut state, &channel, &"hello".into())
            .await;

        assert!(result.is_err());
        // The pending intent commits only after the writes succeed.
        assert_eq!(state.pending_intent(), PendingIntent::None);
    }
}
