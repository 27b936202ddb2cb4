//! Chat session use case
//!
//! [`ChatSessionController`] is the only entry point the presentation layer
//! calls. It owns the single-flight request lifecycle:
//!
//! ```text
//! send_message(text)
//!   ├─ rejected (blank / already pending) → no-op
//!   └─ accepted
//!        1. snapshot history            → request context
//!        2. append user message         (optimistic)
//!        3. pending = true, clear suggestions
//!        4. transport.exchange(...)     ← only suspension point
//!        5. Ok  → append reply, store suggestions, dispatch directive
//!           Err → append fallback apology, log the error
//!        6. pending = false             (on every exit path, via guard)
//! ```
//!
//! [`reset`](ChatSessionController::reset) models a panel remount: the history
//! is re-seeded and the session generation advances, so a reply still in
//! flight from before the reset is discarded when it lands.

use crate::config::SessionConfig;
use crate::dispatch::dispatcher::{ActionDispatcher, DispatchOutcome};
use crate::history::MessageHistoryStore;
use crate::ports::assistant_transport::{AssistantTransport, ExchangeError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::credential::CredentialSource;
use mex_domain::{
    ActionDirective, ChatReply, ChatRequest, ConversationHistory, Message, Rejection,
    RequestTicket, SessionPhase, SessionState,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Clears `pending` for its ticket when dropped.
///
/// Dropping happens on normal return, on panic unwinding out of the transport,
/// and when the caller drops the `send_message` future mid-flight.
struct PendingGuard<'a> {
    state: &'a Mutex<SessionState>,
    ticket: RequestTicket,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !state.settle(self.ticket) {
            debug!(
                "Request from generation {} settled after reset",
                self.ticket.generation()
            );
        }
    }
}

/// Orchestrates one chat panel's conversation with the assistant service.
pub struct ChatSessionController<T: AssistantTransport + 'static> {
    transport: Arc<T>,
    credentials: Arc<dyn CredentialSource>,
    dispatcher: ActionDispatcher,
    logger: Arc<dyn ConversationLogger>,
    config: SessionConfig,
    history: MessageHistoryStore,
    state: Mutex<SessionState>,
}

impl<T: AssistantTransport + 'static> ChatSessionController<T> {
    /// Create a session with the default greeting and fallback text.
    pub fn new(
        transport: Arc<T>,
        credentials: Arc<dyn CredentialSource>,
        dispatcher: ActionDispatcher,
    ) -> Self {
        let config = SessionConfig::default();
        Self {
            transport,
            credentials,
            dispatcher,
            logger: Arc::new(NoConversationLogger),
            history: MessageHistoryStore::new(ConversationHistory::seeded(
                config.greeting.as_deref(),
            )),
            config,
            state: Mutex::new(SessionState::new()),
        }
    }

    /// Replace the session settings. The history is re-seeded with the new
    /// greeting, so call this before the first message.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.history.restart(config.greeting.as_deref());
        self.config = config;
        self
    }

    /// Record a structured transcript through `logger`.
    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Send a user message to the assistant.
    ///
    /// Blank text and calls made while a request is in flight are dropped
    /// silently. Failures never surface to the caller; they become a single
    /// apology message in the history.
    pub async fn send_message(&self, text: &str) {
        let text = text.trim();
        let (ticket, request) = match self.accept(text) {
            Ok(accepted) => accepted,
            Err(rejection) => {
                debug!("Message not sent: {}", rejection);
                return;
            }
        };
        let _pending = PendingGuard {
            state: &self.state,
            ticket,
        };

        // Read per request; the credential is not kept past this exchange.
        let credential = self.credentials.credential();
        if credential.is_none() {
            warn!("No credential available, sending unauthenticated chat request");
        }

        info!(
            "Sending chat message (context: {} messages)",
            request.history.len()
        );
        self.logger
            .log(ConversationEvent::request(ticket.generation(), &request));

        let outcome = self
            .transport
            .exchange(&request, credential.as_ref())
            .await;

        if let Some(directive) = self.settle(ticket, outcome) {
            self.dispatch(&directive);
        }
    }

    /// Validate, snapshot the context and append the user message atomically.
    fn accept(&self, text: &str) -> Result<(RequestTicket, ChatRequest), Rejection> {
        let mut state = self.lock_state();
        let ticket = state.begin(text)?;
        let context = self.history.snapshot();
        self.history.append(Message::user(text));
        Ok((ticket, ChatRequest::new(text, context)))
    }

    /// Apply the exchange outcome to the history. Returns the directive to
    /// dispatch, if any. Stale outcomes are dropped.
    fn settle(
        &self,
        ticket: RequestTicket,
        outcome: Result<ChatReply, ExchangeError>,
    ) -> Option<ActionDirective> {
        let mut state = self.lock_state();
        if !state.is_current(ticket) {
            info!(
                "Discarding reply from generation {} (session was reset)",
                ticket.generation()
            );
            return None;
        }

        match outcome {
            Ok(reply) => {
                debug!("Received reply ({} chars)", reply.response.len());
                self.logger
                    .log(ConversationEvent::reply(ticket.generation(), &reply));
                self.history.append(Message::assistant(reply.response));
                state.set_suggested_actions(reply.suggested_actions);
                reply.function_call
            }
            Err(error) => {
                warn!("Chat exchange failed ({}): {}", error.kind(), error);
                self.logger.log(ConversationEvent::failure(
                    ticket.generation(),
                    error.kind(),
                    &error.to_string(),
                ));
                self.history
                    .append(Message::assistant(self.config.fallback_message.clone()));
                None
            }
        }
    }

    fn dispatch(&self, directive: &ActionDirective) {
        let outcome = self.dispatcher.dispatch(directive);
        self.logger.log(ConversationEvent::directive(
            directive,
            outcome == DispatchOutcome::Handled,
        ));
    }

    /// Start over as if the panel had been remounted.
    ///
    /// Any request still in flight is fenced off: its reply will not be
    /// appended and its directive will not run.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        state.reset();
        self.history.restart(self.config.greeting.as_deref());
        info!("Chat session reset (generation {})", state.generation());
    }

    /// Current conversation, in order
    pub fn history(&self) -> Vec<Message> {
        self.history.snapshot()
    }

    /// Messages at or after position `index`
    pub fn history_since(&self, index: usize) -> Vec<Message> {
        self.history.since(index)
    }

    /// Observe history changes (the value is the history version).
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.history.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.lock_state().is_pending()
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock_state().phase()
    }

    /// Follow-up prompts offered with the latest reply
    pub fn suggested_actions(&self) -> Vec<String> {
        self.lock_state()
            .suggested_actions()
            .iter()
            .cloned()
            .collect()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::session_config::DEFAULT_FALLBACK_MESSAGE;
    use crate::dispatch::handlers::tests::{CountingModal, RecordingNavigator};
    use crate::ports::assistant_transport::{ProtocolError, TransportError, parse_reply};
    use crate::ports::credential::{Credential, NoCredential, SharedCredential};
    use async_trait::async_trait;
    use mex_domain::{DirectiveArgs, Sender};
    use std::collections::VecDeque;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tokio::sync::Notify;

    // === Mock implementations ===

    /// Returns scripted outcomes in order and records every request.
    struct ScriptedTransport {
        outcomes: Mutex<VecDeque<Result<ChatReply, ExchangeError>>>,
        requests: Mutex<Vec<ChatRequest>>,
        credentials: Mutex<Vec<Option<String>>>,
        gate: Option<Notify>,
    }

    impl ScriptedTransport {
        fn new(outcomes: Vec<Result<ChatReply, ExchangeError>>) -> Self {
            Self {
                outcomes: Mutex::new(VecDeque::from(outcomes)),
                requests: Mutex::new(Vec::new()),
                credentials: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        /// Every exchange blocks until [`release`](Self::release) is called.
        fn gated(outcomes: Vec<Result<ChatReply, ExchangeError>>) -> Self {
            Self {
                gate: Some(Notify::new()),
                ..Self::new(outcomes)
            }
        }

        fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.notify_one();
            }
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AssistantTransport for ScriptedTransport {
        async fn exchange(
            &self,
            request: &ChatRequest,
            credential: Option<&Credential>,
        ) -> Result<ChatReply, ExchangeError> {
            self.requests.lock().unwrap().push(request.clone());
            self.credentials
                .lock()
                .unwrap()
                .push(credential.map(|c| c.expose().to_string()));
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Connection("script exhausted".into()).into()))
        }
    }

    struct PanickingTransport;

    #[async_trait]
    impl AssistantTransport for PanickingTransport {
        async fn exchange(
            &self,
            _request: &ChatRequest,
            _credential: Option<&Credential>,
        ) -> Result<ChatReply, ExchangeError> {
            panic!("transport blew up");
        }
    }

    struct NeverTransport;

    #[async_trait]
    impl AssistantTransport for NeverTransport {
        async fn exchange(
            &self,
            _request: &ChatRequest,
            _credential: Option<&Credential>,
        ) -> Result<ChatReply, ExchangeError> {
            std::future::pending().await
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    struct Fixture<T: AssistantTransport + 'static> {
        controller: ChatSessionController<T>,
        transport: Arc<T>,
        navigator: Arc<RecordingNavigator>,
        modal: Arc<CountingModal>,
    }

    fn fixture<T: AssistantTransport + 'static>(transport: T) -> Fixture<T> {
        let transport = Arc::new(transport);
        let navigator = Arc::new(RecordingNavigator::default());
        let modal = Arc::new(CountingModal::default());
        let dispatcher =
            ActionDispatcher::dashboard(navigator.clone(), modal.clone(), "/customers");
        let controller = ChatSessionController::new(
            transport.clone(),
            Arc::new(SharedCredential::new(Credential::new("token-1"))),
            dispatcher,
        )
        .with_config(SessionConfig::default().without_greeting());
        Fixture {
            controller,
            transport,
            navigator,
            modal,
        }
    }

    fn reply(text: &str) -> Result<ChatReply, ExchangeError> {
        Ok(ChatReply::from_text(text))
    }

    /// Outcome the HTTP adapter would produce for a 2xx `body`
    fn wire(body: &str) -> Result<ChatReply, ExchangeError> {
        parse_reply(body).map_err(ExchangeError::from)
    }

    fn last_text<T: AssistantTransport + 'static>(f: &Fixture<T>) -> Option<String> {
        f.controller.history().last().map(|m| m.text().to_string())
    }

    fn user_messages(history: &[Message]) -> usize {
        history.iter().filter(|m| m.is_user()).count()
    }

    // === Scenarios ===

    #[tokio::test]
    async fn test_hello_round_trip() {
        let f = fixture(ScriptedTransport::new(vec![reply("Hi!")]));

        f.controller.send_message("Hello").await;

        let requests = f.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].message, "Hello");
        assert!(requests[0].history.is_empty());
        assert_eq!(
            f.controller.history(),
            vec![Message::user("Hello"), Message::assistant("Hi!")]
        );
        assert!(!f.controller.is_pending());
    }

    #[tokio::test]
    async fn test_empty_message_changes_nothing() {
        let f = fixture(ScriptedTransport::new(vec![reply("unused")]));
        let rx = f.controller.subscribe();

        f.controller.send_message("").await;
        f.controller.send_message("   \n").await;

        assert!(f.controller.history().is_empty());
        assert!(f.transport.requests().is_empty());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(f.controller.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_concurrent_send_is_dropped() {
        let f = fixture(ScriptedTransport::gated(vec![reply("reply to A")]));
        let controller = &f.controller;
        let transport = &f.transport;

        let first = controller.send_message("A");
        let second = async {
            while !controller.is_pending() {
                tokio::task::yield_now().await;
            }
            controller.send_message("B").await;
            assert!(controller.is_pending());
            transport.release();
        };
        tokio::join!(first, second);

        let history = controller.history();
        assert_eq!(
            history,
            vec![Message::user("A"), Message::assistant("reply to A")]
        );
        assert_eq!(transport.requests().len(), 1);
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn test_network_failure_appends_fallback() {
        let f = fixture(ScriptedTransport::new(vec![Err(TransportError::Connection(
            "tcp connect error: Connection refused (os error 111)".into(),
        )
        .into())]));

        f.controller.send_message("Hello").await;

        let history = f.controller.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1], Message::assistant(DEFAULT_FALLBACK_MESSAGE));
        assert!(!f.controller.is_pending());
    }

    // === Properties ===

    #[tokio::test]
    async fn test_status_error_detail_not_leaked() {
        let f = fixture(ScriptedTransport::new(vec![Err(TransportError::Status {
            status: 500,
            status_text: "Internal Server Error".into(),
        }
        .into())]));

        f.controller.send_message("How are sales?").await;

        let last = f.controller.history().pop().unwrap();
        assert_eq!(last.sender(), Sender::Assistant);
        assert_eq!(last.text(), DEFAULT_FALLBACK_MESSAGE);
        assert!(!last.text().contains("500"));
        assert!(!last.text().contains("Internal Server Error"));
    }

    #[tokio::test]
    async fn test_protocol_error_appends_fallback_once() {
        let f = fixture(ScriptedTransport::new(vec![Err(ProtocolError::new(
            r#"{"answer": "x"}"#,
            "missing field `response`",
        )
        .into())]));

        f.controller.send_message("Hello").await;

        let history = f.controller.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].text(), DEFAULT_FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_context_is_history_before_each_send() {
        let f = fixture(ScriptedTransport::new(vec![
            reply("one"),
            Err(TransportError::Timeout.into()),
            reply("three"),
        ]));

        let mut expected_contexts = Vec::new();
        for text in ["first", "second", "third"] {
            expected_contexts.push(f.controller.history());
            f.controller.send_message(text).await;
        }

        let contexts: Vec<Vec<Message>> = f
            .transport
            .requests()
            .into_iter()
            .map(|r| r.history)
            .collect();
        assert_eq!(contexts, expected_contexts);
        assert_eq!(f.controller.history().len(), 6);
    }

    #[tokio::test]
    async fn test_user_message_count_matches_accepted_calls() {
        let f = fixture(ScriptedTransport::new(vec![
            reply("a"),
            reply("b"),
            reply("c"),
        ]));

        for text in ["a", "", "b", "  ", "c", "\t"] {
            f.controller.send_message(text).await;
        }

        assert_eq!(user_messages(&f.controller.history()), 3);
        assert_eq!(f.transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_message_text_is_trimmed() {
        let f = fixture(ScriptedTransport::new(vec![reply("ok")]));

        f.controller.send_message("  show customers \n").await;

        assert_eq!(f.transport.requests()[0].message, "show customers");
        assert_eq!(f.controller.history()[0], Message::user("show customers"));
    }

    #[tokio::test]
    async fn test_pending_only_while_in_flight() {
        let f = fixture(ScriptedTransport::gated(vec![reply("done")]));
        let controller = &f.controller;
        assert!(!controller.is_pending());

        let watcher = async {
            while !controller.is_pending() {
                tokio::task::yield_now().await;
            }
            // Optimistic append is visible while waiting
            assert_eq!(controller.history(), vec![Message::user("go")]);
            assert_eq!(controller.phase(), SessionPhase::AwaitingResponse);
            f.transport.release();
        };
        tokio::join!(controller.send_message("go"), watcher);

        assert!(!controller.is_pending());
        assert_eq!(controller.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_pending_cleared_when_transport_panics() {
        let controller = Arc::new(ChatSessionController::new(
            Arc::new(PanickingTransport),
            Arc::new(NoCredential),
            ActionDispatcher::new(),
        ));

        let task = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.send_message("boom").await })
        };
        let result = task.await;

        assert!(result.unwrap_err().is_panic());
        assert!(!controller.is_pending());

        // The session stays usable
        assert_eq!(
            controller.phase(),
            SessionPhase::Idle,
            "a panicking exchange must not wedge the session"
        );
    }

    #[tokio::test]
    async fn test_pending_cleared_when_future_dropped() {
        let controller = ChatSessionController::new(
            Arc::new(NeverTransport),
            Arc::new(NoCredential),
            ActionDispatcher::new(),
        );

        let result =
            tokio::time::timeout(Duration::from_millis(20), controller.send_message("hello")).await;

        assert!(result.is_err());
        assert!(!controller.is_pending());
    }

    // === Directives ===

    #[tokio::test]
    async fn test_show_customers_with_days_ago_navigates_once() {
        let directive = ActionDirective::new("show_customers")
            .with_args(DirectiveArgs::new().with("daysAgo", 30));
        let f = fixture(ScriptedTransport::new(vec![Ok(ChatReply::from_text(
            "Here are customers from the last 30 days.",
        )
        .with_directive(directive))]));

        f.controller.send_message("Who ordered recently?").await;

        let targets = f.navigator.targets.lock().unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].to_string(), "/customers?daysAgo=30");
        assert_eq!(f.controller.history().len(), 2);
    }

    #[tokio::test]
    async fn test_show_customers_without_days_ago_navigates_unfiltered() {
        let f = fixture(ScriptedTransport::new(vec![Ok(ChatReply::from_text(
            "Opening customers.",
        )
        .with_directive(ActionDirective::new("show_customers")))]));

        f.controller.send_message("Show my customers").await;

        let targets = f.navigator.targets.lock().unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].to_string(), "/customers");
    }

    #[tokio::test]
    async fn test_send_emails_opens_modal() {
        let f = fixture(ScriptedTransport::new(vec![Ok(ChatReply::from_text(
            "Drafting emails.",
        )
        .with_directive(ActionDirective::new("send_emails")))]));

        f.controller.send_message("Email my lapsed customers").await;

        assert_eq!(f.modal.opened.load(Ordering::SeqCst), 1);
        assert!(f.navigator.targets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_directive_still_appends_reply() {
        let f = fixture(ScriptedTransport::new(vec![Ok(ChatReply::from_text(
            "Total forecasted sales: $1200",
        )
        .with_directive(ActionDirective::new("calculate_total_sales")))]));

        f.controller.send_message("Forecast sales").await;

        assert_eq!(
            f.controller.history().last().map(|m| m.text().to_string()),
            Some("Total forecasted sales: $1200".to_string())
        );
        assert!(f.navigator.targets.lock().unwrap().is_empty());
        assert_eq!(f.modal.opened.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_null_args_navigate_unfiltered() {
        let f = fixture(ScriptedTransport::new(vec![wire(
            r#"{"response": "Here are your customers", "function_call": {"name": "show_customers", "args": null}}"#,
        )]));

        f.controller.send_message("Show customers").await;

        assert_eq!(last_text(&f), Some("Here are your customers".to_string()));
        let targets = f.navigator.targets.lock().unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].to_string(), "/customers");
    }

    #[tokio::test]
    async fn test_null_days_ago_navigates_unfiltered() {
        let f = fixture(ScriptedTransport::new(vec![wire(
            r#"{"response": "All customers", "function_call": {"name": "show_customers", "args": {"daysAgo": null}}}"#,
        )]));

        f.controller.send_message("Show customers").await;

        assert_eq!(last_text(&f), Some("All customers".to_string()));
        let targets = f.navigator.targets.lock().unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].to_string(), "/customers");
    }

    #[tokio::test]
    async fn test_null_suggestions_append_reply() {
        let f = fixture(ScriptedTransport::new(vec![wire(
            r#"{"response": "Done", "function_call": null, "suggested_actions": null}"#,
        )]));

        f.controller.send_message("Do it").await;

        assert_eq!(last_text(&f), Some("Done".to_string()));
        assert!(f.controller.suggested_actions().is_empty());
        assert!(f.navigator.targets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_object_arg_on_unknown_directive_appends_reply() {
        let f = fixture(ScriptedTransport::new(vec![wire(
            r#"{"response": "Exported", "function_call": {"name": "export_report", "args": {"filter": {"region": "EU"}}}, "suggested_actions": ["Show customers"]}"#,
        )]));

        f.controller.send_message("Export the report").await;

        assert_eq!(last_text(&f), Some("Exported".to_string()));
        assert_eq!(f.controller.suggested_actions(), vec!["Show customers".to_string()]);
        assert!(f.navigator.targets.lock().unwrap().is_empty());
        assert_eq!(f.modal.opened.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_directive_on_known_name_skips_dispatch() {
        let f = fixture(ScriptedTransport::new(vec![wire(
            r#"{"response": "Showing", "function_call": {"name": "show_customers", "args": {"daysAgo": {"from": 3}}}}"#,
        )]));

        f.controller.send_message("Show customers").await;

        assert_eq!(last_text(&f), Some("Showing".to_string()));
        assert!(f.navigator.targets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_response_is_appended() {
        let f = fixture(ScriptedTransport::new(vec![wire(r#"{"response": "  "}"#)]));

        f.controller.send_message("hello").await;

        assert_eq!(last_text(&f), Some("  ".to_string()));
    }

    // === Suggestions, credentials, reset ===

    #[tokio::test]
    async fn test_suggestions_replaced_by_each_reply() {
        let f = fixture(ScriptedTransport::gated(vec![
            Ok(ChatReply::from_text("hi").with_suggestions(vec![
                "Show customers".into(),
                "Forecast sales".into(),
            ])),
            reply("plain"),
        ]));
        let controller = &f.controller;

        f.transport.release();
        controller.send_message("hello").await;
        assert_eq!(
            controller.suggested_actions(),
            vec!["Forecast sales".to_string(), "Show customers".to_string()]
        );

        let watcher = async {
            while !controller.is_pending() {
                tokio::task::yield_now().await;
            }
            // Cleared as soon as the next request is accepted
            assert!(controller.suggested_actions().is_empty());
            f.transport.release();
        };
        tokio::join!(controller.send_message("next"), watcher);

        assert!(controller.suggested_actions().is_empty());
    }

    #[tokio::test]
    async fn test_credential_read_per_request() {
        let transport = Arc::new(ScriptedTransport::new(vec![reply("1"), reply("2"), reply("3")]));
        let credentials = Arc::new(SharedCredential::new(Credential::new("first")));
        let controller = ChatSessionController::new(
            transport.clone(),
            credentials.clone(),
            ActionDispatcher::new(),
        );

        controller.send_message("a").await;
        credentials.set(Credential::new("second"));
        controller.send_message("b").await;
        credentials.set(None);
        controller.send_message("c").await;

        assert_eq!(
            *transport.credentials.lock().unwrap(),
            vec![Some("first".to_string()), Some("second".to_string()), None]
        );
        // Unauthenticated requests still go out
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_greeting_seeds_history_and_context() {
        let transport = Arc::new(ScriptedTransport::new(vec![reply("Sure.")]));
        let controller = ChatSessionController::new(
            transport.clone(),
            Arc::new(NoCredential),
            ActionDispatcher::new(),
        )
        .with_config(SessionConfig::default().with_greeting("Hello! I'm MEX."));

        assert_eq!(
            controller.history(),
            vec![Message::assistant("Hello! I'm MEX.")]
        );

        controller.send_message("Help me").await;

        assert_eq!(
            transport.requests()[0].history,
            vec![Message::assistant("Hello! I'm MEX.")]
        );
    }

    #[tokio::test]
    async fn test_with_config_keeps_subscribers_connected() {
        let transport = Arc::new(ScriptedTransport::new(vec![reply("Sure.")]));
        let controller = ChatSessionController::new(
            transport.clone(),
            Arc::new(NoCredential),
            ActionDispatcher::new(),
        );
        let mut rx = controller.subscribe();

        let controller =
            controller.with_config(SessionConfig::default().with_greeting("Welcome back"));

        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        controller.send_message("Help me").await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), controller.history.version());
        assert_eq!(controller.history().len(), 3);
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_reply() {
        let directive = ActionDirective::new("show_customers");
        let f = fixture(ScriptedTransport::gated(vec![Ok(
            ChatReply::from_text("late reply").with_directive(directive)
        )]));
        let controller = &f.controller;

        let resetter = async {
            while !controller.is_pending() {
                tokio::task::yield_now().await;
            }
            controller.reset();
            assert!(!controller.is_pending());
            assert!(controller.history().is_empty());
            f.transport.release();
        };
        tokio::join!(controller.send_message("A"), resetter);

        assert!(controller.history().is_empty());
        assert!(f.navigator.targets.lock().unwrap().is_empty());
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn test_stale_request_does_not_clear_new_pending() {
        let f = fixture(ScriptedTransport::gated(vec![reply("stale"), reply("fresh")]));
        let controller = &f.controller;

        let driver = async {
            while !controller.is_pending() {
                tokio::task::yield_now().await;
            }
            controller.reset();

            let fresh = controller.send_message("B");
            let release_both = async {
                while f.transport.requests().len() < 2 {
                    tokio::task::yield_now().await;
                }
                // Let the stale request settle first
                f.transport.release();
                tokio::task::yield_now().await;
                tokio::task::yield_now().await;
                assert!(controller.is_pending(), "stale settle must not clear fresh request");
                f.transport.release();
            };
            tokio::join!(fresh, release_both);
        };
        tokio::join!(controller.send_message("A"), driver);

        assert!(!controller.is_pending());
        assert_eq!(controller.history().len(), 2);
        assert_eq!(controller.history()[0], Message::user("B"));
    }

    #[tokio::test]
    async fn test_transcript_events() {
        let logger = Arc::new(RecordingLogger::default());
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(ChatReply::from_text("ok").with_directive(ActionDirective::new("unknown"))),
            Err(TransportError::Timeout.into()),
        ]));
        let controller = ChatSessionController::new(
            transport,
            Arc::new(NoCredential),
            ActionDispatcher::new(),
        )
        .with_logger(logger.clone());

        controller.send_message("one").await;
        controller.send_message("two").await;

        assert_eq!(
            *logger.events.lock().unwrap(),
            vec![
                "chat_request",
                "chat_reply",
                "directive_ignored",
                "chat_request",
                "chat_failure"
            ]
        );
    }
}
