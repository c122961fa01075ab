//! Translator panel - session state and the language picker state machine

use crate::consts::{limits, lookup, FALLBACK_CODE};
use crate::overlay::{ListenerGuard, PanelId, PointerListeners};
use crate::translate::{Ticket, TranslateError, TranslationRequest};
use std::sync::Arc;

/// Which language a picker commits to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

/// Where a pointer-down landed relative to the picker overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Overlay,
    Outside,
}

/// Picker overlay state. An open picker owns its outside-click listener.
#[derive(Debug)]
pub enum Picker {
    Closed,
    Open { side: Side, _listener: ListenerGuard },
}

impl Picker {
    pub fn side(&self) -> Option<Side> {
        match self {
            Picker::Closed => None,
            Picker::Open { side, .. } => Some(*side),
        }
    }
}

/// Transient, per-panel state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub source: &'static str,
    pub target: &'static str,
    pub input: String,
    pub translated: String,
    pub error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            source: FALLBACK_CODE,
            target: FALLBACK_CODE,
            input: String::new(),
            translated: String::new(),
            error: None,
        }
    }
}

/// Outcome of a submit
#[derive(Debug)]
pub enum Submission {
    /// Empty input: output cleared, nothing to send
    Cleared,
    Request(TranslationRequest),
}

pub struct Panel {
    id: PanelId,
    session: Session,
    picker: Picker,
    listeners: Arc<PointerListeners>,
    pending: Option<Ticket>,
    on_close: Box<dyn FnMut() + Send>,
}

impl Panel {
    pub fn new(
        id: PanelId,
        listeners: Arc<PointerListeners>,
        on_close: impl FnMut() + Send + 'static,
    ) -> Self {
        log::info!("Panel {:?} mounted", id);
        Self {
            id,
            session: Session::default(),
            picker: Picker::Closed,
            listeners,
            pending: None,
            on_close: Box::new(on_close),
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn source_name(&self) -> &'static str {
        lookup(self.session.source)
    }

    pub fn target_name(&self) -> &'static str {
        lookup(self.session.target)
    }

    /// Click on a language display
    pub fn toggle_picker(&mut self, side: Side) {
        if self.picker.side() == Some(side) {
            self.picker = Picker::Closed;
            log::debug!("Panel {:?}: picker closed", self.id);
            return;
        }
        // Release any listener for the other side before acquiring a new one.
        self.picker = Picker::Closed;
        self.picker = Picker::Open { side, _listener: self.listeners.attach(self.id) };
        log::debug!("Panel {:?}: picker open for {:?}", self.id, side);
    }

    /// Click on a picker entry. Ignored while the picker is closed.
    pub fn select_language(&mut self, code: &'static str) -> bool {
        let Some(side) = self.picker.side() else {
            return false;
        };
        match side {
            Side::Source => self.session.source = code,
            Side::Target => self.session.target = code,
        }
        self.picker = Picker::Closed;
        true
    }

    pub fn pointer_down(&mut self, hit: Hit) {
        if hit == Hit::Outside && matches!(self.picker, Picker::Open { .. }) {
            self.picker = Picker::Closed;
            log::debug!("Panel {:?}: picker dismissed", self.id);
        }
    }

    pub fn swap_languages(&mut self) {
        let s = &mut self.session;
        (s.source, s.target) = (s.target, s.source);
    }

    /// Accepts `value` only within the character cap
    pub fn edit_input(&mut self, value: &str) -> bool {
        if value.chars().count() > limits::MAX_INPUT_CHARS {
            log::debug!("Panel {:?}: input over {} chars rejected", self.id, limits::MAX_INPUT_CHARS);
            return false;
        }
        self.session.input = value.to_string();
        true
    }

    /// Starts a translation. A new submit supersedes any request in flight.
    pub fn submit(&mut self) -> Submission {
        if self.session.input.trim().is_empty() {
            self.session.translated.clear();
            self.session.error = None;
            self.pending = None;
            return Submission::Cleared;
        }

        let ticket = Ticket::next();
        self.pending = Some(ticket);

        Submission::Request(TranslationRequest {
            text: self.session.input.clone(),
            source: self.session.source,
            target: self.session.target,
            ticket,
        })
    }

    /// Applies a finished request. Returns false for a superseded ticket.
    pub fn complete(&mut self, ticket: Ticket, result: Result<String, TranslateError>) -> bool {
        if self.pending != Some(ticket) {
            log::warn!("Panel {:?}: dropping stale result for {:?}", self.id, ticket);
            return false;
        }
        self.pending = None;

        match result {
            Ok(text) => {
                self.session.translated = text;
                self.session.error = None;
            }
            Err(e) => {
                log::error!("Panel {:?}: translation failed: {}", self.id, e);
                self.session.error = Some(format!("Translation failed: {}", e));
            }
        }
        true
    }

    /// Signals the embedder that the user asked to close the panel
    pub fn close(&mut self) {
        (self.on_close)();
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        log::info!("Panel {:?} unmounted", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Translate;
    use crate::translate::parse_response;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned {
        body: &'static str,
        calls: AtomicUsize,
    }

    impl Canned {
        fn new(body: &'static str) -> Self {
            Self { body, calls: AtomicUsize::new(0) }
        }
    }

    impl Translate for Canned {
        fn translate(
            &self,
            _req: &TranslationRequest,
        ) -> impl Future<Output = Result<String, TranslateError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let parsed = parse_response(self.body);
            async move { parsed }
        }
    }

    fn panel() -> (Panel, Arc<PointerListeners>) {
        let listeners = PointerListeners::new();
        (Panel::new(PanelId(1), Arc::clone(&listeners), || {}), listeners)
    }

    async fn run<T: Translate>(panel: &mut Panel, engine: &T) {
        if let Submission::Request(req) = panel.submit() {
            let result = engine.translate(&req).await;
            panel.complete(req.ticket, result);
        }
    }

    #[test]
    fn mounts_with_fallback_languages() {
        let (p, listeners) = panel();
        assert_eq!(p.session(), &Session::default());
        assert_eq!(p.session().source, "en");
        assert_eq!(p.source_name(), "English");
        assert!(p.picker().side().is_none());
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn over_cap_input_keeps_previous_value() {
        let (mut p, _l) = panel();
        assert!(p.edit_input("hello"));
        let long = "x".repeat(201);
        assert!(!p.edit_input(&long));
        assert_eq!(p.session().input, "hello");

        let exact = "é".repeat(200);
        assert!(p.edit_input(&exact));
        assert_eq!(p.session().input, exact);
    }

    #[test]
    fn double_swap_is_identity() {
        let (mut p, _l) = panel();
        p.toggle_picker(Side::Target);
        p.select_language("fr");
        p.swap_languages();
        assert_eq!((p.session().source, p.session().target), ("fr", "en"));
        p.swap_languages();
        assert_eq!((p.session().source, p.session().target), ("en", "fr"));
    }

    #[test]
    fn outside_click_closes_without_changing_source() {
        let (mut p, listeners) = panel();
        p.toggle_picker(Side::Source);
        assert!(listeners.is_listening(PanelId(1)));

        p.pointer_down(Hit::Overlay);
        assert_eq!(p.picker().side(), Some(Side::Source));

        p.pointer_down(Hit::Outside);
        assert!(p.picker().side().is_none());
        assert_eq!(p.session().source, "en");
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn select_for_target_leaves_source() {
        let (mut p, listeners) = panel();
        p.toggle_picker(Side::Target);
        assert!(p.select_language("de"));
        assert_eq!(p.session().target, "de");
        assert_eq!(p.session().source, "en");
        assert!(p.picker().side().is_none());
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn select_while_closed_is_ignored() {
        let (mut p, _l) = panel();
        assert!(!p.select_language("de"));
        assert_eq!(p.session().target, "en");
    }

    #[test]
    fn picker_toggles_and_switches_sides() {
        let (mut p, listeners) = panel();
        p.toggle_picker(Side::Source);
        p.toggle_picker(Side::Target);
        assert_eq!(p.picker().side(), Some(Side::Target));
        assert_eq!(listeners.len(), 1);

        p.toggle_picker(Side::Target);
        assert!(p.picker().side().is_none());
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn unmount_releases_listener() {
        let (mut p, listeners) = panel();
        p.toggle_picker(Side::Source);
        assert_eq!(listeners.len(), 1);
        drop(p);
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn close_invokes_callback() {
        let closed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&closed);
        let mut p = Panel::new(PanelId(2), PointerListeners::new(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        p.close();
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn whitespace_submit_clears_without_request() {
        let engine = Canned::new(r#"{"responseData":{"translatedText":"bonjour"}}"#);
        let (mut p, _l) = panel();
        p.edit_input("hello");
        run(&mut p, &engine).await;
        assert_eq!(p.session().translated, "bonjour");

        p.edit_input("   \n ");
        run(&mut p, &engine).await;
        assert_eq!(p.session().translated, "");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn mocked_response_sets_translation() {
        let engine = Canned::new(r#"{"responseData":{"translatedText":"bonjour"}}"#);
        let (mut p, _l) = panel();
        p.toggle_picker(Side::Target);
        p.select_language("fr");
        p.edit_input("hello");
        run(&mut p, &engine).await;
        assert_eq!(p.session().translated, "bonjour");
        assert!(p.session().error.is_none());
        assert!(!p.is_pending());
    }

    #[tokio::test]
    async fn failed_response_is_shown_inline() {
        let engine = Canned::new("not json");
        let (mut p, _l) = panel();
        p.edit_input("hello");
        run(&mut p, &engine).await;
        assert_eq!(p.session().translated, "");
        let err = p.session().error.as_deref().unwrap();
        assert!(err.starts_with("Translation failed"));
    }

    #[test]
    fn request_carries_session_languages() {
        let (mut p, _l) = panel();
        p.toggle_picker(Side::Target);
        p.select_language("fr");
        p.edit_input("hello");
        match p.submit() {
            Submission::Request(req) => {
                assert_eq!(req.url("https://api"), "https://api?q=hello!&langpair=en|fr");
            }
            Submission::Cleared => panic!("expected a request"),
        }
    }

    #[test]
    fn latest_submit_wins() {
        let (mut p, _l) = panel();
        p.edit_input("one");
        let Submission::Request(first) = p.submit() else { panic!("expected a request") };
        p.edit_input("two");
        let Submission::Request(second) = p.submit() else { panic!("expected a request") };

        assert!(!p.complete(first.ticket, Ok("un".into())));
        assert!(p.is_pending());
        assert!(p.complete(second.ticket, Ok("deux".into())));
        assert_eq!(p.session().translated, "deux");
    }

    #[test]
    fn clearing_supersedes_in_flight_request() {
        let (mut p, _l) = panel();
        p.edit_input("one");
        let Submission::Request(req) = p.submit() else { panic!("expected a request") };
        p.edit_input("");
        assert!(matches!(p.submit(), Submission::Cleared));
        assert!(!p.complete(req.ticket, Ok("un".into())));
        assert_eq!(p.session().translated, "");
    }
}
