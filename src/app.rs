//! Per-chat screens: start screen or a mounted translator panel.
//!
//! The panel's close callback only raises a flag; the screen decides to
//! unmount, which also releases any outside-click listener.

use crate::overlay::{PanelId, PointerListeners};
use crate::panel::{Hit, Panel, Submission};
use crate::translate::{Ticket, TranslateError, TranslationRequest};
use crate::view::{render_panel, render_start, Action, View};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use teloxide::types::{ChatId, MessageId};

pub struct ChatScreen {
    chat: ChatId,
    panel: Option<Panel>,
    /// Message currently showing this chat's screen
    pub message: Option<MessageId>,
    dismissed: Arc<AtomicBool>,
    listeners: Arc<PointerListeners>,
}

impl ChatScreen {
    fn new(chat: ChatId, listeners: Arc<PointerListeners>) -> Self {
        Self {
            chat,
            panel: None,
            message: None,
            dismissed: Arc::new(AtomicBool::new(false)),
            listeners,
        }
    }

    #[cfg(test)]
    pub fn panel(&self) -> Option<&Panel> {
        self.panel.as_ref()
    }

    pub fn open_panel(&mut self) {
        if self.panel.is_some() {
            return;
        }
        let dismissed = Arc::clone(&self.dismissed);
        self.panel = Some(Panel::new(
            PanelId(self.chat.0),
            Arc::clone(&self.listeners),
            move || dismissed.store(true, Ordering::SeqCst),
        ));
    }

    pub fn unmount(&mut self) {
        if self.panel.take().is_some() {
            log::debug!("Chat {:?}: {} outside-click listeners active", self.chat, self.listeners.len());
        }
        self.dismissed.store(false, Ordering::SeqCst);
    }

    pub fn view(&self) -> View {
        self.panel.as_ref().map_or_else(render_start, render_panel)
    }

    /// Delivers a pointer-down to the panel while its listener is attached
    fn pointer_down(&mut self, hit: Hit) {
        let Some(panel) = self.panel.as_mut() else { return };
        if self.listeners.is_listening(panel.id()) {
            panel.pointer_down(hit);
        }
    }

    /// Routes a button press. Returns a request when one has to be sent.
    pub fn handle(&mut self, action: Action) -> Option<TranslationRequest> {
        if action == Action::Open {
            self.open_panel();
            return None;
        }

        // Display buttons toggle the picker themselves.
        if !matches!(action, Action::Display(_)) {
            let hit = if action.in_overlay() { Hit::Overlay } else { Hit::Outside };
            self.pointer_down(hit);
        }

        let panel = self.panel.as_mut()?;
        let request = match action {
            Action::Open => None,
            Action::Display(side) => {
                panel.toggle_picker(side);
                None
            }
            Action::Pick(code) => {
                panel.select_language(code);
                None
            }
            Action::Swap => {
                panel.swap_languages();
                None
            }
            Action::Translate => submit(panel),
            Action::Close => {
                panel.close();
                None
            }
        };

        self.settle();
        request
    }

    /// A typed message: edit the input, then submit as if Enter was pressed
    pub fn handle_text(&mut self, text: &str) -> Option<TranslationRequest> {
        self.pointer_down(Hit::Outside);
        let panel = self.panel.as_mut()?;
        panel.edit_input(text);
        submit(panel)
    }

    /// Applies a finished request. False when the panel is gone or moved on.
    pub fn complete(&mut self, ticket: Ticket, result: Result<String, TranslateError>) -> bool {
        match self.panel.as_mut() {
            Some(panel) => panel.complete(ticket, result),
            None => {
                log::warn!("Chat {:?}: result for {:?} arrived after unmount", self.chat, ticket);
                false
            }
        }
    }

    fn settle(&mut self) {
        if self.dismissed.load(Ordering::SeqCst) {
            self.unmount();
        }
    }
}

fn submit(panel: &mut Panel) -> Option<TranslationRequest> {
    match panel.submit() {
        Submission::Cleared => None,
        Submission::Request(req) => {
            log::info!(
                "Panel {:?}: translating {} chars {}|{}",
                panel.id(),
                req.text.chars().count(),
                req.source,
                req.target
            );
            Some(req)
        }
    }
}

/// All chats. The lock is never held across an await.
pub struct Screens {
    chats: Mutex<HashMap<ChatId, ChatScreen>>,
    listeners: Arc<PointerListeners>,
}

impl Screens {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            chats: Mutex::new(HashMap::new()),
            listeners: PointerListeners::new(),
        })
    }

    pub fn with_chat<R>(&self, chat: ChatId, f: impl FnOnce(&mut ChatScreen) -> R) -> R {
        let mut chats = self.chats.lock().unwrap_or_else(|e| e.into_inner());
        let screen = chats
            .entry(chat)
            .or_insert_with(|| ChatScreen::new(chat, Arc::clone(&self.listeners)));
        f(screen)
    }

    #[cfg(test)]
    pub fn listeners(&self) -> &PointerListeners {
        &self.listeners
    }
}
