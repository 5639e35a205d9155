use std::sync::Arc;

use chatpane_core::{Config, LoggingConfig, Result};
use chatpane_providers::ChatBackend;

use crate::controller::{Controller, SubmitOutcome};
use crate::event_handler::{Action, EventKind, Handler, Key, Listeners, PageEvent};
use crate::renderer::Renderer;
use crate::syntax::SyntaxHighlighter;
use crate::view::{ChatView, Page};
use crate::welcome::{StartupModal, WelcomeBanner};

/// A wired-up chat page: page state, controller and listeners
pub struct App {
    page: Page,
    controller: Controller,
    listeners: Listeners,
    highlighter: Arc<SyntaxHighlighter>,
}

impl App {
    /// Build the page from configuration and register every listener once
    pub fn new(config: &Config, backend: Arc<dyn ChatBackend>) -> Result<Self> {
        let highlighter = Arc::new(SyntaxHighlighter::with_theme(&config.display.theme)?);
        let renderer = Renderer::new(Arc::clone(&highlighter), config.display.prose_markup);
        let privacy = LoggingConfig::from(config.logging.clone()).privacy;
        let controller = Controller::new(
            backend,
            renderer,
            config.messages.clone(),
            config.display.assistant_name.as_str(),
            privacy,
        );

        let mut page = Page::new(config.display.assistant_name.as_str());
        let mut listeners = Listeners::new();
        listeners.register(EventKind::SubmitClicked, Handler::Submit);
        listeners.register(EventKind::KeyPress, Handler::SubmitOnEnter);

        if let Some(text) = &config.welcome.banner {
            page.show_banner(WelcomeBanner::new(text.as_str()));
            listeners.register(EventKind::Input, Handler::DismissBanner);
        }

        if let Some(text) = &config.welcome.modal {
            page.show_modal(StartupModal::new(text.as_str()));
            listeners.register(EventKind::ModalCloseClicked, Handler::CloseModal);
            listeners.register(EventKind::WindowClicked, Handler::CloseModalOnBackdrop);
        }

        tracing::debug!(listeners = listeners.len(), theme = highlighter.theme_name(), "app initialized");
        Ok(Self { page, controller, listeners, highlighter })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn highlighter(&self) -> &SyntaxHighlighter {
        &self.highlighter
    }

    /// Dispatch an event and apply the resulting actions
    ///
    /// Returns the outcome of the submit the event triggered, if any.
    pub async fn handle_event(&mut self, event: PageEvent) -> Option<SubmitOutcome> {
        if let PageEvent::Input(text) = &event {
            self.page.set_input(text.as_str());
        }

        let mut submitted = None;
        for action in self.listeners.dispatch(&event) {
            match action {
                Action::Submit => submitted = Some(self.controller.submit(&mut self.page).await),
                Action::DismissBanner { listener } => {
                    self.page.remove_banner();
                    self.listeners.deregister(listener);
                    tracing::debug!("welcome banner dismissed");
                }
                Action::HideModal => {
                    self.page.hide_modal();
                }
            }
        }
        submitted
    }

    /// Type `text` into the input and press Enter
    pub async fn send_line(&mut self, text: &str) -> Option<SubmitOutcome> {
        self.handle_event(PageEvent::Input(text.to_string())).await;
        if !self.page.controls_enabled() {
            return None;
        }
        self.handle_event(PageEvent::KeyPress { key: Key::Enter, shift: false }).await
    }

    /// Standalone HTML document of the current page
    pub fn document(&self) -> String {
        self.page.to_document(&self.highlighter.stylesheet())
    }
}
