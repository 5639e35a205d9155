/// Keys the page distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other,
}

/// What a window click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the modal dialog
    ModalBackdrop,
    /// Anywhere inside the modal dialog
    ModalContent,
    Other,
}

/// User interaction with the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    SubmitClicked,
    KeyPress { key: Key, shift: bool },
    /// Input text changed; carries the new value
    Input(String),
    ModalCloseClicked,
    WindowClicked(ClickTarget),
}

impl PageEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PageEvent::SubmitClicked => EventKind::SubmitClicked,
            PageEvent::KeyPress { .. } => EventKind::KeyPress,
            PageEvent::Input(_) => EventKind::Input,
            PageEvent::ModalCloseClicked => EventKind::ModalCloseClicked,
            PageEvent::WindowClicked(_) => EventKind::WindowClicked,
        }
    }
}

/// Event type a listener subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SubmitClicked,
    KeyPress,
    Input,
    ModalCloseClicked,
    WindowClicked,
}

/// Behaviour attached to a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Submit unconditionally
    Submit,
    /// Submit on Enter without Shift
    SubmitOnEnter,
    /// Remove the welcome banner, then unsubscribe
    DismissBanner,
    /// Hide the startup modal
    CloseModal,
    /// Hide the startup modal when the click hit its backdrop
    CloseModalOnBackdrop,
}

impl Handler {
    fn handle(&self, handle: ListenerHandle, event: &PageEvent) -> Option<Action> {
        match (self, event) {
            (Handler::Submit, _) => Some(Action::Submit),
            (Handler::SubmitOnEnter, PageEvent::KeyPress { key: Key::Enter, shift: false }) => Some(Action::Submit),
            (Handler::SubmitOnEnter, _) => None,
            (Handler::DismissBanner, _) => Some(Action::DismissBanner { listener: handle }),
            (Handler::CloseModal, _) => Some(Action::HideModal),
            (Handler::CloseModalOnBackdrop, PageEvent::WindowClicked(ClickTarget::ModalBackdrop)) => {
                Some(Action::HideModal)
            }
            (Handler::CloseModalOnBackdrop, _) => None,
        }
    }
}

/// Effect requested by a listener, applied by the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Submit,
    /// Remove the banner and deregister `listener`
    DismissBanner { listener: ListenerHandle },
    HideModal,
}

/// Identifies a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

/// Listener registry
#[derive(Debug, Default)]
pub struct Listeners {
    entries: Vec<(ListenerHandle, EventKind, Handler)>,
    next_handle: u64,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: EventKind, handler: Handler) -> ListenerHandle {
        self.next_handle += 1;
        let handle = ListenerHandle(self.next_handle);
        self.entries.push((handle, kind, handler));
        handle
    }

    /// Remove a listener; false if it was not registered
    pub fn deregister(&mut self, handle: ListenerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _, _)| *h != handle);
        self.entries.len() != before
    }

    pub fn is_registered(&self, handle: ListenerHandle) -> bool {
        self.entries.iter().any(|(h, _, _)| *h == handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Actions of every listener for the event's kind, in registration order
    pub fn dispatch(&self, event: &PageEvent) -> Vec<Action> {
        let kind = event.kind();
        self.entries
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .filter_map(|(handle, _, handler)| handler.handle(*handle, event))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enter(shift: bool) -> PageEvent {
        PageEvent::KeyPress { key: Key::Enter, shift }
    }

    #[test]
    fn test_enter_without_shift_submits() {
        let mut listeners = Listeners::new();
        listeners.register(EventKind::KeyPress, Handler::SubmitOnEnter);

        assert_eq!(listeners.dispatch(&enter(false)), vec![Action::Submit]);
        assert!(listeners.dispatch(&enter(true)).is_empty());
        assert!(listeners.dispatch(&PageEvent::KeyPress { key: Key::Char('a'), shift: false }).is_empty());
    }

    #[test]
    fn test_dispatch_filters_by_kind() {
        let mut listeners = Listeners::new();
        listeners.register(EventKind::SubmitClicked, Handler::Submit);

        assert_eq!(listeners.dispatch(&PageEvent::SubmitClicked), vec![Action::Submit]);
        assert!(listeners.dispatch(&PageEvent::Input("x".to_string())).is_empty());
    }

    #[test]
    fn test_dismiss_banner_carries_its_handle() {
        let mut listeners = Listeners::new();
        let handle = listeners.register(EventKind::Input, Handler::DismissBanner);

        let actions = listeners.dispatch(&PageEvent::Input("h".to_string()));
        assert_eq!(actions, vec![Action::DismissBanner { listener: handle }]);

        assert!(listeners.deregister(handle));
        assert!(!listeners.is_registered(handle));
        assert!(listeners.dispatch(&PageEvent::Input("hi".to_string())).is_empty());
    }

    #[test]
    fn test_deregister_unknown_handle() {
        let mut listeners = Listeners::new();
        let handle = listeners.register(EventKind::Input, Handler::DismissBanner);
        assert!(listeners.deregister(handle));
        assert!(!listeners.deregister(handle));
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_backdrop_click_closes_modal() {
        let mut listeners = Listeners::new();
        listeners.register(EventKind::ModalCloseClicked, Handler::CloseModal);
        listeners.register(EventKind::WindowClicked, Handler::CloseModalOnBackdrop);

        assert_eq!(listeners.dispatch(&PageEvent::ModalCloseClicked), vec![Action::HideModal]);
        assert_eq!(listeners.dispatch(&PageEvent::WindowClicked(ClickTarget::ModalBackdrop)), vec![Action::HideModal]);
        assert!(listeners.dispatch(&PageEvent::WindowClicked(ClickTarget::ModalContent)).is_empty());
        assert!(listeners.dispatch(&PageEvent::WindowClicked(ClickTarget::Other)).is_empty());
    }

    #[test]
    fn test_actions_follow_registration_order() {
        let mut listeners = Listeners::new();
        let banner = listeners.register(EventKind::Input, Handler::DismissBanner);
        listeners.register(EventKind::Input, Handler::Submit);

        let actions = listeners.dispatch(&PageEvent::Input("x".to_string()));
        assert_eq!(actions, vec![Action::DismissBanner { listener: banner }, Action::Submit]);
        assert_eq!(listeners.len(), 2);
    }
}
