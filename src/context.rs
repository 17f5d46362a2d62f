//! The application context that owns every keyboard layer.
//!
//! One [`KeyboardContext`] is built at startup and handed the page on each
//! call. Keys pass through the layers in a fixed order: the input gate, the
//! open overlay, the page's focus-mode controller, then the site-wide
//! shortcuts. The first layer that consumes a key ends its journey.

use std::time::{Duration, Instant};

use crate::focus::{ControllerOptions, Deferred, FocusEnv, FocusModeController, PageKind};
use crate::host::Host;
use crate::keyboard::{DocumentState, InputGate, Key, KeyPress};
use crate::notify::Notifier;
use crate::overlay::{ModalObserver, OverlayChange};
use crate::shortcuts::{DispatchEnv, KeyRegistry, ShortcutDispatcher};
use crate::timers::TimerQueue;

#[derive(Clone, Debug, PartialEq)]
pub struct ContextOptions {
    pub controller: ControllerOptions,
    pub notification_ttl: Duration,
    /// Article pane scroll distance per arrow press.
    pub scroll_step: i32,
    pub legacy_key_codes: bool,
    pub enter_key: Key,
    pub exit_key: Key,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            controller: ControllerOptions::default(),
            notification_ttl: Duration::from_millis(2000),
            scroll_step: crate::focus::pages::ARTICLE_SCROLL_STEP,
            legacy_key_codes: true,
            enter_key: Key::Char('i'),
            exit_key: Key::Char('q'),
        }
    }
}

/// Which layer consumed a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handled {
    /// Rejected by the input gate; the key belongs to the focused field.
    Gated,
    Overlay,
    FocusMode,
    Shortcut,
    /// No layer wanted it.
    Ignored,
}

impl Handled {
    pub fn consumed(self) -> bool {
        matches!(self, Handled::Overlay | Handled::FocusMode | Handled::Shortcut)
    }
}

pub struct KeyboardContext {
    options: ContextOptions,
    observer: ModalObserver,
    page: Option<PageKind>,
    controller: Option<FocusModeController>,
    dispatcher: ShortcutDispatcher,
    notifier: Notifier,
    timers: TimerQueue<Deferred>,
}

impl KeyboardContext {
    pub fn new(options: ContextOptions) -> Self {
        let mut registry = KeyRegistry::site_defaults();
        registry.set_legacy_codes(options.legacy_key_codes);
        Self {
            notifier: Notifier::new(options.notification_ttl),
            options,
            observer: ModalObserver::new(),
            page: None,
            controller: None,
            dispatcher: ShortcutDispatcher::new(registry),
            timers: TimerQueue::default(),
        }
    }

    /// Context for the page `host` is currently showing.
    pub fn attach(options: ContextOptions, host: &mut dyn Host) -> Self {
        let mut context = Self::new(options);
        context.sync_page(host);
        context
    }

    pub fn page(&self) -> Option<PageKind> {
        self.page
    }

    pub fn controller(&self) -> Option<&FocusModeController> {
        self.controller.as_ref()
    }

    pub fn observer(&self) -> &ModalObserver {
        &self.observer
    }

    pub fn dispatcher(&self) -> &ShortcutDispatcher {
        &self.dispatcher
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    /// Keys the gate lets through a focused text field right now.
    fn gate(&self) -> InputGate {
        let mut exempt = match &self.controller {
            Some(controller) => controller.input_exempt(),
            None => Vec::new(),
        };
        if self.observer.is_open() {
            exempt.extend([Key::Enter, Key::Tab]);
        }
        InputGate::with_exempt(exempt)
    }

    /// Routes one key press and reports which layer took it.
    pub fn handle_key(
        &mut self,
        press: &KeyPress,
        doc: &DocumentState,
        host: &mut dyn Host,
        now: Instant,
    ) -> Handled {
        self.notifier.set_clock(now);
        self.pump_overlays(host, now);

        if !self.gate().should_process(press, doc) {
            tracing::trace!(key = %press.key, "gated");
            return Handled::Gated;
        }

        let handled = self.route(press, doc, host, now);
        self.pump_overlays(host, now);
        self.sync_page(host);
        self.sync_dispatcher();
        if handled.consumed() {
            tracing::debug!(key = %press.key, layer = ?handled, "key handled");
        }
        handled
    }

    fn route(
        &mut self,
        press: &KeyPress,
        doc: &DocumentState,
        host: &mut dyn Host,
        now: Instant,
    ) -> Handled {
        if self.observer.handle(press, doc, host) {
            return Handled::Overlay;
        }

        if let Some(controller) = &mut self.controller {
            let mut env = FocusEnv {
                host: &mut *host,
                notifier: &mut self.notifier,
                timers: &mut self.timers,
                now,
            };
            if controller.handle(press, doc, &mut env) {
                return Handled::FocusMode;
            }
            if controller.silences_global() {
                return Handled::Ignored;
            }
        }

        let mut env = DispatchEnv {
            host: &mut *host,
            notifier: &mut self.notifier,
            page_help: self.controller.as_ref().map(|c| c.page_help()),
        };
        if self.dispatcher.dispatch(press, &mut env) {
            Handled::Shortcut
        } else {
            Handled::Ignored
        }
    }

    /// Runs due deferred tasks, expires toasts and picks up overlay changes
    /// made outside of key handling.
    pub fn tick(&mut self, host: &mut dyn Host, now: Instant) {
        self.notifier.set_clock(now);
        let due = self.timers.take_due(now);
        if let Some(controller) = &mut self.controller {
            for task in due {
                let mut env = FocusEnv {
                    host: &mut *host,
                    notifier: &mut self.notifier,
                    timers: &mut self.timers,
                    now,
                };
                controller.run_deferred(task, &mut env);
            }
        }
        self.notifier.prune(now);
        self.pump_overlays(host, now);
        self.sync_page(host);
        self.sync_dispatcher();
    }

    /// The page content changed under the controller, e.g. after a reload.
    pub fn refresh(&mut self, host: &mut dyn Host, now: Instant) {
        self.notifier.set_clock(now);
        if let Some(controller) = &mut self.controller {
            let mut env = FocusEnv {
                host,
                notifier: &mut self.notifier,
                timers: &mut self.timers,
                now,
            };
            controller.refresh(&mut env);
        }
    }

    /// The page switched admin tab by itself.
    pub fn tab_changed(&mut self, tab: &str, host: &mut dyn Host, now: Instant) {
        self.notifier.set_clock(now);
        if let Some(controller) = &mut self.controller {
            let mut env = FocusEnv {
                host,
                notifier: &mut self.notifier,
                timers: &mut self.timers,
                now,
            };
            controller.sync_tab(tab, &mut env);
        }
    }

    /// Feeds overlay lifecycle events to the observer, then to the
    /// controller. Repeats until the host reports nothing new.
    fn pump_overlays(&mut self, host: &mut dyn Host, now: Instant) {
        loop {
            let events = host.take_overlay_events();
            if events.is_empty() {
                return;
            }
            for event in events {
                let changes = self.observer.observe(event, host);
                let Some(controller) = &mut self.controller else {
                    continue;
                };
                for change in changes {
                    let mut env = FocusEnv {
                        host: &mut *host,
                        notifier: &mut self.notifier,
                        timers: &mut self.timers,
                        now,
                    };
                    match change {
                        OverlayChange::Opened(id) => controller.on_overlay_opened(&id, &mut env),
                        OverlayChange::Closed(id) => controller.on_overlay_closed(&id, &mut env),
                    }
                }
            }
        }
    }

    /// Swaps the controller when the host has moved to another page.
    fn sync_page(&mut self, host: &mut dyn Host) {
        let page = PageKind::for_path(&host.current_path())
            .filter(|p| *p != PageKind::Admin || host.is_admin());
        if page == self.page {
            return;
        }
        tracing::info!(from = ?self.page, to = ?page, "page changed");
        self.page = page;
        self.controller = page.map(|page| {
            let profile = page
                .profile(self.options.scroll_step)
                .with_mode_keys(self.options.enter_key.clone(), self.options.exit_key.clone());
            FocusModeController::new(profile, self.options.controller)
        });
        self.timers = TimerQueue::default();
    }

    /// The site-wide dispatcher stays silent while a controller that
    /// claims the whole keyboard is active.
    fn sync_dispatcher(&mut self) {
        let silenced = self
            .controller
            .as_ref()
            .is_some_and(FocusModeController::silences_global);
        if silenced && self.dispatcher.is_enabled() {
            self.dispatcher.disable();
        } else if !silenced && !self.dispatcher.is_enabled() {
            self.dispatcher.enable();
        }
    }
}
