use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use keynav::config::Config;
use keynav::keyboard::KeyPress;
use keynav::prefs::{FloatingText, PreferenceChange, UiPreferences};
use keynav::site::{Site, SiteEvent, demo};
use keynav::store::JsonStore;
use keynav::{Handled, KeyboardContext};

use crate::ui::theme::Theme;

/// How long a floating word stays on screen.
const FLOAT_TTL: Duration = Duration::from_millis(800);

pub struct App {
    pub site: Site,
    pub context: KeyboardContext,
    pub theme: &'static Theme,
    pub config: Config,
    pub prefs: UiPreferences,
    pub store: Option<JsonStore>,
    pub should_quit: bool,
    pub last_handled: Option<Handled>,
    floating: FloatingText,
    float_text: Option<(String, Instant)>,
    history_seen: usize,
}

impl App {
    pub fn new(config: Config, path: &str, admin: bool) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let store = JsonStore::new()
            .inspect_err(|err| tracing::warn!(error = %err, "preferences store unavailable"))
            .ok();
        let prefs = store
            .as_ref()
            .map(JsonStore::load_preferences)
            .unwrap_or_default();

        let mut site = demo::site(path, admin);
        let context = KeyboardContext::attach(config.context_options(), &mut site);

        Self {
            site,
            context,
            theme,
            config,
            prefs,
            store,
            should_quit: false,
            last_handled: None,
            floating: FloatingText::default(),
            float_text: None,
            history_seen: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let press = KeyPress::from(key);
        let doc = self.site.document();
        let now = Instant::now();
        let handled = self.context.handle_key(&press, &doc, &mut self.site, now);
        self.last_handled = Some(handled);

        if handled.consumed()
            && let Some(text) = self.floating.spawn(&self.prefs)
        {
            self.float_text = Some((text.to_string(), now));
        }
        self.watch_site();
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.context.tick(&mut self.site, now);
        if let Some((_, at)) = &self.float_text
            && now.duration_since(*at) > FLOAT_TTL
        {
            self.float_text = None;
        }
        self.watch_site();
    }

    pub fn floating_text(&self) -> Option<&str> {
        self.float_text.as_ref().map(|(text, _)| text.as_str())
    }

    /// Reacts to page events the keyboard core does not own. Saving the
    /// appearance section flips the floating-text preference.
    fn watch_site(&mut self) {
        let events: Vec<SiteEvent> = self
            .site
            .history()
            .get(self.history_seen..)
            .unwrap_or_default()
            .to_vec();
        self.history_seen = self.site.history().len();
        for event in events {
            if let SiteEvent::ToolbarPressed(_, role) = &event
                && role == "save-appearance"
            {
                let change = PreferenceChange {
                    floating_text_enabled: Some(!self.prefs.floating_text_enabled),
                    floating_texts: None,
                };
                if self.prefs.apply_change(change) {
                    self.persist_prefs();
                }
            }
        }
        if self.site.history().len() > 512 {
            self.site.clear_history();
            self.history_seen = 0;
        }
    }

    fn persist_prefs(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.save_preferences(&self.prefs) {
            tracing::warn!(error = %err, "failed to save preferences");
        }
    }
}
