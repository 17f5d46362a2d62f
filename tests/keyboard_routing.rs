use std::time::{Duration, Instant};

use keynav::host::Host;
use keynav::keyboard::{ActiveElement, Key, KeyPress};
use keynav::overlay::{FocusableCandidate, OverlayButton, OverlayButtons};
use keynav::site::{Site, SiteEvent, demo};
use keynav::{ContextOptions, Handled, KeyboardContext, PageKind};

/// A demo site and its keyboard context, driven one key at a time.
struct Harness {
    site: Site,
    context: KeyboardContext,
    now: Instant,
}

impl Harness {
    fn open(path: &str, admin: bool) -> Self {
        Self::with_options(path, admin, ContextOptions::default())
    }

    fn with_options(path: &str, admin: bool, options: ContextOptions) -> Self {
        let mut site = demo::site(path, admin);
        let context = KeyboardContext::attach(options, &mut site);
        Self {
            site,
            context,
            now: Instant::now(),
        }
    }

    fn press(&mut self, press: KeyPress) -> Handled {
        let doc = self.site.document();
        self.context
            .handle_key(&press, &doc, &mut self.site, self.now)
    }

    fn key(&mut self, key: Key) -> Handled {
        self.press(KeyPress::new(key))
    }

    fn ch(&mut self, ch: char) -> Handled {
        self.press(KeyPress::ch(ch))
    }

    fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
        self.context.tick(&mut self.site, self.now);
    }

    fn cursor(&self) -> usize {
        self.context.controller().map_or(0, |c| c.cursor())
    }

    fn level(&self) -> Option<String> {
        self.context
            .controller()
            .and_then(|c| c.session().level().map(str::to_string))
    }

    fn is_active(&self) -> bool {
        self.context.controller().is_some_and(|c| c.is_active())
    }

    fn messages(&self) -> Vec<String> {
        self.context
            .notifier()
            .messages()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn last_message(&self) -> Option<String> {
        self.context.notifier().latest().map(|n| n.message.clone())
    }
}

// --- Input gate ---

#[test]
fn text_field_swallows_keys_without_side_effects() {
    let mut h = Harness::open("/about", false);
    let field = h.site.add_control(ActiveElement::TextInput);
    h.site.focus(field);

    assert_eq!(h.ch('i'), Handled::Gated);
    assert_eq!(h.ch('1'), Handled::Gated);
    assert_eq!(h.key(Key::Down), Handled::Gated);
    assert!(!h.is_active());
    assert!(h.site.navigations().is_empty());
    assert!(h.messages().is_empty());

    // Escape always gets through a text field.
    assert_ne!(h.key(Key::Escape), Handled::Gated);
}

#[test]
fn blocking_viewer_gates_everything() {
    let mut h = Harness::open("/about", false);
    h.site.blocking_viewer = true;
    assert_eq!(h.ch('1'), Handled::Gated);
    assert_eq!(h.ch('i'), Handled::Gated);
    assert!(h.site.navigations().is_empty());
}

#[test]
fn open_playlist_claims_vertical_arrows() {
    let mut h = Harness::open("/about", false);
    h.ch('i');
    h.ch('p');
    assert!(h.site.player.as_ref().is_some_and(|p| p.playlist_open));

    assert_eq!(h.key(Key::Down), Handled::Gated);
    assert_eq!(h.cursor(), 0);
}

// --- Focus mode ---

#[test]
fn enter_twice_is_a_no_op() {
    let mut h = Harness::open("/about", false);
    assert_eq!(h.ch('i'), Handled::FocusMode);
    h.key(Key::Down);
    let toasts = h.messages().len();
    let history = h.site.history().len();

    assert_eq!(h.ch('i'), Handled::FocusMode);
    assert_eq!(h.cursor(), 1);
    assert_eq!(h.messages().len(), toasts);
    assert_eq!(h.site.history().len(), history);
}

#[test]
fn enter_marks_root_and_selects_first_item() {
    let mut h = Harness::open("/about", false);
    h.ch('i');
    assert!(h.site.has_marker("about-focus-mode"));
    let first = h.context.controller().unwrap().items()[0].element;
    assert_eq!(h.site.selected("about-focus-selected"), Some(first));
    assert_eq!(
        h.last_message().as_deref(),
        Some("Entered focus mode (press q to exit)")
    );
}

#[test]
fn down_clamps_on_three_item_list() {
    let mut h = Harness::open("/passage", false);
    h.ch('i');
    assert_eq!(h.context.controller().unwrap().items().len(), 3);

    let mut cursors = Vec::new();
    for _ in 0..3 {
        assert_eq!(h.key(Key::Down), Handled::FocusMode);
        cursors.push(h.cursor());
    }
    assert_eq!(cursors, vec![1, 2, 2]);
}

#[test]
fn up_clamps_at_first_card() {
    let mut h = Harness::open("/about", false);
    h.ch('i');
    for _ in 0..6 {
        h.key(Key::Down);
    }
    assert_eq!(h.cursor(), 3);
    for _ in 0..6 {
        h.key(Key::Up);
    }
    assert_eq!(h.cursor(), 0);
}

#[test]
fn admin_rows_cross_tables_and_wrap() {
    let mut h = Harness::open("/admin", true);
    h.ch('i');
    assert_eq!(h.ch('7'), Handled::FocusMode);
    assert_eq!(h.site.active_tab(), Some("about"));

    let groups: Vec<Option<String>> = h
        .context
        .controller()
        .unwrap()
        .items()
        .iter()
        .map(|i| i.group.clone())
        .collect();
    assert_eq!(groups[1].as_deref(), Some("main"));
    assert_eq!(groups[2].as_deref(), Some("sub"));

    h.key(Key::Down);
    assert_eq!(h.cursor(), 1);
    h.key(Key::Down);
    assert_eq!(h.cursor(), 2, "last main row moves to the first sub row");
    h.key(Key::Down);
    h.key(Key::Down);
    assert_eq!(h.cursor(), 0, "last row wraps to the first");

    h.key(Key::Tab);
    assert_eq!(h.cursor(), 2);
}

#[test]
fn escape_pauses_and_enter_resumes_cursor() {
    let mut h = Harness::open("/about", false);
    h.ch('i');
    for _ in 0..3 {
        h.key(Key::Down);
    }
    assert_eq!(h.cursor(), 3);

    assert_eq!(h.key(Key::Escape), Handled::FocusMode);
    assert!(!h.is_active());
    assert!(!h.site.has_marker("about-focus-mode"));
    assert_eq!(h.site.selected("about-focus-selected"), None);
    assert_eq!(
        h.last_message().as_deref(),
        Some("Focus mode paused (press i to resume)")
    );

    h.ch('i');
    assert!(h.is_active());
    assert_eq!(h.cursor(), 3);
    let fourth = h.context.controller().unwrap().items()[3].element;
    assert_eq!(h.site.selected("about-focus-selected"), Some(fourth));
}

#[test]
fn exit_key_forgets_cursor() {
    let mut h = Harness::open("/about", false);
    h.ch('i');
    h.key(Key::Down);
    h.key(Key::Down);
    assert_eq!(h.ch('q'), Handled::FocusMode);
    assert_eq!(h.last_message().as_deref(), Some("Exited focus mode"));

    h.ch('i');
    assert_eq!(h.cursor(), 0);
}

#[test]
fn overlay_suspends_page_focus_mode() {
    let mut h = Harness::open("/about", false);
    h.ch('i');
    h.key(Key::Down);
    h.key(Key::Down);

    assert_eq!(h.ch('l'), Handled::Shortcut);
    assert!(h.site.is_open("loginModal"));
    assert!(!h.is_active());

    // The trap owns the keyboard; the enter key is typed into the username.
    assert_eq!(h.ch('i'), Handled::Gated);

    assert_eq!(h.key(Key::Escape), Handled::Overlay);
    assert!(!h.site.is_open("loginModal"));

    h.ch('i');
    assert!(h.is_active());
    assert_eq!(h.cursor(), 2);
}

#[test]
fn archive_cards_descend_and_escape_back() {
    let mut h = Harness::open("/collect", false);
    h.ch('i');
    assert_eq!(h.level().as_deref(), Some("main"));
    assert!(h.site.has_marker("collect-focus-mode-main"));

    assert_eq!(h.key(Key::Enter), Handled::FocusMode);
    assert_eq!(h.level().as_deref(), Some("sub"));
    assert_eq!(h.context.controller().unwrap().items().len(), 3);
    assert!(h.site.has_marker("collect-focus-mode-sub"));
    assert!(!h.site.has_marker("collect-focus-mode-main"));

    h.key(Key::Right);
    assert_eq!(h.cursor(), 1);

    assert_eq!(h.key(Key::Escape), Handled::FocusMode);
    assert_eq!(h.level().as_deref(), Some("main"));
    assert_eq!(h.cursor(), 0);
    assert!(h.is_active());
}

#[test]
fn archive_article_follows_link_to_new_page() {
    let mut h = Harness::open("/collect", false);
    h.ch('i');
    h.key(Key::Down);
    h.key(Key::Enter);

    assert_eq!(h.site.navigations(), vec!["/passage/ownership"]);
    assert_eq!(h.context.page(), Some(PageKind::Article));
    assert!(!h.is_active());
    assert!(!h.site.has_marker("collect-focus-mode"));
}

#[test]
fn article_tree_expands_and_panels_switch() {
    let mut h = Harness::open("/passage", false);
    h.ch('i');
    assert_eq!(h.ch('u'), Handled::FocusMode);
    assert_eq!(h.context.controller().unwrap().items().len(), 5);

    h.key(Key::Enter);
    assert_eq!(h.context.controller().unwrap().items().len(), 3);

    h.key(Key::Right);
    assert_eq!(h.level().as_deref(), Some("right"));
    assert!(h.site.has_marker("focus-mode-right"));
    assert!(!h.site.has_marker("focus-mode-left"));

    h.key(Key::Down);
    h.key(Key::Down);
    assert_eq!(h.site.scroll_offset(), 400);
    h.key(Key::Up);
    assert_eq!(h.site.scroll_offset(), 200);
}

#[test]
fn article_same_panel_arrow_stays_in_focus_mode() {
    let mut h = Harness::open("/passage", false);
    h.ch('i');
    let track = |h: &Harness| h.site.player.as_ref().and_then(|p| p.current_track()).map(str::to_owned);
    let before = track(&h);
    let toasts = h.messages().len();

    assert_eq!(h.key(Key::Left), Handled::FocusMode);
    assert_eq!(h.level().as_deref(), Some("left"));

    assert_eq!(h.key(Key::Right), Handled::FocusMode);
    assert_eq!(h.key(Key::Right), Handled::FocusMode);
    assert_eq!(h.level().as_deref(), Some("right"));

    assert_eq!(track(&h), before);
    assert_eq!(h.messages().len(), toasts);
}

#[test]
fn empty_list_swallows_motion() {
    let mut site = Site::new("/about");
    let mut context = KeyboardContext::attach(ContextOptions::default(), &mut site);
    let now = Instant::now();
    let doc = site.document();
    context.handle_key(&KeyPress::ch('i'), &doc, &mut site, now);

    let doc = site.document();
    assert_eq!(
        context.handle_key(&KeyPress::new(Key::Down), &doc, &mut site, now),
        Handled::FocusMode
    );
    assert_eq!(context.controller().unwrap().cursor(), 0);
    assert_eq!(site.selected("about-focus-selected"), None);
}

#[test]
fn configured_mode_keys_drive_the_controller() {
    let options = ContextOptions {
        enter_key: Key::Char('v'),
        exit_key: Key::Char('x'),
        ..ContextOptions::default()
    };
    let mut h = Harness::with_options("/about", false, options);
    assert_eq!(h.ch('i'), Handled::Ignored);
    assert_eq!(h.ch('v'), Handled::FocusMode);
    assert_eq!(
        h.last_message().as_deref(),
        Some("Entered focus mode (press x to exit)")
    );
    h.key(Key::Escape);
    assert_eq!(
        h.last_message().as_deref(),
        Some("Focus mode paused (press v to resume)")
    );
}

// --- Overlay trap ---

#[test]
fn login_trap_wraps_both_ways() {
    let mut h = Harness::open("/about", false);
    h.ch('l');
    let sequence = h.context.observer().trap().unwrap().sequence().to_vec();
    assert_eq!(sequence.len(), 5);
    assert_eq!(h.site.focused(), Some(sequence[0]));

    for _ in 0..4 {
        assert_eq!(h.key(Key::Tab), Handled::Overlay);
    }
    assert_eq!(h.site.focused(), Some(sequence[4]));
    h.key(Key::Tab);
    assert_eq!(h.site.focused(), Some(sequence[0]));

    h.press(KeyPress::new(Key::Tab).with_shift());
    assert_eq!(h.site.focused(), Some(sequence[4]));
}

#[test]
fn single_and_empty_traps() {
    let mut site = Site::new("/");
    let only = site.add_control(ActiveElement::Button);
    site.add_overlay(
        "single",
        "One button",
        vec![FocusableCandidate::visible(only)],
        OverlayButtons {
            cancel: Some(OverlayButton::new(only)),
            ..OverlayButtons::default()
        },
    );
    site.add_overlay("empty", "Nothing", Vec::new(), OverlayButtons::default());
    let mut context = KeyboardContext::attach(ContextOptions::default(), &mut site);
    let now = Instant::now();

    site.open("single");
    context.tick(&mut site, now);
    for _ in 0..3 {
        let doc = site.document();
        let handled = context.handle_key(&KeyPress::new(Key::Tab), &doc, &mut site, now);
        assert_eq!(handled, Handled::Overlay);
        assert_eq!(site.focused(), Some(only));
    }
    site.close("single");

    site.open("empty");
    context.tick(&mut site, now);
    assert_eq!(context.observer().active(), Some("empty"));
    let doc = site.document();
    let handled = context.handle_key(&KeyPress::new(Key::Tab), &doc, &mut site, now);
    assert_eq!(handled, Handled::Overlay);
    assert_eq!(site.focused(), None);
}

#[test]
fn overlay_keys_submit_and_cancel() {
    let mut h = Harness::open("/", false);
    h.ch('l');
    assert_eq!(h.key(Key::Enter), Handled::Overlay);
    assert!(!h.site.is_open("loginModal"));

    h.ch('l');
    // 'c' types into the focused username rather than cancelling.
    assert_eq!(h.ch('c'), Handled::Gated);
    h.site.blur();
    assert_eq!(h.ch('c'), Handled::Overlay);
    assert!(!h.site.is_open("loginModal"));
}

// --- Site-wide shortcuts ---

#[test]
fn digit_one_navigates_home_once() {
    let mut h = Harness::open("/about", false);
    assert_eq!(h.ch('1'), Handled::Shortcut);
    assert_eq!(h.site.navigations(), vec!["/"]);
    assert_eq!(h.context.page(), None);
}

#[test]
fn admin_shortcut_denied_for_visitors() {
    let mut h = Harness::open("/about", false);
    assert_eq!(h.ch('a'), Handled::Shortcut);
    assert!(h.site.navigations().is_empty());
    assert_eq!(
        h.last_message().as_deref(),
        Some("This shortcut is only available to administrators")
    );
}

#[test]
fn admin_shortcut_opens_dashboard() {
    let mut h = Harness::open("/about", true);
    h.ch('a');
    assert_eq!(h.site.navigations(), vec!["/admin"]);
    assert_eq!(h.context.page(), Some(PageKind::Admin));
}

#[test]
fn legacy_codes_resolve_digits() {
    let mut h = Harness::open("/", false);
    assert_eq!(h.press(KeyPress::code_only(52)), Handled::Shortcut);
    assert_eq!(h.site.navigations(), vec!["/about"]);

    let options = ContextOptions {
        legacy_key_codes: false,
        ..ContextOptions::default()
    };
    let mut h = Harness::with_options("/", false, options);
    assert_eq!(h.press(KeyPress::code_only(52)), Handled::Ignored);
    assert!(h.site.navigations().is_empty());
}

#[test]
fn music_shortcuts_report_state() {
    let mut h = Harness::open("/", false);
    h.key(Key::Char(' '));
    assert_eq!(h.last_message().as_deref(), Some("Playing"));
    h.key(Key::Up);
    assert_eq!(h.last_message().as_deref(), Some("Volume: 60%"));
    h.ch('m');
    assert_eq!(h.last_message().as_deref(), Some("Muted"));
    h.key(Key::Right);
    assert_eq!(
        h.site.player.as_ref().and_then(|p| p.current_track()),
        Some(demo::TRACKS[1])
    );
}

#[test]
fn toasts_expire_on_the_routing_clock() {
    let mut h = Harness::open("/about", false);
    h.advance(10_000);
    h.ch('i');
    assert_eq!(
        h.last_message().as_deref(),
        Some("Entered focus mode (press q to exit)")
    );

    h.advance(1_500);
    assert_eq!(h.messages().len(), 1);
    h.advance(1_000);
    assert!(h.messages().is_empty());
}

#[test]
fn music_failures_become_error_toasts() {
    let mut h = Harness::open("/", false);
    if let Some(player) = h.site.player.as_mut() {
        player.failure = Some("audio device lost".to_string());
    }
    assert_eq!(h.ch('m'), Handled::Shortcut);
    assert_eq!(
        h.last_message().as_deref(),
        Some("Action failed: audio device lost")
    );

    if let Some(player) = h.site.player.as_mut() {
        player.enabled = false;
    }
    h.ch('m');
    assert_eq!(
        h.last_message().as_deref(),
        Some("Music player is not enabled")
    );
}

#[test]
fn help_sheet_opens_as_overlay() {
    let mut h = Harness::open("/about", false);
    assert_eq!(h.ch('/'), Handled::Shortcut);
    assert!(h.site.is_open("help"));
    let sheet = h.site.help().unwrap();
    assert!(sheet.section("About page focus mode").is_some());

    assert_eq!(h.key(Key::Escape), Handled::Overlay);
    assert!(!h.site.is_open("help"));
}

#[test]
fn navigation_failure_is_a_toast() {
    let mut h = Harness::open("/about", false);
    h.site.navigation_failure = Some("offline".to_string());
    assert_eq!(h.ch('1'), Handled::Shortcut);
    assert_eq!(h.last_message().as_deref(), Some("Action failed: offline"));
    assert_eq!(h.context.page(), Some(PageKind::About));
}

// --- Admin dashboard ---

#[test]
fn admin_focus_mode_silences_site_shortcuts() {
    let mut h = Harness::open("/admin", true);
    h.ch('i');
    assert!(!h.context.dispatcher().is_enabled());

    assert_eq!(h.ch('m'), Handled::Ignored);
    assert!(h.site.player.as_ref().is_some_and(|p| !p.muted));

    h.ch('q');
    assert!(h.context.dispatcher().is_enabled());
    assert_eq!(h.ch('m'), Handled::Shortcut);
    assert!(h.site.player.as_ref().is_some_and(|p| p.muted));
}

#[test]
fn admin_dialog_nests_inside_focus_mode() {
    let mut h = Harness::open("/admin", true);
    h.ch('i');
    h.key(Key::Down);

    assert_eq!(h.ch('e'), Handled::FocusMode);
    assert!(h.site.is_open("editModal"));
    assert!(h.is_active());
    assert_eq!(h.level().as_deref(), Some("modal"));

    assert_eq!(h.key(Key::Escape), Handled::Overlay);
    assert!(!h.site.is_open("editModal"));
    assert_eq!(h.level().as_deref(), Some("rows"));
    assert_eq!(h.cursor(), 1);
}

#[test]
fn admin_dialog_replaced_by_another_keeps_one_modal_level() {
    let mut h = Harness::open("/admin", true);
    h.ch('i');
    h.key(Key::Down);
    h.ch('e');
    assert_eq!(h.level().as_deref(), Some("modal"));

    h.site.open("confirmModal");
    h.advance(0);
    assert_eq!(h.level().as_deref(), Some("modal"));
    assert_eq!(h.context.observer().active(), Some("confirmModal"));

    assert_eq!(h.key(Key::Escape), Handled::Overlay);
    assert_eq!(h.level().as_deref(), Some("rows"));
    assert_eq!(h.cursor(), 1);

    h.site.close("editModal");
    h.advance(0);
    assert_eq!(h.level().as_deref(), Some("rows"));
    assert!(h.context.controller().unwrap().session().active_overlay().is_none());
}

#[test]
fn admin_delete_dialog_confirms_with_y() {
    let mut h = Harness::open("/admin", true);
    h.ch('i');
    h.ch('d');
    assert!(h.site.is_open("confirmModal"));
    assert_eq!(h.ch('y'), Handled::Overlay);
    assert!(!h.site.is_open("confirmModal"));
    assert_eq!(h.level().as_deref(), Some("rows"));
}

#[test]
fn admin_toolbar_and_marks() {
    let mut h = Harness::open("/admin", true);
    h.ch('i');
    h.ch('r');
    h.key(Key::Char(' '));
    assert_eq!(h.site.marked_rows().len(), 1);

    h.ch('2');
    assert_eq!(h.site.active_tab(), Some("users"));
    assert!(h.site.marked_rows().is_empty(), "switching tabs clears marks");
    assert!(
        h.site
            .history()
            .contains(&SiteEvent::ToolbarPressed("articles".into(), "refresh".into()))
    );
}

#[test]
fn filemanager_rows_use_file_capabilities() {
    let mut h = Harness::open("/admin", true);
    h.ch('i');
    h.ch('8');
    assert_eq!(h.site.active_tab(), Some("filemanager"));

    // With a row selected, 'r' renames it instead of reloading.
    h.ch('r');
    let files = h.site.files.clone().unwrap();
    assert_eq!((files.rename_requests, files.reloads), (1, 0));

    h.key(Key::Enter);
    assert_eq!(h.site.files.as_ref().unwrap().path(), "/docs");
    h.key(Key::Backspace);
    assert_eq!(h.site.files.as_ref().unwrap().path(), "/");

    h.key(Key::Delete);
    assert_eq!(h.site.files.as_ref().unwrap().delete_requests, 1);
}

#[test]
fn settings_save_waits_for_input_to_settle() {
    let mut h = Harness::open("/admin", true);
    h.ch('i');
    h.key(Key::Left);
    assert_eq!(h.site.active_tab(), Some("settings"));

    assert_eq!(h.ch('3'), Handled::FocusMode);
    assert_eq!(h.site.visible_section_index(), Some(2));
    assert_eq!(h.site.document().active, ActiveElement::TextInput);
    assert_eq!(h.last_message().as_deref(), Some("Jumped to Template"));

    // The field has focus; 's' still reaches focus mode.
    assert_eq!(h.ch('s'), Handled::FocusMode);
    assert_eq!(h.site.focused(), None);
    assert_eq!(h.context.pending_tasks(), 1);
    let saved = SiteEvent::ToolbarPressed("settings".into(), "save-template".into());
    assert!(!h.site.history().contains(&saved));

    h.advance(50);
    assert!(!h.site.history().contains(&saved));
    h.advance(100);
    assert!(h.site.history().contains(&saved));
    assert_eq!(h.context.pending_tasks(), 0);
}

#[test]
fn settings_digit_while_typing_is_deferred() {
    let mut h = Harness::open("/admin", true);
    h.ch('i');
    h.key(Key::Left);
    h.ch('2');
    assert_eq!(h.site.visible_section_index(), Some(1));

    assert_eq!(h.ch('1'), Handled::FocusMode);
    assert_eq!(h.site.visible_section_index(), Some(1));
    h.advance(150);
    assert_eq!(h.site.visible_section_index(), Some(0));
    assert_eq!(h.last_message().as_deref(), Some("Jumped to Appearance"));
}

#[test]
fn settings_tab_cycles_form_controls() {
    let mut h = Harness::open("/admin", true);
    h.ch('i');
    h.key(Key::Left);
    let before = h.site.focused();
    assert_eq!(h.key(Key::Tab), Handled::FocusMode);
    assert_ne!(h.site.focused(), before);
    assert!(h.site.focused().is_some());
}

#[test]
fn visitors_have_no_admin_focus_mode() {
    let mut h = Harness::open("/admin", false);
    assert_eq!(h.context.page(), None);
    assert_eq!(h.ch('i'), Handled::Ignored);
}
