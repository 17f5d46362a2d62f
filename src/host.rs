//! The surface the keyboard core drives but does not implement.
//!
//! A [`Host`] stands for the page: it knows the current location, owns the
//! element tree, renders overlays and toasts, and hands out the optional
//! music and file-manager collaborators. Everything here is synchronous and
//! runs on the UI loop.

use crate::error::CapabilityError;
use crate::focus::item::{ElementRef, NavigableItem, ScrollBlock};
use crate::overlay::OverlayEvent;
use crate::shortcuts::help::HelpSheet;

pub trait MusicPlayer {
    fn is_enabled(&self) -> bool;
    /// Returns whether playback is running afterwards.
    fn toggle_play(&mut self) -> Result<bool, CapabilityError>;
    fn play_previous(&mut self) -> Result<(), CapabilityError>;
    fn play_next(&mut self) -> Result<(), CapabilityError>;
    /// Current volume in `0.0..=1.0`.
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32) -> Result<(), CapabilityError>;
    /// Returns whether the player is muted afterwards.
    fn toggle_mute(&mut self) -> Result<bool, CapabilityError>;
    fn toggle_playlist(&mut self) -> Result<(), CapabilityError>;
}

pub trait FileManager {
    fn open_file(&mut self, path: &str) -> Result<(), CapabilityError>;
    fn go_back(&mut self) -> Result<(), CapabilityError>;
    fn open_rename_modal(&mut self) -> Result<(), CapabilityError>;
    fn open_delete_modal(&mut self) -> Result<(), CapabilityError>;
    fn load_files(&mut self) -> Result<(), CapabilityError>;
}

/// What a focus controller asks the page to collect.
#[derive(Clone, Copy, Debug)]
pub struct CollectScope<'a> {
    /// Profile name of the asking controller, e.g. `"archive"`.
    pub page: &'a str,
    pub level: &'a str,
    pub parent: Option<&'a NavigableItem>,
    /// Active admin tab, when the controller has tabs.
    pub tab: Option<&'a str>,
}

pub trait Host {
    fn current_path(&self) -> String;

    fn navigate(&mut self, url: &str) -> Result<(), CapabilityError>;

    fn is_admin(&self) -> bool;

    /// Opens or closes the overlay with `id`. `None` when no such overlay
    /// exists, otherwise whether it is open afterwards.
    fn toggle_overlay(&mut self, id: &str) -> Option<bool>;

    /// Closes every open overlay and returns how many were open.
    fn close_all_overlays(&mut self) -> usize;

    fn close_overlay(&mut self, id: &str);

    fn show_help(&mut self, sheet: HelpSheet);

    /// Adds or removes a marker class on the document root.
    fn set_root_marker(&mut self, marker: &str, on: bool);

    /// Moves the `class` selection marker to `item`, or clears it.
    fn mark_selected(&mut self, class: &str, item: Option<&NavigableItem>);

    /// Toggles the multi-select marker on a row.
    fn mark_row(&mut self, _element: ElementRef, _on: bool) {}

    fn scroll_into_view(&mut self, item: &NavigableItem, block: ScrollBlock);

    /// Builds a fresh item list; callers never keep the previous one.
    fn collect(&mut self, scope: CollectScope<'_>) -> Vec<NavigableItem>;

    /// Click-equivalent on an element. `Ok(false)` when it no longer exists.
    fn click(&mut self, element: ElementRef) -> Result<bool, CapabilityError>;

    /// Activates the button with `role` (`"edit"`, `"delete"`, ...) inside
    /// `element`. `Ok(false)` when the row has no such button.
    fn press(&mut self, element: ElementRef, role: &str) -> Result<bool, CapabilityError>;

    fn toggle_expand(&mut self, element: ElementRef);

    /// Scrolls the reading pane by `delta` units.
    fn scroll_panel(&mut self, delta: i32);

    fn focus(&mut self, element: ElementRef);

    fn focused(&self) -> Option<ElementRef>;

    /// Drops focus from the current text input so its value is committed.
    fn blur(&mut self);

    /// Overlay open/close events since the last call.
    fn take_overlay_events(&mut self) -> Vec<OverlayEvent> {
        Vec::new()
    }

    fn music(&mut self) -> Option<&mut dyn MusicPlayer> {
        None
    }

    fn files(&mut self) -> Option<&mut dyn FileManager> {
        None
    }

    /// Makes `tab` the visible admin tab. `false` when it has no tab button.
    fn activate_tab(&mut self, _tab: &str) -> bool {
        false
    }

    /// Activates a toolbar button of the current admin tab.
    fn press_tab_button(&mut self, _tab: &str, _role: &str) -> Result<bool, CapabilityError> {
        Ok(false)
    }

    /// Scrolls to the settings section at 1-based `index`, focusing its
    /// first input, and returns its title.
    fn jump_to_section(&mut self, _index: usize) -> Option<String> {
        None
    }

    /// Title of the settings section in the middle of the viewport.
    fn visible_section(&self) -> Option<String> {
        None
    }

    /// Form controls of the settings tab in document order.
    fn form_controls(&self) -> Vec<ElementRef> {
        Vec::new()
    }
}
