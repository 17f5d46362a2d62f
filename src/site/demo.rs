//! Sample content for every page of the demo site.

use crate::focus::pages::ADMIN_TABS;
use crate::keyboard::ActiveElement;
use crate::overlay::{FocusableCandidate, OverlayButton, OverlayButtons};
use crate::site::{FileBrowser, Node, Player, Site};

pub const TRACKS: [&str; 3] = ["Clair de Lune", "Gymnopédie No.1", "Arabesque No.1"];

pub const SETTINGS_SECTIONS: [&str; 7] = [
    "Appearance",
    "Music",
    "Template",
    "Article title",
    "Switch notice",
    "External links",
    "Sponsor",
];

/// A fully populated site opened at `path`.
pub fn site(path: &str, admin: bool) -> Site {
    let mut site = Site::new(path);
    site.set_admin(admin);
    site.player = Some(Player::new(&TRACKS));
    site.files = Some(FileBrowser::default());

    dialogs(&mut site);
    article_page(&mut site);
    archive_page(&mut site);
    about_page(&mut site);
    admin_page(&mut site);
    site
}

fn button(site: &mut Site) -> OverlayButton {
    OverlayButton::new(site.add_control(ActiveElement::Button))
}

fn dialogs(site: &mut Site) {
    let username = site.add_control(ActiveElement::TextInput);
    let password = site.add_control(ActiveElement::TextInput);
    let remember = site.add_control(ActiveElement::Checkbox);
    let login = button(site);
    let cancel = button(site);
    site.add_overlay(
        "loginModal",
        "Log in",
        vec![
            FocusableCandidate::text_input(username),
            FocusableCandidate::text_input(password),
            FocusableCandidate::visible(remember),
            FocusableCandidate::visible(login.element),
            FocusableCandidate::visible(cancel.element),
        ],
        OverlayButtons {
            primary: Some(login),
            submit: Some(login),
            confirm: None,
            cancel: Some(cancel),
        },
    );

    let profile = button(site);
    let logout = button(site);
    let close = button(site);
    site.add_overlay(
        "userCenterModal",
        "User center",
        vec![
            FocusableCandidate::visible(profile.element),
            FocusableCandidate::visible(logout.element),
            FocusableCandidate::visible(close.element),
        ],
        OverlayButtons {
            primary: Some(profile),
            cancel: Some(close),
            ..OverlayButtons::default()
        },
    );

    let title = site.add_control(ActiveElement::TextInput);
    let body = site.add_control(ActiveElement::TextArea);
    let hidden = site.add_control(ActiveElement::TextInput);
    let save = button(site);
    let discard = button(site);
    site.add_overlay(
        "editModal",
        "Edit",
        vec![
            FocusableCandidate::text_input(title),
            FocusableCandidate::text_input(body),
            FocusableCandidate::text_input(hidden).hidden(),
            FocusableCandidate::visible(save.element),
            FocusableCandidate::visible(discard.element),
        ],
        OverlayButtons {
            primary: Some(save),
            submit: Some(save),
            confirm: None,
            cancel: Some(discard),
        },
    );

    let confirm = button(site);
    let keep = button(site);
    site.add_overlay(
        "confirmModal",
        "Delete this item?",
        vec![
            FocusableCandidate::visible(confirm.element),
            FocusableCandidate::visible(keep.element),
        ],
        OverlayButtons {
            primary: Some(keep),
            confirm: Some(confirm),
            cancel: Some(keep),
            ..OverlayButtons::default()
        },
    );

    site.open_on_press("edit", "editModal");
    site.open_on_press("delete", "confirmModal");
}

fn article_page(site: &mut Site) {
    let rust = site.add(Node::new("article", "left", "folder", "Rust"));
    for (label, link) in [
        ("Ownership", "/passage/ownership"),
        ("Lifetimes", "/passage/lifetimes"),
    ] {
        site.add(Node::new("article", "left", "file", label).link(link).in_folder(rust));
    }
    let notes = site.add(Node::new("article", "left", "folder", "Notes"));
    site.add(
        Node::new("article", "left", "file", "Terminal tricks")
            .link("/passage/terminal")
            .in_folder(notes),
    );
    site.add(Node::new("article", "left", "file", "README").link("/passage/readme"));

    for heading in ["Introduction", "Moves", "Borrowing", "Summary"] {
        site.add(Node::new("article", "right", "heading", heading));
    }
}

fn archive_page(site: &mut Site) {
    let filters = site.add(Node::new("archive", "main", "filter-card", "Filters"));
    for label in ["All", "Rust", "Essays"] {
        site.add(Node::new("archive", "sub", "filter-button", label).child_of(filters));
    }
    for (label, link) in [
        ("Ownership in practice", "/passage/ownership"),
        ("A year of terminals", "/passage/terminal"),
        ("On keyboards", "/passage/keyboards"),
    ] {
        site.add(Node::new("archive", "main", "article", label).link(link));
    }
    let timeline = site.add(Node::new("archive", "main", "timeline-card", "Timeline"));
    for year in ["2026", "2025", "2024"] {
        site.add(Node::new("archive", "sub", "year", year).child_of(timeline));
    }
    let tags = site.add(Node::new("archive", "main", "tag-card", "Tag cloud"));
    for tag in ["rust", "tui", "keyboard", "notes"] {
        site.add(
            Node::new("archive", "sub", "tag", tag)
                .link(&format!("/collect?tag={tag}"))
                .child_of(tags),
        );
    }
}

fn about_page(site: &mut Site) {
    for card in ["Profile", "Skills", "Projects", "Contact"] {
        site.add(Node::new("about", "cards", "card", card));
    }
}

fn admin_page(site: &mut Site) {
    for (id, _) in ADMIN_TABS {
        let mut toolbar = vec!["new", "upload", "search"];
        match id {
            "categories" | "tags" => toolbar.extend(["refresh", "add"]),
            "settings" => toolbar.extend(["reset", "save-appearance", "save-music", "save-template"]),
            // The file manager reloads through its own capability.
            "filemanager" => {}
            _ => toolbar.push("refresh"),
        }
        site.add_tab(id, &toolbar);
    }

    let row = |tab: &str, label: &str, buttons: &[&str]| {
        Node::new("admin", "rows", "row", label)
            .tab(tab)
            .buttons(buttons)
    };
    for title in ["Ownership in practice", "A year of terminals", "On keyboards"] {
        site.add(row("articles", title, &["view", "edit", "delete", "attach", "publish"]));
    }
    for user in ["alice", "bob", "carol"] {
        site.add(row("users", user, &["edit", "delete"]));
    }
    for comment in ["Great post!", "Typo in paragraph 2", "First"] {
        site.add(row("comments", comment, &["view", "approve", "delete"]));
    }
    for category in ["Programming", "Life"] {
        site.add(row("categories", category, &["edit", "delete"]));
    }
    for tag in ["rust", "tui", "keyboard"] {
        site.add(row("tags", tag, &["edit", "delete"]));
    }
    for stat in ["Visits", "Readers", "Comments"] {
        site.add(row("analytics", stat, &["view"]));
    }
    for (label, group) in [
        ("Intro", "main"),
        ("Experience", "main"),
        ("Email", "sub"),
        ("GitHub", "sub"),
    ] {
        site.add(row("about", label, &["edit", "toggle", "delete"]).group(group));
    }
    for (label, link, kind) in [
        ("docs", "/docs/", "folder"),
        ("images", "/images/", "folder"),
        ("notes.md", "/notes.md", "file"),
    ] {
        site.add(
            Node::new("admin", "rows", kind, label)
                .tab("filemanager")
                .link(link),
        );
    }
    for file in ["cover.png", "talk.pdf"] {
        site.add(row("attachments", file, &["view", "edit", "delete"]));
    }

    for title in SETTINGS_SECTIONS {
        let input = site.add_control(ActiveElement::TextInput);
        site.add_section(title, Some(input));
    }
    let toggle = site.add_control(ActiveElement::Checkbox);
    site.add_form_control(toggle);
}
