use crate::keyboard::Key;
use crate::shortcuts::action::BindingGroup;
use crate::shortcuts::registry::KeyRegistry;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HelpEntry {
    pub keys: String,
    pub label: String,
}

impl HelpEntry {
    pub fn new(keys: &[&Key], label: &str) -> Self {
        let keys = keys.iter().map(|k| k.label()).collect::<Vec<_>>().join(" ");
        Self {
            keys,
            label: label.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HelpSection {
    pub title: String,
    pub entries: Vec<HelpEntry>,
    pub note: Option<String>,
}

impl HelpSection {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            entries: Vec::new(),
            note: None,
        }
    }

    pub fn entry(mut self, keys: &[&Key], label: &str) -> Self {
        self.entries.push(HelpEntry::new(keys, label));
        self
    }

    pub fn note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

/// Content of the keyboard help dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HelpSheet {
    pub title: String,
    pub sections: Vec<HelpSection>,
}

impl HelpSheet {
    /// Site-wide bindings grouped by section, with the active page's focus
    /// mode section inserted before the music keys. The administrator
    /// section only appears for administrators.
    pub fn for_site(registry: &KeyRegistry, is_admin: bool, page: Option<HelpSection>) -> Self {
        let mut sections = Vec::new();
        for group in [BindingGroup::Navigation, BindingGroup::Function] {
            sections.push(section_for(registry, group));
        }
        if let Some(page) = page {
            sections.push(page);
        }
        sections.push(section_for(registry, BindingGroup::Music));
        if is_admin {
            sections.push(section_for(registry, BindingGroup::Admin));
        }
        sections.retain(|s| !s.entries.is_empty() || s.note.is_some());
        Self {
            title: "Keyboard shortcuts".to_string(),
            sections,
        }
    }

    pub fn single(title: &str, sections: Vec<HelpSection>) -> Self {
        Self {
            title: title.to_string(),
            sections,
        }
    }

    pub fn section(&self, title: &str) -> Option<&HelpSection> {
        self.sections.iter().find(|s| s.title == title)
    }
}

fn section_for(registry: &KeyRegistry, group: BindingGroup) -> HelpSection {
    let mut section = HelpSection::new(group.title());
    for binding in registry.in_group(group) {
        section.entries.push(HelpEntry::new(&[&binding.key], &binding.label));
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_section_hidden_for_visitors() {
        let registry = KeyRegistry::site_defaults();
        let sheet = HelpSheet::for_site(&registry, false, None);
        assert!(sheet.section("Administrator").is_none());
        let sheet = HelpSheet::for_site(&registry, true, None);
        assert!(sheet.section("Administrator").is_some());
    }

    #[test]
    fn test_page_section_before_music() {
        let registry = KeyRegistry::site_defaults();
        let page = HelpSection::new("About page focus mode").entry(&[&Key::Char('i')], "Enter");
        let sheet = HelpSheet::for_site(&registry, false, Some(page));
        let titles: Vec<_> = sheet.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Navigation", "Functions", "About page focus mode", "Music player"]
        );
    }

    #[test]
    fn test_space_label() {
        let registry = KeyRegistry::site_defaults();
        let sheet = HelpSheet::for_site(&registry, false, None);
        let music = sheet.section("Music player").unwrap();
        assert_eq!(music.entries[0].keys, "Space");
    }
}
