use std::fmt;

/// Opaque handle to a page element. The core only reads and marks elements
/// through the host; it never creates or destroys them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef(pub u64);

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entry of a focus-mode list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigableItem {
    pub element: ElementRef,
    /// Classification tag such as `"article"`, `"folder"` or `"row"`.
    pub kind: String,
    pub label: String,
    /// Table or section the item belongs to, for lists spanning several.
    pub group: Option<String>,
    /// Destination for items that navigate or open a path.
    pub link: Option<String>,
}

impl NavigableItem {
    pub fn new(element: ElementRef, kind: &str, label: &str) -> Self {
        Self {
            element,
            kind: kind.to_string(),
            label: label.to_string(),
            group: None,
            link: None,
        }
    }

    pub fn in_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn with_link(mut self, link: &str) -> Self {
        self.link = Some(link.to_string());
        self
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

/// How an item is brought into view after it becomes selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollBlock {
    #[default]
    Nearest,
    Center,
    Start,
}
