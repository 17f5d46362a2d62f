use crate::focus::item::ElementRef;

/// A focusable element inside an overlay, as measured when it opened.
#[derive(Clone, Debug, PartialEq)]
pub struct FocusableCandidate {
    pub element: ElementRef,
    pub disabled: bool,
    pub tab_index: Option<i32>,
    pub width: f32,
    pub height: f32,
    /// The element itself is `display:none`, `visibility:hidden` or fully
    /// transparent.
    pub hidden: bool,
    /// Some ancestor below the overlay root is hidden.
    pub hidden_ancestor: bool,
    /// Text field, text area or select; these take focus when the overlay
    /// opens.
    pub text_like: bool,
}

impl FocusableCandidate {
    pub fn visible(element: ElementRef) -> Self {
        Self {
            element,
            disabled: false,
            tab_index: None,
            width: 80.0,
            height: 24.0,
            hidden: false,
            hidden_ancestor: false,
            text_like: false,
        }
    }

    pub fn text_input(element: ElementRef) -> Self {
        Self {
            text_like: true,
            ..Self::visible(element)
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = Some(index);
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn under_hidden_ancestor(mut self) -> Self {
        self.hidden_ancestor = true;
        self
    }

    pub fn is_focusable(&self) -> bool {
        !self.disabled
            && self.tab_index != Some(-1)
            && !(self.width == 0.0 && self.height == 0.0)
            && !self.hidden
            && !self.hidden_ancestor
    }
}

/// Tab-cycling boundary of one open overlay.
///
/// The sequence is filtered once, when the trap is attached. Content that
/// changes shape afterwards is not seen until the overlay is closed and
/// opened again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusTrap {
    overlay: String,
    sequence: Vec<ElementRef>,
    first_input: Option<ElementRef>,
}

impl FocusTrap {
    pub fn attach(overlay: &str, candidates: &[FocusableCandidate]) -> Self {
        let focusable: Vec<&FocusableCandidate> =
            candidates.iter().filter(|c| c.is_focusable()).collect();
        Self {
            overlay: overlay.to_string(),
            sequence: focusable.iter().map(|c| c.element).collect(),
            first_input: focusable.iter().find(|c| c.text_like).map(|c| c.element),
        }
    }

    pub fn overlay(&self) -> &str {
        &self.overlay
    }

    pub fn sequence(&self) -> &[ElementRef] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// First text-like input, focused when the overlay opens.
    pub fn first_input(&self) -> Option<ElementRef> {
        self.first_input
    }

    /// Where Tab (or Shift+Tab when `backward`) moves focus from `current`.
    pub fn next(&self, current: Option<ElementRef>, backward: bool) -> Option<ElementRef> {
        let position = current.and_then(|el| self.sequence.iter().position(|e| *e == el));
        cycle_index(self.sequence.len(), position, backward).map(|i| self.sequence[i])
    }
}

/// Next index in a ring of `len` entries. Focus outside the ring enters at
/// the first entry going forward and at the last going backward.
pub fn cycle_index(len: usize, current: Option<usize>, backward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let next = match (current, backward) {
        (Some(i), false) if i + 1 < len => i + 1,
        (_, false) => 0,
        (Some(i), true) if i > 0 && i < len => i - 1,
        (_, true) => len - 1,
    };
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trap(n: u64) -> FocusTrap {
        let candidates: Vec<_> = (1..=n)
            .map(|i| FocusableCandidate::visible(ElementRef(i)))
            .collect();
        FocusTrap::attach("dialog", &candidates)
    }

    #[test]
    fn test_visibility_filter() {
        let candidates = vec![
            FocusableCandidate::visible(ElementRef(1)),
            FocusableCandidate::visible(ElementRef(2)).disabled(),
            FocusableCandidate::visible(ElementRef(3)).tab_index(-1),
            FocusableCandidate::visible(ElementRef(4)).size(0.0, 0.0),
            FocusableCandidate::visible(ElementRef(5)).hidden(),
            FocusableCandidate::visible(ElementRef(6)).under_hidden_ancestor(),
            FocusableCandidate::visible(ElementRef(7)).tab_index(0),
            FocusableCandidate::visible(ElementRef(8)).size(0.0, 12.0),
        ];
        let trap = FocusTrap::attach("dialog", &candidates);
        assert_eq!(trap.sequence(), &[ElementRef(1), ElementRef(7), ElementRef(8)]);
    }

    #[test]
    fn test_tab_wraps_from_last() {
        let trap = trap(3);
        assert_eq!(trap.next(Some(ElementRef(3)), false), Some(ElementRef(1)));
        assert_eq!(trap.next(Some(ElementRef(1)), false), Some(ElementRef(2)));
    }

    #[test]
    fn test_shift_tab_wraps_from_first() {
        let trap = trap(3);
        assert_eq!(trap.next(Some(ElementRef(1)), true), Some(ElementRef(3)));
        assert_eq!(trap.next(Some(ElementRef(3)), true), Some(ElementRef(2)));
    }

    #[test]
    fn test_single_element_stays() {
        let trap = trap(1);
        assert_eq!(trap.next(Some(ElementRef(1)), false), Some(ElementRef(1)));
        assert_eq!(trap.next(Some(ElementRef(1)), true), Some(ElementRef(1)));
    }

    #[test]
    fn test_empty_trap() {
        let trap = trap(0);
        assert!(trap.is_empty());
        assert_eq!(trap.next(None, false), None);
        assert_eq!(trap.next(Some(ElementRef(9)), true), None);
    }

    #[test]
    fn test_focus_outside_enters_at_edges() {
        let trap = trap(3);
        assert_eq!(trap.next(Some(ElementRef(42)), false), Some(ElementRef(1)));
        assert_eq!(trap.next(None, true), Some(ElementRef(3)));
    }

    #[test]
    fn test_first_input_skips_buttons() {
        let candidates = vec![
            FocusableCandidate::visible(ElementRef(1)),
            FocusableCandidate::text_input(ElementRef(2)).disabled(),
            FocusableCandidate::text_input(ElementRef(3)),
        ];
        let trap = FocusTrap::attach("login", &candidates);
        assert_eq!(trap.first_input(), Some(ElementRef(3)));
    }
}
