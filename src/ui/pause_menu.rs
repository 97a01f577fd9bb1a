//! Pause menu selection state

use crate::sim::TickInput;

/// Pause menu entries, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseChoice {
    Resume,
    Restart,
    Quit,
}

impl PauseChoice {
    pub const ALL: [PauseChoice; 3] = [PauseChoice::Resume, PauseChoice::Restart, PauseChoice::Quit];

    pub fn label(&self) -> &'static str {
        match self {
            PauseChoice::Resume => "Resume",
            PauseChoice::Restart => "Restart",
            PauseChoice::Quit => "Quit to Title",
        }
    }

    /// Set the matching intent on this frame's input
    pub fn apply(&self, input: &mut TickInput) {
        match self {
            PauseChoice::Resume => input.resume = true,
            PauseChoice::Restart => input.restart = true,
            PauseChoice::Quit => input.quit = true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PauseMenu {
    selected: usize,
    /// Item under the pointer, if any
    hovered: Option<usize>,
}

impl PauseMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> PauseChoice {
        PauseChoice::ALL[self.selected]
    }

    pub fn hovered(&self) -> Option<PauseChoice> {
        self.hovered.map(|i| PauseChoice::ALL[i])
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % PauseChoice::ALL.len();
    }

    pub fn select_previous(&mut self) {
        let n = PauseChoice::ALL.len();
        self.selected = (self.selected + n - 1) % n;
    }

    /// Pointer moved over item `index` (or off the menu with `None`).
    /// Hovering a valid item also selects it.
    pub fn hover(&mut self, index: Option<usize>) {
        self.hovered = index.filter(|&i| i < PauseChoice::ALL.len());
        if let Some(i) = self.hovered {
            self.selected = i;
        }
    }

    /// Confirm the current selection
    pub fn activate(&self) -> PauseChoice {
        self.selected()
    }

    /// Fresh menu state each time the game pauses
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_navigation_wraps() {
        let mut menu = PauseMenu::new();
        assert_eq!(menu.selected(), PauseChoice::Resume);
        menu.select_previous();
        assert_eq!(menu.selected(), PauseChoice::Quit);
        menu.select_next();
        menu.select_next();
        assert_eq!(menu.selected(), PauseChoice::Restart);
    }

    #[test]
    fn test_hover_selects() {
        let mut menu = PauseMenu::new();
        menu.hover(Some(2));
        assert_eq!(menu.hovered(), Some(PauseChoice::Quit));
        assert_eq!(menu.activate(), PauseChoice::Quit);
        menu.hover(Some(7));
        assert_eq!(menu.hovered(), None);
        assert_eq!(menu.selected(), PauseChoice::Quit);
        menu.reset();
        assert_eq!(menu.selected(), PauseChoice::Resume);
    }

    #[test]
    fn test_apply_sets_intent() {
        let mut input = TickInput::default();
        PauseChoice::Restart.apply(&mut input);
        assert!(input.restart && !input.resume && !input.quit);
        let mut input = TickInput::default();
        PauseChoice::Quit.apply(&mut input);
        assert!(input.quit);
    }
}
