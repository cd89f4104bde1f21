use crate::document::FeatureId;

/// Whether clicking a feature replaces or extends the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// At most one selected feature; selecting another deselects the first.
    Single,
    /// Clicking toggles a feature in or out of an ordered selection.
    Multi,
}

/// Visual state of one feature. Selection wins over hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureState {
    Idle,
    Hovered,
    Selected,
}

/// Hover and selection for one map instance. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionState {
    mode: SelectionMode,
    selected: Vec<FeatureId>,
    hovered: Option<FeatureId>,
}

impl InteractionState {
    pub fn new(mode: SelectionMode) -> Self {
        InteractionState {
            mode,
            selected: Vec::new(),
            hovered: None,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Selected features in the order they were clicked.
    pub fn selected(&self) -> &[FeatureId] {
        &self.selected
    }

    pub fn hovered(&self) -> Option<FeatureId> {
        self.hovered
    }

    pub fn is_selected(&self, id: FeatureId) -> bool {
        self.selected.contains(&id)
    }

    pub fn state_of(&self, id: FeatureId) -> FeatureState {
        if self.is_selected(id) {
            FeatureState::Selected
        } else if self.hovered == Some(id) {
            FeatureState::Hovered
        } else {
            FeatureState::Idle
        }
    }

    /// Returns whether anything changed.
    pub fn pointer_enter(&mut self, id: FeatureId) -> bool {
        if self.hovered == Some(id) {
            return false;
        }
        self.hovered = Some(id);
        true
    }

    /// Clears the hover only if `id` is the hovered feature; a late leave
    /// from a feature the pointer already left is ignored.
    pub fn pointer_leave(&mut self, id: FeatureId) -> bool {
        if self.hovered != Some(id) {
            return false;
        }
        self.hovered = None;
        true
    }

    /// Toggle `id`. Always changes the selection.
    pub fn click(&mut self, id: FeatureId) {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
            return;
        }
        match self.mode {
            SelectionMode::Single => {
                self.selected.clear();
                self.selected.push(id);
            }
            SelectionMode::Multi => self.selected.push(id),
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.hovered = None;
    }

    /// Drop every selected or hovered id that `keep` rejects.
    pub fn retain(&mut self, keep: impl Fn(FeatureId) -> bool) {
        self.selected.retain(|id| keep(*id));
        self.hovered = self.hovered.filter(|id| keep(*id));
    }
}
