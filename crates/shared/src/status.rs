use crate::document::BoundaryDocument;
use crate::selection::InteractionState;

/// Text shown in the bar under the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBar {
    pub text: String,
    pub visible: bool,
}

impl StatusBar {
    pub fn hidden() -> Self {
        StatusBar::default()
    }

    /// Names of the selected features in selection order, joined with ", ".
    /// With nothing selected, the hovered feature's name. Features without a
    /// name contribute nothing. The bar is shown only when there is text.
    pub fn compute(document: &BoundaryDocument, interaction: &InteractionState) -> Self {
        let names: Vec<String> = if interaction.selected().is_empty() {
            interaction
                .hovered()
                .and_then(|id| document.display_name(id))
                .into_iter()
                .collect()
        } else {
            interaction
                .selected()
                .iter()
                .filter_map(|id| document.display_name(*id))
                .collect()
        };
        let text = names.join(", ");
        StatusBar {
            visible: !text.is_empty(),
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tests::two_squares;
    use crate::document::FeatureId;
    use crate::selection::SelectionMode;

    const R1: FeatureId = FeatureId { collection: 0, index: 0 };
    const R2: FeatureId = FeatureId { collection: 0, index: 1 };

    #[test]
    fn test_empty_state_is_hidden() {
        let doc = two_squares();
        let s = InteractionState::new(SelectionMode::Multi);
        assert_eq!(StatusBar::compute(&doc, &s), StatusBar::hidden());
    }

    #[test]
    fn test_selected_names_in_selection_order() {
        let doc = two_squares();
        let mut s = InteractionState::new(SelectionMode::Multi);
        s.click(R2);
        s.click(R1);
        let bar = StatusBar::compute(&doc, &s);
        assert_eq!(bar.text, "R2, R1");
        assert!(bar.visible);
    }

    #[test]
    fn test_hover_shown_when_nothing_selected() {
        let doc = two_squares();
        let mut s = InteractionState::new(SelectionMode::Single);
        s.pointer_enter(R1);
        assert_eq!(StatusBar::compute(&doc, &s).text, "R1");
        s.click(R2);
        // Selection wins over hover.
        assert_eq!(StatusBar::compute(&doc, &s).text, "R2");
    }

    #[test]
    fn test_single_select_scenario() {
        let doc = two_squares();
        let mut s = InteractionState::new(SelectionMode::Single);
        s.click(R1);
        s.click(R2);
        assert_eq!(s.selected(), &[R2]);
        assert_eq!(StatusBar::compute(&doc, &s).text, "R2");
    }

    #[test]
    fn test_unnamed_feature_contributes_nothing() {
        let doc = two_squares();
        let mut s = InteractionState::new(SelectionMode::Multi);
        let ghost = FeatureId::new(4, 4);
        s.click(ghost);
        let bar = StatusBar::compute(&doc, &s);
        assert_eq!(bar, StatusBar::hidden());
        s.click(R1);
        assert_eq!(StatusBar::compute(&doc, &s).text, "R1");
    }
}
