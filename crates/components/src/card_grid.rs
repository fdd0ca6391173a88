//! Responsive grid container for cards.

use dom::{Document, NodeId};

/// Create `<div class="card-grid">` holding `cards` in order.
pub fn create_card_grid(doc: &mut Document, cards: &[NodeId]) -> NodeId {
    let grid = doc.create_element_with_class("div", "card-grid");
    for &card in cards {
        doc.append_child(grid, card);
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_keeps_order() {
        let mut doc = Document::blank();
        let cards: Vec<_> = (0..3).map(|_| doc.create_element_with_class("div", "card")).collect();

        let grid = create_card_grid(&mut doc, &cards);
        assert!(doc.has_class(grid, "card-grid"));
        assert_eq!(doc.tree.children(grid).collect::<Vec<_>>(), cards);
    }

    #[test]
    fn test_empty_grid() {
        let mut doc = Document::blank();
        let grid = create_card_grid(&mut doc, &[]);
        assert_eq!(doc.tree.first_child(grid), None);
    }
}
