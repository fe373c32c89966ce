use serde::{Deserialize, Serialize};

/// Vertical extent of a rendered candidate card inside a stage column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardBounds {
    pub top: f64,
    pub height: f64,
}

impl CardBounds {
    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Where a dragged card lands in a column: the index of the nearest card whose midpoint
/// lies below the pointer, or `cards.len()` to append.
pub fn insertion_index(pointer_y: f64, cards: &[CardBounds]) -> usize {
    cards
        .iter()
        .enumerate()
        .filter(|(_, card)| card.midpoint() > pointer_y)
        .min_by(|(_, a), (_, b)| a.midpoint().total_cmp(&b.midpoint()))
        .map(|(index, _)| index)
        .unwrap_or(cards.len())
}
