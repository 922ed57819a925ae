use serde::{Deserialize, Serialize};

use wordsmith_core::arena::{Arena, Id};
use wordsmith_core::geometry::Rect;
use wordsmith_core::random::RandomSource;

use crate::level::Level;

/// Common writing words handed out cyclically to collectibles.
pub const BOOK_WORDS: &[&str] = &[
    "the", "and", "to", "of", "a", "in", "that", "have", "I", "it", "for", "not", "on", "with",
    "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we", "say", "her",
    "she", "or", "an", "will",
];

/// Narrowest an item box gets, regardless of its word.
pub const MIN_ITEM_WIDTH: f32 = 50.0;
/// Horizontal space per character of the word.
const CHAR_WIDTH: f32 = 8.0;
pub const ITEM_HEIGHT: f32 = 18.0;
/// Distance from an item's top to the top of the platform it floats over.
const ITEM_HOVER: f32 = 20.0;

/// A collectible word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub rect: Rect,
    pub word: String,
    pub collected: bool,
}

pub type ItemId = Id<Item>;

/// Box width for a word.
pub fn item_width(word: &str) -> f32 {
    (word.chars().count() as f32 * CHAR_WIDTH).max(MIN_ITEM_WIDTH)
}

/// Width of the widest item the vocabulary can produce.
pub fn widest_item() -> f32 {
    BOOK_WORDS
        .iter()
        .map(|w| item_width(w))
        .fold(MIN_ITEM_WIDTH, f32::max)
}

/// Place `count` items on random eligible platforms, words drawn in order
/// from the vocabulary.
pub fn generate_items(level: &Level, count: usize, rng: &mut dyn RandomSource) -> Arena<Item> {
    let eligible = level.eligible_platforms();
    let mut items = Arena::with_capacity(count);
    for i in 0..count {
        let platform_id = eligible[rng.index(eligible.len())];
        let Some(platform) = level.platform(platform_id) else {
            continue;
        };
        let word = BOOK_WORDS[i % BOOK_WORDS.len()];
        let width = item_width(word);
        let slack = (platform.rect.w - width).max(0.0);
        items.push(Item {
            rect: Rect::new(
                platform.rect.x + rng.next_f32() * slack,
                platform.rect.y - ITEM_HOVER,
                width,
                ITEM_HEIGHT,
            ),
            word: word.to_string(),
            collected: false,
        });
    }
    items
}
