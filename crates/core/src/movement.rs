use crate::{Card, CardStore, RaceConfig, RngState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reveal {
    /// None when both piles were empty.
    pub revealed: Option<Card>,
    pub contribution: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movement {
    pub played: Vec<Card>,
    pub reveals: Vec<Reveal>,
    pub distance: u32,
}

/// Sums the played cards. Each instability card reveals the top of the
/// draw pile and counts its pace value, or a random wildcard amount when the
/// revealed card has none. Played cards end in the discard pile.
pub fn resolve_movement(
    store: &mut CardStore,
    played: Vec<Card>,
    config: &RaceConfig,
    rng: &mut RngState,
) -> Movement {
    let mut distance = 0u32;
    let mut reveals = Vec::new();
    for card in &played {
        match card {
            Card::Pace(value) => distance += u32::from(*value),
            Card::Instability => {
                let revealed = store.reveal_top(rng);
                let contribution = match revealed.and_then(|card| card.pace_value()) {
                    Some(value) => value,
                    None => rng.range(config.wildcard_min..=config.wildcard_max),
                };
                distance += contribution;
                reveals.push(Reveal {
                    revealed,
                    contribution,
                });
            }
            Card::Stamina => {}
        }
    }
    store.discard_cards(played.iter().copied());
    Movement {
        played,
        reveals,
        distance,
    }
}
