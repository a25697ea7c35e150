use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CardKind {
    Pace,
    Instability,
    Stamina,
}

/// A movement card. Cards are fungible within a kind; only the pace value
/// distinguishes two cards of the same kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Card {
    Pace(u8),
    Instability,
    Stamina,
}

impl Card {
    pub fn kind(&self) -> CardKind {
        match self {
            Self::Pace(_) => CardKind::Pace,
            Self::Instability => CardKind::Instability,
            Self::Stamina => CardKind::Stamina,
        }
    }

    /// Stamina cards are fatigue; they never move a participant.
    pub fn is_playable(&self) -> bool {
        !matches!(self, Self::Stamina)
    }

    pub fn pace_value(&self) -> Option<u32> {
        match self {
            Self::Pace(value) => Some(u32::from(*value)),
            _ => None,
        }
    }

    /// Ranking value used when choosing which cards to play. Instability
    /// cards rank at `wildcard_estimate`, stamina cards never rank.
    pub fn estimate(&self, wildcard_estimate: u32) -> u32 {
        match self {
            Self::Pace(value) => u32::from(*value),
            Self::Instability => wildcard_estimate,
            Self::Stamina => 0,
        }
    }

    /// Hand ordering: pace cards first, then instability, then stamina,
    /// pace cards by ascending value.
    pub fn hand_order(&self) -> (u8, u8) {
        match self {
            Self::Pace(value) => (0, *value),
            Self::Instability => (1, 0),
            Self::Stamina => (2, 0),
        }
    }

    pub fn short_label(&self) -> String {
        match self {
            Self::Pace(value) => value.to_string(),
            Self::Instability => "?".to_string(),
            Self::Stamina => "S".to_string(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pace(value) => write!(f, "Pace {value}"),
            Self::Instability => f.write_str("Instability"),
            Self::Stamina => f.write_str("Stamina"),
        }
    }
}

pub fn sort_hand(hand: &mut [Card]) {
    hand.sort_by_key(Card::hand_order);
}

pub fn count_kind(cards: &[Card], kind: CardKind) -> usize {
    cards.iter().filter(|card| card.kind() == kind).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_order_groups_kinds_then_values() {
        let mut hand = vec![
            Card::Stamina,
            Card::Pace(3),
            Card::Instability,
            Card::Pace(1),
            Card::Stamina,
            Card::Pace(2),
        ];
        sort_hand(&mut hand);
        assert_eq!(
            hand,
            vec![
                Card::Pace(1),
                Card::Pace(2),
                Card::Pace(3),
                Card::Instability,
                Card::Stamina,
                Card::Stamina,
            ]
        );
    }

    #[test]
    fn stamina_is_not_playable() {
        assert!(Card::Pace(1).is_playable());
        assert!(Card::Instability.is_playable());
        assert!(!Card::Stamina.is_playable());
        assert_eq!(Card::Instability.estimate(2), 2);
        assert_eq!(Card::Stamina.estimate(2), 0);
    }
}
