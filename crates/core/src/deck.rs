use crate::{sort_hand, Card, CardKind, DeckRule, RngState};
use std::collections::VecDeque;

/// One participant's cards. Nothing here is shared between participants.
#[derive(Debug, Default, Clone)]
pub struct CardStore {
    pub draw: VecDeque<Card>,
    pub hand: Vec<Card>,
    pub discard: Vec<Card>,
    stamina: u32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefillReport {
    pub drawn: usize,
    pub reshuffles: usize,
    pub fallback_cards: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaminaPayment {
    pub requested: u32,
    pub paid: u32,
}

impl StaminaPayment {
    pub fn is_full(&self) -> bool {
        self.paid >= self.requested
    }
}

impl CardStore {
    pub fn new(rule: &DeckRule, rng: &mut RngState) -> Self {
        let mut cards = rule.draw_cards();
        rng.shuffle(&mut cards);
        Self {
            draw: cards.into(),
            hand: Vec::new(),
            discard: Vec::new(),
            stamina: rule.stamina as u32,
        }
    }

    /// Builds a store from explicit containers, draw pile front first.
    pub fn from_parts(draw: Vec<Card>, hand: Vec<Card>, discard: Vec<Card>, stamina: u32) -> Self {
        Self {
            draw: draw.into(),
            hand,
            discard,
            stamina,
        }
    }

    pub fn stamina(&self) -> u32 {
        self.stamina
    }

    /// Shuffles the discard pile under the draw pile. Returns false when
    /// there was nothing to shuffle.
    pub fn reshuffle_discard(&mut self, rng: &mut RngState) -> bool {
        if self.discard.is_empty() {
            return false;
        }
        let mut cards: Vec<Card> = self.draw.drain(..).collect();
        cards.append(&mut self.discard);
        rng.shuffle(&mut cards);
        self.draw = cards.into();
        true
    }

    /// Draws until the hand holds `hand_limit` cards. When both piles are
    /// empty a single Pace(1) card is synthesized so the loop always ends.
    pub fn refill(&mut self, hand_limit: usize, rng: &mut RngState) -> RefillReport {
        let mut report = RefillReport::default();
        while self.hand.len() < hand_limit {
            if self.draw.is_empty() {
                if self.reshuffle_discard(rng) {
                    report.reshuffles += 1;
                } else {
                    self.draw.push_back(Card::Pace(1));
                    report.fallback_cards += 1;
                }
            }
            if let Some(card) = self.draw.pop_front() {
                self.hand.push(card);
                report.drawn += 1;
            }
        }
        sort_hand(&mut self.hand);
        report
    }

    /// Pops the top of the draw pile into the discard pile, reshuffling
    /// first when the draw pile is empty.
    pub fn reveal_top(&mut self, rng: &mut RngState) -> Option<Card> {
        if self.draw.is_empty() {
            self.reshuffle_discard(rng);
        }
        let card = self.draw.pop_front()?;
        self.discard.push(card);
        Some(card)
    }

    /// Pays up to `amount` stamina into the discard pile. A short payment
    /// empties the pile and reports what was actually paid.
    pub fn spend_stamina(&mut self, amount: u32) -> StaminaPayment {
        let paid = amount.min(self.stamina);
        self.stamina -= paid;
        self.discard
            .extend(std::iter::repeat(Card::Stamina).take(paid as usize));
        StaminaPayment {
            requested: amount,
            paid,
        }
    }

    /// Empties the stamina pile without paying into the discard pile.
    pub fn wipe_stamina(&mut self) -> u32 {
        std::mem::take(&mut self.stamina)
    }

    /// Moves up to `limit` stamina cards from the hand back to the pile.
    pub fn recover_stamina(&mut self, limit: usize) -> usize {
        let mut recovered = 0;
        self.hand.retain(|card| {
            if recovered < limit && *card == Card::Stamina {
                recovered += 1;
                false
            } else {
                true
            }
        });
        self.stamina += recovered as u32;
        recovered
    }

    pub fn add_friction(&mut self, count: usize) {
        self.hand
            .extend(std::iter::repeat(Card::Stamina).take(count));
    }

    pub fn playable_count(&self) -> usize {
        self.hand.iter().filter(|card| card.is_playable()).count()
    }

    pub fn playable_cards(&self) -> Vec<Card> {
        self.hand
            .iter()
            .copied()
            .filter(Card::is_playable)
            .collect()
    }

    /// Moves every playable card in the hand to the discard pile.
    pub fn discard_playable(&mut self) -> usize {
        let (playable, kept): (Vec<Card>, Vec<Card>) =
            self.hand.iter().partition(|card| card.is_playable());
        let count = playable.len();
        self.hand = kept;
        self.discard.extend(playable);
        count
    }

    /// Removes the cards at `indices` from the hand, preserving the order
    /// the indices were given in. Returns None if any index is invalid or
    /// repeated.
    pub fn take_from_hand(&mut self, indices: &[usize]) -> Option<Vec<Card>> {
        let mut seen = Vec::with_capacity(indices.len());
        for index in indices {
            if *index >= self.hand.len() || seen.contains(index) {
                return None;
            }
            seen.push(*index);
        }
        let taken: Vec<Card> = indices.iter().map(|index| self.hand[*index]).collect();
        let mut sorted = seen;
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        for index in sorted {
            self.hand.remove(index);
        }
        Some(taken)
    }

    pub fn discard_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.discard.extend(cards);
    }

    /// Cards across draw, hand and discard. Stamina in its own pile is
    /// counted separately.
    pub fn cycling_cards(&self) -> usize {
        self.draw.len() + self.hand.len() + self.discard.len()
    }

    pub fn count_kind(&self, kind: CardKind) -> usize {
        self.draw
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard.iter())
            .filter(|card| card.kind() == kind)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(draw: Vec<Card>, hand: Vec<Card>, discard: Vec<Card>, stamina: u32) -> CardStore {
        CardStore::from_parts(draw, hand, discard, stamina)
    }

    #[test]
    fn refill_draws_from_front_and_sorts() {
        let mut rng = RngState::from_seed(1);
        let mut cards = store(
            vec![Card::Stamina, Card::Pace(3), Card::Instability, Card::Pace(1)],
            Vec::new(),
            Vec::new(),
            0,
        );
        let report = cards.refill(3, &mut rng);
        assert_eq!(report.drawn, 3);
        assert_eq!(
            cards.hand,
            vec![Card::Pace(3), Card::Instability, Card::Stamina]
        );
        assert_eq!(cards.draw.front(), Some(&Card::Pace(1)));
    }

    #[test]
    fn refill_reshuffles_discard_when_draw_runs_out() {
        let mut rng = RngState::from_seed(2);
        let mut cards = store(
            vec![Card::Pace(1)],
            Vec::new(),
            vec![Card::Pace(2), Card::Pace(2), Card::Instability],
            0,
        );
        let report = cards.refill(4, &mut rng);
        assert_eq!(report.reshuffles, 1);
        assert_eq!(report.fallback_cards, 0);
        assert_eq!(cards.hand.len(), 4);
        assert!(cards.discard.is_empty());
    }

    #[test]
    fn refill_synthesizes_fallback_cards() {
        let mut rng = RngState::from_seed(3);
        let mut cards = store(Vec::new(), vec![Card::Stamina], Vec::new(), 0);
        let report = cards.refill(3, &mut rng);
        assert_eq!(report.fallback_cards, 2);
        assert_eq!(cards.hand, vec![Card::Pace(1), Card::Pace(1), Card::Stamina]);
    }

    #[test]
    fn reshuffle_preserves_card_multiset() {
        let mut rng = RngState::from_seed(4);
        let mut cards = store(
            vec![Card::Pace(1)],
            Vec::new(),
            vec![Card::Pace(3), Card::Stamina, Card::Instability, Card::Pace(2)],
            2,
        );
        let before_total = cards.cycling_cards();
        let before_pace = cards.count_kind(CardKind::Pace);
        let before_stamina = cards.count_kind(CardKind::Stamina);
        assert!(cards.reshuffle_discard(&mut rng));
        assert_eq!(cards.cycling_cards(), before_total);
        assert_eq!(cards.count_kind(CardKind::Pace), before_pace);
        assert_eq!(cards.count_kind(CardKind::Stamina), before_stamina);
        assert_eq!(cards.count_kind(CardKind::Instability), 1);
        assert_eq!(cards.stamina(), 2);
    }

    #[test]
    fn spend_stamina_reports_partial_payment() {
        let mut cards = store(Vec::new(), Vec::new(), Vec::new(), 2);
        let full = cards.spend_stamina(1);
        assert!(full.is_full());
        let partial = cards.spend_stamina(3);
        assert!(!partial.is_full());
        assert_eq!(partial.paid, 1);
        assert_eq!(cards.stamina(), 0);
        assert_eq!(cards.discard, vec![Card::Stamina, Card::Stamina]);
    }

    #[test]
    fn recover_moves_at_most_limit() {
        let mut cards = store(
            Vec::new(),
            vec![Card::Pace(1), Card::Stamina, Card::Stamina, Card::Stamina],
            Vec::new(),
            0,
        );
        assert_eq!(cards.recover_stamina(2), 2);
        assert_eq!(cards.hand, vec![Card::Pace(1), Card::Stamina]);
        assert_eq!(cards.stamina(), 2);
    }

    #[test]
    fn take_from_hand_rejects_bad_indices() {
        let mut cards = store(
            Vec::new(),
            vec![Card::Pace(1), Card::Pace(2), Card::Pace(3)],
            Vec::new(),
            0,
        );
        assert_eq!(cards.take_from_hand(&[0, 0]), None);
        assert_eq!(cards.take_from_hand(&[5]), None);
        assert_eq!(
            cards.take_from_hand(&[2, 0]),
            Some(vec![Card::Pace(3), Card::Pace(1)])
        );
        assert_eq!(cards.hand, vec![Card::Pace(2)]);
    }

    #[test]
    fn reveal_top_reshuffles_then_gives_up() {
        let mut rng = RngState::from_seed(5);
        let mut cards = store(Vec::new(), Vec::new(), vec![Card::Pace(2)], 0);
        assert_eq!(cards.reveal_top(&mut rng), Some(Card::Pace(2)));
        assert_eq!(cards.discard, vec![Card::Pace(2)]);
        cards.discard.clear();
        assert_eq!(cards.reveal_top(&mut rng), None);
    }
}
