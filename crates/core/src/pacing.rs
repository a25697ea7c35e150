use crate::{Participant, RaceConfig, RaceError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RateChange {
    Unchanged,
    Shifted { from: u8, to: u8 },
    Jumped { from: u8, to: u8 },
    JumpFailed { from: u8, target: u8 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Upkeep {
    None,
    Recovered(usize),
    Paid,
    ForcedToMinimum,
}

impl Participant {
    /// Moves the pacing rate toward `target`. A jump of exactly two levels
    /// costs one stamina and fails without it.
    pub fn set_rate(&mut self, target: u8, config: &RaceConfig) -> Result<RateChange, RaceError> {
        if !config.rate_in_range(target) {
            return Err(RaceError::RateOutOfRange {
                target,
                min: config.min_rate,
                max: config.max_rate,
            });
        }
        let from = self.rate;
        if target == from {
            return Ok(RateChange::Unchanged);
        }
        if from.abs_diff(target) == 2 {
            let payment = self.store.spend_stamina(1);
            if !payment.is_full() {
                log::warn!("{} could not pay for a jump to rate {target}", self.name());
                return Ok(RateChange::JumpFailed { from, target });
            }
            self.stats.stamina_spent += payment.paid;
            self.rate = target;
            return Ok(RateChange::Jumped { from, to: target });
        }
        self.rate = target;
        Ok(RateChange::Shifted { from, to: target })
    }

    /// Once-per-turn rate side effects, applied after movement.
    pub fn apply_rate_upkeep(&mut self, config: &RaceConfig) -> Upkeep {
        if self.rate == config.min_rate {
            let recovered = self.store.recover_stamina(config.recovery_per_round);
            if recovered > 0 {
                return Upkeep::Recovered(recovered);
            }
            return Upkeep::None;
        }
        if self.rate == config.max_rate && self.round > 0 {
            let payment = self.store.spend_stamina(1);
            if payment.is_full() {
                self.stats.stamina_spent += payment.paid;
                return Upkeep::Paid;
            }
            self.rate = config.min_rate;
            return Upkeep::ForcedToMinimum;
        }
        Upkeep::None
    }

    /// Discards every playable card and drops to the minimum rate when the
    /// hand cannot cover `required` playable cards.
    pub fn check_clustered_hand(&mut self, required: usize, config: &RaceConfig) -> bool {
        if self.store.playable_count() >= required {
            return false;
        }
        self.store.discard_playable();
        self.rate = config.min_rate;
        self.stats.clustered += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Card, CardStore, Control, Identity, RngState};

    fn participant(stamina: u32, hand: Vec<Card>) -> Participant {
        let config = RaceConfig::default();
        let mut rng = RngState::from_seed(9);
        let mut p = Participant::new(Identity::new("Red", "red"), 1, Control::Policy, &config, &mut rng);
        p.store = CardStore::from_parts(Vec::new(), hand, Vec::new(), stamina);
        p
    }

    #[test]
    fn same_rate_is_a_no_op() {
        let config = RaceConfig::default();
        let mut p = participant(3, Vec::new());
        assert_eq!(p.set_rate(0, &config), Ok(RateChange::Unchanged));
        assert_eq!(p.store.stamina(), 3);
    }

    #[test]
    fn single_step_is_free() {
        let config = RaceConfig::default();
        let mut p = participant(0, Vec::new());
        assert_eq!(
            p.set_rate(1, &config),
            Ok(RateChange::Shifted { from: 0, to: 1 })
        );
        assert_eq!(p.rate, 1);
    }

    #[test]
    fn jump_costs_one_stamina() {
        let config = RaceConfig::default();
        let mut p = participant(2, Vec::new());
        assert_eq!(
            p.set_rate(2, &config),
            Ok(RateChange::Jumped { from: 0, to: 2 })
        );
        assert_eq!(p.store.stamina(), 1);
        assert_eq!(p.store.discard, vec![Card::Stamina]);
    }

    #[test]
    fn jump_without_stamina_fails_and_keeps_rate() {
        let config = RaceConfig::default();
        let mut p = participant(0, Vec::new());
        assert_eq!(
            p.set_rate(2, &config),
            Ok(RateChange::JumpFailed { from: 0, target: 2 })
        );
        assert_eq!(p.rate, 0);
    }

    #[test]
    fn out_of_range_target_is_rejected() {
        let config = RaceConfig::default();
        let mut p = participant(5, Vec::new());
        assert_eq!(
            p.set_rate(3, &config),
            Err(RaceError::RateOutOfRange {
                target: 3,
                min: 0,
                max: 2
            })
        );
        assert_eq!(p.rate, 0);
        assert_eq!(p.store.stamina(), 5);
    }

    #[test]
    fn minimum_rate_recovers_stamina_from_hand() {
        let config = RaceConfig::default();
        let mut p = participant(0, vec![Card::Stamina, Card::Stamina, Card::Stamina]);
        assert_eq!(p.apply_rate_upkeep(&config), Upkeep::Recovered(2));
        assert_eq!(p.store.stamina(), 2);
        assert_eq!(p.store.hand, vec![Card::Stamina]);
    }

    #[test]
    fn maximum_rate_upkeep_skips_first_round() {
        let config = RaceConfig::default();
        let mut p = participant(1, Vec::new());
        p.rate = 2;
        assert_eq!(p.apply_rate_upkeep(&config), Upkeep::None);
        p.round = 1;
        assert_eq!(p.apply_rate_upkeep(&config), Upkeep::Paid);
        assert_eq!(p.apply_rate_upkeep(&config), Upkeep::ForcedToMinimum);
        assert_eq!(p.rate, 0);
    }

    #[test]
    fn clustered_hand_discards_playable_cards() {
        let config = RaceConfig::default();
        let mut p = participant(
            1,
            vec![Card::Pace(2), Card::Instability, Card::Stamina, Card::Stamina],
        );
        p.rate = 1;
        assert!(p.check_clustered_hand(3, &config));
        assert_eq!(p.store.hand, vec![Card::Stamina, Card::Stamina]);
        assert_eq!(p.store.playable_count(), 0);
        assert_eq!(p.rate, 0);
        assert_eq!(p.store.discard.len(), 2);
        assert!(!p.check_clustered_hand(0, &config));
    }
}
