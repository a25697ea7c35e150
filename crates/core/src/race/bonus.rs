use super::*;
use crate::Desk;

/// Indices ordered by `(position, rate)`, highest first. Ties keep their
/// input order.
pub fn ranking(keys: &[(u32, u8)]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|a, b| keys[*b].cmp(&keys[*a]));
    order
}

impl Race {
    fn ranking_now(&self) -> Vec<usize> {
        let keys: Vec<(u32, u8)> = self
            .participants()
            .map(|participant| (participant.position, participant.rate))
            .collect();
        ranking(&keys)
    }

    /// End-of-round positional bonuses: catch-up for the trailing pair, then
    /// drafting offers walking the ranking downward.
    pub(super) fn apply_bonuses(&mut self, presenter: &mut dyn Presenter) -> Result<(), RaceError> {
        let order = self.ranking_now();
        if order.len() < 2 {
            return Ok(());
        }
        self.apply_catch_up(&order);
        self.apply_drafting(&order, presenter)
    }

    fn apply_catch_up(&mut self, order: &[usize]) {
        let bonus = &self.config.bonus;
        let course_length = self.config.course_length;
        let trailing = order.len().saturating_sub(bonus.catch_up_count);
        for index in &order[trailing..] {
            let participant = &mut self.entrants[*index].participant;
            if participant.finished || participant.caught_penalty {
                continue;
            }
            let from = participant.position;
            if participant.advance(bonus.catch_up, course_length) == 0 {
                continue;
            }
            participant.stats.bonuses += 1;
            log::debug!("{} gets the catch-up bonus", participant.name());
            self.events.push(RaceEvent::CatchUp {
                name: participant.name().to_string(),
                from,
                to: participant.position,
            });
        }
    }

    fn apply_drafting(
        &mut self,
        order: &[usize],
        presenter: &mut dyn Presenter,
    ) -> Result<(), RaceError> {
        let Race {
            config,
            entrants,
            rng,
            events,
            ..
        } = self;
        let bonus = &config.bonus;
        for pair in order.windows(2) {
            let (ahead_index, behind_index) = (pair[0], pair[1]);
            let ahead = &entrants[ahead_index].participant;
            if ahead.finished {
                continue;
            }
            let ahead_name = ahead.name().to_string();
            let ahead_position = ahead.position;

            let Entrant { participant, pilot } = &mut entrants[behind_index];
            if participant.finished || participant.caught_penalty {
                continue;
            }
            if ahead_position < participant.position
                || ahead_position - participant.position > bonus.drafting_gap
            {
                continue;
            }
            if participant.store.stamina() < bonus.drafting_cost {
                continue;
            }

            let mut desk = Desk {
                config,
                rng: &mut *rng,
                presenter: &mut *presenter,
            };
            if !pilot.choose_motivation(participant, &ahead_name, &mut desk)? {
                events.push(RaceEvent::DraftingDeclined {
                    name: participant.name().to_string(),
                    ahead: ahead_name,
                });
                continue;
            }
            let payment = participant.store.spend_stamina(bonus.drafting_cost);
            participant.stats.stamina_spent += payment.paid;
            let from = participant.position;
            participant.advance(bonus.drafting, config.course_length);
            participant.stats.bonuses += 1;
            log::debug!("{} drafts {ahead_name}", participant.name());
            events.push(RaceEvent::Drafting {
                name: participant.name().to_string(),
                ahead: ahead_name,
                from,
                to: participant.position,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CardStore, Headless, ScriptedPresenter};

    fn field(positions: &[u32], stamina: u32, control: Control) -> Race {
        let config = RaceConfig::default();
        let mut rng = RngState::from_seed(4);
        let identities = crate::default_identities();
        let participants = positions
            .iter()
            .enumerate()
            .map(|(lane, position)| {
                let mut participant = Participant::new(
                    identities[lane].clone(),
                    lane + 1,
                    control,
                    &config,
                    &mut rng,
                );
                participant.position = *position;
                participant.store =
                    CardStore::from_parts(Vec::new(), Vec::new(), Vec::new(), stamina);
                participant
            })
            .collect();
        Race::from_participants(config, participants, rng).expect("race")
    }

    fn positions(race: &Race) -> Vec<u32> {
        race.participants().map(|p| p.position).collect()
    }

    #[test]
    fn ranking_orders_by_position_then_rate() {
        assert_eq!(ranking(&[(10, 0), (30, 1), (30, 2), (5, 0)]), vec![2, 1, 0, 3]);
        assert_eq!(ranking(&[(7, 1), (7, 1)]), vec![0, 1]);
        assert!(ranking(&[]).is_empty());
    }

    #[test]
    fn catch_up_lifts_the_trailing_pair() {
        let mut race = field(&[90, 70, 69, 40], 0, Control::Policy);
        let order = race.ranking_now();
        race.apply_catch_up(&order);
        assert_eq!(positions(&race), vec![90, 70, 70, 41]);
        let events: Vec<RaceEvent> = race.events.drain().collect();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn catch_up_skips_caught_and_finished() {
        let mut race = field(&[90, 70, 69, 40], 0, Control::Policy);
        race.participant_mut(3).expect("last").caught_penalty = true;
        race.participant_mut(2).expect("third").finished = true;
        let order = race.ranking_now();
        race.apply_catch_up(&order);
        assert_eq!(positions(&race), vec![90, 70, 69, 40]);
    }

    #[test]
    fn drafting_requires_stamina() {
        let mut race = field(&[50, 49], 0, Control::Policy);
        race.apply_bonuses(&mut Headless).expect("bonuses");
        // catch-up only, both are in the trailing pair
        assert_eq!(positions(&race), vec![51, 50]);
    }

    #[test]
    fn human_accepts_drafting() {
        let mut race = field(&[60, 59, 20], 3, Control::Human);
        let mut presenter = ScriptedPresenter::new([0]);
        let order = race.ranking_now();
        race.apply_drafting(&order, &mut presenter)
            .expect("drafting");
        assert_eq!(positions(&race), vec![60, 61, 20]);
        let drafter = race.participant(1).expect("drafter");
        assert_eq!(drafter.store.stamina(), 2);
        assert_eq!(drafter.stats.bonuses, 1);
        assert_eq!(presenter.asked.len(), 1);
    }

    #[test]
    fn human_declines_drafting() {
        let mut race = field(&[60, 60], 3, Control::Human);
        let mut presenter = ScriptedPresenter::new([1]);
        let order = race.ranking_now();
        race.apply_drafting(&order, &mut presenter)
            .expect("drafting");
        assert_eq!(positions(&race), vec![60, 60]);
        let events: Vec<RaceEvent> = race.events.drain().collect();
        assert!(matches!(events[0], RaceEvent::DraftingDeclined { .. }));
    }

    #[test]
    fn no_drafting_behind_a_finished_leader() {
        let mut race = field(&[100, 99], 5, Control::Human);
        race.participant_mut(0).expect("leader").finished = true;
        let order = race.ranking_now();
        race.apply_drafting(&order, &mut ScriptedPresenter::new([]))
            .expect("drafting");
        assert_eq!(positions(&race), vec![100, 99]);
    }

    #[test]
    fn drafting_gap_is_bounded() {
        let mut race = field(&[60, 58], 5, Control::Human);
        let order = race.ranking_now();
        race.apply_drafting(&order, &mut ScriptedPresenter::new([]))
            .expect("drafting");
        assert_eq!(positions(&race), vec![60, 58]);
    }

    #[test]
    fn single_participant_gets_no_bonus() {
        let mut race = field(&[10], 5, Control::Policy);
        race.apply_bonuses(&mut Headless).expect("bonuses");
        assert_eq!(positions(&race), vec![10]);
    }
}
