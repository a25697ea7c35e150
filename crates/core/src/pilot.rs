//! Who makes a participant's decisions. Chosen once when the roster is
//! built; the turn loop never branches on the participant kind.

use crate::{
    choose_cards, choose_motivation, choose_rate, Card, Participant, Presenter, Prompt,
    PromptKind, RaceConfig, RaceError, RngState, TurnContext,
};

pub struct Desk<'a> {
    pub config: &'a RaceConfig,
    pub rng: &'a mut RngState,
    pub presenter: &'a mut dyn Presenter,
}

pub trait Pilot: std::fmt::Debug {
    fn choose_rate(&mut self, participant: &Participant, desk: &mut Desk<'_>)
        -> Result<u8, RaceError>;

    /// Indices into the hand, in play order.
    fn choose_cards(
        &mut self,
        participant: &Participant,
        required: usize,
        desk: &mut Desk<'_>,
    ) -> Result<Vec<usize>, RaceError>;

    /// Hand indices to discard after moving.
    fn choose_discards(
        &mut self,
        _participant: &Participant,
        _desk: &mut Desk<'_>,
    ) -> Result<Vec<usize>, RaceError> {
        Ok(Vec::new())
    }

    fn choose_motivation(
        &mut self,
        participant: &Participant,
        ahead: &str,
        desk: &mut Desk<'_>,
    ) -> Result<bool, RaceError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PolicyPilot;

impl Pilot for PolicyPilot {
    fn choose_rate(
        &mut self,
        participant: &Participant,
        desk: &mut Desk<'_>,
    ) -> Result<u8, RaceError> {
        Ok(choose_rate(participant, desk.config, desk.rng))
    }

    fn choose_cards(
        &mut self,
        participant: &Participant,
        required: usize,
        desk: &mut Desk<'_>,
    ) -> Result<Vec<usize>, RaceError> {
        Ok(choose_cards(&participant.store.hand, required, desk.config))
    }

    fn choose_motivation(
        &mut self,
        participant: &Participant,
        _ahead: &str,
        desk: &mut Desk<'_>,
    ) -> Result<bool, RaceError> {
        Ok(choose_motivation(participant, desk.config, desk.rng))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HumanPilot;

fn context(participant: &Participant) -> TurnContext {
    TurnContext {
        name: participant.name().to_string(),
        color: participant.identity.color.clone(),
        position: participant.position,
        rate: participant.rate,
        hand: participant.store.hand.clone(),
        stamina: participant.store.stamina(),
    }
}

fn ask(desk: &mut Desk<'_>, prompt: Prompt) -> Result<usize, RaceError> {
    let index = desk.presenter.choose(&prompt)?;
    if index >= prompt.options.len() {
        return Err(RaceError::InvalidChoice {
            index,
            options: prompt.options.len(),
        });
    }
    Ok(index)
}

fn playable_indices(hand: &[Card], taken: &[usize]) -> Vec<usize> {
    hand.iter()
        .enumerate()
        .filter(|(index, card)| card.is_playable() && !taken.contains(index))
        .map(|(index, _)| index)
        .collect()
}

impl Pilot for HumanPilot {
    fn choose_rate(
        &mut self,
        participant: &Participant,
        desk: &mut Desk<'_>,
    ) -> Result<u8, RaceError> {
        let config = desk.config;
        let current = participant.rate;
        let playable = participant.store.playable_count();
        let mut targets = vec![current];
        let mut options = vec![format!("Maintain rate {current}")];
        for rate in config.min_rate..=config.max_rate {
            // rates the hand cannot cover are not offered
            if rate == current || config.cards_required(rate) > playable {
                continue;
            }
            targets.push(rate);
            let cards = config.cards_required(rate);
            if current.abs_diff(rate) == 2 {
                options.push(format!("Jump to rate {rate} ({cards} cards, costs 1 stamina)"));
            } else {
                options.push(format!("Rate {rate} ({cards} cards)"));
            }
        }
        let prompt = Prompt::vertical(
            PromptKind::Rate,
            format!("{}: current rate {current}. Change?", participant.name()),
            options,
        )
        .with_context(context(participant));
        let index = ask(desk, prompt)?;
        Ok(targets[index])
    }

    fn choose_cards(
        &mut self,
        participant: &Participant,
        required: usize,
        desk: &mut Desk<'_>,
    ) -> Result<Vec<usize>, RaceError> {
        let hand = &participant.store.hand;
        let mut picked = Vec::with_capacity(required);
        for step in 0..required {
            let available = playable_indices(hand, &picked);
            if available.is_empty() {
                break;
            }
            let options = available
                .iter()
                .map(|index| hand[*index].short_label())
                .collect();
            let prompt = Prompt::horizontal(
                PromptKind::Card,
                format!("Select card {}/{required}", step + 1),
                options,
            )
            .with_context(context(participant));
            let choice = ask(desk, prompt)?;
            picked.push(available[choice]);
        }
        Ok(picked)
    }

    fn choose_discards(
        &mut self,
        participant: &Participant,
        desk: &mut Desk<'_>,
    ) -> Result<Vec<usize>, RaceError> {
        let hand = &participant.store.hand;
        if playable_indices(hand, &[]).is_empty() {
            return Ok(Vec::new());
        }
        let offer = Prompt::vertical(
            PromptKind::DiscardOffer,
            "Discard any cards?",
            vec!["No discard".to_string(), "Discard".to_string()],
        )
        .with_context(context(participant));
        if ask(desk, offer)? == 0 {
            return Ok(Vec::new());
        }
        let mut discarded = Vec::new();
        loop {
            let available = playable_indices(hand, &discarded);
            if available.is_empty() {
                break;
            }
            let mut options: Vec<String> = available
                .iter()
                .map(|index| hand[*index].short_label())
                .collect();
            options.push("Done".to_string());
            let prompt = Prompt::horizontal(PromptKind::Discard, "Select card to discard", options)
                .with_context(context(participant));
            let choice = ask(desk, prompt)?;
            let Some(index) = available.get(choice) else {
                break;
            };
            discarded.push(*index);
        }
        Ok(discarded)
    }

    fn choose_motivation(
        &mut self,
        participant: &Participant,
        ahead: &str,
        desk: &mut Desk<'_>,
    ) -> Result<bool, RaceError> {
        let bonus = &desk.config.bonus;
        let prompt = Prompt::vertical(
            PromptKind::Motivation,
            format!(
                "MOTIVATION: {} is drafting {ahead}. Activate?",
                participant.name()
            ),
            vec![
                format!(
                    "Activate Motivation (+{} spaces, costs {} stamina)",
                    bonus.drafting, bonus.drafting_cost
                ),
                "Hold position".to_string(),
            ],
        )
        .with_context(context(participant));
        Ok(ask(desk, prompt)? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CardStore, Control, Identity, ScriptedPresenter};

    fn human(hand: Vec<Card>, stamina: u32) -> Participant {
        let config = RaceConfig::default();
        let mut rng = RngState::from_seed(31);
        let mut p = Participant::new(
            Identity::new("Blue", "blue"),
            2,
            Control::Human,
            &config,
            &mut rng,
        );
        p.store = CardStore::from_parts(Vec::new(), hand, Vec::new(), stamina);
        p
    }

    #[test]
    fn rate_prompt_maps_options_to_targets() {
        let config = RaceConfig::default();
        let mut rng = RngState::from_seed(1);
        let mut presenter = ScriptedPresenter::new([2]);
        let p = human(vec![Card::Pace(1); 4], 3);
        let mut desk = Desk {
            config: &config,
            rng: &mut rng,
            presenter: &mut presenter,
        };
        assert_eq!(HumanPilot.choose_rate(&p, &mut desk), Ok(2));
        assert_eq!(presenter.asked[0].options.len(), 3);
        assert!(presenter.asked[0].options[2].contains("Jump"));
    }

    #[test]
    fn card_prompts_skip_already_picked_and_stamina() {
        let config = RaceConfig::default();
        let mut rng = RngState::from_seed(1);
        let mut presenter = ScriptedPresenter::new([1, 0]);
        let p = human(vec![Card::Pace(1), Card::Pace(3), Card::Stamina], 0);
        let mut desk = Desk {
            config: &config,
            rng: &mut rng,
            presenter: &mut presenter,
        };
        assert_eq!(HumanPilot.choose_cards(&p, 2, &mut desk), Ok(vec![1, 0]));
        assert_eq!(presenter.asked[1].options, vec!["1".to_string()]);
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        let config = RaceConfig::default();
        let mut rng = RngState::from_seed(1);
        let mut presenter = ScriptedPresenter::new([7]);
        let p = human(Vec::new(), 2);
        let mut desk = Desk {
            config: &config,
            rng: &mut rng,
            presenter: &mut presenter,
        };
        assert_eq!(
            HumanPilot.choose_motivation(&p, "Red", &mut desk),
            Err(RaceError::InvalidChoice {
                index: 7,
                options: 2
            })
        );
    }

    #[test]
    fn discard_loop_stops_on_done() {
        let config = RaceConfig::default();
        let mut rng = RngState::from_seed(1);
        let mut presenter = ScriptedPresenter::new([1, 0, 1]);
        let p = human(vec![Card::Pace(1), Card::Pace(2), Card::Stamina], 0);
        let mut desk = Desk {
            config: &config,
            rng: &mut rng,
            presenter: &mut presenter,
        };
        assert_eq!(HumanPilot.choose_discards(&p, &mut desk), Ok(vec![0]));
    }
}
