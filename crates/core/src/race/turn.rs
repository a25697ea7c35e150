use super::*;
use crate::{resolve_checkpoint, resolve_movement, Card, Desk, Movement};

/// Per-participant phases. Each returns early through `?` or an explicit
/// `return`; nothing here loops over participants.
impl Race {
    pub(super) fn play_turn(
        &mut self,
        index: usize,
        presenter: &mut dyn Presenter,
    ) -> Result<TurnReport, RaceError> {
        let Race {
            config,
            entrants,
            rng,
            events,
            ..
        } = self;
        let Entrant { participant, pilot } = &mut entrants[index];
        let name = participant.name().to_string();
        events.push(RaceEvent::TurnStarted {
            name: name.clone(),
            round: participant.round + 1,
            position: participant.position,
            rate: participant.rate,
        });

        refill_phase(participant, config, rng, events);

        let required = config.cards_required(participant.rate);
        let playable = participant.store.playable_count();
        if participant.check_clustered_hand(required, config) {
            log::debug!("{name} stalled with a cluttered hand");
            events.push(RaceEvent::ClusteredHand {
                name: name.clone(),
                required,
                playable,
            });
            replenish_phase(participant, config, rng, events);
            return Ok(TurnReport {
                name,
                outcome: TurnOutcome::Skipped { required, playable },
            });
        }

        let mut desk = Desk {
            config,
            rng,
            presenter,
        };
        let target = pilot.choose_rate(participant, &mut desk)?;
        let change = participant.set_rate(target, config)?;
        events.push(RaceEvent::RateChanged {
            name: name.clone(),
            change,
        });

        let required = config.cards_required(participant.rate);
        let selection = pilot.choose_cards(participant, required, &mut desk)?;
        let played = take_selection(participant, &selection, required)?;

        let movement = movement_phase(participant, played, config, desk.rng);
        events.push(RaceEvent::CardsPlayed {
            name: name.clone(),
            cards: movement.played.iter().map(Card::short_label).collect(),
            distance: movement.distance,
        });

        let report = resolve_checkpoint(participant, movement.distance, config);
        events.push(RaceEvent::Checkpoint {
            name: name.clone(),
            outcome: report.outcome,
            threshold: report.threshold,
            limit: report.limit,
            movement: report.movement,
            from: report.from,
            to: report.to,
            stamina_paid: report.stamina_paid,
        });

        let discards = pilot.choose_discards(participant, &mut desk)?;
        if !discards.is_empty() {
            let cards = participant
                .store
                .take_from_hand(&discards)
                .filter(|cards| cards.iter().all(Card::is_playable))
                .ok_or_else(|| RaceError::InvalidSelection(format!("discard {discards:?}")))?;
            events.push(RaceEvent::CardsDiscarded {
                name: name.clone(),
                count: cards.len(),
            });
            participant.store.discard_cards(cards);
        }

        replenish_phase(participant, config, desk.rng, events);
        participant.round += 1;

        debug_assert!(participant.position <= config.course_length);
        debug_assert!(config.rate_in_range(participant.rate));
        Ok(TurnReport {
            name,
            outcome: TurnOutcome::Moved(report),
        })
    }
}

fn refill_phase(
    participant: &mut Participant,
    config: &RaceConfig,
    rng: &mut RngState,
    events: &mut EventBus,
) {
    let refill = participant.store.refill(config.hand_limit, rng);
    if refill.fallback_cards > 0 {
        log::warn!(
            "{} ran out of cards; {} fallback cards added",
            participant.name(),
            refill.fallback_cards
        );
    }
    if refill.drawn > 0 {
        events.push(RaceEvent::HandRefilled {
            name: participant.name().to_string(),
            drawn: refill.drawn,
            reshuffles: refill.reshuffles,
            fallback_cards: refill.fallback_cards,
        });
    }
}

/// Checks a pilot's selection and pulls the cards out of the hand.
fn take_selection(
    participant: &mut Participant,
    selection: &[usize],
    required: usize,
) -> Result<Vec<Card>, RaceError> {
    if selection.len() != required {
        return Err(RaceError::InvalidSelection(format!(
            "expected {required} cards, got {}",
            selection.len()
        )));
    }
    let hand = &participant.store.hand;
    if let Some(index) = selection
        .iter()
        .find(|index| hand.get(**index).map_or(true, |card| !card.is_playable()))
    {
        return Err(RaceError::InvalidSelection(format!(
            "hand index {index} is not a playable card"
        )));
    }
    participant
        .store
        .take_from_hand(selection)
        .ok_or_else(|| RaceError::InvalidSelection(format!("repeated index in {selection:?}")))
}

fn movement_phase(
    participant: &mut Participant,
    played: Vec<Card>,
    config: &RaceConfig,
    rng: &mut RngState,
) -> Movement {
    let movement = resolve_movement(&mut participant.store, played, config, rng);
    log::debug!(
        "{} plays {} cards for {}",
        participant.name(),
        movement.played.len(),
        movement.distance
    );
    movement
}

fn replenish_phase(
    participant: &mut Participant,
    config: &RaceConfig,
    rng: &mut RngState,
    events: &mut EventBus,
) {
    let upkeep = participant.apply_rate_upkeep(config);
    if upkeep != crate::Upkeep::None {
        events.push(RaceEvent::RateUpkeep {
            name: participant.name().to_string(),
            upkeep,
        });
    }
    refill_phase(participant, config, rng, events);
}
