use crate::{ConfigError, Control, Identity, Participant, RaceConfig, RngState};

/// Seats the chosen identities in random free lanes and fills the remaining
/// lanes with policy participants from the unused palette entries, in
/// palette order. The result is ordered by lane.
pub fn build_roster(
    config: &RaceConfig,
    humans: &[String],
    rng: &mut RngState,
) -> Result<Vec<Participant>, ConfigError> {
    if humans.len() > config.lanes {
        return Err(ConfigError::TooManyParticipants {
            chosen: humans.len(),
            lanes: config.lanes,
        });
    }
    if config.identities.len() < config.lanes {
        return Err(ConfigError::NotEnoughIdentities {
            identities: config.identities.len(),
            lanes: config.lanes,
        });
    }

    let mut chosen: Vec<&Identity> = Vec::with_capacity(humans.len());
    for name in humans {
        let identity = find_identity(config, name)
            .ok_or_else(|| ConfigError::UnknownIdentity(name.clone()))?;
        if chosen.iter().any(|taken| taken.name == identity.name) {
            return Err(ConfigError::DuplicateIdentity(identity.name.clone()));
        }
        chosen.push(identity);
    }

    let mut free_lanes: Vec<usize> = (1..=config.lanes).collect();
    let mut roster = Vec::with_capacity(config.lanes);
    for identity in &chosen {
        let slot = rng.pick_index(free_lanes.len()).unwrap_or(0);
        let lane = free_lanes.remove(slot);
        log::debug!("{} takes lane {lane}", identity.name);
        roster.push(Participant::new(
            (*identity).clone(),
            lane,
            Control::Human,
            config,
            rng,
        ));
    }

    let leftovers = config
        .identities
        .iter()
        .filter(|identity| !chosen.iter().any(|taken| taken.name == identity.name));
    for (lane, identity) in free_lanes.into_iter().zip(leftovers) {
        roster.push(Participant::new(
            identity.clone(),
            lane,
            Control::Policy,
            config,
            rng,
        ));
    }
    roster.sort_by_key(|participant| participant.lane);
    Ok(roster)
}

fn find_identity<'a>(config: &'a RaceConfig, name: &str) -> Option<&'a Identity> {
    config
        .identities
        .iter()
        .find(|identity| identity.name.eq_ignore_ascii_case(name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(roster: &[Participant]) -> Vec<&str> {
        roster.iter().map(Participant::name).collect()
    }

    #[test]
    fn policy_only_roster_uses_palette_order() {
        let config = RaceConfig::default();
        let mut rng = RngState::from_seed(9);
        let roster = build_roster(&config, &[], &mut rng).expect("roster");
        assert_eq!(
            names(&roster),
            vec!["Black", "Red", "Green", "Brown", "Blue", "Purple"]
        );
        let lanes: Vec<usize> = roster.iter().map(|p| p.lane).collect();
        assert_eq!(lanes, vec![1, 2, 3, 4, 5, 6]);
        assert!(roster.iter().all(|p| p.control == Control::Policy));
    }

    #[test]
    fn humans_take_distinct_lanes() {
        let config = RaceConfig::default();
        for seed in 0..20 {
            let mut rng = RngState::from_seed(seed);
            let humans = vec!["cyan".to_string(), "Red".to_string()];
            let roster = build_roster(&config, &humans, &mut rng).expect("roster");
            assert_eq!(roster.len(), 6);
            let mut lanes: Vec<usize> = roster.iter().map(|p| p.lane).collect();
            lanes.dedup();
            assert_eq!(lanes, vec![1, 2, 3, 4, 5, 6]);
            let human_names: Vec<&str> = roster
                .iter()
                .filter(|p| p.is_human())
                .map(Participant::name)
                .collect();
            assert_eq!(human_names.len(), 2);
            assert!(human_names.contains(&"Cyan"));
            assert!(!roster
                .iter()
                .any(|p| p.control == Control::Policy && p.name() == "Red"));
        }
    }

    #[test]
    fn roster_rejects_bad_choices() {
        let config = RaceConfig::default();
        let mut rng = RngState::from_seed(1);
        assert_eq!(
            build_roster(&config, &["Magenta".to_string()], &mut rng).err(),
            Some(ConfigError::UnknownIdentity("Magenta".to_string()))
        );
        assert_eq!(
            build_roster(&config, &["Red".to_string(), "red".to_string()], &mut rng).err(),
            Some(ConfigError::DuplicateIdentity("Red".to_string()))
        );
        let everyone: Vec<String> = config.identities.iter().map(|i| i.name.clone()).collect();
        assert_eq!(
            build_roster(&config, &everyone, &mut rng).err(),
            Some(ConfigError::TooManyParticipants {
                chosen: 8,
                lanes: 6
            })
        );
    }
}
