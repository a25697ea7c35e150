use serde::{Deserialize, Serialize};

pub use pacerace_core::{
    AggressionProfile, BonusRule, Checkpoint, CheckpointTable, DeckRule, Identity, PolicyRule,
    RaceConfig,
};

/// One titled block of the rules text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleSection {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleBook {
    pub sections: Vec<RuleSection>,
}

impl RuleBook {
    pub fn titles(&self) -> Vec<&str> {
        self.sections
            .iter()
            .map(|section| section.title.as_str())
            .collect()
    }

    pub fn section(&self, title: &str) -> Option<&RuleSection> {
        self.sections.iter().find(|section| section.title == title)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
