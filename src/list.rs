//src/list.rs
use crate::workout::{Variant, Workout, WorkoutKind};

/// Affordances a card offers; the host reports them back to `App::card_action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Focus,
    Edit,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardStat {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// Display projection of one workout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutCard {
    pub id: String,
    pub variant: Variant,
    pub title: String,
    pub stats: Vec<CardStat>,
}

/// Projects a workout to its card: distance, duration and the two
/// variant-specific values.
pub fn project(workout: &Workout) -> WorkoutCard {
    let mut stats = vec![
        CardStat {
            icon: workout.variant().icon(),
            value: workout.distance().to_string(),
            unit: "km",
        },
        CardStat {
            icon: "⏱",
            value: workout.duration().to_string(),
            unit: "min",
        },
    ];
    match *workout.kind() {
        WorkoutKind::Running(run) => {
            stats.push(CardStat {
                icon: "⚡️",
                value: format!("{:.1}", run.pace),
                unit: "min/km",
            });
            stats.push(CardStat {
                icon: "🦶🏼",
                value: run.cadence.to_string(),
                unit: "spm",
            });
        }
        WorkoutKind::Cycling(ride) => {
            stats.push(CardStat {
                icon: "⚡️",
                value: format!("{:.1}", ride.speed),
                unit: "km/h",
            });
            stats.push(CardStat {
                icon: "⛰",
                value: ride.elevation_gain.to_string(),
                unit: "m",
            });
        }
    }
    WorkoutCard {
        id: workout.id().to_string(),
        variant: workout.variant(),
        title: workout.description().to_string(),
        stats,
    }
}

/// Rendered cards, newest first.
#[derive(Debug, Default, Clone)]
pub struct WorkoutList {
    cards: Vec<WorkoutCard>,
}

impl WorkoutList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `workout`: an existing card with the same id is redrawn in
    /// place, otherwise the card goes on top.
    pub fn render(&mut self, workout: &Workout) {
        let card = project(workout);
        match self.cards.iter_mut().find(|c| c.id == card.id) {
            Some(existing) => *existing = card,
            None => self.cards.insert(0, card),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<WorkoutCard> {
        let index = self.cards.iter().position(|c| c.id == id)?;
        Some(self.cards.remove(index))
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn cards(&self) -> &[WorkoutCard] {
        &self.cards
    }

    pub fn card(&self, id: &str) -> Option<&WorkoutCard> {
        self.cards.iter().find(|c| c.id == id)
    }
}
