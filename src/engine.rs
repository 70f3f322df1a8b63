use crate::clock::{Clock, days_between};
use crate::milestone::{MilestoneTable, evaluate};
use crate::models::{CheckInOutcome, CheckInResult, StreakState};
use crate::store::KeyValueStore;
use tracing::{debug, info};

/// Daily check-in state machine.
///
/// The engine is the only writer of the streak keys. It owns nothing global:
/// store, clock and milestone table are all handed in.
pub struct StreakEngine<'t, S, C> {
    store: S,
    clock: C,
    milestones: &'t MilestoneTable,
}

impl<'t, S: KeyValueStore, C: Clock> StreakEngine<'t, S, C> {
    pub fn new(store: S, clock: C, milestones: &'t MilestoneTable) -> Self {
        Self {
            store,
            clock,
            milestones,
        }
    }

    pub fn state(&self) -> StreakState {
        StreakState::load(&self.store)
    }

    pub fn check_in(&mut self) -> CheckInResult {
        let today = self.clock.today();
        let state = self.state();

        let (outcome, count) = match state.last_check_in {
            Some(last) if last == today => {
                return CheckInResult {
                    outcome: CheckInOutcome::AlreadyCheckedIn,
                    count: state.count,
                    milestone_reached: None,
                };
            }
            None => (CheckInOutcome::Started, 1),
            Some(last) => match days_between(last, today) {
                1 => (CheckInOutcome::Continued, state.count.saturating_add(1)),
                diff => {
                    if diff <= 0 {
                        debug!(%last, %today, diff, "clock moved backwards, restarting streak");
                    }
                    (CheckInOutcome::Reset, 1)
                }
            },
        };

        let milestone = evaluate(
            self.milestones,
            state.count,
            count,
            state.highest_milestone_acknowledged,
        );

        StreakState {
            count,
            last_check_in: Some(today),
            highest_milestone_acknowledged: milestone.acknowledged,
        }
        .save(&mut self.store);

        info!(?outcome, count, milestone = ?milestone.reached, %today, "checked in");

        CheckInResult {
            outcome,
            count,
            milestone_reached: milestone.reached,
        }
    }

    pub fn reset(&mut self) {
        StreakState::default().save(&mut self.store);
        info!("streak reset");
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
