use crate::game::*;
use crate::*;

/// One decision taken by one seat during self-play.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub seat: Seat,
    /// observation of the acting player
    pub encoding: Vec<f32>,
    /// dense indices of the legal actions
    pub legal: Vec<usize>,
    /// dense index of the action taken
    pub action: usize,
    /// oracle probability of the taken action when it was taken
    pub prior: Probability,
    /// normalized root visit counts over the dense action space
    pub target: Vec<Probability>,
    /// oracle value estimate for the acting player
    pub value: Utility,
    /// immediate reward after backfill
    pub reward: Utility,
}

/// Every decision one seat made in one finished game.
///
/// Rewards are sparse: the last step carries the seat's outcome and every
/// earlier step carries zero, so rewards always sum to the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    seat: Seat,
    steps: Vec<Step>,
    outcome: Utility,
}

impl Trajectory {
    /// close out a seat's steps with its terminal outcome
    pub fn new(seat: Seat, mut steps: Vec<Step>, outcome: Utility) -> Self {
        steps.iter_mut().for_each(|s| s.reward = 0.);
        if let Some(last) = steps.last_mut() {
            last.reward = outcome;
        }
        Self {
            seat,
            steps,
            outcome,
        }
    }
    pub fn seat(&self) -> Seat {
        self.seat
    }
    pub fn outcome(&self) -> Utility {
        self.outcome
    }
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
    pub fn len(&self) -> usize {
        self.steps.len()
    }
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

/// How terminal outcomes turn into per-step returns. Shared by self-play
/// and the trainer for a whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reward {
    /// per-step discount; 1.0 backfills the outcome to every step
    pub gamma: Utility,
}

impl Default for Reward {
    fn default() -> Self {
        Self { gamma: GAMMA }
    }
}

impl Reward {
    /// discounted reward-to-go of every step
    pub fn returns(&self, steps: &[Step]) -> Vec<Utility> {
        let mut returns = steps
            .iter()
            .rev()
            .scan(0., |acc: &mut Utility, step| {
                *acc = step.reward + self.gamma * *acc;
                Some(*acc)
            })
            .collect::<Vec<Utility>>();
        returns.reverse();
        returns
    }
}
