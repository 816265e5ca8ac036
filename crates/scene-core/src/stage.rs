//! Cyclic stage sequencing for staged diagrams ("Build → Ship → Run").

use crate::error::{SceneError, SceneResult};
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    pub name: String,
    /// Seconds spent in this stage before moving on.
    pub duration: f32,
}

impl Stage {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageTransition {
    pub from: usize,
    pub to: usize,
    /// Moved from the last stage back to the first.
    pub wrapped: bool,
}

/// Advances through stages one way and wraps to the first.
#[derive(Clone, Debug)]
pub struct StageMachine {
    stages: SmallVec<[Stage; 6]>,
    current: usize,
    elapsed: f32,
    cycles: u64,
}

impl StageMachine {
    pub fn new(stages: impl IntoIterator<Item = Stage>) -> SceneResult<Self> {
        let stages: SmallVec<[Stage; 6]> = stages.into_iter().collect();
        if stages.is_empty() {
            return Err(SceneError::InvalidConfig("stage list is empty".into()));
        }
        if let Some(bad) = stages.iter().find(|s| !s.duration.is_finite() || s.duration <= 0.0) {
            return Err(SceneError::InvalidConfig(format!(
                "stage {:?} needs a positive duration, got {}",
                bad.name, bad.duration
            )));
        }
        if stages.len() > 32 {
            return Err(SceneError::InvalidConfig("at most 32 stages are supported".into()));
        }
        Ok(Self {
            stages,
            current: 0,
            elapsed: 0.0,
            cycles: 0,
        })
    }

    /// Length of one full pass through every stage.
    pub fn cycle_duration(&self) -> f32 {
        self.stages.iter().map(|s| s.duration).sum()
    }

    /// Advance by `dt` seconds, returning the transitions taken in order.
    ///
    /// A step longer than two cycles counts the whole cycles it skips in
    /// [`cycles`](Self::cycles) but reports at most one cycle of transitions.
    pub fn advance(&mut self, dt: f32) -> SmallVec<[StageTransition; 2]> {
        let mut taken = SmallVec::new();
        if !dt.is_finite() || dt <= 0.0 {
            return taken;
        }
        self.elapsed += dt;
        let cycle = self.cycle_duration();
        if self.elapsed >= cycle * 2.0 {
            let laps = (self.elapsed / cycle).floor();
            self.elapsed = cycle + self.elapsed.rem_euclid(cycle);
            self.cycles += (laps as u64).saturating_sub(1);
        }
        while self.elapsed >= self.stages[self.current].duration {
            self.elapsed -= self.stages[self.current].duration;
            let from = self.current;
            let to = (from + 1) % self.stages.len();
            let wrapped = to == 0;
            if wrapped {
                self.cycles += 1;
            }
            self.current = to;
            taken.push(StageTransition { from, to, wrapped });
        }
        taken
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Stage {
        &self.stages[self.current]
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Progress through the current stage in `[0, 1)`.
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.stages[self.current].duration).clamp(0.0, 1.0)
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}
