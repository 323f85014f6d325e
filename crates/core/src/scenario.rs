// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario model: an algebraic step tree and a builder for it.
//!
//! A [`Scenario`] is the high-level, composable description of one
//! virtual-user iteration; `loadgen-compiler` lowers it into a flat
//! [`crate::action::ActionChain`] (see §4.1 of the specification this
//! crate implements).

use crate::action::Action;
use crate::feeder::Feeder;
use crate::session::Session;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// A boolean test over the current session, used by `RepeatWhile`,
/// `IfCondition`, and `ExitIf`.
pub trait Predicate: Send + Sync {
    fn test(&self, session: &Session) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&Session) -> bool + Send + Sync,
{
    fn test(&self, session: &Session) -> bool {
        (self)(session)
    }
}

/// How a `Pause` step waits between the previous and next step.
#[derive(Clone)]
pub enum PauseStrategy {
    Fixed(Duration),
    Uniform(Duration, Duration),
    None,
}

impl PauseStrategy {
    /// Build a `Uniform` strategy, rejecting `min > max` synchronously
    /// (§7 configuration errors).
    pub fn uniform(min: Duration, max: Duration) -> Result<Self, ScenarioError> {
        if min > max {
            return Err(ScenarioError::InvalidUniformPause { min, max });
        }
        Ok(Self::Uniform(min, max))
    }

    /// Sample a concrete duration for one invocation.
    pub fn sample(&self) -> Duration {
        match self {
            PauseStrategy::Fixed(d) => *d,
            PauseStrategy::Uniform(min, max) => {
                if min == max {
                    *min
                } else {
                    let lo = min.as_millis() as u64;
                    let hi = max.as_millis() as u64;
                    let ms = rand::Rng::gen_range(&mut rand::thread_rng(), lo..=hi);
                    Duration::from_millis(ms)
                }
            }
            PauseStrategy::None => Duration::ZERO,
        }
    }
}

/// One weighted branch of a `RandomSwitch`.
#[derive(Clone)]
pub struct Branch {
    pub weight: f64,
    pub steps: Vec<ScenarioStep>,
}

/// Tagged variant of one step in a scenario's step tree.
#[derive(Clone)]
pub enum ScenarioStep {
    Execute(String, Arc<dyn Action>),
    Pause(PauseStrategy),
    Feed(Arc<dyn Feeder>),
    Repeat(usize, String, Vec<ScenarioStep>),
    RepeatWhile(Arc<dyn Predicate>, String, Vec<ScenarioStep>),
    IfCondition(Arc<dyn Predicate>, String, Vec<ScenarioStep>, Vec<ScenarioStep>),
    ExitIf(Arc<dyn Predicate>),
    RandomSwitch(Vec<Branch>),
    Group(String, Vec<ScenarioStep>),
}

impl ScenarioStep {
    pub fn execute(name: impl Into<String>, body: impl Action + 'static) -> Self {
        Self::Execute(name.into(), Arc::new(body))
    }

    pub fn pause(strategy: PauseStrategy) -> Self {
        Self::Pause(strategy)
    }

    pub fn feed(feeder: impl Feeder + 'static) -> Self {
        Self::Feed(Arc::new(feeder))
    }

    pub fn repeat(count: usize, counter_key: impl Into<String>, steps: Vec<ScenarioStep>) -> Self {
        Self::Repeat(count, counter_key.into(), steps)
    }

    pub fn repeat_while(
        predicate: impl Predicate + 'static,
        label: impl Into<String>,
        steps: Vec<ScenarioStep>,
    ) -> Self {
        Self::RepeatWhile(Arc::new(predicate), label.into(), steps)
    }

    pub fn if_condition(
        predicate: impl Predicate + 'static,
        label: impl Into<String>,
        then_steps: Vec<ScenarioStep>,
        else_steps: Vec<ScenarioStep>,
    ) -> Self {
        Self::IfCondition(Arc::new(predicate), label.into(), then_steps, else_steps)
    }

    pub fn exit_if(predicate: impl Predicate + 'static) -> Self {
        Self::ExitIf(Arc::new(predicate))
    }

    /// Build a `RandomSwitch`, rejecting an empty branch list, negative
    /// weights, or non-finite weights synchronously.
    pub fn random_switch(branches: Vec<(f64, Vec<ScenarioStep>)>) -> Result<Self, ScenarioError> {
        if branches.is_empty() {
            return Err(ScenarioError::EmptyRandomSwitch);
        }
        for (weight, _) in &branches {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ScenarioError::InvalidBranchWeight(*weight));
            }
        }
        Ok(Self::RandomSwitch(
            branches
                .into_iter()
                .map(|(weight, steps)| Branch { weight, steps })
                .collect(),
        ))
    }

    pub fn group(name: impl Into<String>, steps: Vec<ScenarioStep>) -> Self {
        Self::Group(name.into(), steps)
    }
}

/// `(name, list of steps)`; both must be non-empty.
pub struct Scenario {
    pub name: String,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, steps: Vec<ScenarioStep>) -> Result<Self, ScenarioError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ScenarioError::BlankName);
        }
        if steps.is_empty() {
            return Err(ScenarioError::EmptySteps);
        }
        Ok(Self { name, steps })
    }

    pub fn builder(name: impl Into<String>) -> ScenarioBuilder {
        ScenarioBuilder {
            name: name.into(),
            steps: Vec::new(),
        }
    }
}

/// Fluent builder for a [`Scenario`].
pub struct ScenarioBuilder {
    name: String,
    steps: Vec<ScenarioStep>,
}

impl ScenarioBuilder {
    pub fn step(mut self, step: ScenarioStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn exec(self, name: impl Into<String>, body: impl Action + 'static) -> Self {
        self.step(ScenarioStep::execute(name, body))
    }

    pub fn pause(self, strategy: PauseStrategy) -> Self {
        self.step(ScenarioStep::pause(strategy))
    }

    pub fn feed(self, feeder: impl Feeder + 'static) -> Self {
        self.step(ScenarioStep::feed(feeder))
    }

    pub fn build(self) -> Result<Scenario, ScenarioError> {
        Scenario::new(self.name, self.steps)
    }
}

/// Configuration errors surfaced synchronously at scenario-construction
/// time (§7); the runtime never starts with an invalid scenario.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ScenarioError {
    #[error("scenario name must be non-blank")]
    BlankName,
    #[error("scenario must have at least one step")]
    EmptySteps,
    #[error("uniform pause requires min <= max, got min={min:?} max={max:?}")]
    InvalidUniformPause { min: Duration, max: Duration },
    #[error("random switch requires at least one branch")]
    EmptyRandomSwitch,
    #[error("random switch branch weight must be finite and non-negative, got {0}")]
    InvalidBranchWeight(f64),
}

#[cfg(test)]
#[path = "scenario_tests.rs"]
mod tests;
