// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lowering: scenario step tree → flat, ordered [`ActionChain`].
//!
//! See §4.1 of the specification. Compilation is pure and deterministic
//! for a given scenario; randomness (uniform pause sampling, random
//! switch draws) only occurs at execution time, inside the produced
//! actions.

use crate::inline::run_steps;
use crate::synthetic::{CounterAction, FeedAction, PauseAction};
use async_trait::async_trait;
use loadgen_core::{Action, ActionChain, ActionChainError, ActionError, Scenario, ScenarioStep, Session};
use std::sync::Arc;
use thiserror::Error;

/// Errors building a chain from a scenario. Beyond an empty chain (which
/// cannot happen for a validated non-empty [`Scenario`] unless every top
/// level step is a zero-count `Repeat`), this wraps [`ActionChainError`].
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Chain(#[from] ActionChainError),
}

/// Lower a scenario into its canonical action chain.
pub fn compile(scenario: &Scenario) -> Result<ActionChain, CompileError> {
    let mut entries: Vec<(String, Arc<dyn Action>)> = Vec::new();
    lower_steps(&scenario.steps, "", &mut entries);
    ActionChain::new(entries).map_err(CompileError::from)
}

fn lower_steps(steps: &[ScenarioStep], prefix: &str, out: &mut Vec<(String, Arc<dyn Action>)>) {
    for step in steps {
        lower_step(step, prefix, out);
    }
}

fn lower_step(step: &ScenarioStep, prefix: &str, out: &mut Vec<(String, Arc<dyn Action>)>) {
    match step {
        ScenarioStep::Execute(name, body) => {
            out.push((format!("{prefix}{name}"), Arc::clone(body)));
        }
        ScenarioStep::Pause(strategy) => {
            out.push((
                format!("{prefix}_pause"),
                Arc::new(PauseAction {
                    strategy: strategy.clone(),
                }),
            ));
        }
        ScenarioStep::Feed(feeder) => {
            out.push((
                format!("{prefix}_feed:{}", feeder.name()),
                Arc::new(FeedAction {
                    feeder: Arc::clone(feeder),
                }),
            ));
        }
        ScenarioStep::Repeat(count, key, inner) => {
            // Unrolled at compile time: every inner action becomes a
            // top-level chain entry, once per iteration.
            for i in 0..*count {
                let iter_prefix = format!("{prefix}{key}[{i}].");
                out.push((
                    format!("{iter_prefix}_counter"),
                    Arc::new(CounterAction {
                        key: key.clone(),
                        value: i,
                    }),
                ));
                lower_steps(inner, &iter_prefix, out);
            }
        }
        ScenarioStep::Group(name, inner) => {
            let group_prefix = format!("{prefix}{name}.");
            lower_steps(inner, &group_prefix, out);
        }
        ScenarioStep::RepeatWhile(_, label, _)
        | ScenarioStep::IfCondition(_, label, _, _) => {
            out.push((format!("{prefix}{label}"), Arc::new(InlineAction::new(step.clone()))));
        }
        ScenarioStep::ExitIf(_) => {
            out.push((
                format!("{prefix}_exit_if"),
                Arc::new(InlineAction::new(step.clone())),
            ));
        }
        ScenarioStep::RandomSwitch(_) => {
            out.push((
                format!("{prefix}_switch"),
                Arc::new(InlineAction::new(step.clone())),
            ));
        }
    }
}

/// The single executable emitted for `RepeatWhile`, `IfCondition`,
/// `ExitIf`, and `RandomSwitch` — interprets its captured step inline
/// against the dispatched session rather than unrolling at compile time,
/// since its targets are data-dependent on session state at runtime.
struct InlineAction {
    step: ScenarioStep,
}

impl InlineAction {
    fn new(step: ScenarioStep) -> Self {
        Self { step }
    }
}

#[async_trait]
impl Action for InlineAction {
    async fn call(&self, session: &mut Session) -> Result<(), ActionError> {
        run_steps(std::slice::from_ref(&self.step), session).await
    }
}

#[cfg(test)]
#[path = "lower_tests.rs"]
mod tests;
