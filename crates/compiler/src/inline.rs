// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inline interpretation of the step variants the compiler does not
//! unroll at compile time: `RepeatWhile`, `IfCondition`, `ExitIf`, and
//! `RandomSwitch`. These are data-dependent on the session at runtime,
//! so unrolling them would be incorrect (`RepeatWhile`) or unbounded
//! (`RandomSwitch`'s weighted draw); instead the compiler emits a single
//! named executable that interprets the nested steps inline, without
//! dispatching each inner step to the pool.
//!
//! Inline execution supports every step variant, including nested
//! `Repeat`, so behavior matches compiled form for those inner steps —
//! differing only in that inner actions share the latency envelope and
//! pool of the enclosing action (§4.1).

use loadgen_core::{Action, ActionError, ScenarioStep, Session};
use rand::Rng;
use std::future::Future;
use std::pin::Pin;

/// Runs a list of steps inline against `session`, recursing into nested
/// control-flow steps. Boxed because `async fn` cannot recurse directly.
pub fn run_steps<'a>(
    steps: &'a [ScenarioStep],
    session: &'a mut Session,
) -> Pin<Box<dyn Future<Output = Result<(), ActionError>> + Send + 'a>> {
    Box::pin(async move {
        for step in steps {
            run_step(step, session).await?;
        }
        Ok(())
    })
}

fn run_step<'a>(
    step: &'a ScenarioStep,
    session: &'a mut Session,
) -> Pin<Box<dyn Future<Output = Result<(), ActionError>> + Send + 'a>> {
    Box::pin(async move {
        match step {
            ScenarioStep::Execute(_, body) => body.call(session).await,
            ScenarioStep::Pause(strategy) => {
                let duration = strategy.sample();
                if !duration.is_zero() {
                    tokio::time::sleep(duration).await;
                }
                Ok(())
            }
            ScenarioStep::Feed(feeder) => {
                if !feeder.has_next() {
                    return Err(ActionError::exit());
                }
                match feeder.next() {
                    Some(row) => {
                        session.merge(row);
                        Ok(())
                    }
                    None => Err(ActionError::exit()),
                }
            }
            ScenarioStep::Repeat(count, key, inner) => {
                for i in 0..*count {
                    session.set(key.clone(), i as i64);
                    run_steps(inner, session).await?;
                }
                Ok(())
            }
            ScenarioStep::RepeatWhile(predicate, _label, inner) => {
                while predicate.test(session) {
                    run_steps(inner, session).await?;
                }
                Ok(())
            }
            ScenarioStep::IfCondition(predicate, _label, then_steps, else_steps) => {
                if predicate.test(session) {
                    run_steps(then_steps, session).await
                } else {
                    run_steps(else_steps, session).await
                }
            }
            ScenarioStep::ExitIf(predicate) => {
                if predicate.test(session) {
                    Err(ActionError::exit())
                } else {
                    Ok(())
                }
            }
            ScenarioStep::RandomSwitch(branches) => {
                let chosen = pick_branch(branches);
                run_steps(&chosen.steps, session).await
            }
            ScenarioStep::Group(_name, inner) => run_steps(inner, session).await,
        }
    })
}

/// §4.1 RandomSwitch semantics: draw `r` uniform over `[0, W)` and pick
/// the first branch whose cumulative weight exceeds `r`.
fn pick_branch(branches: &[loadgen_core::Branch]) -> &loadgen_core::Branch {
    let total: f64 = branches.iter().map(|b| b.weight).sum();
    let r = if total > 0.0 {
        rand::thread_rng().gen_range(0.0..total)
    } else {
        0.0
    };
    let mut cumulative = 0.0;
    branches
        .iter()
        .find(|branch| {
            cumulative += branch.weight;
            cumulative > r
        })
        .unwrap_or_else(|| &branches[branches.len() - 1])
}

#[cfg(test)]
#[path = "inline_tests.rs"]
mod tests;
