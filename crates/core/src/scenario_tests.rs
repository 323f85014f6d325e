use super::*;

fn noop(_session: &mut Session) -> Result<(), crate::action::ActionError> {
    Ok(())
}

#[test]
fn uniform_pause_rejects_min_greater_than_max() {
    let err = PauseStrategy::uniform(Duration::from_millis(10), Duration::from_millis(5))
        .unwrap_err();
    assert!(matches!(err, ScenarioError::InvalidUniformPause { .. }));
}

#[test]
fn uniform_pause_samples_within_bounds() {
    let strategy =
        PauseStrategy::uniform(Duration::from_millis(5), Duration::from_millis(10)).unwrap();
    for _ in 0..100 {
        let d = strategy.sample();
        assert!(d >= Duration::from_millis(5) && d <= Duration::from_millis(10));
    }
}

#[test]
fn fixed_pause_always_samples_the_same_duration() {
    let strategy = PauseStrategy::Fixed(Duration::from_millis(42));
    assert_eq!(strategy.sample(), Duration::from_millis(42));
}

#[test]
fn none_pause_samples_zero() {
    assert_eq!(PauseStrategy::None.sample(), Duration::ZERO);
}

#[test]
fn scenario_rejects_blank_name() {
    let err = Scenario::new("  ", vec![ScenarioStep::execute("a", noop)]).unwrap_err();
    assert_eq!(err, ScenarioError::BlankName);
}

#[test]
fn scenario_rejects_empty_steps() {
    let err = Scenario::new("s", vec![]).unwrap_err();
    assert_eq!(err, ScenarioError::EmptySteps);
}

#[test]
fn scenario_builder_produces_valid_scenario() {
    let scenario = Scenario::builder("checkout")
        .exec("login", noop)
        .pause(PauseStrategy::None)
        .build()
        .unwrap();
    assert_eq!(scenario.name, "checkout");
    assert_eq!(scenario.steps.len(), 2);
}

#[test]
fn random_switch_rejects_empty_branches() {
    let err = ScenarioStep::random_switch(vec![]).unwrap_err();
    assert_eq!(err, ScenarioError::EmptyRandomSwitch);
}

#[test]
fn random_switch_rejects_negative_weight() {
    let err = ScenarioStep::random_switch(vec![(-1.0, vec![ScenarioStep::execute("a", noop)])])
        .unwrap_err();
    assert!(matches!(err, ScenarioError::InvalidBranchWeight(_)));
}

#[test]
fn random_switch_rejects_non_finite_weight() {
    let err = ScenarioStep::random_switch(vec![(f64::NAN, vec![ScenarioStep::execute("a", noop)])])
        .unwrap_err();
    assert!(matches!(err, ScenarioError::InvalidBranchWeight(_)));
}

#[test]
fn random_switch_accepts_single_branch() {
    let step = ScenarioStep::random_switch(vec![(100.0, vec![ScenarioStep::execute("a", noop)])])
        .unwrap();
    assert!(matches!(step, ScenarioStep::RandomSwitch(branches) if branches.len() == 1));
}

#[test]
fn predicate_closure_blanket_impl() {
    let predicate = |session: &Session| session.contains("error");
    let mut session = Session::new();
    assert!(!predicate.test(&session));
    session.set("error", true);
    assert!(predicate.test(&session));
}
