use super::*;

#[test]
fn exit_signal_displays_as_sentinel() {
    assert_eq!(ExitSignal.to_string(), "exit sentinel");
}

#[test]
fn exit_signal_is_an_error() {
    let err: Box<dyn std::error::Error> = Box::new(ExitSignal);
    assert_eq!(err.to_string(), "exit sentinel");
}
