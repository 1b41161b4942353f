use skyduel_shared::TurnSnapshot;

/// Consumer of per-turn snapshots. The engine calls this once per turn, win
/// or not; pacing between turns is the reporter's business, never the
/// engine's.
pub trait TurnReporter {
    fn report_turn(&mut self, snapshot: &TurnSnapshot);
}

/// Reporter that discards every snapshot - for tests and batch harnesses.
pub struct NullReporter;

impl TurnReporter for NullReporter {
    fn report_turn(&mut self, _snapshot: &TurnSnapshot) {}
}
