use std::process::ExitCode;

use foxgrove_engine::{InputAction, InputSnapshot, StepClock};
use tracing::{debug, info};

use super::bootstrap::AppWiring;

/// Frames in one pass of the scripted input sequence.
const SCRIPT_PERIOD_TICKS: u64 = 480;

pub fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        config,
        mut world,
        frames,
    } = app;
    let mut clock = StepClock::new(&config);
    let dt = clock.fixed_dt_seconds();
    let script = ScriptedInput::new(u64::from(frames));

    'frames: loop {
        let plan = clock.advance_frame(clock.fixed_dt());
        for _ in 0..plan.ticks_to_run {
            let input = script.snapshot(world.tick_count());
            if input.quit_requested() {
                info!(tick = world.tick_count(), "quit_requested");
                break 'frames;
            }
            world.tick(dt, &input);
            let counts = world.last_tick_event_counts();
            if counts.total > 0 {
                debug!(
                    tick = world.tick_count(),
                    events = counts.total,
                    attack_connected = counts.attack_connected,
                    damage_taken = counts.damage_taken,
                    push_performed = counts.push_performed,
                    footstep = counts.footstep,
                    "tick_events"
                );
            }
        }
        if !world.hero().is_alive() {
            break;
        }
    }

    let hud = world.hud();
    info!(
        ticks = world.tick_count(),
        area = %world.area().def_name,
        health = hud.health,
        max_health = hud.max_health,
        mood = hud.mood.as_str(),
        alive = hud.alive,
        kills = world.progress().total_kills(),
        "run_summary"
    );
    ExitCode::SUCCESS
}

/// Canned input for headless runs. Quit is pressed once `quit_at_tick` is
/// reached.
struct ScriptedInput {
    quit_at_tick: u64,
}

impl ScriptedInput {
    fn new(quit_at_tick: u64) -> Self {
        Self { quit_at_tick }
    }

    fn snapshot(&self, tick: u64) -> InputSnapshot {
        if tick >= self.quit_at_tick {
            return InputSnapshot::empty().with_action_pressed(InputAction::Quit, true);
        }
        scripted_moves(tick)
    }
}

/// Walks a loop around the start point: right while attacking, a run down,
/// an interact press, then left and up back home with a short rest.
fn scripted_moves(tick: u64) -> InputSnapshot {
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_repeats_every_period() {
        let script = ScriptedInput::new(u64::MAX);
        for tick in [0, 150, 200, 250, 320, 400, 460, 470] {
            assert_eq!(
                script.snapshot(tick),
                script.snapshot(tick + SCRIPT_PERIOD_TICKS)
            );
        }
    }

    #[test]
    fn script_presses_interact_once_per_period() {
        let presses = (0..SCRIPT_PERIOD_TICKS)
            .filter(|tick| scripted_moves(*tick).was_pressed(InputAction::Interact))
            .count();
        assert_eq!(presses, 1);
    }

    #[test]
    fn script_requests_quit_at_its_budget() {
        let script = ScriptedInput::new(90);
        assert!(!script.snapshot(89).quit_requested());
        assert!(script.snapshot(90).quit_requested());
        assert!(!script.snapshot(90).any_movement_down());
    }
}
