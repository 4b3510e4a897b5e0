#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input-latching system.
//!
//! Drivers report raw "is held" booleans once per frame. Steering controls
//! pass through to the world every frame, while the mode toggles are edge
//! triggered: a held key fires its toggle exactly once per press, not once
//! per tick held.

use sky_joust_core::{Command, InputSnapshot};

/// Pure system that converts raw held-key snapshots into command batches.
#[derive(Debug, Default)]
pub struct Controls {
    previous: InputSnapshot,
}

impl Controls {
    /// Creates the system with no keys considered held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one raw snapshot and emits the commands it implies.
    pub fn handle(&mut self, snapshot: InputSnapshot, out: &mut Vec<Command>) {
        out.push(Command::UpdateInput { snapshot });

        if snapshot.god_mode && !self.previous.god_mode {
            out.push(Command::ToggleGodMode);
        }
        if snapshot.pause && !self.previous.pause {
            out.push(Command::TogglePause);
        }
        if snapshot.sound && !self.previous.sound {
            out.push(Command::ToggleSound);
        }
        if snapshot.filter && !self.previous.filter {
            out.push(Command::ToggleFilter);
        }

        self.previous = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::Controls;
    use sky_joust_core::{Command, InputSnapshot};

    fn toggles_in(commands: &[Command]) -> usize {
        commands
            .iter()
            .filter(|command| {
                matches!(
                    command,
                    Command::ToggleGodMode
                        | Command::TogglePause
                        | Command::ToggleSound
                        | Command::ToggleFilter
                )
            })
            .count()
    }

    #[test]
    fn every_frame_forwards_the_snapshot() {
        let mut controls = Controls::new();
        let mut commands = Vec::new();
        let snapshot = InputSnapshot {
            left: true,
            ..InputSnapshot::default()
        };

        controls.handle(snapshot, &mut commands);
        assert_eq!(commands[0], Command::UpdateInput { snapshot });
    }

    #[test]
    fn held_toggle_fires_once_per_press() {
        let mut controls = Controls::new();
        let held = InputSnapshot {
            pause: true,
            ..InputSnapshot::default()
        };

        let mut commands = Vec::new();
        controls.handle(held, &mut commands);
        assert_eq!(toggles_in(&commands), 1);

        for _ in 0..5 {
            let mut commands = Vec::new();
            controls.handle(held, &mut commands);
            assert_eq!(toggles_in(&commands), 0, "held key must not re-fire");
        }
    }

    #[test]
    fn release_and_repress_fires_again() {
        let mut controls = Controls::new();
        let held = InputSnapshot {
            sound: true,
            ..InputSnapshot::default()
        };

        let mut commands = Vec::new();
        controls.handle(held, &mut commands);
        controls.handle(InputSnapshot::default(), &mut commands);
        controls.handle(held, &mut commands);
        assert_eq!(toggles_in(&commands), 2);
    }

    #[test]
    fn simultaneous_presses_each_fire() {
        let mut controls = Controls::new();
        let chord = InputSnapshot {
            god_mode: true,
            filter: true,
            ..InputSnapshot::default()
        };

        let mut commands = Vec::new();
        controls.handle(chord, &mut commands);
        assert_eq!(toggles_in(&commands), 2);
        assert!(commands.contains(&Command::ToggleGodMode));
        assert!(commands.contains(&Command::ToggleFilter));
    }
}
