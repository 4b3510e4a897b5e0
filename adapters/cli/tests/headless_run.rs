use std::time::Duration;

use sky_joust_core::{
    arena, ActorState, Command, InputSnapshot, SpriteCatalog, SpriteFrame, ENEMY_MOUNT_FRAMES,
    LEDGE_PIECES, PLAYER_MOUNT_FRAMES,
};
use sky_joust_rendering::{dispatch_audio, NullAudioSink};
use sky_joust_system_controls::Controls;
use sky_joust_system_spawning::{Config, Spawning};
use sky_joust_world::{self as world, query, World, ENEMY_CAP};

fn catalog() -> SpriteCatalog {
    SpriteCatalog {
        player_mount: vec![SpriteFrame::solid(16, 20); PLAYER_MOUNT_FRAMES],
        player_rider: SpriteFrame::solid(12, 7),
        enemy_mount: vec![SpriteFrame::solid(20, 20); ENEMY_MOUNT_FRAMES],
        enemy_rider: SpriteFrame::solid(12, 7),
        ledges: {
            let mut pieces = vec![SpriteFrame::solid(80, 8); LEDGE_PIECES];
            pieces[0] = SpriteFrame::solid(190, 30);
            pieces
        },
    }
}

#[test]
fn full_stack_runs_a_session_without_surprises() {
    let catalog = catalog();
    catalog.validate().expect("catalog is usable");

    let mut world = World::new(catalog, 0xDEC0_DE);
    let mut controls = Controls::new();
    let mut spawning = Spawning::new(Config::new(
        Duration::from_millis(500),
        Duration::from_millis(500),
        0xBADC_0FFE,
    ));
    let mut audio = NullAudioSink;

    for tick in 0u64..900 {
        let mut events = Vec::new();

        let snapshot = if (100..=110).contains(&tick) {
            InputSnapshot {
                flap: true,
                ..InputSnapshot::default()
            }
        } else {
            InputSnapshot::default()
        };
        let mut commands = Vec::new();
        controls.handle(snapshot, &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }

        world::apply(&mut world, Command::Tick { dt: arena::TICK }, &mut events);

        let mut wave_commands = Vec::new();
        spawning.handle(
            &events,
            query::live_enemy_count(&world),
            ENEMY_CAP,
            &mut wave_commands,
        );
        for command in wave_commands {
            world::apply(&mut world, command, &mut events);
        }

        dispatch_audio(&events, query::sound_enabled(&world), &mut audio)
            .expect("null sink never fails");

        assert!(
            query::live_enemy_count(&world) <= ENEMY_CAP,
            "tick {tick}: enemy cap violated"
        );
    }

    let player = query::player_view(&world);
    assert_ne!(
        player.state,
        ActorState::Dead,
        "dead is a one-tick pass-through, never an end state"
    );
}
