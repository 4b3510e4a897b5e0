use sky_joust_core::{
    InputSnapshot, SpriteCatalog, SpriteFrame, ENEMY_MOUNT_FRAMES, LEDGE_PIECES,
    PLAYER_MOUNT_FRAMES,
};
use sky_joust_system_controls::Controls;
use sky_joust_world::{self as world, query, World};

fn test_catalog() -> SpriteCatalog {
    SpriteCatalog {
        player_mount: vec![SpriteFrame::solid(16, 20); PLAYER_MOUNT_FRAMES],
        player_rider: SpriteFrame::solid(12, 7),
        enemy_mount: vec![SpriteFrame::solid(20, 20); ENEMY_MOUNT_FRAMES],
        enemy_rider: SpriteFrame::solid(12, 7),
        ledges: vec![SpriteFrame::solid(64, 8); LEDGE_PIECES],
    }
}

fn drive(world: &mut World, controls: &mut Controls, snapshot: InputSnapshot) {
    let mut commands = Vec::new();
    controls.handle(snapshot, &mut commands);
    for command in commands {
        let mut events = Vec::new();
        world::apply(world, command, &mut events);
    }
}

#[test]
fn holding_the_pause_key_toggles_exactly_once() {
    let mut world = World::new(test_catalog(), 1);
    let mut controls = Controls::new();
    let held = InputSnapshot {
        pause: true,
        ..InputSnapshot::default()
    };

    for _ in 0..10 {
        drive(&mut world, &mut controls, held);
    }
    assert!(query::paused(&world), "one press, one toggle");

    drive(&mut world, &mut controls, InputSnapshot::default());
    drive(&mut world, &mut controls, held);
    assert!(!query::paused(&world), "re-press toggles back");
}

#[test]
fn steering_reaches_the_world_every_frame() {
    let mut world = World::new(test_catalog(), 1);
    let mut controls = Controls::new();

    drive(
        &mut world,
        &mut controls,
        InputSnapshot {
            god_mode: true,
            ..InputSnapshot::default()
        },
    );
    assert!(query::god_mode(&world));

    drive(&mut world, &mut controls, InputSnapshot::default());
    assert!(query::god_mode(&world), "releasing the key keeps the mode");
}
