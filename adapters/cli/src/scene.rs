//! Scene composition from world queries.

use glam::Vec2;
use sky_joust_rendering::{ActorSprite, Color, LedgeSprite, Scene, SpriteKey};
use sky_joust_world::{query, World};

/// Assembles the frame description a rendering backend would draw.
pub(crate) fn compose(world: &World) -> Scene {
    let terrain = query::terrain_view(world)
        .into_iter()
        .map(|ledge| LedgeSprite {
            key: SpriteKey::Ledge(ledge.piece),
            position: Vec2::new(ledge.x, ledge.y),
        })
        .collect();

    let enemies = query::enemy_view(world)
        .into_iter()
        .map(|enemy| ActorSprite {
            key: SpriteKey::EnemyMount,
            frame: enemy.frame,
            position: Vec2::new(
                enemy.x - enemy.width as f32 / 2.0,
                enemy.y - enemy.height as f32 / 2.0,
            ),
            flip_x: !enemy.facing_right,
            reveal_rows: enemy.spawn_reveal,
            mount_tint: enemy.body_flash.map(Color::from),
            rider_tint: enemy.rider_flash.map(Color::from),
        })
        .collect();

    let player = query::player_view(world);
    let player = ActorSprite {
        key: SpriteKey::PlayerMount,
        frame: player.frame,
        position: Vec2::new(
            player.x - player.width as f32 / 2.0,
            player.y - player.height as f32 / 2.0,
        ),
        flip_x: !player.facing_right,
        reveal_rows: player.spawn_reveal,
        mount_tint: player.body_flash.map(Color::from),
        rider_tint: player.rider_flash.map(Color::from),
    };

    let debug_overlay = if query::god_mode(world) {
        Some(query::debug_overlay(world).to_owned())
    } else {
        None
    };

    Scene {
        terrain,
        enemies,
        player: Some(player),
        debug_overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::compose;
    use crate::placeholder;
    use sky_joust_core::{arena, Command};
    use sky_joust_rendering::SpriteKey;
    use sky_joust_world::{self as world, World};

    #[test]
    fn scene_layers_terrain_enemies_player() {
        let mut world = World::new(placeholder::catalog(), 11);
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                spawn_point: 0,
                facing_right: true,
            },
            &mut events,
        );
        world::apply(&mut world, Command::Tick { dt: arena::TICK }, &mut events);

        let scene = compose(&world);
        assert_eq!(scene.terrain.len(), sky_joust_core::LEDGE_PIECES);
        assert_eq!(scene.enemies.len(), 1);
        assert!(scene.player.is_some());
        assert!(scene.debug_overlay.is_none(), "overlay needs god mode");
        assert_eq!(scene.terrain[0].key, SpriteKey::Ledge(0));
    }

    #[test]
    fn god_mode_exposes_the_debug_overlay() {
        let mut world = World::new(placeholder::catalog(), 11);
        let mut events = Vec::new();
        world::apply(&mut world, Command::ToggleGodMode, &mut events);

        let scene = compose(&world);
        assert!(scene.debug_overlay.is_some());
    }

    #[test]
    fn materializing_actors_carry_reveal_and_flash() {
        let mut world = World::new(placeholder::catalog(), 11);
        let mut events = Vec::new();
        // Two ticks pass the 30ms throttle once: the first reveal step.
        for _ in 0..2 {
            world::apply(&mut world, Command::Tick { dt: arena::TICK }, &mut events);
        }

        let scene = compose(&world);
        let player = scene.player.expect("player always present");
        assert!(player.reveal_rows.is_some());
        assert!(player.mount_tint.is_some());
        assert!(player.rider_tint.is_some());
    }
}
