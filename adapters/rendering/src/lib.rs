#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering and audio contracts for Sky Joust adapters.
//!
//! Windowed backends, the CRT-style filter and the audio decoder all live
//! outside this workspace; they consume the scene description and the sound
//! dispatch defined here.

use anyhow::Result as AnyResult;
use glam::Vec2;
use sky_joust_core::{Event, SoundId, SpawnColor};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl From<SpawnColor> for Color {
    fn from(flash: SpawnColor) -> Self {
        let (red, green, blue) = flash.rgb();
        Color::from_rgb_u8(red, green, blue)
    }
}

/// Texture families a backend must supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// The player's mount animation strip.
    PlayerMount,
    /// The player's rider overlay.
    PlayerRider,
    /// The enemy mount animation strip.
    EnemyMount,
    /// The enemy rider overlay.
    EnemyRider,
    /// One terrain ledge piece, by catalog index.
    Ledge(usize),
}

/// One composited rider-and-mount sprite ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorSprite {
    /// Mount texture family to sample.
    pub key: SpriteKey,
    /// Frame index within the mount's animation strip.
    pub frame: usize,
    /// Top-left corner in virtual-pixel coordinates.
    pub position: Vec2,
    /// Mirror the sprite across its vertical axis.
    pub flip_x: bool,
    /// Rows revealed from the bottom while materializing; `None` once whole.
    pub reveal_rows: Option<u32>,
    /// Flash override applied to the mount while materializing.
    pub mount_tint: Option<Color>,
    /// Flash override applied to the rider while materializing.
    pub rider_tint: Option<Color>,
}

/// One static terrain piece ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgeSprite {
    /// Ledge texture to sample.
    pub key: SpriteKey,
    /// Top-left corner in virtual-pixel coordinates.
    pub position: Vec2,
}

/// Complete description of one frame for a rendering backend.
///
/// Draw order matters and matches the reference presentation: terrain first,
/// then enemies, then the player on top.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Terrain pieces in layout order.
    pub terrain: Vec<LedgeSprite>,
    /// Live enemies in storage order.
    pub enemies: Vec<ActorSprite>,
    /// The player, drawn last.
    pub player: Option<ActorSprite>,
    /// Diagnostic text shown while god mode is active.
    pub debug_overlay: Option<String>,
}

/// Named triggerable sound handles exposed by the driver's audio stack.
///
/// Implementations may fail (decoder errors, device loss); callers are
/// expected to report and continue, never to abort the session.
pub trait AudioSink {
    /// Starts playback of the named sound.
    fn play(&mut self, sound: SoundId) -> AnyResult<()>;

    /// Stops the named sound if it is currently held.
    fn stop(&mut self, sound: SoundId) -> AnyResult<()>;

    /// Stops every held sound.
    fn stop_all(&mut self) -> AnyResult<()>;
}

/// Audio sink that swallows every trigger; headless drivers use this.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn play(&mut self, _sound: SoundId) -> AnyResult<()> {
        Ok(())
    }

    fn stop(&mut self, _sound: SoundId) -> AnyResult<()> {
        Ok(())
    }

    fn stop_all(&mut self) -> AnyResult<()> {
        Ok(())
    }
}

/// Routes the audio events of one tick into a sink.
///
/// Play requests are dropped while the global sound switch is off; stop
/// requests always go through so a mid-toggle never leaves a sound held.
pub fn dispatch_audio(
    events: &[Event],
    sound_enabled: bool,
    sink: &mut dyn AudioSink,
) -> AnyResult<()> {
    for event in events {
        match event {
            Event::SoundTriggered { sound } => {
                if sound_enabled {
                    sink.play(*sound)?;
                }
            }
            Event::SoundHalted { sound } => sink.stop(*sound)?,
            Event::AllSoundsStopped => sink.stop_all()?,
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{dispatch_audio, AudioSink, Color};
    use anyhow::Result as AnyResult;
    use sky_joust_core::{Event, SoundId, SpawnColor};

    #[derive(Default)]
    struct RecordingSink {
        played: Vec<SoundId>,
        stopped: Vec<SoundId>,
        stop_all_calls: usize,
    }

    impl AudioSink for RecordingSink {
        fn play(&mut self, sound: SoundId) -> AnyResult<()> {
            self.played.push(sound);
            Ok(())
        }

        fn stop(&mut self, sound: SoundId) -> AnyResult<()> {
            self.stopped.push(sound);
            Ok(())
        }

        fn stop_all(&mut self) -> AnyResult<()> {
            self.stop_all_calls += 1;
            Ok(())
        }
    }

    #[test]
    fn spawn_flash_palette_converts_to_presentation_colors() {
        let white = Color::from(SpawnColor::White);
        assert_eq!(white, Color::new(1.0, 1.0, 1.0, 1.0));

        let yellow = Color::from(SpawnColor::Yellow);
        assert!((yellow.blue - 86.0 / 255.0).abs() < f32::EPSILON);
    }

    #[test]
    fn play_requests_respect_the_sound_switch() {
        let events = vec![
            Event::SoundTriggered {
                sound: SoundId::FlapDown,
            },
            Event::SoundHalted {
                sound: SoundId::Energize,
            },
            Event::AllSoundsStopped,
        ];

        let mut muted = RecordingSink::default();
        dispatch_audio(&events, false, &mut muted).expect("dispatch");
        assert!(muted.played.is_empty(), "muted sinks never play");
        assert_eq!(muted.stopped, vec![SoundId::Energize]);
        assert_eq!(muted.stop_all_calls, 1);

        let mut audible = RecordingSink::default();
        dispatch_audio(&events, true, &mut audible).expect("dispatch");
        assert_eq!(audible.played, vec![SoundId::FlapDown]);
    }
}
