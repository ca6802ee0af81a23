//! Cosmetic scene state: parallax clouds, particles, crash flash
//!
//! Owned by the render layer and fed from controller events. It has its own
//! RNG stream so nothing here can perturb obstacle generation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState};

/// Particle colors, packed 0xRRGGBBAA
pub mod palette {
    pub const GOLD: u32 = 0xFFD54AFF;
    pub const WHITE: u32 = 0xFFFFFFFF;
    pub const FEATHER: u32 = 0xFFF3B0FF;
    pub const EMBER: u32 = 0xFF7043FF;
    pub const SMOKE: u32 = 0x9E9E9EFF;
}

const FLASH_DECAY: f32 = 3.0;
const PARTICLE_GRAVITY: f32 = 400.0;
const SCORE_BURST: usize = 14;
const CRASH_BURST: usize = 28;
const FLAP_PUFF: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    /// Radius of the main puff
    pub size: f32,
    /// Leftward drift, px/s
    pub speed: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: u32,
}

impl Particle {
    /// Remaining life as 0..1
    pub fn life_ratio(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

pub struct Scene {
    pub clouds: Vec<Cloud>,
    pub particles: Vec<Particle>,
    /// White flash after a crash, 0..1
    pub flash: f32,
    rng: Pcg32,
    max_particles: usize,
    crash_flash: bool,
    cloud_speed_scale: f32,
}

impl Scene {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        let mut scene = Self {
            clouds: Vec::new(),
            particles: Vec::new(),
            flash: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            max_particles: 0,
            crash_flash: true,
            cloud_speed_scale: 1.0,
        };
        scene.apply_settings(settings);
        scene
    }

    /// Re-read quality/motion settings. Adds or drops clouds to match the
    /// new count and trims particles to the new cap.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.max_particles = settings.max_particles();
        self.crash_flash = settings.crash_flash();
        self.cloud_speed_scale = if settings.reduced_motion { 0.5 } else { 1.0 };

        let target = settings.cloud_count();
        self.clouds.truncate(target);
        while self.clouds.len() < target {
            let x = self.rng.random_range(0.0..PLAY_WIDTH);
            let cloud = self.random_cloud(x);
            self.clouds.push(cloud);
        }
        self.particles.truncate(self.max_particles);
        if !self.crash_flash {
            self.flash = 0.0;
        }
    }

    fn random_cloud(&mut self, x: f32) -> Cloud {
        Cloud {
            pos: Vec2::new(x, self.rng.random_range(20.0..PLAY_HEIGHT * 0.45)),
            size: self.rng.random_range(24.0..48.0),
            speed: self.rng.random_range(10.0..40.0),
            opacity: self.rng.random_range(0.5..0.9),
        }
    }

    /// React to a controller event
    pub fn apply_event(&mut self, event: &GameEvent, state: &GameState) {
        let rect = state.bird.rect();
        let center = Vec2::new(rect.x + rect.w / 2.0, rect.y + rect.h / 2.0);
        match *event {
            GameEvent::Jumped => {
                let tail = Vec2::new(rect.x, rect.y + rect.h * 0.6);
                self.burst(tail, FLAP_PUFF, 40.0..90.0, 0.25..0.45, &[palette::FEATHER]);
            }
            GameEvent::Scored { .. } => {
                self.burst(
                    center,
                    SCORE_BURST,
                    80.0..220.0,
                    0.4..0.8,
                    &[palette::GOLD, palette::WHITE],
                );
            }
            GameEvent::Crashed { new_high_score, .. } => {
                self.burst(
                    center,
                    CRASH_BURST,
                    120.0..320.0,
                    0.5..1.1,
                    &[palette::EMBER, palette::SMOKE, palette::FEATHER],
                );
                if new_high_score {
                    self.burst(center, SCORE_BURST, 60.0..180.0, 0.8..1.4, &[palette::GOLD]);
                }
                if self.crash_flash {
                    self.flash = 1.0;
                }
            }
            GameEvent::Reset => {
                self.particles.clear();
                self.flash = 0.0;
            }
            GameEvent::Started | GameEvent::Paused | GameEvent::Resumed => {}
        }
    }

    fn burst(
        &mut self,
        origin: Vec2,
        count: usize,
        speed: std::ops::Range<f32>,
        life: std::ops::Range<f32>,
        colors: &[u32],
    ) {
        for i in 0..count {
            if self.particles.len() >= self.max_particles {
                break;
            }
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.random_range(speed.clone());
            let life = self.rng.random_range(life.clone());
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::from_angle(angle) * speed,
                life,
                max_life: life,
                size: self.rng.random_range(2.0..5.0),
                color: colors[i % colors.len()],
            });
        }
    }

    /// Advance cosmetics by `dt` seconds. Clouds keep drifting in every
    /// phase; only the sky moves while the world is frozen.
    pub fn update(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        let scale = self.cloud_speed_scale;
        for i in 0..self.clouds.len() {
            let cloud = &mut self.clouds[i];
            cloud.pos.x -= cloud.speed * scale * dt;
            // Fully past the left edge (puffs extend ~2x size right of pos)
            if cloud.pos.x + cloud.size * 2.5 < 0.0 {
                let fresh = self.random_cloud(PLAY_WIDTH + 48.0);
                self.clouds[i] = fresh;
            }
        }

        for p in &mut self.particles {
            p.vel.y += PARTICLE_GRAVITY * dt;
            p.pos += p.vel * dt;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);

        self.flash = (self.flash - FLASH_DECAY * dt).max(0.0);
    }
}

/// How much to darken the world behind overlays
pub fn dim_for(phase: GamePhase) -> f32 {
    match phase {
        GamePhase::Playing | GamePhase::Ready => 0.0,
        GamePhase::Paused => 0.25,
        GamePhase::GameOver => 0.35,
    }
}
