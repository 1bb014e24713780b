//! Chimney smoke particles
//!
//! Offsets are relative to the train, so particles ride along with it and
//! are pushed backwards by the train's speed to leave a trail.

use rand::Rng;

use super::types::Position;

/// Chimney top relative to the train origin
pub const CHIMNEY_OFFSET: Position = Position {
    x: 1.0,
    y: 2.8,
    z: 0.0,
};

/// Opacity of a particle at full life
pub const BASE_OPACITY: f32 = 0.6;

const LIFE_DECAY: f32 = 0.015;
const GROWTH: f32 = 0.03;
const TRAIL_FACTOR: f32 = 1.2;
const MOVING_SPAWN_CHANCE: f32 = 0.4;
const IDLE_SPAWN_CHANCE: f32 = 0.02;
const MOVING_SPEED: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct SmokeParticle {
    pub offset: Position,
    pub velocity: Position,
    /// Remaining life in 0..=1
    pub life: f32,
    pub growth: f32,
    pub scale: f32,
}

impl SmokeParticle {
    pub fn opacity(&self) -> f32 {
        (self.life * BASE_OPACITY).max(0.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SmokeEmitter {
    pub particles: Vec<SmokeParticle>,
}

impl SmokeEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chance of a new puff this frame for the given train speed
    pub fn spawn_chance(train_speed: f32) -> f32 {
        if train_speed.abs() > MOVING_SPEED {
            MOVING_SPAWN_CHANCE
        } else {
            IDLE_SPAWN_CHANCE
        }
    }

    /// Create a particle at the chimney with a randomized drift
    pub fn spawn<R: Rng>(&mut self, rng: &mut R) {
        let offset = Position::new(
            CHIMNEY_OFFSET.x + rng.random_range(-0.1..0.1),
            CHIMNEY_OFFSET.y,
            CHIMNEY_OFFSET.z + rng.random_range(-0.1..0.1),
        );
        let velocity = Position::new(
            rng.random_range(-0.01..0.01),
            rng.random_range(0.05..0.1),
            rng.random_range(-0.01..0.01),
        );
        self.particles.push(SmokeParticle {
            offset,
            velocity,
            life: 1.0,
            growth: GROWTH,
            scale: 1.0,
        });
    }

    /// Possibly spawn, then age every particle by one frame
    pub fn update<R: Rng>(&mut self, rng: &mut R, train_speed: f32) {
        if rng.random::<f32>() < Self::spawn_chance(train_speed) {
            self.spawn(rng);
        }
        self.advance(train_speed);
    }

    /// Age particles without spawning
    pub fn advance(&mut self, train_speed: f32) {
        let trailing = train_speed.abs() > MOVING_SPEED;
        for particle in &mut self.particles {
            particle.offset += particle.velocity;
            if trailing {
                particle.offset.x -= train_speed * TRAIL_FACTOR;
            }
            particle.scale += particle.growth;
            particle.life -= LIFE_DECAY;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_particles_expire() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut emitter = SmokeEmitter::new();
        emitter.spawn(&mut rng);
        let frames = (1.0 / LIFE_DECAY).ceil() as usize;
        for _ in 0..frames {
            emitter.advance(0.0);
        }
        assert!(emitter.particles.is_empty());
    }

    #[test]
    fn test_smoke_trails_behind_moving_train() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut emitter = SmokeEmitter::new();
        emitter.spawn(&mut rng);
        let start_x = emitter.particles[0].offset.x;
        emitter.advance(1.0);
        assert!(emitter.particles[0].offset.x < start_x - 1.0);
        assert!(emitter.particles[0].offset.y > CHIMNEY_OFFSET.y);
    }

    #[test]
    fn test_spawn_chance_depends_on_speed() {
        assert_eq!(SmokeEmitter::spawn_chance(0.0), IDLE_SPAWN_CHANCE);
        assert_eq!(SmokeEmitter::spawn_chance(-0.5), MOVING_SPAWN_CHANCE);
    }
}
