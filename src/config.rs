/// Game tunables and the per-level entity table.

use thiserror::Error;

use crate::grid;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("the level table is empty")]
    NoLevels,
    #[error("max level must be at least 1")]
    ZeroMaxLevel,
    #[error("enemy speed range {min}..{max} is empty")]
    EmptySpeedRange { min: u32, max: u32 },
    #[error("level {level} wants {wanted} entities on the road but only {capacity} cells exist")]
    Overcrowded {
        level: u32,
        wanted: usize,
        capacity: usize,
    },
}

/// How many of each entity a level keeps on the road.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelPlan {
    pub roaming: usize,
    pub obstacles: usize,
    pub collectibles: usize,
}

impl LevelPlan {
    pub const fn new(roaming: usize, obstacles: usize, collectibles: usize) -> Self {
        LevelPlan {
            roaming,
            obstacles,
            collectibles,
        }
    }

    pub fn total(&self) -> usize {
        self.roaming + self.obstacles + self.collectibles
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub max_level: u32,
    /// Points for reaching the water.
    pub win_bonus: i64,
    pub collectible_points: i64,
    /// Roaming enemy speed, pixels per second, drawn from `speed_min..speed_max`.
    pub speed_min: u32,
    pub speed_max: u32,
    /// Seconds between a collision and the player being sent back.
    pub collision_grace: f64,
    /// Seconds between the final crossing and the victory popup.
    pub victory_delay: f64,
    /// Victory jump speed, pixels per second.
    pub jump_rate: f32,
    pub jump_height: f32,
    /// Plans indexed by level - 1.  Levels past the end use the first plan.
    pub levels: Vec<LevelPlan>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_level: 3,
            win_bonus: 500,
            collectible_points: 100,
            speed_min: 150,
            speed_max: 450,
            collision_grace: 0.06,
            victory_delay: 0.1,
            jump_rate: 70.0,
            jump_height: 10.0,
            levels: vec![
                LevelPlan::new(3, 0, 0),
                LevelPlan::new(3, 1, 1),
                LevelPlan::new(3, 2, 2),
            ],
        }
    }
}

impl GameConfig {
    pub fn plan_for(&self, level: u32) -> LevelPlan {
        level
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
            .or_else(|| self.levels.first())
            .copied()
            .unwrap_or(LevelPlan::new(0, 0, 0))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        if self.max_level == 0 {
            return Err(ConfigError::ZeroMaxLevel);
        }
        if self.speed_min >= self.speed_max {
            return Err(ConfigError::EmptySpeedRange {
                min: self.speed_min,
                max: self.speed_max,
            });
        }

        // Levels past the table all share the fallback plan, so one check
        // covers them no matter how large `max_level` is.
        let tabled = self.levels.len().min(self.max_level as usize) as u32;
        let mut levels: Vec<u32> = (1..=tabled).collect();
        if self.max_level > tabled {
            levels.push(tabled + 1);
        }

        let capacity = grid::lane_capacity();
        for level in levels {
            let wanted = self.plan_for(level).total();
            if wanted > capacity {
                return Err(ConfigError::Overcrowded {
                    level,
                    wanted,
                    capacity,
                });
            }
        }
        Ok(())
    }
}
