//! Probability distributions over nearby candidate ranks.
//!
//! A nearby selector ranks candidates by distance and then draws a rank;
//! these distributions favor small ranks.

use listforge_config::{NearbySelectionConfig, NearbySelectionDistributionType};
use listforge_core::{ListForgeError, Result};
use rand_distr::Beta;

use crate::heuristic::selector::random::WorkingRandom;

/// Draws a rank in `[0, nearby_size)`, biased toward the nearest candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NearbyRandom {
    /// Probability decreases linearly with rank, up to `size_maximum` ranks.
    Linear { size_maximum: usize },
    /// Probability decreases quadratically with rank, up to `size_maximum` ranks.
    Parabolic { size_maximum: usize },
    /// Uniform over a block of the nearest ranks.
    ///
    /// The block holds `nearby_size * size_ratio` ranks, raised to
    /// `size_minimum` and capped at `size_maximum`. With probability
    /// `uniform_probability` the block is ignored and every rank is equally
    /// likely.
    Block {
        size_minimum: usize,
        size_maximum: usize,
        size_ratio: f64,
        uniform_probability: f64,
    },
    /// Rank fraction of the first `size_maximum` ranks drawn from
    /// `Beta(alpha, beta)`; `alpha < beta` favors near ranks. Parameters that
    /// are not positive and finite draw uniformly.
    Beta {
        alpha: f64,
        beta: f64,
        size_maximum: usize,
    },
}

impl Default for NearbyRandom {
    fn default() -> Self {
        NearbyRandom::Linear {
            size_maximum: usize::MAX,
        }
    }
}

impl NearbyRandom {
    /// Builds the distribution a nearby selection config describes.
    pub fn from_config(config: &NearbySelectionConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|err| ListForgeError::config(err.to_string()))?;
        let size_maximum = config.distribution_size_maximum.unwrap_or(usize::MAX);
        Ok(match config.distribution_type {
            NearbySelectionDistributionType::Linear => NearbyRandom::Linear { size_maximum },
            NearbySelectionDistributionType::Parabolic => NearbyRandom::Parabolic { size_maximum },
            NearbySelectionDistributionType::Block => NearbyRandom::Block {
                size_minimum: config.distribution_size_minimum.unwrap_or(1),
                size_maximum,
                size_ratio: config.distribution_size_ratio.unwrap_or(1.0),
                uniform_probability: config.distribution_uniform_probability.unwrap_or(0.0),
            },
            NearbySelectionDistributionType::Beta => NearbyRandom::Beta {
                alpha: config.beta_distribution_alpha.unwrap_or(1.0),
                beta: config.beta_distribution_beta.unwrap_or(5.0),
                size_maximum,
            },
        })
    }

    /// Draws a rank in `[0, nearby_size)`.
    ///
    /// # Panics
    ///
    /// If `nearby_size` is zero.
    pub fn next_index(&self, random: &WorkingRandom, nearby_size: usize) -> usize {
        assert!(nearby_size > 0, "cannot draw from an empty nearby ranking");
        match *self {
            NearbyRandom::Linear { size_maximum } => {
                let m = size_maximum.min(nearby_size);
                let p = random.next_f64();
                let x = m as f64 * (1.0 - (1.0 - p).sqrt());
                (x as usize).min(m - 1)
            }
            NearbyRandom::Parabolic { size_maximum } => {
                let m = size_maximum.min(nearby_size);
                let p = random.next_f64();
                let x = m as f64 * (1.0 - (1.0 - p).cbrt());
                (x as usize).min(m - 1)
            }
            NearbyRandom::Block {
                size_minimum,
                size_maximum,
                size_ratio,
                uniform_probability,
            } => {
                if uniform_probability > 0.0 && random.next_f64() < uniform_probability {
                    return random.next_index(nearby_size);
                }
                let mut size = if size_ratio < 1.0 {
                    let size = (nearby_size as f64 * size_ratio) as usize;
                    size.max(size_minimum.min(nearby_size))
                } else {
                    nearby_size
                };
                size = size.min(size_maximum).max(1);
                random.next_index(size)
            }
            NearbyRandom::Beta {
                alpha,
                beta,
                size_maximum,
            } => {
                let m = size_maximum.min(nearby_size);
                let fraction = match Beta::new(alpha, beta) {
                    Ok(distribution) => random.sample(&distribution),
                    Err(_) => random.next_f64(),
                };
                ((fraction * m as f64) as usize).min(m - 1)
            }
        }
    }

    /// Highest rank count this distribution can ever draw from.
    ///
    /// Nearby matrices are truncated to this many destinations per origin.
    pub fn overall_size_maximum(&self) -> usize {
        match *self {
            NearbyRandom::Linear { size_maximum }
            | NearbyRandom::Parabolic { size_maximum }
            | NearbyRandom::Beta { size_maximum, .. } => size_maximum,
            NearbyRandom::Block {
                size_maximum,
                uniform_probability,
                ..
            } => {
                if uniform_probability > 0.0 {
                    usize::MAX
                } else {
                    size_maximum
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(nearby_random: NearbyRandom, nearby_size: usize, draws: usize) -> Vec<usize> {
        let random = WorkingRandom::seeded(31);
        let mut counts = vec![0; nearby_size];
        for _ in 0..draws {
            counts[nearby_random.next_index(&random, nearby_size)] += 1;
        }
        counts
    }

    #[test]
    fn linear_prefers_near_ranks() {
        let counts = histogram(NearbyRandom::default(), 10, 20_000);

        assert!(counts.iter().all(|&count| count > 0));
        assert!(counts[0] > counts[4]);
        assert!(counts[4] > counts[9]);
        // P(rank 0) = 1 - (0.9)^2 = 0.19
        let share = counts[0] as f64 / 20_000.0;
        assert!((share - 0.19).abs() < 0.02, "rank 0 share {share}");
    }

    #[test]
    fn parabolic_is_steeper_than_linear() {
        let linear = histogram(NearbyRandom::Linear { size_maximum: 10 }, 10, 20_000);
        let parabolic = histogram(NearbyRandom::Parabolic { size_maximum: 10 }, 10, 20_000);

        assert!(parabolic[0] > linear[0]);
        assert!(parabolic[9] < linear[9]);
    }

    #[test]
    fn size_maximum_caps_ranks() {
        let counts = histogram(NearbyRandom::Linear { size_maximum: 3 }, 10, 2_000);

        assert!(counts[3..].iter().all(|&count| count == 0));
        assert_eq!(NearbyRandom::Linear { size_maximum: 3 }.overall_size_maximum(), 3);
    }

    #[test]
    fn block_is_uniform_over_its_block() {
        let block = NearbyRandom::Block {
            size_minimum: 1,
            size_maximum: usize::MAX,
            size_ratio: 0.5,
            uniform_probability: 0.0,
        };
        let counts = histogram(block, 10, 10_000);

        assert!(counts[..5].iter().all(|&count| count > 1_700 && count < 2_300));
        assert!(counts[5..].iter().all(|&count| count == 0));
    }

    #[test]
    fn block_minimum_raises_small_blocks() {
        let block = NearbyRandom::Block {
            size_minimum: 4,
            size_maximum: usize::MAX,
            size_ratio: 0.1,
            uniform_probability: 0.0,
        };
        let counts = histogram(block, 10, 4_000);

        assert!(counts[..4].iter().all(|&count| count > 0));
        assert!(counts[4..].iter().all(|&count| count == 0));
    }

    #[test]
    fn block_uniform_probability_reaches_every_rank() {
        let block = NearbyRandom::Block {
            size_minimum: 1,
            size_maximum: 2,
            size_ratio: 1.0,
            uniform_probability: 0.5,
        };
        let counts = histogram(block, 10, 4_000);

        assert!(counts.iter().all(|&count| count > 0));
        assert_eq!(block.overall_size_maximum(), usize::MAX);
    }

    #[test]
    fn from_config_reads_block_options() {
        let config = NearbySelectionConfig {
            distribution_type: NearbySelectionDistributionType::Block,
            distribution_size_minimum: Some(2),
            distribution_size_maximum: Some(8),
            distribution_size_ratio: Some(0.25),
            distribution_uniform_probability: None,
            ..NearbySelectionConfig::default()
        };

        assert_eq!(
            NearbyRandom::from_config(&config).unwrap(),
            NearbyRandom::Block {
                size_minimum: 2,
                size_maximum: 8,
                size_ratio: 0.25,
                uniform_probability: 0.0,
            }
        );
        assert_eq!(
            NearbyRandom::from_config(&NearbySelectionConfig::linear(5)).unwrap(),
            NearbyRandom::Linear { size_maximum: 5 }
        );
    }

    #[test]
    fn beta_leans_toward_near_ranks() {
        let beta = NearbyRandom::Beta {
            alpha: 1.0,
            beta: 5.0,
            size_maximum: usize::MAX,
        };
        let counts = histogram(beta, 10, 20_000);

        assert!(counts[0] > counts[3]);
        assert!(counts[3] > counts[8]);
        // P(rank 0) = 1 - (0.9)^5 = 0.41
        let share = counts[0] as f64 / 20_000.0;
        assert!((share - 0.41).abs() < 0.02, "rank 0 share {share}");
        assert_eq!(beta.overall_size_maximum(), usize::MAX);

        let capped = NearbyRandom::Beta {
            alpha: 1.0,
            beta: 5.0,
            size_maximum: 4,
        };
        assert!(histogram(capped, 10, 2_000)[4..].iter().all(|&count| count == 0));
        assert_eq!(capped.overall_size_maximum(), 4);
    }

    #[test]
    fn beta_config_defaults_and_overrides() {
        let defaults = NearbySelectionConfig {
            distribution_type: NearbySelectionDistributionType::Beta,
            ..NearbySelectionConfig::default()
        };
        assert_eq!(
            NearbyRandom::from_config(&defaults).unwrap(),
            NearbyRandom::Beta {
                alpha: 1.0,
                beta: 5.0,
                size_maximum: usize::MAX,
            }
        );

        let far = NearbySelectionConfig {
            beta_distribution_alpha: Some(5.0),
            beta_distribution_beta: Some(1.0),
            ..defaults
        };
        let far = NearbyRandom::from_config(&far).unwrap();
        let counts = histogram(far, 10, 4_000);
        assert!(counts[9] > counts[0]);
    }

    #[test]
    fn from_config_rejects_invalid_options() {
        let config = NearbySelectionConfig {
            distribution_size_ratio: Some(0.5),
            ..NearbySelectionConfig::default()
        };

        assert!(matches!(
            NearbyRandom::from_config(&config),
            Err(ListForgeError::Config(_))
        ));
    }
}
