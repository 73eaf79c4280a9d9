//! Class rebalancing by random undersampling.
//!
//! Given a target ratio `[normal, anomalous]` the oversized class is sampled
//! down without replacement; the other class is returned untouched. Sampling
//! preserves the original relative order of the kept items.
use crate::error::{PrepError, Result};
use crate::partition::Label;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RATIO: [usize; 2] = [4, 1];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceParams {
    /// Target counts ratio, `[normal, anomalous]`.
    pub ratio: [usize; 2],
    /// Seed for the sampler; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for BalanceParams {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_RATIO,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Balanced<T> {
    pub normal: Vec<T>,
    pub anomalous: Vec<T>,
    /// Class that was sampled down, if any.
    pub resampled: Option<Label>,
}

/// Undersample whichever class exceeds its share of `ratio`.
pub fn balance<T, R>(normal: Vec<T>, anomalous: Vec<T>, ratio: [usize; 2], rng: &mut R) -> Result<Balanced<T>>
where
    R: Rng + ?Sized,
{
    let [r0, r1] = ratio;
    if r0 == 0 || r1 == 0 {
        return Err(PrepError::config(format!(
            "balance ratio components must be positive, got {ratio:?}"
        )));
    }
    let (n0, n1) = (normal.len(), anomalous.len());
    let overflow = || PrepError::config(format!("balance ratio {ratio:?} is too large"));
    let normal_share = n0.checked_mul(r1).ok_or_else(overflow)?;
    let anomalous_share = n1.checked_mul(r0).ok_or_else(overflow)?;

    if normal_share > anomalous_share {
        let target = anomalous_share / r1;
        debug!("balance: sampling normal {n0} -> {target}");
        Ok(Balanced {
            normal: sample_ordered(normal, target, rng),
            anomalous,
            resampled: Some(Label::Normal),
        })
    } else if anomalous_share > normal_share {
        let target = normal_share / r0;
        debug!("balance: sampling anomalous {n1} -> {target}");
        Ok(Balanced {
            normal,
            anomalous: sample_ordered(anomalous, target, rng),
            resampled: Some(Label::Anomalous),
        })
    } else {
        Ok(Balanced {
            normal,
            anomalous,
            resampled: None,
        })
    }
}

fn sample_ordered<T, R>(items: Vec<T>, amount: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    let mut keep = vec![false; items.len()];
    for i in rand::seq::index::sample(rng, items.len(), amount.min(items.len())) {
        keep[i] = true;
    }
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, kept)| kept.then_some(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn oversized_normal_is_sampled_to_ratio() {
        let normal: Vec<u32> = (0..100).collect();
        let anomalous: Vec<u32> = (1000..1010).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let out = balance(normal.clone(), anomalous.clone(), [4, 1], &mut rng).unwrap();

        assert_eq!(out.resampled, Some(Label::Normal));
        assert_eq!(out.normal.len(), 40);
        assert_eq!(out.anomalous, anomalous);
        assert!(out.normal.iter().all(|v| normal.contains(v)));
        assert!(out.normal.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn oversized_anomalous_is_sampled_to_ratio() {
        let normal: Vec<u32> = (0..20).collect();
        let anomalous: Vec<u32> = (100..130).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let out = balance(normal.clone(), anomalous, [4, 1], &mut rng).unwrap();

        assert_eq!(out.resampled, Some(Label::Anomalous));
        assert_eq!(out.normal, normal);
        assert_eq!(out.anomalous.len(), 5);
    }

    #[test]
    fn balanced_input_is_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = balance(vec![1, 2, 3, 4], vec![9], [4, 1], &mut rng).unwrap();
        assert_eq!(out.resampled, None);
        assert_eq!(out.normal, [1, 2, 3, 4]);
    }

    #[test]
    fn same_seed_same_sample() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            balance((0..50).collect::<Vec<u32>>(), vec![0u32; 3], [4, 1], &mut rng)
                .unwrap()
                .normal
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn zero_ratio_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(balance(vec![1], vec![2], [0, 1], &mut rng).is_err());
    }

    #[test]
    fn overflowing_ratio_is_a_configuration_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = balance(vec![1, 2], vec![3, 4], [usize::MAX, 1], &mut rng).unwrap_err();
        assert!(matches!(err, PrepError::Configuration(_)), "got {err:?}");
    }
}
