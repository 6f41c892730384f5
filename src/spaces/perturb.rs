//! Gaussian perturbation of a point cloud.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::cloud::PointCloud;
use crate::error::{Error, Result};

/// Standard deviation used by every stability sweep unless configured
pub const DEFAULT_NOISE_STD: f64 = 0.01;

/// Return a cloud of the same shape with i.i.d. N(0, σ²) noise added
pub fn perturb<R: Rng + ?Sized>(cloud: &PointCloud, noise_std: f64, rng: &mut R) -> Result<PointCloud> {
    if !(noise_std.is_finite() && noise_std > 0.0) {
        return Err(Error::invalid("noise_std", format!("{noise_std} is not a positive finite value")));
    }
    let normal = Normal::new(0.0, noise_std).map_err(|e| Error::invalid("noise_std", e.to_string()))?;
    let noisy = cloud.points().mapv(|x| x + normal.sample(rng));
    Ok(PointCloud::new(noisy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_shape_preserved_and_noise_small() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let cloud = PointCloud::new(Array2::zeros((40, 3)));
        let noisy = perturb(&cloud, DEFAULT_NOISE_STD, &mut rng).unwrap();
        assert_eq!(noisy.points().dim(), (40, 3));
        assert!(noisy.points().iter().all(|v| v.abs() < 0.1));
        assert!(noisy.points().iter().any(|v| *v != 0.0));
    }

    #[test]
    fn test_rejects_bad_sigma() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let cloud = PointCloud::new(Array2::zeros((2, 2)));
        assert!(perturb(&cloud, 0.0, &mut rng).is_err());
        assert!(perturb(&cloud, f64::NAN, &mut rng).is_err());
    }
}
