use ndarray::ArrayView1;

use crate::Float;

/// A distance metric between two feature vectors of equal length.
pub trait Distance<F: Float>: Clone + Send + Sync {
    /// The true distance between `a` and `b`.
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F;

    /// A cheaper, order-preserving stand-in for `distance`.
    ///
    /// Comparing two `rdistance` values gives the same ordering as comparing
    /// the corresponding `distance` values, so nearest-neighbour searches can
    /// skip the final transform. Defaults to `distance` itself.
    fn rdistance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        self.distance(a, b)
    }

    /// Converts a relative distance back into the true distance.
    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist
    }
}

/// Euclidean (L2) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L2Dist;

impl<F: Float> Distance<F> for L2Dist {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        self.rdistance(a, b).sqrt()
    }

    // Squared Euclidean distance.
    fn rdistance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| (x - y) * (x - y))
            .sum()
    }

    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_l2_distance() {
        let a = array![0.0, 0.0];
        let b = array![3.0, 4.0];
        assert_abs_diff_eq!(L2Dist.distance(a.view(), b.view()), 5.0);
        assert_abs_diff_eq!(L2Dist.rdistance(a.view(), b.view()), 25.0);
    }

    #[test]
    fn test_rdist_roundtrip() {
        let a = array![1.0f32, 2.0, 3.0];
        let b = array![4.0f32, 6.0, 3.0];
        let rdist = L2Dist.rdistance(a.view(), b.view());
        assert_abs_diff_eq!(L2Dist.rdist_to_dist(rdist), L2Dist.distance(a.view(), b.view()));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let a = array![90.0, 42.0, 43.0, 20.88, 82.0, 6.5, 202.94];
        assert_eq!(L2Dist.distance(a.view(), a.view()), 0.0);
    }
}
