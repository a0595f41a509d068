use crate::error::HclustError;
use crate::matrix::DistanceMatrix;
use num_traits::Float;
use std::str::FromStr;

/// Possible linkage criteria used to derive the distance between two
/// clusters from the distances between their individual members.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Linkage {
    /// The mean distance between the members of each cluster, as used in
    /// UPGMA. Also known as average linkage clustering.
    Average,
    /// The maximum distance between the members of each cluster. Also known
    /// as complete linkage clustering.
    Complete,
    /// The minimum distance between the members of each cluster. Also known
    /// as single linkage clustering.
    Single,
}

impl Linkage {
    /// Calculates the raw linkage distance between two groups of
    /// observations over the cross product of their members. Distances are
    /// always read from the original matrix, never from previously
    /// aggregated values, so repeated merges do not compound rounding.
    ///
    /// Returns `None` if any member pair is missing from the matrix.
    pub(crate) fn between<T: Float>(
        &self,
        matrix: &DistanceMatrix<T>,
        a: &[String],
        b: &[String],
    ) -> Option<T> {
        match *self {
            Self::Average => {
                let mut sum = T::zero();
                let mut n_pairs = 0_usize;
                for obs_a in a {
                    for obs_b in b {
                        sum = sum + matrix.distance(obs_a, obs_b)?;
                        n_pairs += 1;
                    }
                }
                Some(sum / T::from(n_pairs).unwrap_or_else(T::one))
            }
            Self::Complete => {
                let mut max = T::neg_infinity();
                for obs_a in a {
                    for obs_b in b {
                        max = max.max(matrix.distance(obs_a, obs_b)?);
                    }
                }
                Some(max)
            }
            Self::Single => {
                let mut min = T::infinity();
                for obs_a in a {
                    for obs_b in b {
                        min = min.min(matrix.distance(obs_a, obs_b)?);
                    }
                }
                Some(min)
            }
        }
    }
}

impl FromStr for Linkage {
    type Err = HclustError;

    /// Parses the linkage criterion names accepted by the textual interface:
    /// `average`, `max` and `min`. Anything else is rejected before any
    /// clustering is attempted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "average" => Ok(Linkage::Average),
            "max" => Ok(Linkage::Complete),
            "min" => Ok(Linkage::Single),
            other => Err(HclustError::InvalidLinkageMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> (DistanceMatrix<f64>, Vec<String>, Vec<String>) {
        // p and q in one group, r and s in the other; the cross distances
        // are 10, 12, 14 and 16
        let matrix = DistanceMatrix::parse(
            "\tp\tq\tr\nq\t1.0\nr\t10.0\t12.0\ns\t14.0\t16.0\t2.0",
        )
        .unwrap();
        let a = vec![String::from("p"), String::from("q")];
        let b = vec![String::from("r"), String::from("s")];
        (matrix, a, b)
    }

    #[test]
    fn average_is_the_exact_pair_mean() {
        let (matrix, a, b) = two_by_two();
        let d = Linkage::Average.between(&matrix, &a, &b).unwrap();
        assert_eq!(d, (10.0 + 12.0 + 14.0 + 16.0) / 4.0);
    }

    #[test]
    fn complete_takes_the_maximum() {
        let (matrix, a, b) = two_by_two();
        let d = Linkage::Complete.between(&matrix, &a, &b).unwrap();
        assert_eq!(d, 16.0);
    }

    #[test]
    fn single_takes_the_minimum() {
        let (matrix, a, b) = two_by_two();
        let d = Linkage::Single.between(&matrix, &a, &b).unwrap();
        assert_eq!(d, 10.0);
    }

    #[test]
    fn missing_pair_is_none() {
        let (matrix, a, _) = two_by_two();
        let b = vec![String::from("unknown")];
        assert!(Linkage::Average.between(&matrix, &a, &b).is_none());
    }

    #[test]
    fn criterion_names() {
        assert_eq!("average".parse::<Linkage>().unwrap(), Linkage::Average);
        assert_eq!("max".parse::<Linkage>().unwrap(), Linkage::Complete);
        assert_eq!("min".parse::<Linkage>().unwrap(), Linkage::Single);
        assert!(matches!(
            "ward".parse::<Linkage>(),
            Err(HclustError::InvalidLinkageMethod(..))
        ));
    }
}
