use crate::error::HclustError;
use num_traits::Float;
use std::collections::HashMap;
use std::str::FromStr;

/// A symmetric matrix of pairwise distances between named observations.
///
/// The matrix is the immutable ground truth for clustering: it is built once
/// from a lower triangular table of distances and only ever read afterwards.
/// Each unordered pair of observations is stored exactly once; lookups are
/// symmetric in their two arguments.
#[derive(Debug, Clone)]
pub struct DistanceMatrix<T> {
    obs: Vec<String>,
    index: HashMap<String, usize>,
    dist: HashMap<(usize, usize), T>,
}

/// Normalises an index pair so that each unordered pair maps to one key.
pub(crate) fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl<T: Float> DistanceMatrix<T> {
    /// Builds a matrix from rows already reduced to the lower triangular
    /// form: `header` lists every observation except the last, and each row
    /// holds an observation label along with its distances to the
    /// observations preceding it.
    ///
    /// A label that already appeared in the header is inserted into the
    /// observation order exactly once.
    ///
    /// # Parameters
    /// * `header` - the leading observation ids, in input order.
    /// * `rows` - one `(label, distances)` pair per remaining row.
    ///
    /// # Returns
    /// * The populated matrix, or an error if a row holds more distances
    ///   than there are observations preceding it.
    pub fn from_rows<I>(header: Vec<String>, rows: I) -> Result<Self, HclustError>
    where
        I: IntoIterator<Item = (String, Vec<T>)>,
    {
        let mut matrix = DistanceMatrix {
            obs: Vec::new(),
            index: HashMap::new(),
            dist: HashMap::new(),
        };
        for id in header {
            matrix.insert_observation(id);
        }
        for (label, distances) in rows {
            if distances.len() > matrix.obs.len() {
                return Err(HclustError::MalformedMatrix(format!(
                    "row {label} has {} entries but only {} preceding observations",
                    distances.len(),
                    matrix.obs.len(),
                )));
            }
            let row = matrix.insert_observation(label);
            for (col, distance) in distances.into_iter().enumerate() {
                matrix.dist.insert(pair_key(row, col), distance);
            }
        }
        Ok(matrix)
    }

    /// Returns the two observations that are closest together, or `None` if
    /// there are fewer than two observations in the matrix.
    ///
    /// Ties are broken by the first minimal pair encountered in row and
    /// column enumeration order.
    pub fn closest(&self) -> Option<(&str, &str)> {
        if self.obs.len() < 2 {
            return None;
        }
        let mut best: Option<(usize, usize, T)> = None;
        for row in 1..self.obs.len() {
            for col in 0..row {
                if let Some(&distance) = self.dist.get(&pair_key(row, col)) {
                    let closer = match best {
                        Some((_, _, best_dist)) => distance < best_dist,
                        None => true,
                    };
                    if closer {
                        best = Some((row, col, distance));
                    }
                }
            }
        }
        best.map(|(row, col, _)| (self.obs[row].as_str(), self.obs[col].as_str()))
    }

    /// Returns the distance between two observations, or `None` if either
    /// observation is unknown or the pair was never recorded.
    pub fn distance(&self, a: &str, b: &str) -> Option<T> {
        let a = *self.index.get(a)?;
        let b = *self.index.get(b)?;
        self.dist.get(&pair_key(a, b)).copied()
    }

    /// The number of observations represented in the matrix.
    pub fn n_observations(&self) -> usize {
        self.obs.len()
    }

    /// The observation ids, in input order.
    pub fn observations(&self) -> &[String] {
        &self.obs
    }

    fn insert_observation(&mut self, id: String) -> usize {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.obs.len();
        self.index.insert(id.clone(), idx);
        self.obs.push(id);
        idx
    }
}

impl<T: Float + FromStr> DistanceMatrix<T> {
    /// Parses the tab delimited lower triangular distance format:
    ///
    /// ```text
    /// '\tid1\tid2\tid3'
    /// 'id2\t2.0'
    /// 'id3\t1.5\t3.0'
    /// 'id4\t2.5\t1.0\t4.5'
    /// ```
    ///
    /// The header row starts with a tab and lists every observation except
    /// the last; there is no row for the first observation. Blank lines are
    /// ignored.
    pub fn parse(input: &str) -> Result<Self, HclustError> {
        let mut header: Option<Vec<String>> = None;
        let mut rows: Vec<(String, Vec<T>)> = Vec::new();

        for line in input.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('\t') {
                header = Some(line.split('\t').skip(1).map(str::to_string).collect());
                continue;
            }
            let mut entries = line.split_whitespace();
            // Safe: the line is non-empty, so there is at least one entry
            let label = entries.next().unwrap().to_string();
            let distances = entries
                .map(|entry| {
                    entry.parse::<T>().map_err(|_| {
                        HclustError::MalformedMatrix(format!(
                            "entry '{entry}' in row {label} is not a number"
                        ))
                    })
                })
                .collect::<Result<Vec<T>, HclustError>>()?;
            rows.push((label, distances));
        }

        let header = header.ok_or_else(|| {
            HclustError::MalformedMatrix(String::from("missing tab prefixed header row"))
        })?;
        DistanceMatrix::from_rows(header, rows)
    }

    /// Parses the tab delimited full matrix format, in which every row lists
    /// the distances to every observation and the matrix is symmetric across
    /// its diagonal:
    ///
    /// ```text
    /// 'title\tid1\tid2\tid3\tid4'
    /// 'id1\t0.0\t2.0\t1.5\t2.5'
    /// 'id2\t2.0\t0.0\t3.0\t1.0'
    /// 'id3\t1.5\t3.0\t0.0\t4.5'
    /// 'id4\t2.5\t1.0\t4.5\t0.0'
    /// ```
    ///
    /// The title cell, the diagonal and the upper triangle are dropped,
    /// reducing the input to the lower triangular form consumed by
    /// [`DistanceMatrix::parse`].
    pub fn parse_full(input: &str) -> Result<Self, HclustError> {
        DistanceMatrix::parse(&bottom_triangle(input))
    }
}

/// Reduces the text of a full symmetric matrix to its bottom triangle. The
/// first row loses its title cell and its final column, the row for the
/// first observation is dropped entirely, and row `i` keeps only the
/// distances to the observations preceding it.
fn bottom_triangle(input: &str) -> String {
    let mut reduced: Vec<String> = Vec::new();
    let lines = input
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty());

    for (line_num, line) in lines.enumerate() {
        let entries: Vec<&str> = line.split('\t').collect();
        if line_num == 0 {
            let inner = if entries.len() > 1 {
                &entries[1..entries.len() - 1]
            } else {
                &[][..]
            };
            reduced.push(format!("\t{}", inner.join("\t")));
        } else if line_num > 1 {
            let keep = entries.len().min(line_num);
            reduced.push(entries[..keep].join("\t"));
        }
    }
    reduced.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOWER: &str = "\tid1\tid2\tid3\nid2\t2.0\nid3\t1.5\t3.0\nid4\t2.5\t1.0\t4.5";

    const FULL: &str = "title\tid1\tid2\tid3\tid4\n\
                        id1\t0.0\t2.0\t1.5\t2.5\n\
                        id2\t2.0\t0.0\t3.0\t1.0\n\
                        id3\t1.5\t3.0\t0.0\t4.5\n\
                        id4\t2.5\t1.0\t4.5\t0.0";

    #[test]
    fn parse_lower_triangular() {
        let matrix: DistanceMatrix<f64> = DistanceMatrix::parse(LOWER).unwrap();
        assert_eq!(matrix.n_observations(), 4);
        assert_eq!(matrix.observations(), ["id1", "id2", "id3", "id4"]);
        assert_eq!(matrix.distance("id1", "id3"), Some(1.5));
        assert_eq!(matrix.distance("id3", "id1"), Some(1.5));
    }

    #[test]
    fn parse_full_reduces_to_bottom_triangle() {
        let full: DistanceMatrix<f64> = DistanceMatrix::parse_full(FULL).unwrap();
        let lower: DistanceMatrix<f64> = DistanceMatrix::parse(LOWER).unwrap();
        assert_eq!(full.n_observations(), lower.n_observations());
        for a in lower.observations() {
            for b in lower.observations() {
                assert_eq!(full.distance(a, b), lower.distance(a, b));
            }
        }
    }

    #[test]
    fn closest_pair() {
        let matrix: DistanceMatrix<f64> = DistanceMatrix::parse(LOWER).unwrap();
        let (a, b) = matrix.closest().unwrap();
        assert_eq!([a.min(b), a.max(b)], ["id2", "id4"]);
    }

    #[test]
    fn closest_needs_two_observations() {
        let matrix: DistanceMatrix<f64> =
            DistanceMatrix::from_rows(vec![String::from("only")], Vec::new()).unwrap();
        assert_eq!(matrix.n_observations(), 1);
        assert!(matrix.closest().is_none());
    }

    #[test]
    fn unknown_observation_is_none() {
        let matrix: DistanceMatrix<f64> = DistanceMatrix::parse(LOWER).unwrap();
        assert!(matrix.distance("id1", "nope").is_none());
        assert!(matrix.distance("nope", "id1").is_none());
    }

    #[test]
    fn non_numeric_entry_is_rejected() {
        let result: Result<DistanceMatrix<f64>, _> =
            DistanceMatrix::parse("\tid1\nid2\tabc");
        assert!(matches!(result, Err(HclustError::MalformedMatrix(..))));
    }

    #[test]
    fn missing_header_is_rejected() {
        let result: Result<DistanceMatrix<f64>, _> = DistanceMatrix::parse("id2\t2.0");
        assert!(matches!(result, Err(HclustError::MalformedMatrix(..))));
    }

    #[test]
    fn overlong_row_is_rejected() {
        let result: Result<DistanceMatrix<f64>, _> =
            DistanceMatrix::parse("\tid1\nid2\t2.0\t3.0\t4.0");
        assert!(matches!(result, Err(HclustError::MalformedMatrix(..))));
    }
}
