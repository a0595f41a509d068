use hclust::{DistanceMatrix, HierarchicalClustering, Linkage};
use std::{env, fs};

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let full = args.iter().any(|arg| arg == "--full");
    let mut positional = args.iter().filter(|arg| !arg.starts_with("--"));

    let path = positional
        .next()
        .expect("usage: hclust [--full] <matrix.dist> [average|max|min]");
    let linkage = positional
        .next()
        .map(|method| method.parse::<Linkage>().expect("unknown linkage criterion"))
        .unwrap_or(Linkage::Average);

    let contents = fs::read_to_string(path).expect("Unable to read file");
    let matrix: DistanceMatrix<f64> = if full {
        DistanceMatrix::parse_full(&contents)
    } else {
        DistanceMatrix::parse(&contents)
    }
    .expect("Unable to parse the distance matrix");

    let clustering = HierarchicalClustering::new(&matrix, linkage).expect("Nothing to cluster");
    for node in clustering.clusters() {
        println!("{node}");
    }
}
