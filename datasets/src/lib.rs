//! `ovalearn-datasets` provides a collection of commonly used datasets ready
//! to be used in tests and examples.
//!
//! ## Current state
//!
//! Currently the following datasets are provided:
//!
//! * `["iris"]` : iris flower dataset
//!
//! Loaded datasets are returned as an [`ovalearn::Dataset`] with named
//! features.
//!
//! ## Using a dataset
//!
//! To use one of the provided datasets in your project add the crate to your
//! Cargo.toml with the corresponding feature enabled:
//! ```ignore
//! ovalearn-datasets = { version = "0.1", features = ["iris"] }
//! ```
//! and then use it in your example or tests as
//! ```ignore
//! let (train, valid) = ovalearn_datasets::iris().split_with_ratio(0.8);
//! ```

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use ndarray::prelude::*;
use ndarray_csv::Array2Reader;
use ovalearn::Dataset;

#[cfg(feature = "iris")]
fn array_from_buf(buf: &[u8]) -> Array2<f64> {
    // unzip file
    let file = GzDecoder::new(buf);
    // create a CSV reader with headers and `,` as delimiter
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .from_reader(file);

    // extract ndarray
    reader.deserialize_array2_dynamic().unwrap()
}

#[cfg(feature = "iris")]
/// Read in the iris-flower dataset from dataset path.
// The `.csv` data is two dimensional: Axis(0) denotes y-axis (rows), Axis(1) denotes x-axis (columns)
pub fn iris() -> Dataset<f64, usize> {
    let data = include_bytes!("../data/iris.csv.gz");
    let array = array_from_buf(&data[..]);

    let (data, targets) = (
        array.slice(s![.., 0..4]).to_owned(),
        array.column(4).mapv(|x| x as usize),
    );

    let feature_names = vec!["sepal length", "sepal width", "petal length", "petal width"];

    Dataset::new(data, targets).with_feature_names(feature_names)
}
