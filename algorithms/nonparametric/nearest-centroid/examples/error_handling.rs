//! Example demonstrating error handling with the nearest-centroid classifier.
//!
//! Every failure mode surfaces as a `CentroidError` value rather than a panic.

use croprec_helpers::{DataPoint, L2Dist};
use ndarray::array;
use nearest_centroid::{CentroidError, NearestCentroid, classify, train};

fn recommend(features: [f64; 2]) -> Result<String, CentroidError> {
    let training_data = vec![
        DataPoint::new(array![80.0, 200.0], "rice".to_string()),
        DataPoint::new(array![90.0, 210.0], "rice".to_string()),
        DataPoint::new(array![20.0, 60.0], "lentil".to_string()),
    ];
    let table = train(&training_data)?;
    classify(&table, array![features[0], features[1]].view())
}

fn main() {
    println!("Nearest-centroid error handling");
    println!("===============================");

    println!("\n1. Classifying against an empty model:");
    let empty: Vec<DataPoint<String, f64>> = vec![];
    match NearestCentroid::fit(&empty, L2Dist) {
        Ok(model) => match model.predict(array![1.0, 1.0].view()) {
            Ok(label) => println!("   Predicted label: {}", label),
            Err(CentroidError::EmptyModel) => {
                println!("   Caught expected error: {}", CentroidError::EmptyModel)
            }
            Err(e) => println!("   Unexpected error: {}", e),
        },
        Err(e) => println!("   Error training model: {}", e),
    }

    println!("\n2. Training on points of different arity:");
    let ragged = vec![
        DataPoint::new(array![1.0, 2.0], "A"),
        DataPoint::new(array![3.0], "B"),
    ];
    match train(&ragged) {
        Ok(_) => println!("   Trained unexpectedly"),
        Err(e) => println!("   Caught expected error: {}", e),
    }

    println!("\n3. Error propagation with `?`:");
    match recommend([85.0, 190.0]) {
        Ok(crop) => println!("   Recommended crop: {}", crop),
        Err(e) => println!("   Classification failed: {}", e),
    }
    match recommend([f64::NAN, 0.0]) {
        Ok(crop) => println!("   Recommended crop: {}", crop),
        Err(e) => println!("   Caught expected error: {}", e),
    }
}
