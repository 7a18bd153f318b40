use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use ovalearn::prelude::*;
use ovalearn_sgd::{LearningRate, Loss, Penalty, SgdClassifier, SgdGridSearch};

fn report(name: &str, model: &SgdClassifier<f64, usize>, valid: &Dataset<f64, usize>) {
    let predictions = model.predict(valid.records());
    let cm = predictions.confusion_matrix(valid.targets()).unwrap();

    println!("== {} ==", name);
    println!("accuracy: {:.3}", cm.accuracy());
    println!("{:?}", cm);
    println!("weights:\n{:.4}", model.weights());
    println!("intercepts: {:.4}", model.intercepts());
    println!(
        "epochs per class: {:?} (max {})",
        model.n_iter_per_class(),
        model.n_iter()
    );
    println!();
}

fn weight_magnitude(weights: &Array2<f64>) -> f64 {
    weights.iter().map(|w| w * w).sum::<f64>().sqrt()
}

fn main() -> ovalearn_sgd::Result<()> {
    // Petal length and width carry almost all of the class signal, so the
    // models are trained on those two features only
    let dataset = ovalearn_datasets::iris()
        .select_features(&[2, 3])
        .shuffle(&mut SmallRng::seed_from_u64(42));
    let (train, valid) = dataset.split_with_ratio(0.8);
    println!(
        "iris: {} training and {} validation samples, features {:?}",
        train.nsamples(),
        valid.nsamples(),
        train.feature_names()
    );
    println!();

    let grid = SgdGridSearch::new()
        .losses(&[Loss::Hinge, Loss::Log, Loss::ModifiedHuber])
        .penalties(&[
            Penalty::None,
            Penalty::L2,
            Penalty::L1,
            Penalty::ElasticNet { l1_ratio: 0.15 },
        ])
        .alphas(&[1e-4, 1e-3, 1e-2, 0.05, 0.1])
        .learning_rates(&[
            LearningRate::Constant,
            LearningRate::Optimal,
            LearningRate::InvScaling { power_t: 0.5 },
            LearningRate::Adaptive,
        ])
        .eta0s(&[0.01, 0.1])
        .max_iters(&[3000])
        .tols(&[Some(1e-5)])
        .seed(42);

    // First pass: run every candidate until its training loss plateaus
    let plain = grid.run(&train, 5)?;
    println!(
        "grid search without early stopping: {} candidates, best accuracy {:.3}",
        plain.candidates().len(),
        plain.best_score()
    );

    // Second pass: the same grid, but every candidate holds out a tenth of
    // its training data and stops on the validation score instead
    let early = grid.early_stopping(true).run(&train, 5)?;
    println!(
        "grid search with early stopping:    {} candidates, best accuracy {:.3}",
        early.candidates().len(),
        early.best_score()
    );
    println!();

    // Refit the winners on the full training split. The generators are
    // entropy seeded here, so repeated runs give slightly different weights.
    let plain_model = plain
        .best_params()
        .clone()
        .rng(SmallRng::from_entropy())
        .check()?
        .fit(&train)?;
    let early_model = early
        .best_params()
        .clone()
        .rng(SmallRng::from_entropy())
        .check()?
        .fit(&train)?;

    report("best model, no early stopping", &plain_model, &valid);
    report("best model, early stopping", &early_model, &valid);

    println!("== comparison ==");
    println!(
        "weight magnitude: {:.4} (plain) vs {:.4} (early stopping)",
        weight_magnitude(plain_model.weights()),
        weight_magnitude(early_model.weights())
    );
    println!(
        "epochs:           {} (plain) vs {} (early stopping)",
        plain_model.n_iter(),
        early_model.n_iter()
    );

    Ok(())
}
