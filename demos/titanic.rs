extern crate csv;
extern crate env_logger;
extern crate rand;
extern crate serde_json;
extern crate tabgrad;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use tabgrad::{fit, infer, read_csv, ColumnType, Encoder, ModelKind, TrainConfig};

fn survival_config() -> TrainConfig {
    let mut config = TrainConfig::new("Survived");
    for (name, kind) in vec![
        ("Survived", ColumnType::Bool),
        ("Pclass", ColumnType::String),
        ("Sex", ColumnType::String),
        ("Age", ColumnType::Numeric),
        ("SibSp", ColumnType::Numeric),
        ("Parch", ColumnType::Numeric),
        ("Fare", ColumnType::Numeric),
        ("Embarked", ColumnType::String),
    ] {
        config.cols.insert(name.to_string(), kind);
    }
    config.normalize = ["Pclass", "Sex", "Age", "Fare", "Embarked"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    config.logarithmic = vec!["Fare".to_string()];
    config.subset = Some((5, 40));
    config
}

fn named_params(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

fn main() {
    env_logger::init();

    let train = read_csv("data/titanic-train.csv").expect("Train data");
    let test = read_csv("data/titanic-test.csv").expect("Test data");

    let mut config = survival_config();
    println!("Config {:?}", config);

    // The training window; the test table stays whole
    let train = match config.subset {
        Some((skip, take)) => train.slice(skip, take),
        None => train,
    };

    let encoder = Encoder::fit(&config, &train).expect("Encoder");
    let train_data = encoder.encode(&train).expect("Train encoding");
    let test_data = encoder.encode(&test).expect("Test encoding");

    let mut rng = StdRng::seed_from_u64(42);

    println!(
        "Running linear regression with {} parameters...",
        train_data.schema.len()
    );
    let linear = fit(&train_data, &config, &mut rng).expect("Linear fit");
    println!("\tloss was {}", linear.loss);

    config.model = ModelKind::TwoLayerAdditive;
    config.hard_params = Some(named_params(&[
        ("Ones", 0.1),
        ("Pclass_1", 0.2),
        ("Pclass_2", 0.05),
        ("Sex_female", 0.5),
        ("Age", -0.1),
        ("SibSp", -0.05),
        ("Parch", 0.01),
        ("Fare", 0.05),
        ("Embarked_C", 0.05),
        ("Embarked_Q", 0.01),
    ]));
    config.hard_params1 = Some(named_params(&[
        ("Ones", 0.01),
        ("Pclass_1", 0.05),
        ("Pclass_2", 0.01),
        ("Sex_female", 0.1),
        ("Age", -0.05),
        ("SibSp", -0.01),
        ("Parch", 0.005),
        ("Fare", 0.01),
        ("Embarked_C", 0.01),
        ("Embarked_Q", 0.005),
    ]));

    println!(
        "Running two layer regression with {} parameters...",
        2 * train_data.schema.len()
    );
    let neural = fit(&train_data, &config, &mut rng).expect("Two layer fit");
    println!("\tloss was {}", neural.loss);

    println!(
        "Improvement over the linear model: {:.2}%",
        (linear.loss - neural.loss) * 100.
    );
    println!("Accuracy: {:.2}%", (1. - neural.loss) * 100.);

    let predictions = infer(&neural.model, &test_data).expect("Test predictions");
    for (passenger, prediction) in &predictions {
        let outcome = if *prediction > 0.05 { "Survived" } else { "Died" };
        println!("Passenger {}: {}", passenger, outcome);
    }

    println!("Serializing model to titanic.json");
    let serialized: String =
        serde_json::to_string(&neural.model).expect("Error on JSON serialization");
    let mut file = File::create("titanic.json").expect("Error on file creation");
    file.write_all(serialized.as_bytes())
        .expect("Error on writing of the JSON");

    println!("Writing predictions to titanic.csv");
    let file = File::create("titanic.csv").expect("Error on file creation");
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(&["passenger", "prediction", "outcome"])
        .expect("Error on csv writing");
    for (passenger, prediction) in &predictions {
        let outcome = if *prediction > 0.05 { "Survived" } else { "Died" };
        wtr.write_record(&[&passenger.to_string(), &prediction.to_string(), &outcome.to_string()])
            .expect("Error on csv writing");
    }
    wtr.flush().expect("Error on CSV flushing");
}
