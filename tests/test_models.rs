use assert_approx_eq::assert_approx_eq;
use demand_forecast::dataset::WindowedExample;
use demand_forecast::models::recurrent::{RecurrentConfig, TrainedRecurrentModel};
use demand_forecast::models::{ModelTopology, SequenceModel, SequenceRegressor};
use pretty_assertions::assert_eq;

fn constant_examples(value: f64, count: usize, window: usize) -> Vec<WindowedExample> {
    (0..count)
        .map(|_| WindowedExample {
            input: vec![value; window],
            target: value,
        })
        .collect()
}

#[test]
fn learns_a_constant_signal() {
    let model = RecurrentConfig::new(8).unwrap();
    let trained = model.fit(&constant_examples(0.5, 20, 3)).unwrap();

    let prediction = trained.predict_next(&[0.5, 0.5, 0.5]).unwrap();
    assert_approx_eq!(prediction, 0.5, 0.15);
}

#[test]
fn fit_rejects_empty_and_ragged_example_sets() {
    let model = RecurrentConfig::default();
    assert!(model.fit(&[]).is_err());

    let ragged = vec![
        WindowedExample {
            input: vec![0.1, 0.2],
            target: 0.3,
        },
        WindowedExample {
            input: vec![0.1, 0.2, 0.3],
            target: 0.4,
        },
    ];
    assert!(model.fit(&ragged).is_err());
}

#[test]
fn same_seed_same_weights() {
    let examples = constant_examples(0.4, 10, 3);
    let a = RecurrentConfig::new(8).unwrap().with_seed(7);
    let b = RecurrentConfig::new(8).unwrap().with_seed(7);

    assert_eq!(
        a.fit(&examples).unwrap().weight_vec(),
        b.fit(&examples).unwrap().weight_vec()
    );
}

#[test]
fn different_seeds_diverge() {
    let examples = constant_examples(0.4, 10, 3);
    let a = RecurrentConfig::new(8).unwrap().with_seed(1);
    let b = RecurrentConfig::new(8).unwrap().with_seed(2);

    assert_ne!(
        a.fit(&examples).unwrap().weight_vec(),
        b.fit(&examples).unwrap().weight_vec()
    );
}

#[test]
fn weight_vec_round_trips_through_from_parts() {
    let model = RecurrentConfig::new(4).unwrap();
    let trained = model.fit(&constant_examples(0.3, 5, 3)).unwrap();

    let rebuilt =
        TrainedRecurrentModel::from_parts(&trained.topology(), &trained.weight_vec()).unwrap();

    let window = [0.2, 0.3, 0.4];
    assert_eq!(
        trained.predict_next(&window).unwrap(),
        rebuilt.predict_next(&window).unwrap()
    );
}

#[test]
fn from_parts_rejects_bad_topology_or_weights() {
    let good = ModelTopology {
        kind: "elman_rnn".to_string(),
        window: 3,
        hidden: 4,
    };
    let weights = vec![0.0; TrainedRecurrentModel::weight_len(4)];

    let alien = ModelTopology {
        kind: "transformer".to_string(),
        ..good.clone()
    };
    assert!(TrainedRecurrentModel::from_parts(&alien, &weights).is_err());

    assert!(TrainedRecurrentModel::from_parts(&good, &weights[1..]).is_err());

    let hollow = ModelTopology {
        hidden: 0,
        ..good.clone()
    };
    assert!(TrainedRecurrentModel::from_parts(&hollow, &[]).is_err());
}

#[test]
fn predict_uses_the_trailing_window_of_long_input() {
    let model = RecurrentConfig::new(4).unwrap();
    let trained = model.fit(&constant_examples(0.3, 5, 3)).unwrap();

    let long = [9.0, 9.0, 0.3, 0.3, 0.3];
    assert_eq!(
        trained.predict_next(&long).unwrap(),
        trained.predict_next(&[0.3, 0.3, 0.3]).unwrap()
    );
}

#[test]
fn predict_rejects_short_input() {
    let model = RecurrentConfig::new(4).unwrap();
    let trained = model.fit(&constant_examples(0.3, 5, 3)).unwrap();
    assert!(trained.predict_next(&[0.3, 0.3]).is_err());
}

#[test]
fn config_parameter_validation() {
    assert!(RecurrentConfig::new(0).is_err());
    assert!(RecurrentConfig::new(8).unwrap().with_epochs(0).is_err());
    assert!(RecurrentConfig::new(8)
        .unwrap()
        .with_learning_rate(0.0)
        .is_err());
    assert!(RecurrentConfig::new(8)
        .unwrap()
        .with_learning_rate(-1.0)
        .is_err());
}
