mod test_signals;

use std::fs;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use test_signals::random_stream;
use zdf::persistence::{read_samples, write_samples};
use zdf::simulation::{NoiseConfig, SyntheticConfig, generate_synthetic_data};
use zdf::{FileStore, FilterBank, FilterSpec, MemoryStore, SampleStore, ZdfEngine, ZdfProcessor};

#[test]
fn test_file_batch_output_length() {
    let dir = tempfile::tempdir().unwrap();
    let spec = FilterSpec::new(64, &[0, 1, 2], 0, 1..3, 2).unwrap();
    let config = SyntheticConfig {
        updates: 100,
        noise: NoiseConfig::default().with_seed(9),
    };
    let data = generate_synthetic_data(spec.length(), &config);

    let store = FileStore::for_spec(dir.path(), &spec);
    write_samples(store.snapshot_path(), &data.seed).unwrap();
    write_samples(store.input_path(), &data.input).unwrap();
    let output = store.output_path();

    let mut processor = ZdfProcessor::new(&spec, store).unwrap();
    assert_eq!(processor.run().unwrap(), 100);

    let bytes = fs::metadata(&output).unwrap().len() as usize;
    assert_eq!(bytes, 4 * spec.num_channels() * 100);
}

#[test]
fn test_empty_input_replaces_stale_output() {
    let dir = tempfile::tempdir().unwrap();
    let spec = FilterSpec::new(8, &[0, 1], 0, 1..2, 0).unwrap();

    let store = FileStore::for_spec(dir.path(), &spec);
    write_samples(store.snapshot_path(), &random_stream(8, 11)).unwrap();
    write_samples(store.input_path(), &[]).unwrap();
    write_samples(store.output_path(), &[0.5; 10]).unwrap();
    let output = store.output_path();

    let mut processor = ZdfProcessor::new(&spec, store).unwrap();
    assert_eq!(processor.run().unwrap(), 0);
    assert_eq!(fs::metadata(&output).unwrap().len(), 0);
}

#[test]
fn test_file_batch_matches_memory_batch() {
    let dir = tempfile::tempdir().unwrap();
    let spec = FilterSpec::new(20, &[1, 2], 1, 0..2, 1).unwrap();
    let seed = random_stream(20, 1);
    let input = random_stream(45, 2);

    let store = FileStore::for_spec(dir.path(), &spec);
    write_samples(store.snapshot_path(), &seed).unwrap();
    write_samples(store.input_path(), &input).unwrap();
    let output = store.output_path();
    ZdfProcessor::new(&spec, store).unwrap().run().unwrap();

    let mut memory = ZdfProcessor::new(&spec, MemoryStore::new(seed, input)).unwrap();
    memory.run().unwrap();
    let expected: Vec<f32> = memory.into_store().outputs.concat();

    assert_eq!(read_samples(&output).unwrap(), expected);
}

#[test]
fn test_snapshot_round_trip_is_bit_identical() {
    let dir = tempfile::tempdir().unwrap();
    let spec = FilterSpec::new(16, &[0, 1], 0, 1..3, 0).unwrap();
    let seed = random_stream(16, 3);
    let input = random_stream(37, 4);

    let store = FileStore::for_spec(dir.path(), &spec);
    write_samples(store.snapshot_path(), &seed).unwrap();
    write_samples(store.input_path(), &input).unwrap();

    let mut processor = ZdfProcessor::new(&spec, store).unwrap();
    processor.run().unwrap();
    let history = processor.engine().chronological();
    processor.checkpoint().unwrap();

    let mut reloaded = FileStore::for_spec(dir.path(), &spec);
    let restored = reloaded.read_seed(16).unwrap();
    assert_eq!(
        restored.iter().map(|x| x.to_bits()).collect::<Vec<_>>(),
        history.iter().map(|x| x.to_bits()).collect::<Vec<_>>()
    );
}

#[test]
fn test_resume_from_snapshot_continues_stream() {
    let spec = FilterSpec::new(12, &[0, 2], 0, 1..2, 1).unwrap();
    let bank = Arc::new(FilterBank::build(&spec).unwrap());
    let seed = random_stream(12, 7);
    let input = random_stream(40, 8);
    let (first, second) = input.split_at(17);

    let mut uninterrupted = ZdfEngine::new(Arc::clone(&bank), &seed).unwrap();
    let expected: Vec<Vec<f32>> = input
        .iter()
        .map(|&x| uninterrupted.update(x).to_vec())
        .collect();

    let mut processor =
        ZdfProcessor::with_bank(Arc::clone(&bank), MemoryStore::new(seed, first.to_vec()))
            .unwrap();
    processor.run().unwrap();
    processor.checkpoint().unwrap();
    let snapshot = processor.into_store().snapshot.unwrap();

    let mut resumed =
        ZdfProcessor::with_bank(bank, MemoryStore::new(snapshot, second.to_vec())).unwrap();
    resumed.run().unwrap();
    let outputs = resumed.into_store().outputs;
    assert_eq!(outputs.len(), second.len());
    for (record, reference) in outputs.iter().zip(&expected[17..]) {
        for (&a, &b) in record.iter().zip(reference) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-5);
        }
    }
}

#[test]
fn test_identifier_names_files() {
    let spec = FilterSpec::default();
    let restored = FilterSpec::from_identifier(spec.identifier()).unwrap();
    assert_eq!(restored, spec);

    let store = FileStore::for_spec("dat", &spec);
    let name = format!("{}.zdfo", spec.identifier());
    assert!(store.output_path().ends_with(name));
}
