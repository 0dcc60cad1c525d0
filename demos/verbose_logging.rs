//! Demonstrates enabling verbose logging for atrous.
use atrous::swt::decompose_vec;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let signal: Vec<f32> = (0..32).map(|i| i as f32).collect();
    decompose_vec(&signal, 4).unwrap();
}
