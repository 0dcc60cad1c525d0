use atrous::swt::{decompose, decompose_levels, max_level};
use atrous::Status;

fn main() {
    let signal: Vec<f32> = (0..64)
        .map(|i| {
            let t = i as f32;
            (0.2 * t).sin() + 0.3 * (2.5 * t).sin()
        })
        .collect();

    let depth = 3;
    let mut detail = vec![0.0f32; signal.len()];
    let result = decompose(&signal, &mut detail, depth);
    println!("status: {}", Status::from(&result).code());
    println!("depth {} detail: {:?}", depth, detail);

    let deepest = max_level(signal.len());
    let bands = decompose_levels(&signal, deepest).unwrap();
    for (d, band) in bands.iter().enumerate() {
        let energy: f32 = band.iter().map(|x| x * x).sum();
        println!("octave {}: energy {:.4}", d + 1, energy);
    }

    let too_deep = decompose(&signal, &mut detail, deepest + 1);
    println!("depth {} -> status {}", deepest + 1, Status::from(&too_deep).code());
}
