use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;

use cabin_core::AmbientKind;
use cabin_core::ambient::AMBIENT_WEIGHTS;

pub fn run(draws: usize, seed: u64) -> Result<(), String> {
    if draws == 0 {
        return Err("--draws must be at least 1".to_string());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut counts = [0usize; AMBIENT_WEIGHTS.len()];
    for _ in 0..draws {
        let kind = AmbientKind::draw(&mut rng);
        if let Some(slot) = AMBIENT_WEIGHTS.iter().position(|(k, _)| *k == kind) {
            counts[slot] += 1;
        }
    }

    println!(
        "  {} {}",
        "Ambient odds".bold(),
        format!("({draws} draws, seed={seed})").dimmed()
    );
    println!();

    let total: u32 = AMBIENT_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Event", "Weight", "Expected", "Observed", "Count"]);
    for ((kind, weight), count) in AMBIENT_WEIGHTS.iter().zip(counts) {
        let expected = f64::from(*weight) / f64::from(total) * 100.0;
        let observed = count as f64 / draws as f64 * 100.0;
        table.add_row(vec![
            kind.to_string(),
            weight.to_string(),
            format!("{expected:.1}%"),
            format!("{observed:.1}%"),
            count.to_string(),
        ]);
    }
    println!("{table}");
    println!();

    Ok(())
}
