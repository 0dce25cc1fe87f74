//! Merkle Mountain Range example: stream leaves in and watch the peaks.
//!
//! Run with: cargo run --example mmr_growth

use chronicle_mmr::Mmr;

fn main() -> anyhow::Result<()> {
    println!("=== Merkle Mountain Range Demo ===\n");

    let mmr = Mmr::new();
    print!("{}", mmr.summary());

    println!("\nAppending leaves...\n");
    for leaf in [b"A", b"B", b"C", b"D", b"E"] {
        mmr.append(leaf)?;

        let heights: Vec<u32> = mmr.peaks().iter().map(|p| p.height).collect();
        println!(
            "appended {:?}: {} leaves, peak heights {:?}",
            std::str::from_utf8(leaf)?,
            mmr.leaf_count(),
            heights
        );
    }

    println!();
    print!("{}", mmr.summary());
    println!();
    print!("{}", mmr.render());

    Ok(())
}
