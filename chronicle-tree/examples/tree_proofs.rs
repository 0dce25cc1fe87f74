//! History tree example: build a log, append to it, prove inclusion and
//! consistency.
//!
//! Run with: cargo run --example tree_proofs

use chronicle_tree::{verify_consistency_proof, verify_inclusion_proof, Tree};

fn main() -> anyhow::Result<()> {
    println!("=== History Tree Demo ===\n");

    // Build a log over an initial batch of entries
    let initial: Vec<&[u8]> = vec![b"tx1", b"tx2", b"tx3", b"tx4", b"tx5"];
    let tree = Tree::new(&initial)?;

    let old_size = tree.leaf_count();
    let old_root = tree.root_hash();
    println!("Initialized log with {} leaves", old_size);
    println!("Root: {}\n", old_root);
    println!("{}", tree.render());

    // Prove an existing entry is in the log
    let proof = tree.inclusion_proof_for(b"tx3")?;
    let valid = verify_inclusion_proof(b"tx3", &proof, &old_root, None);
    println!("Inclusion proof for 'tx3': {} siblings, valid: {}\n", proof.len(), valid);

    // Append a new entry; the root moves
    tree.append(b"tx6")?;
    let new_root = tree.root_hash();
    println!("Appended 'tx6'. New leaf count: {}", tree.leaf_count());
    println!("New root: {}\n", new_root);
    println!("{}", tree.render());

    // The freshly appended entry is provable against the new root
    let proof = tree.inclusion_proof_for(b"tx6")?;
    let valid = verify_inclusion_proof(b"tx6", &proof, &new_root, None);
    println!("Inclusion proof for 'tx6': {} siblings, valid: {}\n", proof.len(), valid);

    // Prove the old 5-leaf log is a prefix of the current 6-leaf log
    let new_size = tree.leaf_count();
    println!("--- Consistency: size {} vs size {} ---", old_size, new_size);

    let consistency = tree.consistency_proof(old_size)?;
    println!("Proof carries {} hashes:", consistency.hashes.len());
    for (i, hash) in consistency.hashes.iter().enumerate() {
        println!("  hash {}: {}", i, hash);
    }

    let valid = verify_consistency_proof(
        old_size,
        new_size,
        &old_root,
        &new_root,
        &consistency,
        None,
    );
    println!("Consistency proof valid: {}", valid);

    Ok(())
}
