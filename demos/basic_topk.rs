//! Example demonstrating the TopKBuilder API with both stores.
//!
//! Run with: cargo run --example basic_topk

use topkit::builder::{Representation, TopKBuilder};
use topkit::traits::{ReadOnlyTopK, TopK};

const TEXT: &str = "the quick brown fox jumps over the lazy dog the fox \
                    runs and the dog sleeps while the quick fox jumps again";

fn main() {
    println!("=== TopKBuilder Examples ===\n");

    for (n, representation) in [Representation::Array, Representation::List]
        .into_iter()
        .enumerate()
    {
        println!("{}. {:?} store, maxsize 4", n + 1, representation);
        let mut table = TopKBuilder::new().seed(7).build(representation);

        for word in TEXT.split_whitespace() {
            if let Some(evicted) = table.increment(word, 4).unwrap() {
                println!("   {word:>6} evicted {evicted}");
            }
        }

        for (key, count) in table.iter() {
            println!("   {key:>6} ~ {count}");
        }

        let bytes = table.encode();
        println!("   encoded to {} bytes\n", bytes.len());
    }

    // Example 3: update admits only counts above the floor
    println!("3. Update against a full table");
    let mut table = TopKBuilder::new().build(Representation::List);
    table.update("a", 10, 2).unwrap();
    table.update("b", 5, 2).unwrap();
    println!("   update(c, 3) -> {:?}", table.update("c", 3, 2).unwrap());
    println!("   update(d, 8) -> {:?}", table.update("d", 8, 2).unwrap());
    println!("   entries: {:?}", table.sorted_entries());
}
