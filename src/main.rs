extern crate sequence_treap;

use sequence_treap::sort::reversal_sort;
use std::io::{self, Read, Write};

/// Reads an element count followed by that many integers from stdin, runs the
/// reversal sort, and prints the position reported at each step.
fn main() {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .expect("failed to read stdin");

    let mut tokens = input.split_whitespace().map(|token| {
        token
            .parse::<i64>()
            .expect("input must be whitespace-separated integers")
    });

    let count = tokens.next().unwrap_or(0).max(0) as usize;
    let values = tokens.take(count).collect::<Vec<i64>>();
    assert_eq!(values.len(), count, "fewer values than announced");

    let reported = reversal_sort(values);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let line = reported
        .iter()
        .map(|index| index.to_string())
        .collect::<Vec<String>>()
        .join(" ");
    writeln!(out, "{}", line).expect("failed to write stdout");
}
