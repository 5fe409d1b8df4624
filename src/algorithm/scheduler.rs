//! Least-branching choice: find the generator that runs dry first without
//! materializing the others.

use tracing::trace;

/// Steps every generator once per round, in the given order, until one is
/// exhausted. Returns that generator's key together with everything it
/// produced, which is the smallest list among them. Ties go to the earliest
/// generator in `generators`.
///
/// Returns `None` only when `generators` is empty. The other generators are
/// consumed partially and dropped.
pub fn pick_least_branching<K, I>(generators: Vec<(K, I)>) -> Option<(K, Vec<I::Item>)>
where
    I: Iterator,
{
    let mut running: Vec<(K, I, Vec<I::Item>)> = generators
        .into_iter()
        .map(|(key, generator)| (key, generator, Vec::new()))
        .collect();
    if running.is_empty() {
        return None;
    }

    let mut round = 0usize;
    loop {
        for slot in 0..running.len() {
            let (_, generator, produced) = &mut running[slot];
            match generator.next() {
                Some(item) => produced.push(item),
                None => {
                    let (key, _, produced) = running.swap_remove(slot);
                    trace!(round, size = produced.len(), "least-branching generator found");
                    return Some((key, produced));
                }
            }
        }
        round += 1;
    }
}
