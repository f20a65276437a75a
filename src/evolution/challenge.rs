/// Scores an individual. Higher scores are better.
///
/// Implementations must be `Send + Sync` so a population can be scored in
/// parallel.
pub trait Challenge<P>: Send + Sync {
    fn score(&self, individual: &P) -> f64;
}
