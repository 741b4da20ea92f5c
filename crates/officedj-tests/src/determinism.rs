//! Repeat-and-compare checks.
//!
//! A generator is run several times and every output is reduced to a BLAKE3
//! hex digest; the outputs are deterministic when all digests agree.

/// Digests of every run of one generator.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// One digest per run, in run order.
    pub hashes: Vec<String>,
}

impl DeterminismResult {
    /// Digest of the first run.
    pub fn hash(&self) -> &str {
        &self.hashes[0]
    }

    /// Index of the first run that disagreed with run 0.
    pub fn first_mismatch(&self) -> Option<usize> {
        self.hashes.iter().position(|h| h != self.hash())
    }

    pub fn is_deterministic(&self) -> bool {
        self.first_mismatch().is_none()
    }

    /// # Panics
    /// Panics, listing every digest, if any run disagreed.
    pub fn assert_deterministic(&self) {
        if let Some(run) = self.first_mismatch() {
            panic!(
                "run {} of {} differs from run 0\n{}",
                run,
                self.hashes.len(),
                self.hashes.join("\n")
            );
        }
    }
}

/// BLAKE3 hex digest of a byte slice.
pub fn compute_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Runs `generate` `runs` times and records the digest of each output.
///
/// # Panics
/// Panics if `runs` is less than 2.
pub fn verify_determinism<F, T>(mut generate: F, runs: usize) -> DeterminismResult
where
    F: FnMut() -> T,
    T: AsRef<[u8]>,
{
    assert!(runs >= 2, "determinism needs at least two runs");
    let hashes = (0..runs).map(|_| compute_hash(generate().as_ref())).collect();
    DeterminismResult { hashes }
}
