use rand::Rng;

/// Result of a single throw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatchOutcome {
    /// The Pokemon was caught
    Caught,
    /// The Pokemon broke free
    Escaped,
}

impl CatchOutcome {
    /// Returns true for [`CatchOutcome::Caught`].
    pub fn is_caught(self) -> bool {
        matches!(self, CatchOutcome::Caught)
    }
}

/// Rolls a catch attempt against a Pokemon's base experience.
///
/// The roll is uniform in `[0, 2 * base_experience)` and succeeds when it
/// lands at or above `base_experience`.
pub fn attempt_catch<R: Rng + ?Sized>(base_experience: u32, rng: &mut R) -> CatchOutcome {
    if base_experience == 0 {
        return CatchOutcome::Caught;
    }

    let upper = u64::from(base_experience) * 2;
    let roll = rng.gen_range(0..upper);
    if roll >= u64::from(base_experience) {
        CatchOutcome::Caught
    } else {
        CatchOutcome::Escaped
    }
}
