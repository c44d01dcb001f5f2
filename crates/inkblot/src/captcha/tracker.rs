//! Attempt tracking for a rendered captcha.

use std::fmt;

use inkblot_common::{CaptchaState, RenderedCaptcha, Solution};

/// A rendered captcha and the state of the attempts made against it.
///
/// `solved` never flips back, and once the attempt budget is spent
/// further checks have no effect.
#[derive(Debug, Clone)]
pub struct Captcha {
    art: String,
    solution: Solution,
    fails: u32,
    /// Wrong attempts allowed (0 = unlimited)
    max_fails: u32,
    solved: bool,
}

impl Captcha {
    pub fn new(art: String, solution: Solution, max_fails: u32) -> Self {
        Self {
            art,
            solution,
            fails: 0,
            max_fails,
            solved: false,
        }
    }

    pub fn art(&self) -> &str {
        &self.art
    }

    /// The expected answer, for revealing after a failed session
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn fails(&self) -> u32 {
        self.fails
    }

    pub fn max_fails(&self) -> u32 {
        self.max_fails
    }

    /// True once the attempt budget is exhausted
    pub fn failed(&self) -> bool {
        self.max_fails > 0 && self.fails >= self.max_fails
    }

    pub fn solved(&self) -> bool {
        self.solved
    }

    /// Attempts left before lock-out, `None` when unlimited
    pub fn remaining_attempts(&self) -> Option<u32> {
        (self.max_fails > 0).then(|| self.max_fails.saturating_sub(self.fails))
    }

    pub fn state(&self) -> CaptchaState {
        if self.solved {
            CaptchaState::Solved
        } else if self.failed() {
            CaptchaState::Failed
        } else {
            CaptchaState::Active
        }
    }

    /// Check an attempt (case-insensitive).
    ///
    /// Always false once failed; always true once solved. Only a wrong
    /// attempt on an active captcha counts against the budget.
    pub fn check(&mut self, attempt: &str) -> bool {
        if self.failed() {
            return false;
        }

        if self.solved || self.solution.matches(attempt) {
            if !self.solved {
                tracing::info!(fails = self.fails, "Captcha solved");
            }
            self.solved = true;
            return true;
        }

        self.fails += 1;

        if self.failed() {
            tracing::warn!(fails = self.fails, max_fails = self.max_fails, "Captcha attempts exhausted");
        } else {
            tracing::debug!(
                fails = self.fails,
                remaining = ?self.remaining_attempts(),
                "Wrong captcha attempt"
            );
        }

        false
    }
}

impl fmt::Display for Captcha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.art)
    }
}

impl From<Captcha> for RenderedCaptcha {
    fn from(captcha: Captcha) -> Self {
        RenderedCaptcha::new(captcha.art, captcha.solution, captcha.max_fails)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::captcha::{CompositorSettings, GlyphCompositor};
    use crate::glyphs::BitmapRenderer;

    fn captcha(solution: &str, max_fails: u32) -> Captcha {
        Captcha::new("#".to_string(), Solution::new(solution).unwrap(), max_fails)
    }

    #[test]
    fn test_check_is_case_insensitive() {
        let mut lower = captcha("ABCDE", 3);
        let mut upper = captcha("ABCDE", 3);
        assert_eq!(lower.check("abcde"), upper.check("ABCDE"));
        assert!(lower.solved() && upper.solved());
    }

    #[test]
    fn test_generated_captcha_accepts_lowercase_answer() {
        let compositor = GlyphCompositor::new(BitmapRenderer::new(), CompositorSettings::default()).unwrap();
        let mut captcha = compositor
            .generate_with(&mut StdRng::seed_from_u64(31), 3, 2)
            .unwrap();
        assert_eq!(captcha.solution().len(), 3);
        assert_eq!(captcha.max_fails(), 2);

        let answer = captcha.solution().as_str().to_lowercase();
        assert!(captcha.check(&answer));
        assert!(captcha.solved() && !captcha.failed());
        assert_eq!(captcha.fails(), 0);
    }

    #[test]
    fn test_solved_is_idempotent() {
        let mut captcha = captcha("ABC", 3);
        assert!(!captcha.check("XYZ"));
        assert!(captcha.check("abc"));
        assert_eq!(captcha.fails(), 1);

        assert!(captcha.check("wrong"));
        assert!(captcha.check(""));
        assert_eq!(captcha.fails(), 1);
        assert_eq!(captcha.state(), CaptchaState::Solved);
    }

    #[test]
    fn test_lock_out_on_third_wrong_attempt() {
        let mut captcha = captcha("ABC", 3);
        assert!(!captcha.check("X"));
        assert!(!captcha.failed());
        assert!(!captcha.check("Y"));
        assert!(!captcha.failed());
        assert!(!captcha.check("Z"));
        assert!(captcha.failed());
        assert_eq!(captcha.state(), CaptchaState::Failed);
    }

    #[test]
    fn test_failed_is_monotonic() {
        let mut captcha = captcha("ABC", 1);
        assert!(!captcha.check("ZZZ"));
        assert!(captcha.failed());

        assert!(!captcha.check("ABC"));
        assert!(!captcha.check("abc"));
        assert_eq!(captcha.fails(), 1);
        assert!(!captcha.solved());
    }

    #[test]
    fn test_unlimited_attempts_never_fail() {
        let mut captcha = captcha("ABC", 0);
        for _ in 0..1_000 {
            assert!(!captcha.check("nope"));
        }
        assert!(!captcha.failed());
        assert_eq!(captcha.fails(), 1_000);
        assert_eq!(captcha.remaining_attempts(), None);
        assert!(captcha.check("ABC"));
    }

    #[test]
    fn test_remaining_attempts() {
        let mut captcha = captcha("ABC", 2);
        assert_eq!(captcha.remaining_attempts(), Some(2));
        captcha.check("no");
        assert_eq!(captcha.remaining_attempts(), Some(1));
        captcha.check("no");
        assert_eq!(captcha.remaining_attempts(), Some(0));
    }

    #[test]
    fn test_display_is_art() {
        let captcha = Captcha::new(" # \r\n###".to_string(), Solution::new("A").unwrap(), 3);
        assert_eq!(captcha.to_string(), " # \r\n###");
    }

    #[test]
    fn test_into_rendered() {
        let rendered: RenderedCaptcha = captcha("QRS", 4).into();
        assert_eq!(rendered.solution.as_str(), "QRS");
        assert_eq!(rendered.max_fails, 4);
        assert_eq!(rendered.art, "#");
    }
}
