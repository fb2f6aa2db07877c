//! Arithmetic questions and their candidate answers

use rand::Rng;
use rand::seq::SliceRandom;

use crate::consts::{CANDIDATE_COUNT, MAX_QUOTIENT, RANGE_PER_LEVEL};

/// The four supported operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Exact integer result. Division callers guarantee `rhs != 0` and `lhs % rhs == 0`.
    pub fn apply(&self, lhs: i64, rhs: i64) -> i64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => lhs / rhs,
        }
    }
}

/// A generated question with exactly one correct candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub lhs: i64,
    pub rhs: i64,
    pub operator: Operator,
    pub answer: i64,
    /// Display text, e.g. `"12 * 3 = ?"`
    pub text: String,
    /// Shuffled; zone `i` of the answer column shows `candidates[i]`
    pub candidates: [i64; CANDIDATE_COUNT],
    pub difficulty: u32,
}

impl Question {
    /// Generate a question for `difficulty` (values below 1 are treated as 1)
    pub fn generate<R: Rng + ?Sized>(difficulty: u32, rng: &mut R) -> Self {
        let difficulty = difficulty.max(1);
        let range = RANGE_PER_LEVEL * difficulty as i64;

        let operator = Operator::ALL[rng.random_range(0..Operator::ALL.len())];
        let (lhs, rhs) = match operator {
            Operator::Divide => {
                // Divisor first, so the quotient is always a whole number
                let divisor = rng.random_range(1..=range);
                let quotient = rng.random_range(1..=MAX_QUOTIENT);
                (divisor * quotient, divisor)
            }
            _ => (rng.random_range(1..=range), rng.random_range(1..=range)),
        };
        let answer = operator.apply(lhs, rhs);

        let mut candidates = Vec::with_capacity(CANDIDATE_COUNT);
        candidates.push(answer);
        while candidates.len() < CANDIDATE_COUNT {
            let decoy = rng.random_range(answer - range..=answer + range);
            if !candidates.contains(&decoy) {
                candidates.push(decoy);
            }
        }
        candidates.shuffle(rng);

        Self {
            lhs,
            rhs,
            operator,
            answer,
            text: format!("{} {} {} = ?", lhs, operator.symbol(), rhs),
            candidates: [candidates[0], candidates[1], candidates[2]],
            difficulty,
        }
    }

    pub fn is_correct(&self, candidate: i64) -> bool {
        candidate == self.answer
    }

    /// Zone index holding the answer
    pub fn correct_index(&self) -> usize {
        self.candidates
            .iter()
            .position(|&c| c == self.answer)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = Question::generate(1, &mut Pcg32::seed_from_u64(42));
        let b = Question::generate(1, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
        assert_eq!(a.difficulty, 1);
    }

    #[test]
    fn test_zero_difficulty_is_clamped() {
        let q = Question::generate(0, &mut Pcg32::seed_from_u64(7));
        assert_eq!(q.difficulty, 1);
        assert!(q.lhs >= 1 && q.rhs >= 1);
    }

    #[test]
    fn test_operator_apply() {
        assert_eq!(Operator::Add.apply(7, 5), 12);
        assert_eq!(Operator::Subtract.apply(3, 9), -6);
        assert_eq!(Operator::Multiply.apply(6, 7), 42);
        assert_eq!(Operator::Divide.apply(42, 6), 7);
    }

    #[test]
    fn test_text_format() {
        let q = Question::generate(2, &mut Pcg32::seed_from_u64(3));
        assert_eq!(
            q.text,
            format!("{} {} {} = ?", q.lhs, q.operator.symbol(), q.rhs)
        );
    }

    #[test]
    fn test_all_operators_show_up() {
        let mut rng = Pcg32::seed_from_u64(1234);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let q = Question::generate(1, &mut rng);
            let i = Operator::ALL.iter().position(|&o| o == q.operator).unwrap();
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    proptest! {
        #[test]
        fn prop_candidates_distinct_with_single_answer(
            seed in any::<u64>(),
            difficulty in 1u32..60,
        ) {
            let q = Question::generate(difficulty, &mut Pcg32::seed_from_u64(seed));
            let [a, b, c] = q.candidates;
            prop_assert!(a != b && b != c && a != c);
            prop_assert_eq!(q.candidates.iter().filter(|&&x| x == q.answer).count(), 1);
            prop_assert_eq!(q.candidates[q.correct_index()], q.answer);

            let spread = RANGE_PER_LEVEL * difficulty as i64;
            for x in q.candidates {
                prop_assert!((x - q.answer).abs() <= spread);
            }
        }

        #[test]
        fn prop_operands_scale_with_difficulty(seed in any::<u64>(), difficulty in 1u32..60) {
            let q = Question::generate(difficulty, &mut Pcg32::seed_from_u64(seed));
            let range = RANGE_PER_LEVEL * difficulty as i64;
            prop_assert!(q.rhs >= 1 && q.rhs <= range);
            if q.operator != Operator::Divide {
                prop_assert!(q.lhs >= 1 && q.lhs <= range);
            }
            prop_assert_eq!(q.operator.apply(q.lhs, q.rhs), q.answer);
        }

        #[test]
        fn prop_division_is_exact(seed in any::<u64>(), difficulty in 1u32..60) {
            let mut rng = Pcg32::seed_from_u64(seed);
            // Draw until a division comes up
            let q = loop {
                let q = Question::generate(difficulty, &mut rng);
                if q.operator == Operator::Divide {
                    break q;
                }
            };
            prop_assert!(q.rhs != 0);
            prop_assert_eq!(q.lhs % q.rhs, 0);
            prop_assert_eq!(q.lhs / q.rhs, q.answer);
            prop_assert!(q.answer >= 1 && q.answer <= MAX_QUOTIENT);
        }
    }
}
