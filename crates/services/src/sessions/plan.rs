use rand::seq::SliceRandom;

use quiz_core::model::{Question, QuestionDraft, QuestionOrder};

/// Ordered, validated question list selected for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub questions: Vec<Question>,
    /// Session size the caller asked for.
    pub requested: usize,
    /// Malformed records dropped during validation.
    pub discarded: usize,
}

impl SessionPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Returns true when no usable questions survived selection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Returns true when fewer valid questions exist than were requested.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.questions.len() < self.requested
    }
}

/// Builds a session plan from a fetched question batch.
pub struct SessionBuilder {
    order: QuestionOrder,
    target: usize,
}

impl SessionBuilder {
    #[must_use]
    pub fn new(order: QuestionOrder, target: usize) -> Self {
        Self { order, target }
    }

    /// Validate, order, and cap a fetched batch.
    ///
    /// - Malformed records are dropped and counted, never surfaced as errors.
    /// - `Sequential` preserves fetch order; `Random` applies a uniform
    ///   shuffle before capping.
    /// - The result is capped at the target size; a shorter batch is used
    ///   whole.
    #[must_use]
    pub fn build(self, drafts: Vec<QuestionDraft>) -> SessionPlan {
        let fetched = drafts.len();
        let mut questions: Vec<Question> = Vec::with_capacity(fetched);
        for draft in drafts {
            match draft.validate() {
                Ok(question) => questions.push(question),
                Err(err) => log::debug!("dropping malformed question record: {err}"),
            }
        }
        let discarded = fetched - questions.len();
        if discarded > 0 {
            log::warn!("discarded {discarded} of {fetched} fetched question records");
        }

        if self.order == QuestionOrder::Random {
            let mut rng = rand::rng();
            questions.as_mut_slice().shuffle(&mut rng);
        }
        questions.truncate(self.target);

        SessionPlan {
            questions,
            requested: self.target,
            discarded,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
