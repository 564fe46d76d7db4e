use crate::Essay;

/// Number of questions on the submission form
pub const ANSWER_COUNT: usize = 7;

/// One prompt of the fixed question list
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Question {
    pub label: &'static str,
    pub emoji: &'static str,
}

/// The static ordered question list, pairing positionally with
/// `Essay::answers`
pub const QUESTIONS: [Question; ANSWER_COUNT] = [
    Question {
        label: "What made you start studying?",
        emoji: "\u{1f4ad}", // 💭
    },
    Question {
        label: "How much time did you put into preparing?",
        emoji: "\u{23f0}", // ⏰
    },
    Question {
        label: "What study methods or tips worked for you?",
        emoji: "\u{1f525}", // 🔥
    },
    Question {
        label: "How did you keep going when you wanted to give up?",
        emoji: "\u{1f4aa}", // 💪
    },
    Question {
        label: "What is your resolution for next year?",
        emoji: "\u{2b50}", // ⭐
    },
    Question {
        label: "How was your exam preparation overall?",
        emoji: "\u{1f4da}", // 📚
    },
    Question {
        label: "What changed for you after taking the exam?",
        emoji: "\u{2728}", // ✨
    },
];

/// A question together with its non-empty answer
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AnsweredQuestion<'a> {
    pub question: &'static Question,
    pub answer: &'a str,
}

impl Essay {
    /// The ordered subset of questions whose answer is non-empty after
    /// trimming whitespace. This is the primary input to the display engine.
    pub fn answered_questions(&self) -> Vec<AnsweredQuestion<'_>> {
        QUESTIONS
            .iter()
            .zip(self.answers.iter())
            .filter(|(_, a)| !a.trim().is_empty())
            .map(|(question, answer)| AnsweredQuestion {
                question,
                answer: answer.as_str(),
            })
            .collect()
    }
}
