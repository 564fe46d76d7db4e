use std::time::Duration;

use sugi_api::{Essay, EssayId, Time};

/// Total answer length at which an essay is always split in two pages
const SPLIT_TOTAL_LEN: usize = 2000;
/// Question count at which an essay is always split
const SPLIT_QUESTION_COUNT: usize = 7;
/// Average answer length at which an essay is split
const SPLIT_AVG_LEN: usize = 300;
/// Single answer length at which an essay is split
const SPLIT_SINGLE_LEN: usize = 800;

const WHOLE_ESSAY_BASE: Duration = Duration::from_millis(30_000);
const WHOLE_ESSAY_MIN: Duration = Duration::from_millis(20_000);
const WHOLE_ESSAY_MAX: Duration = Duration::from_millis(90_000);

const PAGE_BASE: Duration = Duration::from_millis(20_000);
const PAGE_MIN: Duration = Duration::from_millis(10_000);
const PAGE_MAX: Duration = Duration::from_millis(60_000);

const QUESTION_BASE: Duration = Duration::from_millis(15_000);
const QUESTION_MIN: Duration = Duration::from_millis(10_000);
const QUESTION_MAX: Duration = Duration::from_millis(30_000);

/// Settle delay for a slide between distinct essays (or questions)
pub const SLIDE_SETTLE: Duration = Duration::from_millis(1000);
/// Settle delay for a fade between the two pages of one essay
pub const FADE_SETTLE: Duration = Duration::from_millis(800);
/// Point within `FADE_SETTLE` at which fade-out completes and fade-in starts
pub const FADE_OUT: Duration = Duration::from_millis(400);

/// Responsive signal deciding the unit of display
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Viewport {
    /// Wide screens: one essay at a time, long essays split in two pages
    Standard,
    /// Narrow screens: one question-answer pair at a time
    Compact,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransitionStyle {
    /// Outgoing unit slides off-screen, incoming slides in from the
    /// opposite edge
    Slide,
    /// Page 0 to page 1 of the same essay: fade out, then fade in
    Fade,
}

impl TransitionStyle {
    pub fn settle_delay(&self) -> Duration {
        match self {
            TransitionStyle::Slide => SLIDE_SETTLE,
            TransitionStyle::Fade => FADE_SETTLE,
        }
    }
}

/// The atomic thing shown on screen at one time.
///
/// `slot` is a page index in `Viewport::Standard` and a question index in
/// `Viewport::Compact`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Unit {
    pub essay: usize,
    pub slot: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Transition {
    pub from: Unit,
    pub to: Unit,
    pub direction: Direction,
    pub style: TransitionStyle,
}

impl Transition {
    pub fn settle_delay(&self) -> Duration {
        self.style.settle_delay()
    }
}

/// One question with its answer, ready for display
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DisplayQuestion {
    pub label: &'static str,
    pub emoji: &'static str,
    pub answer: String,
}

impl DisplayQuestion {
    pub fn answer_len(&self) -> usize {
        self.answer.chars().count()
    }
}

/// An essay reduced to what the slideshow needs: its answered questions
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DisplayEssay {
    pub id: EssayId,
    pub nickname: Option<String>,
    pub created_at: Time,
    pub questions: Vec<DisplayQuestion>,
}

impl DisplayEssay {
    /// Returns `None` for essays with zero non-empty answers, which are
    /// excluded from the slideshow entirely
    pub fn from_essay(essay: &Essay) -> Option<DisplayEssay> {
        let questions = essay
            .answered_questions()
            .into_iter()
            .map(|q| DisplayQuestion {
                label: q.question.label,
                emoji: q.question.emoji,
                answer: q.answer.to_string(),
            })
            .collect::<Vec<_>>();
        if questions.is_empty() {
            return None;
        }
        Some(DisplayEssay {
            id: essay.id,
            nickname: essay.nickname.clone(),
            created_at: essay.created_at,
            questions,
        })
    }

    pub fn content_len(&self) -> usize {
        self.questions.iter().map(|q| q.answer_len()).sum()
    }

    /// Whether this essay's content must be divided across two pages
    /// (standard viewport only)
    pub fn should_split(&self) -> bool {
        should_split(&self.questions)
    }

    /// The two pages of this essay; page 1 is empty when not split
    pub fn pages(&self) -> (&[DisplayQuestion], &[DisplayQuestion]) {
        if self.should_split() {
            split_pages(&self.questions)
        } else {
            (&self.questions[..], &[])
        }
    }

    fn page_count(&self) -> usize {
        if self.should_split() {
            2
        } else {
            1
        }
    }

    fn page_len(&self, page: usize) -> usize {
        let (page0, page1) = self.pages();
        let qs = if page == 0 { page0 } else { page1 };
        qs.iter().map(|q| q.answer_len()).sum()
    }
}

pub fn should_split(questions: &[DisplayQuestion]) -> bool {
    if questions.is_empty() {
        return false;
    }
    let total: usize = questions.iter().map(|q| q.answer_len()).sum();
    total >= SPLIT_TOTAL_LEN
        || questions.len() >= SPLIT_QUESTION_COUNT
        || total / questions.len() >= SPLIT_AVG_LEN
        || questions.iter().any(|q| q.answer_len() >= SPLIT_SINGLE_LEN)
}

/// Divides a question list at the ceiling of half its length
pub fn split_pages(questions: &[DisplayQuestion]) -> (&[DisplayQuestion], &[DisplayQuestion]) {
    let mid = (questions.len() + 1) / 2;
    questions.split_at(mid)
}

/// Column count for rendering `count` questions on one page
pub fn grid_columns(count: usize, wide: bool) -> usize {
    match count {
        0..=2 => {
            if wide {
                2
            } else {
                1
            }
        }
        3..=4 => 2,
        5..=6 => {
            if wide {
                3
            } else {
                2
            }
        }
        _ => {
            if wide {
                4
            } else {
                2
            }
        }
    }
}

fn clamp(d: Duration, min: Duration, max: Duration) -> Duration {
    d.max(min).min(max)
}

/// Display time for a whole, unsplit essay
pub fn whole_essay_duration(content_len: usize) -> Duration {
    let extra = Duration::from_millis(10_000) * (content_len / 1000) as u32;
    clamp(WHOLE_ESSAY_BASE + extra, WHOLE_ESSAY_MIN, WHOLE_ESSAY_MAX)
}

/// Display time for one page of a split essay
pub fn page_duration(page_len: usize) -> Duration {
    let extra = Duration::from_millis(5_000) * (page_len / 500) as u32;
    clamp(PAGE_BASE + extra, PAGE_MIN, PAGE_MAX)
}

/// Display time for one question in the compact viewport
pub fn question_duration(answer_len: usize) -> Duration {
    let extra = Duration::from_millis(1_000) * (answer_len / 100) as u32;
    clamp(QUESTION_BASE + extra, QUESTION_MIN, QUESTION_MAX)
}

/// The slideshow state machine.
///
/// Two states: idle on the current unit, or one transition in flight.
/// `advance`/`retreat` begin a transition; the caller waits the settle
/// delay and then calls `commit`. Navigation while a transition is in
/// flight is ignored, so at most one transition exists at a time. Timers
/// are owned by the caller; `current_duration` says how long the current
/// unit should stay on screen.
#[derive(Clone, Debug)]
pub struct DisplayEngine {
    essays: Vec<DisplayEssay>,
    viewport: Viewport,
    current: Unit,
    in_flight: Option<Transition>,
}

impl DisplayEngine {
    pub fn new(essays: Vec<DisplayEssay>, viewport: Viewport) -> DisplayEngine {
        DisplayEngine {
            essays,
            viewport,
            current: Unit { essay: 0, slot: 0 },
            in_flight: None,
        }
    }

    pub fn from_essays<'a>(
        essays: impl IntoIterator<Item = &'a Essay>,
        viewport: Viewport,
    ) -> DisplayEngine {
        DisplayEngine::new(
            essays
                .into_iter()
                .filter_map(DisplayEssay::from_essay)
                .collect(),
            viewport,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.essays.is_empty()
    }

    pub fn essays(&self) -> &[DisplayEssay] {
        &self.essays
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Responsive class changes reset to the first unit of the current
    /// essay: slot indices do not carry over between unit kinds
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.current.slot = 0;
            self.in_flight = None;
        }
    }

    pub fn current(&self) -> Unit {
        self.current
    }

    pub fn current_essay(&self) -> Option<&DisplayEssay> {
        self.essays.get(self.current.essay)
    }

    pub fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&Transition> {
        self.in_flight.as_ref()
    }

    /// Number of units within one essay under the current viewport
    fn slots_of(&self, essay: usize) -> usize {
        let e = &self.essays[essay];
        match self.viewport {
            Viewport::Standard => e.page_count(),
            Viewport::Compact => e.questions.len(),
        }
    }

    /// How long the currently displayed unit should stay on screen
    pub fn current_duration(&self) -> Option<Duration> {
        let essay = self.current_essay()?;
        Some(match self.viewport {
            Viewport::Compact => {
                let q = essay.questions.get(self.current.slot)?;
                question_duration(q.answer_len())
            }
            Viewport::Standard => {
                if essay.should_split() {
                    page_duration(essay.page_len(self.current.slot))
                } else {
                    whole_essay_duration(essay.content_len())
                }
            }
        })
    }

    /// Begins a forward transition. Returns `None` (and changes nothing)
    /// when the list is empty or a transition is already in flight.
    pub fn advance(&mut self) -> Option<Transition> {
        self.begin(Direction::Forward)
    }

    /// Begins a backward transition, mirroring `advance`
    pub fn retreat(&mut self) -> Option<Transition> {
        self.begin(Direction::Backward)
    }

    fn begin(&mut self, direction: Direction) -> Option<Transition> {
        if self.is_empty() || self.in_flight.is_some() {
            return None;
        }
        let from = self.current;
        let to = match direction {
            Direction::Forward => self.next_unit(from),
            Direction::Backward => self.prev_unit(from),
        };
        // Fade only between adjacent pages of one essay: a wrap-around in a
        // single-essay list is still an essay-to-essay move
        let adjacent_page = match direction {
            Direction::Forward => to.slot == from.slot + 1,
            Direction::Backward => from.slot == to.slot + 1,
        };
        let style = if self.viewport == Viewport::Standard
            && from.essay == to.essay
            && adjacent_page
        {
            TransitionStyle::Fade
        } else {
            TransitionStyle::Slide
        };
        let t = Transition {
            from,
            to,
            direction,
            style,
        };
        self.in_flight = Some(t);
        Some(t)
    }

    /// Applies the in-flight transition after its settle delay has elapsed.
    /// Idle again afterwards.
    pub fn commit(&mut self) -> Option<Unit> {
        let t = self.in_flight.take()?;
        self.current = t.to;
        Some(t.to)
    }

    fn next_unit(&self, from: Unit) -> Unit {
        if from.slot + 1 < self.slots_of(from.essay) {
            return Unit {
                essay: from.essay,
                slot: from.slot + 1,
            };
        }
        // circular over essays
        Unit {
            essay: (from.essay + 1) % self.essays.len(),
            slot: 0,
        }
    }

    fn prev_unit(&self, from: Unit) -> Unit {
        if from.slot > 0 {
            return Unit {
                essay: from.essay,
                slot: from.slot - 1,
            };
        }
        let essay = (from.essay + self.essays.len() - 1) % self.essays.len();
        // entering an essay backwards lands on its last unit
        Unit {
            essay,
            slot: self.slots_of(essay) - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sugi_api::{EssayId, ANSWER_COUNT};

    fn essay(answers: [&str; ANSWER_COUNT]) -> Essay {
        Essay {
            id: EssayId(uuid::Uuid::new_v4()),
            nickname: None,
            answers: answers.map(String::from),
            created_at: Time::default(),
            likes_count: 0,
            comments_count: 0,
        }
    }

    fn display(answers: [&str; ANSWER_COUNT]) -> DisplayEssay {
        DisplayEssay::from_essay(&essay(answers)).expect("essay with no answers")
    }

    fn long(n: usize) -> String {
        "x".repeat(n)
    }

    #[test]
    fn split_on_total_length() {
        let e = display([&long(1000), &long(1000), "", "", "", "", ""]);
        assert!(e.should_split());
        let e = display([&long(700), &long(700), "", "", "", "", ""]);
        // 1400 total, 700 avg >= 300 still splits
        assert!(e.should_split());
    }

    #[test]
    fn split_on_question_count() {
        let e = display(["a", "b", "c", "d", "e", "f", "g"]);
        assert!(e.should_split());
    }

    #[test]
    fn split_on_average_length() {
        let e = display([&long(300), &long(310), "", "", "", "", ""]);
        assert!(e.should_split());
        let e = display([&long(100), &long(100), "", "", "", "", ""]);
        assert!(!e.should_split());
    }

    #[test]
    fn split_on_single_long_answer() {
        let e = display([&long(800), "a", "b", "", "", "", ""]);
        assert!(e.should_split());
    }

    #[test]
    fn short_essay_does_not_split() {
        let e = display(["short", "also short", "", "", "", "", ""]);
        assert!(!e.should_split());
    }

    #[test]
    fn pages_reconstruct_the_question_list() {
        for n in 1..=7 {
            let mut answers = [""; ANSWER_COUNT];
            let filled: Vec<String> = (0..n).map(|i| long(400) + &i.to_string()).collect();
            for (i, a) in filled.iter().enumerate() {
                answers[i] = a;
            }
            let e = display(answers);
            assert!(e.should_split(), "400-char answers must split");
            let (page0, page1) = e.pages();
            assert_eq!(page0.len(), (n + 1) / 2);
            assert_eq!(page1.len(), n - (n + 1) / 2);
            let rebuilt: Vec<_> = page0.iter().chain(page1.iter()).collect();
            assert_eq!(rebuilt.len(), e.questions.len());
            for (got, want) in rebuilt.iter().zip(e.questions.iter()) {
                assert_eq!(**got, *want);
            }
        }
    }

    #[test]
    fn single_long_question_gets_an_empty_second_page() {
        let e = display([&long(2100), "", "", "", "", "", ""]);
        assert!(e.should_split());
        let (page0, page1) = e.pages();
        assert_eq!(page0.len(), 1);
        assert_eq!(page1.len(), 0);
    }

    #[test]
    fn durations_are_clamped() {
        assert_eq!(whole_essay_duration(0), Duration::from_millis(30_000));
        assert_eq!(whole_essay_duration(999), Duration::from_millis(30_000));
        assert_eq!(whole_essay_duration(1000), Duration::from_millis(40_000));
        assert_eq!(whole_essay_duration(50_000), Duration::from_millis(90_000));

        assert_eq!(page_duration(0), Duration::from_millis(20_000));
        assert_eq!(page_duration(499), Duration::from_millis(20_000));
        assert_eq!(page_duration(500), Duration::from_millis(25_000));
        assert_eq!(page_duration(1_000_000), Duration::from_millis(60_000));

        assert_eq!(question_duration(0), Duration::from_millis(15_000));
        assert_eq!(question_duration(100), Duration::from_millis(16_000));
        assert_eq!(question_duration(100_000), Duration::from_millis(30_000));
    }

    #[test]
    fn fade_out_completes_before_the_fade_settles() {
        // the fade-in half needs room within the settle window
        assert!(FADE_OUT < FADE_SETTLE);
    }

    #[test]
    fn durations_are_monotonic() {
        for f in [whole_essay_duration, page_duration, question_duration] {
            let mut prev = Duration::ZERO;
            for len in (0..5000).step_by(50) {
                let d = f(len);
                assert!(d >= prev, "duration decreased at length {}", len);
                prev = d;
            }
        }
    }

    #[test]
    fn grid_column_table() {
        for (count, narrow, wide) in [
            (1, 1, 2),
            (2, 1, 2),
            (3, 2, 2),
            (4, 2, 2),
            (5, 2, 3),
            (6, 2, 3),
            (7, 2, 4),
            (8, 2, 4),
        ] {
            assert_eq!(grid_columns(count, false), narrow);
            assert_eq!(grid_columns(count, true), wide);
        }
    }

    fn engine(essays: Vec<DisplayEssay>, viewport: Viewport) -> DisplayEngine {
        DisplayEngine::new(essays, viewport)
    }

    fn step(e: &mut DisplayEngine, dir: Direction) -> Transition {
        let t = match dir {
            Direction::Forward => e.advance(),
            Direction::Backward => e.retreat(),
        }
        .expect("navigation refused while idle");
        e.commit().unwrap();
        t
    }

    #[test]
    fn circular_navigation_over_whole_essays() {
        let mut e = engine(
            vec![
                display(["a", "", "", "", "", "", ""]),
                display(["b", "", "", "", "", "", ""]),
                display(["c", "", "", "", "", "", ""]),
            ],
            Viewport::Standard,
        );
        assert_eq!(e.current(), Unit { essay: 0, slot: 0 });
        for _ in 0..3 {
            step(&mut e, Direction::Forward);
        }
        assert_eq!(e.current(), Unit { essay: 0, slot: 0 });
        step(&mut e, Direction::Backward);
        assert_eq!(e.current(), Unit { essay: 2, slot: 0 });
    }

    #[test]
    fn page_transitions_fade_and_essay_transitions_slide() {
        let mut e = engine(
            vec![
                display([&long(2500), "", "", "", "", "", ""]),
                display(["tiny", "", "", "", "", "", ""]),
            ],
            Viewport::Standard,
        );
        let t = step(&mut e, Direction::Forward);
        assert_eq!(t.style, TransitionStyle::Fade);
        assert_eq!(t.settle_delay(), FADE_SETTLE);
        assert_eq!(e.current(), Unit { essay: 0, slot: 1 });

        let t = step(&mut e, Direction::Forward);
        assert_eq!(t.style, TransitionStyle::Slide);
        assert_eq!(t.settle_delay(), SLIDE_SETTLE);
        assert_eq!(e.current(), Unit { essay: 1, slot: 0 });
    }

    #[test]
    fn single_essay_wrap_is_a_slide() {
        let mut e = engine(
            vec![display([&long(2500), &long(100), "", "", "", "", ""])],
            Viewport::Standard,
        );
        assert_eq!(step(&mut e, Direction::Forward).style, TransitionStyle::Fade);
        // wrapping from the last page back to page 0 of the same (only)
        // essay is an essay move, not a page move
        assert_eq!(step(&mut e, Direction::Forward).style, TransitionStyle::Slide);
        assert_eq!(e.current(), Unit { essay: 0, slot: 0 });
    }

    #[test]
    fn backward_into_split_essay_lands_on_last_page() {
        let mut e = engine(
            vec![
                display([&long(2500), &long(100), "", "", "", "", ""]),
                display(["tiny", "", "", "", "", "", ""]),
            ],
            Viewport::Standard,
        );
        // start on essay 1, go backward
        step(&mut e, Direction::Forward);
        step(&mut e, Direction::Forward);
        assert_eq!(e.current(), Unit { essay: 1, slot: 0 });
        let t = step(&mut e, Direction::Backward);
        assert_eq!(t.style, TransitionStyle::Slide);
        assert_eq!(e.current(), Unit { essay: 0, slot: 1 });
    }

    #[test]
    fn compact_viewport_steps_question_by_question() {
        let mut e = engine(
            vec![
                display(["one", "two", "", "", "", "", ""]),
                display(["three", "", "", "", "", "", ""]),
            ],
            Viewport::Compact,
        );
        let t = step(&mut e, Direction::Forward);
        assert_eq!(t.style, TransitionStyle::Slide);
        assert_eq!(e.current(), Unit { essay: 0, slot: 1 });
        step(&mut e, Direction::Forward);
        assert_eq!(e.current(), Unit { essay: 1, slot: 0 });
        // backward crosses into the previous essay's last question
        step(&mut e, Direction::Backward);
        assert_eq!(e.current(), Unit { essay: 0, slot: 1 });
    }

    #[test]
    fn navigation_ignored_while_animating() {
        let mut e = engine(
            vec![
                display(["a", "", "", "", "", "", ""]),
                display(["b", "", "", "", "", "", ""]),
            ],
            Viewport::Standard,
        );
        assert!(e.advance().is_some());
        assert!(e.is_animating());
        assert!(e.advance().is_none());
        assert!(e.retreat().is_none());
        e.commit().unwrap();
        assert!(!e.is_animating());
        assert_eq!(e.current(), Unit { essay: 1, slot: 0 });
    }

    #[test]
    fn empty_list_never_navigates() {
        let mut e = engine(vec![], Viewport::Standard);
        assert!(e.is_empty());
        assert!(e.advance().is_none());
        assert!(e.retreat().is_none());
        assert!(e.current_duration().is_none());
    }

    #[test]
    fn current_duration_follows_the_unit() {
        let mut e = engine(
            vec![display([&long(2100), &long(100), "", "", "", "", ""])],
            Viewport::Standard,
        );
        // split essay: page durations, not the whole-essay duration
        let (page0, page1) = e.current_essay().unwrap().pages();
        let len0: usize = page0.iter().map(|q| q.answer_len()).sum();
        let len1: usize = page1.iter().map(|q| q.answer_len()).sum();
        assert_eq!(e.current_duration(), Some(page_duration(len0)));
        step(&mut e, Direction::Forward);
        assert_eq!(e.current_duration(), Some(page_duration(len1)));

        e.set_viewport(Viewport::Compact);
        assert_eq!(e.current(), Unit { essay: 0, slot: 0 });
        assert_eq!(e.current_duration(), Some(question_duration(2100)));
    }

    #[test]
    fn essays_without_answers_are_excluded() {
        let e = DisplayEngine::from_essays(
            [
                essay(["", "", "", "", "", "", ""]),
                essay(["kept", "", "", "", "", "", ""]),
                essay([" \n", "\t", "", "", "", "", ""]),
            ]
            .iter(),
            Viewport::Standard,
        );
        assert_eq!(e.essays().len(), 1);
    }
}
