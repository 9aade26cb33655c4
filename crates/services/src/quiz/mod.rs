mod outcome;
mod progress;
mod session;
mod workflow;

pub use outcome::{PASS_THRESHOLD, QuizOutcome};
pub use progress::QuizProgress;
pub use session::{QuizSession, QuizState};
pub use workflow::QuizService;
