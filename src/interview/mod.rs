//! Guided interview — the linear intake flow.
//!
//! The interview walks a fixed sequence of questions: every forward or
//! backward transition saves the currently displayed value, and the forward
//! transition at the last question signals finalize instead of moving. The
//! REST layer in [`routes`] is the front-end contract around the state
//! machine in [`state`].

pub mod routes;
pub mod state;

pub use routes::{InterviewRouteState, QuestionView, interview_routes};
pub use state::{InterviewState, Transition};
