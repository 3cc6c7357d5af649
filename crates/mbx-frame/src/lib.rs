//! Record framing for mbxsync.
//!
//! Splits containers into logical records:
//!
//! - [`mbox`] -- messages in a `From - `-delimited store, with byte spans
//! - [`state`] -- tagged lines of a `popstate.dat` file
//! - [`read_span`] -- read a framed message back out by its span

pub mod error;
pub mod mbox;
pub mod span;
pub mod state;

pub use error::{FrameError, FrameResult};
pub use mbox::{ends_in_header, frame_mailbox, frame_messages, is_boundary, FramedMessage, MessageFramer};
pub use span::read_span;
pub use state::{frame_state_file, parse_state, tag_of, StateFile, StateLine, DEFAULT_HEADER_LINES};
