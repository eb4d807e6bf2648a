// Input command demultiplexer for rdp-session-bridge.
//
// Provides the pure (side-effect free) half of the Command Parser &
// Dispatcher (C6): decoding tab-separated tagged records off the inputs
// channel into a typed Command. Translating a Command into calls against
// the RDP facade / Session policy is the dispatcher's job, in the
// rdp-session crate, since that step needs mutable session state (e.g.
// whether a domain has already been set) that this crate deliberately
// does not hold.
//
// - command.rs: Command enum, record tokenizer, per-tag argument parsing
// - keymap.rs: extended-scancode set, mouse wheel flag constants

pub mod command;
pub mod keymap;

pub use command::{parse_batch, Command, MouseButtonKind, ParseError, ScaleRequest};
