//! Interactive console chat against the board.
//!
//! The terminal stands in for a chat network: `terminal` is the transport,
//! `input` reads and classifies lines, and `loop_runner` wires both to the
//! event loop. Entry point: `loop_runner::run_chat_loop`.

pub mod terminal;
pub mod input;
pub mod loop_runner;
