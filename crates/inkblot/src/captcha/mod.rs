//! Captcha generation and verification.
//!
//! The compositor renders a random solution into noisy ASCII art; the
//! resulting [`Captcha`] tracks attempts against it, either directly via
//! [`Captcha::check`] or through an interactive terminal session.

mod compositor;
mod session;
mod tracker;

pub use compositor::{CompositorSettings, GlyphCompositor};
pub use session::StdinTerminal;
pub use tracker::Captcha;
