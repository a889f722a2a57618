//! # Proofmark Core
//!
//! Live input tracking and floating-overlay state machine for Proofmark.
//!
//! ## Architecture
//!
//! ```text
//!  host page ──PageEvent──▶ Dispatcher ──owns──▶ Option<Control>
//!      ▲                        │                    │
//!      │                        │ spawn               │ present / dismiss
//!      │                        ▼                    ▼
//!      │              correction task ──▶ GrammarProvider
//!      │                        │
//!      └────── CorrectionSettled (back into the same queue)
//! ```
//!
//! All state mutation happens inside [`Dispatcher::handle`]. Provider calls
//! run as tokio tasks that report back through the event queue, and timers
//! are plain deadlines in a per-control [`TimerRegistry`] driven by a
//! [`Clock`], so the whole machine can be exercised with a [`ManualClock`]
//! and a [`MemoryPage`].
//!
//! ## Key Components
//!
//! - [`diff`]: word-level diff between original and corrected text
//! - [`position`]: anchored placement with flip/shift collision handling
//! - [`Control`]: one tracked element's button, tooltip and correction state
//! - [`Dispatcher`]: owns the single live control and routes page events

pub mod clock;
pub mod control;
pub mod correction;
pub mod diff;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod memory_page;
pub mod position;
pub mod timers;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use control::{Control, ControlFailure, CorrectionState};
pub use correction::{CorrectionRequest, RequestId};
pub use diff::{diff, render_html, render_inline, word_count};
pub use dispatcher::{Dispatcher, EventSender};
pub use error::{DispatchError, DispatchResult};
pub use events::{CorrectionSettled, PageEvent};
pub use memory_page::{MemoryElement, MemoryPage};
pub use position::{Alignment, Offset, Placement, PlacementConfig, PlacementResult, Side, place};
pub use timers::{TimerKind, TimerRegistry};

// Re-export CancellationToken for convenience
pub use tokio_util::sync::CancellationToken;
