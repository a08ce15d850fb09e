//! Shotform Pose Model
//!
//! Defines the data contracts shared by every Shotform crate:
//! - **Joints:** Named body landmarks and shooting-side selection
//! - **Frames:** Per-frame observations and the recorded landmark stream format
//! - **Feedback:** Validated angle-band tables
//! - **Settings:** Tunables of one shot analysis
//! - **Report:** Release event, angle measurement, and shot status
//!
//! Coordinates follow image convention: origin top-left, `y` grows
//! downward, so a smaller `y` is a higher physical position.

pub mod feedback;
pub mod frame;
pub mod joint;
pub mod landmark;
pub mod report;
pub mod settings;

pub use feedback::*;
pub use frame::*;
pub use joint::*;
pub use landmark::*;
pub use report::*;
pub use settings::*;
