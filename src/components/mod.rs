//! ECS components tweens read and write.
//!
//! Submodules overview:
//! - [`anchoredposition`] – UI anchored position
//! - [`canvasgroup`] – alpha shared by a UI subtree
//! - [`color`] – RGBA color value
//! - [`globaltransform`] – world transform computed from the hierarchy
//! - [`inactive`] – marker for entities fan-out playback skips
//! - [`mapposition`] – local position (pivot) for an entity
//! - [`rotation`] – Euler rotation in degrees
//! - [`scale`] – local scale factor
//! - [`sprite`] – current sprite key
//! - [`tint`] – sprite renderer color
//! - [`uiimage`] – UI graphic color and fill amount
//! - [`zindex`] – sorting order for 2D drawing

pub mod anchoredposition;
pub mod canvasgroup;
pub mod color;
pub mod globaltransform;
pub mod inactive;
pub mod mapposition;
pub mod rotation;
pub mod scale;
pub mod sprite;
pub mod tint;
pub mod uiimage;
pub mod zindex;
