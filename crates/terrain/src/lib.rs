//! Streaming terrain: synthesizes one height/color/normal surface from the 3×3 tile
//! neighborhood around the viewpoint and rebuilds it whenever the viewpoint changes tile.

pub mod colorize;
pub mod error;
pub mod heightmap;
pub mod normals;
pub mod streamer;
pub mod surface;
pub mod tracker;

pub use colorize::*;
pub use error::*;
pub use heightmap::*;
pub use normals::*;
pub use streamer::*;
pub use surface::*;
pub use tracker::*;
