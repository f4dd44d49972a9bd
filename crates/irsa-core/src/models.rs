pub mod angle;
pub mod coords;
pub mod spatial;
pub mod table;

pub use angle::{AngleUnit, Dimension};
pub use coords::{Coordinates, Frame, SkyCoord};
pub use spatial::{PolygonVertex, Spatial};
pub use table::{Cell, Field, Table};
