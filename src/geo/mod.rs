pub mod group;
pub mod kml;

pub use group::{export_groups, group_points, parse_point, GeoExport, PointGroup};
pub use kml::{render_kml, GeoPoint, GeoWriter, KmlWriter};
