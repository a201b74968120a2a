//! Dateiformate: Kegel-Dateien, Punktlisten, SLAM-Graph-Dump und C-Export.

pub mod c_export;
pub mod cone_file;
pub mod graph_file;
pub mod points;

pub use c_export::{c_color_name, format_c_initializer, write_c_initializer};
pub use cone_file::{
    cones_from_str, cones_to_string, read_cone_file, write_cone_file, ConeFile, ConeFormat,
    ConeRecord,
};
pub use graph_file::{parse_graph, read_graph_file, Landmark, Measurement, Pose, SlamGraph};
pub use points::{format_point_list, parse_point_list, read_point_list};
