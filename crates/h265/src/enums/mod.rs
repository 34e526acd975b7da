mod aspect_ratio_idc;
pub use aspect_ratio_idc::*;

mod nal_unit_type;
pub use nal_unit_type::*;

mod video_format;
pub use video_format::*;

mod parallelism_type;
pub use parallelism_type::*;

mod constant_frame_rate;
pub use constant_frame_rate::*;

mod num_temporal_layers;
pub use num_temporal_layers::*;

mod profile_compatibility_flags;
pub use profile_compatibility_flags::*;
