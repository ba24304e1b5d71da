pub mod blur_image_use_case;
pub mod detect_faces_use_case;
pub mod redact_faces_use_case;
pub mod region_filter;
pub mod response_formatter;
