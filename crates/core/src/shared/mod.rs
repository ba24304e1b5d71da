pub mod canvas;
pub mod constants;
pub mod face_rect;
pub mod sub_image;
